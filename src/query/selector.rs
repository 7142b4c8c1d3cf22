//! Series Selector Module
//! Slices the loaded tables into the time series a filter asks for.

use super::filter::{FilterQuery, RegionFilter};
use super::series::TimeSeries;
use crate::data::{RawRecordTable, RegionSeriesTable};

/// Derives time series from the loaded tables.
pub struct SeriesSelector;

impl SeriesSelector {
    /// Cumulative series for `query`, clipped to its date range.
    ///
    /// Worldwide queries sum every column of the aggregated table. Other
    /// queries sum the raw rows of the region, narrowed to the sub-region
    /// unless it is `All`. No matching rows yield an empty series.
    pub fn select_time_series(
        query: &FilterQuery,
        aggregated: &RegionSeriesTable,
        raw: &RawRecordTable,
    ) -> TimeSeries {
        let series = match query.region() {
            RegionFilter::All => TimeSeries::new(aggregated.dates(), &aggregated.totals()),
            RegionFilter::Region(region) => {
                Self::sum_records(raw, region, query.sub_region().name())
            }
        };
        series.clip(query.range())
    }

    /// Element-wise sum of the matching raw rows.
    pub fn sum_records(raw: &RawRecordTable, region: &str, sub_region: Option<&str>) -> TimeSeries {
        let mut totals: Option<Vec<f64>> = None;
        for record in raw.matching(region, sub_region) {
            let totals = totals.get_or_insert_with(|| vec![0.0; raw.dates().len()]);
            for (total, count) in totals.iter_mut().zip(&record.counts) {
                *total += count;
            }
        }

        match totals {
            Some(totals) => TimeSeries::new(raw.dates(), &totals),
            None => TimeSeries::empty(),
        }
    }
}
