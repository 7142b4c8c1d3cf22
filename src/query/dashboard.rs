//! Dashboard View Module
//! Derives everything one dashboard frame shows from a loaded snapshot and
//! the current selection.

use super::filter::{AggregationMode, DateRange, FilterQuery, RegionFilter, SubRegionFilter};
use super::location::resolve_location;
use super::selector::SeriesSelector;
use super::series::{QueryError, TimeSeries};
use crate::data::{DashboardData, Dataset, GeoPoint, LocationTable, RegionSeriesTable};

/// Exponent of the sub-linear marker size transform.
pub const MARKER_EXPONENT: f64 = 0.35;
/// Marker radius scale, in points.
pub const MARKER_SCALE: f64 = 0.05;

/// Label of the worldwide entry in the region selector.
pub const WORLDWIDE_LABEL: &str = "Worldwide";
/// Label of the all-provinces entry in the sub-region selector.
pub const ALL_SUB_REGIONS_LABEL: &str = "All";

/// Selection driving one dashboard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSettings {
    /// Filters; its mode applies to the summary metrics.
    pub query: FilterQuery,
    pub cases_plot_mode: AggregationMode,
    pub deaths_plot_mode: AggregationMode,
    pub map_dataset: Dataset,
}

/// A bubble on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub label: String,
    pub position: GeoPoint,
    pub value: f64,
    pub radius: f64,
    pub dataset: Dataset,
}

/// Derived content of the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub confirmed: Result<i64, QueryError>,
    pub deaths: Result<i64, QueryError>,
    pub summary_mode: AggregationMode,
    pub cases_series: TimeSeries,
    pub deaths_series: TimeSeries,
    pub markers: Vec<MapMarker>,
    pub map_dataset: Dataset,
}

impl DashboardView {
    /// Evaluate `settings` against `data`.
    ///
    /// The summary metrics and both charts start from the same clipped
    /// cumulative series and apply their own mode, so no series is ever
    /// differenced twice.
    pub fn build(data: &DashboardData, settings: &ViewSettings) -> Self {
        let query = &settings.query;
        let confirmed = SeriesSelector::select_time_series(
            query,
            &data.confirmed.aggregated,
            &data.confirmed.raw,
        );
        let deaths =
            SeriesSelector::select_time_series(query, &data.deaths.aggregated, &data.deaths.raw);

        let markers = map_markers(
            &data.tables(settings.map_dataset).aggregated,
            &data.locations,
            query,
            settings.map_dataset,
        );

        tracing::debug!(
            points = confirmed.len(),
            markers = markers.len(),
            "derived dashboard view"
        );

        Self {
            confirmed: confirmed.with_mode(query.mode()).latest_value(),
            deaths: deaths.with_mode(query.mode()).latest_value(),
            summary_mode: query.mode(),
            cases_series: confirmed.with_mode(settings.cases_plot_mode),
            deaths_series: deaths.with_mode(settings.deaths_plot_mode),
            markers,
            map_dataset: settings.map_dataset,
        }
    }
}

/// One marker per region with a positive value at the last date in range.
///
/// The selected country is placed at its selected sub-region when one is
/// chosen, falling back to the country location. Regions without
/// coordinates are left off the map.
pub fn map_markers(
    table: &RegionSeriesTable,
    locations: &LocationTable,
    query: &FilterQuery,
    dataset: Dataset,
) -> Vec<MapMarker> {
    let range = query.range();
    let Some(last_idx) = table.dates().iter().rposition(|date| range.contains(*date)) else {
        return Vec::new();
    };

    table
        .iter_columns()
        .filter_map(|(region, values)| {
            let value = values[last_idx];
            if value <= 0.0 {
                return None;
            }

            let selected = query.region().name() == Some(region);
            let position = match query.sub_region() {
                SubRegionFilter::Named(_) if selected => {
                    resolve_location(region, query.sub_region(), locations)
                        .or_else(|| resolve_location(region, &SubRegionFilter::All, locations))
                }
                _ => resolve_location(region, &SubRegionFilter::All, locations),
            }?;

            Some(MapMarker {
                label: format!("{}: {}", region, format_count(value.trunc() as i64)),
                position,
                value,
                radius: marker_radius(value),
                dataset,
            })
        })
        .collect()
}

/// Marker radius, monotonic and sub-linear in `value`.
pub fn marker_radius(value: f64) -> f64 {
    value.max(0.0).powf(MARKER_EXPONENT) * MARKER_SCALE
}

/// Integer with `,` group separators, e.g. `1,234,567`.
pub fn format_count(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Region selector entries: worldwide first, then the sorted regions.
pub fn region_options(data: &DashboardData) -> Vec<String> {
    std::iter::once(WORLDWIDE_LABEL.to_string())
        .chain(data.regions().iter().cloned())
        .collect()
}

/// Sub-region selector entries, or `None` when the region has at most one
/// distinct sub-region and no selector should be shown.
pub fn sub_region_options(locations: &LocationTable, region: &str) -> Option<Vec<String>> {
    let sub_regions = locations.sub_regions(region);
    if sub_regions.len() <= 1 {
        return None;
    }

    Some(
        std::iter::once(ALL_SUB_REGIONS_LABEL.to_string())
            .chain(sub_regions.into_iter().filter(|name| !name.is_empty()))
            .collect(),
    )
}

/// Map a selector label back to a filter.
pub fn region_filter(label: &str) -> RegionFilter {
    if label == WORLDWIDE_LABEL {
        RegionFilter::All
    } else {
        RegionFilter::Region(label.to_string())
    }
}

/// Map a selector label back to a filter.
pub fn sub_region_filter(label: Option<&str>) -> SubRegionFilter {
    match label {
        None | Some(ALL_SUB_REGIONS_LABEL) => SubRegionFilter::All,
        Some(name) => SubRegionFilter::Named(name.to_string()),
    }
}

/// Default range covering every loaded date.
pub fn full_range(data: &DashboardData) -> Option<DateRange> {
    let (start, end) = data.confirmed.aggregated.date_bounds()?;
    Some(DateRange::new(start, end))
}
