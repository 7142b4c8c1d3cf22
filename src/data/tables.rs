//! In-memory tables derived from a source dataset.

use chrono::NaiveDate;
use std::collections::HashSet;

/// Cumulative counts indexed by date, one column per region.
///
/// Dates are unique and ascending; regions are sorted by name. Every column
/// has exactly one value per date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionSeriesTable {
    dates: Vec<NaiveDate>,
    regions: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl RegionSeriesTable {
    /// Build a table from `(region, values)` columns aligned with `dates`.
    ///
    /// Columns are reordered by region name.
    pub fn new(dates: Vec<NaiveDate>, mut columns: Vec<(String, Vec<f64>)>) -> Self {
        columns.sort_by(|a, b| a.0.cmp(&b.0));
        let (regions, columns) = columns.into_iter().unzip();
        Self {
            dates,
            regions,
            columns,
        }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    /// Values of one region, aligned with [`dates`](Self::dates).
    pub fn column(&self, region: &str) -> Option<&[f64]> {
        self.regions
            .binary_search_by(|r| r.as_str().cmp(region))
            .ok()
            .map(|idx| self.columns[idx].as_slice())
    }

    /// Iterate `(region, values)` pairs in region order.
    pub fn iter_columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.regions
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Vec::as_slice))
    }

    /// Cross-region sum for every date.
    pub fn totals(&self) -> Vec<f64> {
        let mut totals = vec![0.0; self.dates.len()];
        for column in &self.columns {
            for (total, value) in totals.iter_mut().zip(column) {
                *total += value;
            }
        }
        totals
    }

    /// First and last date of the table.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((*self.dates.first()?, *self.dates.last()?))
    }
}

/// One source row: a country or one of its provinces.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub region: String,
    /// Empty when the source row has no province breakdown.
    pub sub_region: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Cumulative counts aligned with the owning table's dates.
    pub counts: Vec<f64>,
}

/// Unaggregated source rows sharing one ascending date axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecordTable {
    dates: Vec<NaiveDate>,
    records: Vec<RawRecord>,
}

impl RawRecordTable {
    pub fn new(dates: Vec<NaiveDate>, records: Vec<RawRecord>) -> Self {
        Self { dates, records }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    /// Records of `region`, restricted to `sub_region` when given.
    pub fn matching<'a>(
        &'a self,
        region: &'a str,
        sub_region: Option<&'a str>,
    ) -> impl Iterator<Item = &'a RawRecord> + 'a {
        self.records.iter().filter(move |record| {
            record.region == region && sub_region.map_or(true, |sub| record.sub_region == sub)
        })
    }
}

/// Latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// One distinct `(region, sub_region, lat, lon)` row.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationEntry {
    pub region: String,
    pub sub_region: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl LocationEntry {
    pub fn point(&self) -> Option<GeoPoint> {
        Some(GeoPoint {
            lat: self.lat?,
            lon: self.lon?,
        })
    }
}

/// Location lookup table, in source row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationTable {
    entries: Vec<LocationEntry>,
}

impl LocationTable {
    /// Select the identifying columns of every record and drop exact
    /// duplicate rows, keeping the first occurrence.
    pub fn from_records(raw: &RawRecordTable) -> Self {
        let mut seen: HashSet<(&str, &str, Option<u64>, Option<u64>)> = HashSet::new();
        let entries = raw
            .records()
            .iter()
            .filter(|r| {
                seen.insert((
                    r.region.as_str(),
                    r.sub_region.as_str(),
                    r.lat.map(f64::to_bits),
                    r.lon.map(f64::to_bits),
                ))
            })
            .map(|r| LocationEntry {
                region: r.region.clone(),
                sub_region: r.sub_region.clone(),
                lat: r.lat,
                lon: r.lon,
            })
            .collect();

        Self { entries }
    }

    pub fn entries(&self) -> &[LocationEntry] {
        &self.entries
    }

    /// Rows belonging to `region`, in source order.
    pub fn for_region<'a>(&'a self, region: &'a str) -> impl Iterator<Item = &'a LocationEntry> + 'a {
        self.entries.iter().filter(move |e| e.region == region)
    }

    /// Sorted, distinct sub-region names of `region` (the empty
    /// country-level name included when present).
    pub fn sub_regions(&self, region: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .for_region(region)
            .map(|e| e.sub_region.clone())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, m, d).unwrap()
    }

    fn record(region: &str, sub: &str, lat: Option<f64>, lon: Option<f64>) -> RawRecord {
        RawRecord {
            region: region.to_string(),
            sub_region: sub.to_string(),
            lat,
            lon,
            counts: vec![1.0],
        }
    }

    #[test]
    fn region_table_sorts_columns_and_sums_totals() {
        let table = RegionSeriesTable::new(
            vec![date(1, 1), date(1, 2)],
            vec![
                ("Zambia".to_string(), vec![1.0, 2.0]),
                ("Albania".to_string(), vec![10.0, 20.0]),
            ],
        );

        assert_eq!(table.regions(), ["Albania", "Zambia"]);
        assert_eq!(table.column("Zambia"), Some(&[1.0, 2.0][..]));
        assert_eq!(table.column("Chad"), None);
        assert_eq!(table.totals(), vec![11.0, 22.0]);
        assert_eq!(table.date_bounds(), Some((date(1, 1), date(1, 2))));
    }

    #[test]
    fn locations_drop_exact_duplicates_only() {
        let raw = RawRecordTable::new(
            vec![date(1, 1)],
            vec![
                record("France", "", Some(46.2), Some(2.2)),
                record("France", "", Some(46.2), Some(2.2)),
                record("France", "Reunion", Some(-21.1), Some(55.5)),
                record("France", "Reunion", Some(-21.2), Some(55.5)),
            ],
        );

        let locations = LocationTable::from_records(&raw);
        assert_eq!(locations.entries().len(), 3);
        assert_eq!(locations.entries()[1].lat, Some(-21.1));
        assert_eq!(locations.entries()[2].lat, Some(-21.2));
    }

    #[test]
    fn sub_regions_are_sorted_and_distinct() {
        let raw = RawRecordTable::new(
            vec![date(1, 1)],
            vec![
                record("Canada", "Ontario", Some(51.2), Some(-85.3)),
                record("Canada", "Alberta", Some(53.9), Some(-116.5)),
                record("Canada", "Ontario", Some(51.3), Some(-85.3)),
                record("Chad", "", Some(15.4), Some(18.7)),
            ],
        );

        let locations = LocationTable::from_records(&raw);
        assert_eq!(locations.sub_regions("Canada"), vec!["Alberta", "Ontario"]);
        assert_eq!(locations.sub_regions("Chad"), vec![""]);
        assert!(locations.sub_regions("Peru").is_empty());
    }

    #[test]
    fn missing_coordinates_give_no_point() {
        let entry = LocationEntry {
            region: "Canada".to_string(),
            sub_region: "Repatriated Travellers".to_string(),
            lat: None,
            lon: None,
        };
        assert_eq!(entry.point(), None);
    }
}
