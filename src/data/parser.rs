//! Source Frame Parser Module
//! Validates a wide time-series CSV (one column per date) and reshapes it
//! into the raw record table and the per-region aggregate.

use super::tables::{RawRecord, RawRecordTable, RegionSeriesTable};
use chrono::NaiveDate;
use polars::prelude::*;
use std::io::Cursor;
use thiserror::Error;

pub const SUB_REGION_COLUMN: &str = "Province/State";
pub const REGION_COLUMN: &str = "Country/Region";
pub const LAT_COLUMN: &str = "Lat";
pub const LON_COLUMN: &str = "Long";

/// Identifying columns; every other column is a date.
pub const IDENTIFYING_COLUMNS: [&str; 4] =
    [SUB_REGION_COLUMN, REGION_COLUMN, LAT_COLUMN, LON_COLUMN];

/// Date header format: `month/day/2-digit-year`, e.g. `1/22/20`.
pub const DATE_HEADER_FORMAT: &str = "%m/%d/%y";

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),
    #[error("Unrecognized date column header: {0:?}")]
    InvalidDateHeader(String),
    #[error("Duplicate date column: {0}")]
    DuplicateDate(NaiveDate),
    #[error("Date column {0:?} is not numeric")]
    NonNumericColumn(String),
    #[error("Source has no date columns")]
    NoDateColumns,
    #[error("{0} row(s) have an empty country/region")]
    MissingRegion(usize),
}

/// A validated source CSV.
pub struct SourceFrame {
    df: DataFrame,
    /// Date columns in ascending date order, with their header names.
    date_columns: Vec<(String, NaiveDate)>,
}

impl SourceFrame {
    /// Parse CSV text and validate its schema.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .into_reader_with_file_handle(Cursor::new(text.as_bytes().to_vec()))
            .finish()?;

        Self::from_dataframe(df)
    }

    /// Validate an already loaded DataFrame.
    pub fn from_dataframe(df: DataFrame) -> Result<Self, ParseError> {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        for required in IDENTIFYING_COLUMNS {
            if !names.iter().any(|name| name == required) {
                return Err(ParseError::MissingColumn(required));
            }
        }

        let mut date_columns = Vec::with_capacity(names.len());
        for name in names
            .iter()
            .filter(|name| !IDENTIFYING_COLUMNS.contains(&name.as_str()))
        {
            let date = parse_date_header(name)?;
            if !is_count_column(df.column(name)?) {
                return Err(ParseError::NonNumericColumn(name.clone()));
            }
            date_columns.push((name.clone(), date));
        }

        if date_columns.is_empty() {
            return Err(ParseError::NoDateColumns);
        }

        date_columns.sort_by_key(|(_, date)| *date);
        if let Some(pair) = date_columns.windows(2).find(|pair| pair[0].1 == pair[1].1) {
            return Err(ParseError::DuplicateDate(pair[0].1));
        }

        let missing_regions = df.column(REGION_COLUMN)?.null_count();
        if missing_regions > 0 {
            return Err(ParseError::MissingRegion(missing_regions));
        }

        tracing::debug!(
            rows = df.height(),
            dates = date_columns.len(),
            "validated source frame"
        );

        Ok(Self { df, date_columns })
    }

    /// Ascending observation dates.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.date_columns.iter().map(|(_, date)| *date).collect()
    }

    pub fn row_count(&self) -> usize {
        self.df.height()
    }

    /// One record per source row. Empty sub-region cells become `""` and
    /// empty count cells become 0.
    pub fn raw_records(&self) -> Result<RawRecordTable, ParseError> {
        let regions = string_values(&self.df, REGION_COLUMN)?;
        let sub_regions = string_values(&self.df, SUB_REGION_COLUMN)?;
        let lats = float_values(&self.df, LAT_COLUMN)?;
        let lons = float_values(&self.df, LON_COLUMN)?;

        let counts_by_date = self
            .date_columns
            .iter()
            .map(|(name, _)| float_values(&self.df, name))
            .collect::<Result<Vec<_>, _>>()?;

        let records = (0..self.df.height())
            .map(|row| RawRecord {
                region: regions[row].clone().unwrap_or_default(),
                sub_region: sub_regions[row].clone().unwrap_or_default(),
                lat: lats[row],
                lon: lons[row],
                counts: counts_by_date
                    .iter()
                    .map(|values| values[row].unwrap_or(0.0))
                    .collect(),
            })
            .collect();

        Ok(RawRecordTable::new(self.dates(), records))
    }

    /// Sum all rows sharing a country/region and pivot the result so that
    /// rows are dates and columns are regions.
    pub fn aggregate_by_region(&self) -> Result<RegionSeriesTable, ParseError> {
        let sums: Vec<Expr> = self
            .date_columns
            .iter()
            .map(|(name, _)| col(name.as_str()).cast(DataType::Float64).sum())
            .collect();

        let grouped = self
            .df
            .clone()
            .lazy()
            .group_by([col(REGION_COLUMN)])
            .agg(sums)
            .collect()?;

        let mut columns: Vec<(String, Vec<f64>)> = string_values(&grouped, REGION_COLUMN)?
            .into_iter()
            .map(|region| {
                (
                    region.unwrap_or_default(),
                    Vec::with_capacity(self.date_columns.len()),
                )
            })
            .collect();

        for (name, _) in &self.date_columns {
            let values = float_values(&grouped, name)?;
            for ((_, column), value) in columns.iter_mut().zip(values) {
                column.push(value.unwrap_or(0.0));
            }
        }

        tracing::debug!(
            regions = columns.len(),
            dates = self.date_columns.len(),
            "aggregated source frame by region"
        );

        Ok(RegionSeriesTable::new(self.dates(), columns))
    }
}

/// Parse a `month/day/2-digit-year` column header.
pub fn parse_date_header(header: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(header.trim(), DATE_HEADER_FORMAT)
        .map_err(|_| ParseError::InvalidDateHeader(header.to_string()))
}

/// Numeric, or entirely empty (inferred as `String`, read as zeros).
fn is_count_column(column: &Column) -> bool {
    column.dtype().is_primitive_numeric() || column.null_count() == column.len()
}

fn string_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, ParseError> {
    let column = df.column(name)?.cast(&DataType::String)?;
    let values = column
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect();
    Ok(values)
}

fn float_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, ParseError> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    let values = column.as_materialized_series().f64()?.into_iter().collect();
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_data::{CASES_CSV, SCENARIO_CSV};

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, m, d).unwrap()
    }

    #[test]
    fn parses_date_headers() {
        assert_eq!(parse_date_header("1/22/20").unwrap(), date(1, 22));
        assert_eq!(parse_date_header("12/31/21").unwrap(), NaiveDate::from_ymd_opt(2021, 12, 31).unwrap());
        assert!(matches!(
            parse_date_header("2020-01-22"),
            Err(ParseError::InvalidDateHeader(_))
        ));
    }

    #[test]
    fn raw_records_keep_every_source_row() {
        let frame = SourceFrame::parse(CASES_CSV).unwrap();
        let raw = frame.raw_records().unwrap();

        assert_eq!(raw.dates(), [date(1, 22), date(1, 23), date(1, 24)]);
        assert_eq!(raw.records().len(), frame.row_count());

        let afghanistan = &raw.records()[0];
        assert_eq!(afghanistan.region, "Afghanistan");
        assert_eq!(afghanistan.sub_region, "");
        assert_eq!(afghanistan.counts, vec![0.0, 1.0, 3.0]);

        let korea = raw
            .records()
            .iter()
            .find(|r| r.region == "Korea, South")
            .unwrap();
        assert_eq!(korea.sub_region, "");
        assert_eq!(korea.counts, vec![10.0, 15.0, 27.0]);

        let repatriated = raw
            .records()
            .iter()
            .find(|r| r.sub_region == "Repatriated Travellers")
            .unwrap();
        assert_eq!(repatriated.lat, None);
        assert_eq!(repatriated.lon, None);
    }

    #[test]
    fn aggregates_rows_by_region() {
        let table = SourceFrame::parse(CASES_CSV)
            .unwrap()
            .aggregate_by_region()
            .unwrap();

        assert_eq!(
            table.regions(),
            ["Afghanistan", "Australia", "Canada", "Korea, South"]
        );
        assert_eq!(table.dates(), [date(1, 22), date(1, 23), date(1, 24)]);
        assert_eq!(table.column("Australia"), Some(&[3.0, 7.0, 8.0][..]));
        assert_eq!(table.column("Canada"), Some(&[1.0, 1.0, 3.0][..]));
    }

    #[test]
    fn date_columns_are_sorted_by_date() {
        let csv = "\
Province/State,Country/Region,Lat,Long,1/2/20,1/1/20
A,CountryY,1.0,2.0,15,10
";
        let raw = SourceFrame::parse(csv).unwrap().raw_records().unwrap();
        assert_eq!(raw.dates(), [date(1, 1), date(1, 2)]);
        assert_eq!(raw.records()[0].counts, vec![10.0, 15.0]);
    }

    #[test]
    fn empty_count_cells_read_as_zero() {
        let csv = "\
Province/State,Country/Region,Lat,Long,1/1/20,1/2/20
,Chad,15.4,18.7,,4
";
        let raw = SourceFrame::parse(csv).unwrap().raw_records().unwrap();
        assert_eq!(raw.records()[0].counts, vec![0.0, 4.0]);
    }

    #[test]
    fn all_empty_date_column_reads_as_zero() {
        let csv = "\
Province/State,Country/Region,Lat,Long,1/1/20,1/2/20
,Chad,15.4,18.7,,4
,Peru,-9.2,-75.0,,5
";
        let frame = SourceFrame::parse(csv).unwrap();
        let raw = frame.raw_records().unwrap();
        assert_eq!(raw.records()[0].counts, vec![0.0, 4.0]);
        assert_eq!(raw.records()[1].counts, vec![0.0, 5.0]);

        let table = frame.aggregate_by_region().unwrap();
        assert_eq!(table.column("Chad"), Some(&[0.0, 4.0][..]));
        assert_eq!(table.column("Peru"), Some(&[0.0, 5.0][..]));
    }

    #[test]
    fn scenario_fixture_has_two_provinces() {
        let raw = SourceFrame::parse(SCENARIO_CSV)
            .unwrap()
            .raw_records()
            .unwrap();
        let subs: Vec<&str> = raw
            .matching("CountryY", None)
            .map(|r| r.sub_region.as_str())
            .collect();
        assert_eq!(subs, vec!["A", "B"]);
    }

    #[test]
    fn rejects_unrecognized_date_header() {
        let csv = "\
Province/State,Country/Region,Lat,Long,1/1/20,Total
,Chad,15.4,18.7,1,1
";
        assert!(matches!(
            SourceFrame::parse(csv),
            Err(ParseError::InvalidDateHeader(h)) if h == "Total"
        ));
    }

    #[test]
    fn rejects_missing_identifying_column() {
        let csv = "\
Province/State,Country/Region,Long,1/1/20
,Chad,18.7,1
";
        assert!(matches!(
            SourceFrame::parse(csv),
            Err(ParseError::MissingColumn(LAT_COLUMN))
        ));
    }

    #[test]
    fn rejects_duplicate_dates() {
        let csv = "\
Province/State,Country/Region,Lat,Long,1/1/20,01/01/20
,Chad,15.4,18.7,1,1
";
        assert!(matches!(
            SourceFrame::parse(csv),
            Err(ParseError::DuplicateDate(d)) if d == date(1, 1)
        ));
    }

    #[test]
    fn rejects_source_without_dates() {
        let csv = "\
Province/State,Country/Region,Lat,Long
,Chad,15.4,18.7
";
        assert!(matches!(
            SourceFrame::parse(csv),
            Err(ParseError::NoDateColumns)
        ));
    }

    #[test]
    fn rejects_non_numeric_counts() {
        let csv = "\
Province/State,Country/Region,Lat,Long,1/1/20
,Chad,15.4,18.7,many
";
        assert!(matches!(
            SourceFrame::parse(csv),
            Err(ParseError::NonNumericColumn(_))
        ));
    }
}
