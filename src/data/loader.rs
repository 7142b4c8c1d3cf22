//! Data Loader Module
//! Fetches the case and death datasets, reshapes them and caches the
//! resulting tables for the session.

use super::cache::TtlCache;
use super::parser::{ParseError, SourceFrame};
use super::source::{CsvSource, Dataset, FetchError};
use super::tables::{LocationTable, RawRecordTable, RegionSeriesTable};
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to fetch data: {0}")]
    Fetch(#[from] FetchError),
    #[error("Failed to parse data: {0}")]
    Parse(#[from] ParseError),
}

/// Tables derived from one fetched dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetTables {
    pub aggregated: RegionSeriesTable,
    pub raw: RawRecordTable,
}

impl DatasetTables {
    pub fn from_csv(text: &str) -> Result<Self, ParseError> {
        let frame = SourceFrame::parse(text)?;
        Ok(Self {
            aggregated: frame.aggregate_by_region()?,
            raw: frame.raw_records()?,
        })
    }
}

/// Everything the dashboard renders from, loaded in one pass.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub confirmed: Arc<DatasetTables>,
    pub deaths: Arc<DatasetTables>,
    pub locations: LocationTable,
}

impl DashboardData {
    pub fn tables(&self, dataset: Dataset) -> &DatasetTables {
        match dataset {
            Dataset::Cases => &self.confirmed,
            Dataset::Deaths => &self.deaths,
        }
    }

    /// Country/region names of the confirmed dataset, sorted.
    pub fn regions(&self) -> &[String] {
        self.confirmed.aggregated.regions()
    }

    /// Observation dates of the confirmed dataset, ascending.
    pub fn dates(&self) -> &[NaiveDate] {
        self.confirmed.aggregated.dates()
    }
}

/// Loads the source datasets through a [`CsvSource`] and caches the
/// parsed tables per dataset.
pub struct DataLoader {
    source: Box<dyn CsvSource>,
    cache: TtlCache<Dataset, DatasetTables>,
}

impl DataLoader {
    /// `ttl` of `None` keeps loaded tables for the lifetime of the loader.
    pub fn new(source: Box<dyn CsvSource>, ttl: Option<Duration>) -> Self {
        Self {
            source,
            cache: TtlCache::new(ttl),
        }
    }

    /// Cached tables of one dataset, fetching them on a miss.
    pub fn tables(&self, dataset: Dataset) -> Result<Arc<DatasetTables>, LoaderError> {
        if let Some(tables) = self.cache.get(&dataset) {
            tracing::debug!(dataset = dataset.label(), "cache hit");
            return Ok(tables);
        }

        self.cache.get_or_try_insert_with(dataset, || -> Result<_, LoaderError> {
            tracing::debug!(dataset = dataset.label(), "cache miss");
            let text = self.source.fetch(dataset)?;
            let tables = DatasetTables::from_csv(&text)?;
            tracing::info!(
                dataset = dataset.label(),
                rows = tables.raw.records().len(),
                regions = tables.aggregated.regions().len(),
                dates = tables.aggregated.dates().len(),
                "loaded dataset"
            );
            Ok(tables)
        })
    }

    /// Country-level series for cases and deaths. Both datasets are
    /// fetched in parallel.
    pub fn load_aggregated(&self) -> Result<(RegionSeriesTable, RegionSeriesTable), LoaderError> {
        let (confirmed, deaths) = self.load_both()?;
        Ok((confirmed.aggregated.clone(), deaths.aggregated.clone()))
    }

    /// Unaggregated rows of one dataset.
    pub fn load_raw(&self, dataset: Dataset) -> Result<RawRecordTable, LoaderError> {
        Ok(self.tables(dataset)?.raw.clone())
    }

    /// Distinct locations of the confirmed dataset.
    pub fn load_locations(&self) -> Result<LocationTable, LoaderError> {
        Ok(LocationTable::from_records(&self.tables(Dataset::Cases)?.raw))
    }

    /// Load everything the dashboard needs. Either every table loads or
    /// the first error is returned.
    pub fn snapshot(&self) -> Result<DashboardData, LoaderError> {
        let (confirmed, deaths) = self.load_both()?;
        let locations = LocationTable::from_records(&confirmed.raw);
        Ok(DashboardData {
            confirmed,
            deaths,
            locations,
        })
    }

    /// Drop all cached tables so the next load fetches again.
    pub fn refresh(&self) {
        tracing::info!("invalidating cached datasets");
        self.cache.clear();
    }

    fn load_both(&self) -> Result<(Arc<DatasetTables>, Arc<DatasetTables>), LoaderError> {
        let (confirmed, deaths) = rayon::join(
            || self.tables(Dataset::Cases),
            || self.tables(Dataset::Deaths),
        );
        Ok((confirmed?, deaths?))
    }
}
