//! Data module - dataset fetching, parsing and caching

mod cache;
mod loader;
mod parser;
mod source;
mod tables;

#[cfg(test)]
pub(crate) mod test_data;

pub use cache::TtlCache;
pub use loader::{DashboardData, DataLoader, DatasetTables, LoaderError};
pub use parser::{ParseError, SourceFrame};
pub use source::{CsvSource, Dataset, FetchError, HttpSource};
pub use tables::{
    GeoPoint, LocationEntry, LocationTable, RawRecord, RawRecordTable, RegionSeriesTable,
};
