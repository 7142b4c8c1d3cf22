//! Query module - filtering, aggregation and differencing of loaded tables

mod dashboard;
mod filter;
mod location;
mod selector;
mod series;

pub use dashboard::{
    format_count, full_range, map_markers, marker_radius, region_filter, region_options,
    sub_region_filter, sub_region_options, DashboardView, MapMarker, ViewSettings,
    ALL_SUB_REGIONS_LABEL, WORLDWIDE_LABEL,
};
pub use filter::{AggregationMode, DateRange, FilterQuery, RegionFilter, SubRegionFilter};
pub use location::resolve_location;
pub use selector::SeriesSelector;
pub use series::{QueryError, TimeSeries};
