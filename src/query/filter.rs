//! User filter selections.

use chrono::NaiveDate;

/// Country-level selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RegionFilter {
    /// Worldwide: every region summed.
    #[default]
    All,
    Region(String),
}

impl RegionFilter {
    pub fn name(&self) -> Option<&str> {
        match self {
            RegionFilter::All => None,
            RegionFilter::Region(name) => Some(name),
        }
    }
}

/// Province/state selection within a region.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubRegionFilter {
    #[default]
    All,
    Named(String),
}

impl SubRegionFilter {
    pub fn name(&self) -> Option<&str> {
        match self {
            SubRegionFilter::All => None,
            SubRegionFilter::Named(name) => Some(name),
        }
    }
}

/// Whether figures are shown as running totals or per-day counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AggregationMode {
    #[default]
    Cumulative,
    Daily,
}

impl AggregationMode {
    pub fn label(self) -> &'static str {
        match self {
            AggregationMode::Cumulative => "Cumulative",
            AggregationMode::Daily => "Daily",
        }
    }
}

/// Inclusive date interval. Empty when `start > end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// One complete filter selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterQuery {
    region: RegionFilter,
    sub_region: SubRegionFilter,
    range: DateRange,
    mode: AggregationMode,
}

impl FilterQuery {
    pub fn new(
        region: RegionFilter,
        sub_region: SubRegionFilter,
        range: DateRange,
        mode: AggregationMode,
    ) -> Self {
        Self {
            region,
            sub_region,
            range,
            mode,
        }
    }

    /// Worldwide, cumulative query over `range`.
    pub fn worldwide(range: DateRange) -> Self {
        Self::new(
            RegionFilter::All,
            SubRegionFilter::All,
            range,
            AggregationMode::Cumulative,
        )
    }

    pub fn region(&self) -> &RegionFilter {
        &self.region
    }

    pub fn sub_region(&self) -> &SubRegionFilter {
        &self.sub_region
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn mode(&self) -> AggregationMode {
        self.mode
    }
}
