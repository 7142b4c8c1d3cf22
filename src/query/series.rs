//! Time Series Module
//! Immutable `(date, value)` sequences and the derivations applied to them.

use super::filter::{AggregationMode, DateRange};
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryError {
    #[error("No data available for the selected filters.")]
    EmptyResult,
}

/// Date-ordered series of values. Every derivation returns a new series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    points: Vec<(NaiveDate, f64)>,
}

impl TimeSeries {
    /// Build from `dates` and `values` of equal length; `dates` must be
    /// ascending.
    pub fn new(dates: &[NaiveDate], values: &[f64]) -> Self {
        debug_assert_eq!(dates.len(), values.len());
        Self {
            points: dates.iter().copied().zip(values.iter().copied()).collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[(NaiveDate, f64)] {
        &self.points
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|(_, value)| *value)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points whose date falls inside `range`, both ends inclusive.
    pub fn clip(&self, range: DateRange) -> Self {
        Self {
            points: self
                .points
                .iter()
                .copied()
                .filter(|(date, _)| range.contains(*date))
                .collect(),
        }
    }

    /// First difference of a cumulative series. The first delta is 0 and
    /// negative deltas (source corrections) are clipped to 0.
    ///
    /// Applying this twice yields a second difference, so callers must
    /// keep track of which form a series is in.
    pub fn to_daily_delta(&self) -> Self {
        let mut previous: Option<f64> = None;
        let points = self
            .points
            .iter()
            .map(|&(date, value)| {
                let delta = previous.map_or(0.0, |prev| (value - prev).max(0.0));
                previous = Some(value);
                (date, delta)
            })
            .collect();
        Self { points }
    }

    /// The series in the requested form, starting from cumulative values.
    pub fn with_mode(&self, mode: AggregationMode) -> Self {
        match mode {
            AggregationMode::Cumulative => self.clone(),
            AggregationMode::Daily => self.to_daily_delta(),
        }
    }

    /// Value at the last date, truncated to an integer.
    pub fn latest_value(&self) -> Result<i64, QueryError> {
        self.points
            .last()
            .map(|(_, value)| value.trunc() as i64)
            .ok_or(QueryError::EmptyResult)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(n: u32) -> Vec<NaiveDate> {
        (1..=n)
            .map(|d| NaiveDate::from_ymd_opt(2020, 3, d).unwrap())
            .collect()
    }

    fn series(values: &[f64]) -> TimeSeries {
        TimeSeries::new(&dates(values.len() as u32), values)
    }

    #[test]
    fn daily_delta_keeps_length_and_starts_at_zero() {
        let delta = series(&[4.0, 9.0, 9.0, 20.0]).to_daily_delta();
        assert_eq!(delta.len(), 4);
        assert_eq!(delta.values().collect::<Vec<_>>(), vec![0.0, 5.0, 0.0, 11.0]);
        assert_eq!(delta.points()[3].0, dates(4)[3]);
    }

    #[test]
    fn daily_delta_clips_corrections() {
        let delta = series(&[10.0, 12.0, 8.0, 9.0]).to_daily_delta();
        assert_eq!(delta.values().collect::<Vec<_>>(), vec![0.0, 2.0, 0.0, 1.0]);
        assert!(delta.values().all(|v| v >= 0.0));
    }

    #[test]
    fn daily_delta_sums_back_to_cumulative_growth() {
        let cumulative = [3.0, 5.0, 8.0, 13.0, 21.0, 34.0];
        let delta = series(&cumulative).to_daily_delta();

        let mut running = 0.0;
        for (i, value) in delta.values().enumerate() {
            running += value;
            assert_eq!(running, cumulative[i] - cumulative[0]);
        }
    }

    #[test]
    fn daily_delta_is_not_idempotent() {
        let once = series(&[0.0, 2.0, 6.0, 12.0]).to_daily_delta();
        let twice = once.to_daily_delta();
        assert_eq!(twice.values().collect::<Vec<_>>(), vec![0.0, 2.0, 2.0, 2.0]);
        assert_ne!(once, twice);
    }

    #[test]
    fn daily_delta_of_empty_is_empty() {
        assert!(TimeSeries::empty().to_daily_delta().is_empty());
    }

    #[test]
    fn with_mode_leaves_cumulative_untouched() {
        let s = series(&[1.0, 3.0]);
        assert_eq!(s.with_mode(AggregationMode::Cumulative), s);
        assert_eq!(s.with_mode(AggregationMode::Daily), s.to_daily_delta());
    }

    #[test]
    fn latest_value_truncates_last_point() {
        assert_eq!(series(&[1.0, 7.9]).latest_value(), Ok(7));
    }

    #[test]
    fn latest_value_of_empty_series_fails() {
        assert_eq!(
            TimeSeries::empty().latest_value(),
            Err(QueryError::EmptyResult)
        );
    }

    #[test]
    fn clip_is_inclusive() {
        let d = dates(5);
        let clipped = series(&[1.0, 2.0, 3.0, 4.0, 5.0]).clip(DateRange::new(d[1], d[3]));
        assert_eq!(clipped.values().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn clip_outside_the_series_is_empty() {
        let d = dates(3);
        let later = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let s = series(&[1.0, 2.0, 3.0]);

        assert!(s.clip(DateRange::new(later, later)).is_empty());
        assert!(s.clip(DateRange::new(d[2], d[0])).is_empty());
    }
}
