//! COVID-19 Dashboard - Cases & Deaths Time-Series Viewer
//!
//! Loads the JHU CSSE global time-series CSVs and shows them as a bubble
//! map and line charts, filtered by country, province and date range.

pub mod charts;
pub mod data;
pub mod gui;
pub mod query;
pub mod settings;
