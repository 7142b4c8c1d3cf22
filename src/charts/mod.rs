//! Charts module - Chart and map rendering

mod map;
mod plotter;

pub use map::MapPlotter;
pub use plotter::{dataset_color, ChartPlotter, CASES_COLOR, DEATHS_COLOR, NO_DATA_MESSAGE};
