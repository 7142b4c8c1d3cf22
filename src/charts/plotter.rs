//! Chart Plotter Module
//! Interactive time-series line charts using egui_plot.

use crate::data::Dataset;
use crate::query::{format_count, TimeSeries};
use chrono::{Datelike, NaiveDate};
use egui::{Color32, RichText};
use egui_plot::{Line, Plot, PlotPoints};

/// Map and chart color per data source.
pub const CASES_COLOR: Color32 = Color32::from_rgb(231, 76, 60); // Red
pub const DEATHS_COLOR: Color32 = Color32::BLACK;

/// Shown in place of a chart or metric whose filters matched nothing.
pub const NO_DATA_MESSAGE: &str = "No data available for the selected filters.";

pub fn dataset_color(dataset: Dataset) -> Color32 {
    match dataset {
        Dataset::Cases => CASES_COLOR,
        Dataset::Deaths => DEATHS_COLOR,
    }
}

/// Plot x coordinate of a date (days since the common era).
pub fn date_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

/// Inverse of [`date_to_x`], rounding to the nearest day.
pub fn x_to_date(x: f64) -> Option<NaiveDate> {
    if !x.is_finite() {
        return None;
    }
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}

/// Draws time series as line charts.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Series as `[x, y]` plot points.
    pub fn plot_points(series: &TimeSeries) -> Vec<[f64; 2]> {
        series
            .points()
            .iter()
            .map(|(date, value)| [date_to_x(*date), *value])
            .collect()
    }

    /// Draw one line chart; hovering shows the date and the value.
    pub fn draw_line_chart(
        ui: &mut egui::Ui,
        id: &str,
        value_label: &str,
        series: &TimeSeries,
        color: Color32,
        height: f32,
    ) {
        if series.is_empty() {
            ui.label(RichText::new(NO_DATA_MESSAGE).color(Color32::GRAY));
            return;
        }

        let tooltip_label = value_label.to_string();
        Plot::new(id)
            .height(height)
            .allow_scroll(false)
            .x_axis_label("Date")
            .y_axis_label(value_label)
            .x_axis_formatter(|mark, _range| {
                x_to_date(mark.value)
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default()
            })
            .y_axis_formatter(|mark, _range| format_count(mark.value.round() as i64))
            .label_formatter(move |_name, value| {
                let date = x_to_date(value.x)
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                format!(
                    "Date: {}\n{}: {}",
                    date,
                    tooltip_label,
                    format_count(value.y.round() as i64)
                )
            })
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from(Self::plot_points(series)))
                        .color(color)
                        .width(1.5)
                        .name(value_label),
                );
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_axis_round_trips() {
        let date = NaiveDate::from_ymd_opt(2021, 2, 28).unwrap();
        assert_eq!(x_to_date(date_to_x(date) + 0.4), Some(date));
        assert_eq!(x_to_date(f64::NAN), None);
    }

    #[test]
    fn plot_points_follow_series_order() {
        let dates = [
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
        ];
        let series = TimeSeries::new(&dates, &[10.0, 15.0]);
        let points = ChartPlotter::plot_points(&series);

        assert_eq!(points.len(), 2);
        assert_eq!(points[1][0] - points[0][0], 1.0);
        assert_eq!(points[1][1], 15.0);
    }
}
