//! Chart Viewer Widget
//! Central panel with the summary metrics, the bubble map and the two
//! time-series charts.

use crate::charts::{ChartPlotter, MapPlotter, CASES_COLOR, DEATHS_COLOR, NO_DATA_MESSAGE};
use crate::query::{format_count, AggregationMode, DashboardView, QueryError};
use egui::{Color32, RichText, ScrollArea};

const MAP_HEIGHT: f32 = 500.0;
const CHART_HEIGHT: f32 = 240.0;

/// Displays the derived dashboard or the load error that prevented it.
#[derive(Default)]
pub struct ChartViewer {
    pub view: Option<DashboardView>,
    pub load_error: Option<String>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_view(&mut self, view: DashboardView) {
        self.load_error = None;
        self.view = Some(view);
    }

    /// Replace everything with a load error; nothing partial is shown.
    pub fn set_load_error(&mut self, error: String) {
        self.view = None;
        self.load_error = Some(error);
    }

    pub fn clear(&mut self) {
        self.view = None;
        self.load_error = None;
    }

    pub fn show(&mut self, ui: &mut egui::Ui, is_loading: bool) {
        ui.heading("COVID-19 Dashboard");
        ui.add_space(8.0);

        if let Some(error) = &self.load_error {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new(format!("Failed to load data: {}", error))
                        .size(16.0)
                        .color(Color32::from_rgb(220, 53, 69)),
                );
            });
            return;
        }

        let Some(view) = &self.view else {
            ui.centered_and_justified(|ui| {
                let text = if is_loading { "Loading data..." } else { "No Data" };
                ui.label(RichText::new(text).size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                // Summary boxes
                ui.columns(2, |cols| {
                    Self::draw_metric(&mut cols[0], "Confirmed", &view.confirmed, CASES_COLOR);
                    Self::draw_metric(&mut cols[1], "Deaths", &view.deaths, DEATHS_COLOR);
                });
                if view.summary_mode == AggregationMode::Daily {
                    ui.label(
                        RichText::new("Note: Daily data is based on the End Date you choose.")
                            .italics()
                            .color(Color32::GRAY),
                    );
                }

                ui.add_space(10.0);
                ui.separator();

                ui.columns(2, |cols| {
                    cols[0].label(RichText::new("Map View").size(16.0).strong());
                    MapPlotter::draw_bubble_map(&mut cols[0], &view.markers, MAP_HEIGHT);

                    cols[1].label(RichText::new("Time Series Plots").size(16.0).strong());
                    ChartPlotter::draw_line_chart(
                        &mut cols[1],
                        "cases_chart",
                        "Case Num",
                        &view.cases_series,
                        CASES_COLOR,
                        CHART_HEIGHT,
                    );
                    cols[1].add_space(10.0);
                    ChartPlotter::draw_line_chart(
                        &mut cols[1],
                        "deaths_chart",
                        "Deaths",
                        &view.deaths_series,
                        DEATHS_COLOR,
                        CHART_HEIGHT,
                    );
                });
            });
    }

    fn draw_metric(ui: &mut egui::Ui, title: &str, value: &Result<i64, QueryError>, color: Color32) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(2.0, color))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(title).size(14.0).color(Color32::GRAY));
                match value {
                    Ok(count) => {
                        ui.label(RichText::new(format_count(*count)).size(28.0).strong());
                    }
                    Err(_) => {
                        ui.label(RichText::new(NO_DATA_MESSAGE).color(Color32::GRAY));
                    }
                }
            });
    }
}
