//! Bubble map of the latest value per region.

use super::plotter::dataset_color;
use crate::query::MapMarker;
use egui_plot::{Plot, Points};

/// Smallest drawn radius, so tiny values stay visible.
const MIN_RADIUS: f32 = 1.0;

/// Draws map markers on a longitude/latitude plane.
pub struct MapPlotter;

impl MapPlotter {
    pub fn draw_bubble_map(ui: &mut egui::Ui, markers: &[MapMarker], height: f32) {
        Plot::new("bubble_map")
            .height(height)
            .data_aspect(1.0)
            .include_x(-180.0)
            .include_x(180.0)
            .include_y(-90.0)
            .include_y(90.0)
            .allow_scroll(false)
            .x_axis_label("Longitude")
            .y_axis_label("Latitude")
            .label_formatter(|name, value| {
                if name.is_empty() {
                    format!("{:.2}, {:.2}", value.y, value.x)
                } else {
                    name.to_string()
                }
            })
            .show(ui, |plot_ui| {
                for marker in markers {
                    let color = dataset_color(marker.dataset);
                    plot_ui.points(
                        Points::new(vec![[marker.position.lon, marker.position.lat]])
                            .radius((marker.radius as f32).max(MIN_RADIUS))
                            .color(color.gamma_multiply(0.6))
                            .filled(true)
                            .name(&marker.label),
                    );
                }
            });
    }
}
