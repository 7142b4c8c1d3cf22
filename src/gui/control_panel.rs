//! Control Panel Widget
//! Left side panel with the dashboard filters.

use crate::data::{DashboardData, Dataset};
use crate::query::{
    region_filter, region_options, sub_region_filter, AggregationMode, DateRange, FilterQuery,
    ViewSettings, WORLDWIDE_LABEL,
};
use chrono::NaiveDate;
use egui::{Color32, ComboBox, RichText};

/// Filter selections as shown in the panel.
#[derive(Clone, PartialEq)]
pub struct UserSettings {
    pub region: String,
    /// `None` when the region has no province selector.
    pub sub_region: Option<String>,
    pub start_idx: usize,
    pub end_idx: usize,
    pub summary_mode: AggregationMode,
    pub map_dataset: Dataset,
    pub cases_plot_mode: AggregationMode,
    pub deaths_plot_mode: AggregationMode,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            region: WORLDWIDE_LABEL.to_string(),
            sub_region: None,
            start_idx: 0,
            end_idx: 0,
            summary_mode: AggregationMode::Cumulative,
            map_dataset: Dataset::Cases,
            cases_plot_mode: AggregationMode::Cumulative,
            deaths_plot_mode: AggregationMode::Cumulative,
        }
    }
}

/// Left side control panel with filter widgets.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub regions: Vec<String>,
    pub sub_regions: Option<Vec<String>>,
    pub dates: Vec<NaiveDate>,
    pub status: String,
    pub is_loading: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: UserSettings::default(),
            regions: Vec::new(),
            sub_regions: None,
            dates: Vec::new(),
            status: "Ready".to_string(),
            is_loading: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh selector options after a load, keeping the current region
    /// when it still exists.
    pub fn update_options(&mut self, data: &DashboardData) {
        self.regions = region_options(data);
        self.dates = data.dates().to_vec();
        self.settings.start_idx = 0;
        self.settings.end_idx = self.dates.len().saturating_sub(1);

        if !self.regions.contains(&self.settings.region) {
            self.settings.region = WORLDWIDE_LABEL.to_string();
            self.settings.sub_region = None;
        }
    }

    /// Set the province options of the selected region.
    pub fn update_sub_regions(&mut self, options: Option<Vec<String>>) {
        self.settings.sub_region = options
            .as_ref()
            .and_then(|opts| opts.first().cloned());
        self.sub_regions = options;
    }

    /// Current selection as a query, once dates are known.
    pub fn view_settings(&self) -> Option<ViewSettings> {
        let start = *self.dates.get(self.settings.start_idx)?;
        let end = *self.dates.get(self.settings.end_idx)?;

        Some(ViewSettings {
            query: FilterQuery::new(
                region_filter(&self.settings.region),
                sub_region_filter(self.settings.sub_region.as_deref()),
                DateRange::new(start, end),
                self.settings.summary_mode,
            ),
            cases_plot_mode: self.settings.cases_plot_mode,
            deaths_plot_mode: self.settings.deaths_plot_mode,
            map_dataset: self.settings.map_dataset,
        })
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let before = self.settings.clone();
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🦠 COVID-19 Dashboard")
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        ui.label(RichText::new("🔎 Filters").size(14.0).strong());
        ui.add_space(8.0);

        let label_width = 90.0;
        let combo_width = 170.0;

        // Country selection
        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Country:"));
            ComboBox::from_id_salt("region")
                .width(combo_width)
                .selected_text(&self.settings.region)
                .show_ui(ui, |ui| {
                    for region in &self.regions {
                        if ui
                            .selectable_label(self.settings.region == *region, region)
                            .clicked()
                            && self.settings.region != *region
                        {
                            self.settings.region = region.clone();
                            action = ControlPanelAction::RegionChanged;
                        }
                    }
                });
        });

        // Province/State selection, only for countries with a breakdown
        if let Some(options) = &self.sub_regions {
            ui.add_space(5.0);
            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("Province:"));
                let selected = self.settings.sub_region.clone().unwrap_or_default();
                ComboBox::from_id_salt("sub_region")
                    .width(combo_width)
                    .selected_text(&selected)
                    .show_ui(ui, |ui| {
                        for option in options {
                            if ui.selectable_label(selected == *option, option).clicked() {
                                self.settings.sub_region = Some(option.clone());
                            }
                        }
                    });
            });
        }

        ui.add_space(10.0);

        // Date range
        let max_idx = self.dates.len().saturating_sub(1);
        let date_text = |idx: usize, dates: &[NaiveDate]| {
            dates
                .get(idx)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string())
        };
        ui.add_enabled_ui(!self.dates.is_empty(), |ui| {
            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("Start Date:"));
                ui.add(egui::Slider::new(&mut self.settings.start_idx, 0..=max_idx).show_value(false));
                ui.label(date_text(self.settings.start_idx, &self.dates));
            });
            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("End Date:"));
                ui.add(egui::Slider::new(&mut self.settings.end_idx, 0..=max_idx).show_value(false));
                ui.label(date_text(self.settings.end_idx, &self.dates));
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // Summary and map controls
        ui.label(RichText::new("⚙️ Display").size(14.0).strong());
        ui.add_space(5.0);

        Self::mode_radio(ui, "Summary Mode:", &mut self.settings.summary_mode);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Map Data:"));
            for dataset in Dataset::ALL {
                ui.radio_value(&mut self.settings.map_dataset, dataset, dataset.label());
            }
        });

        ui.add_space(8.0);
        ui.label(RichText::new("Plot Modes").strong());
        Self::mode_radio(ui, "Cases:", &mut self.settings.cases_plot_mode);
        Self::mode_radio(ui, "Deaths:", &mut self.settings.deaths_plot_mode);

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(!self.is_loading, |ui| {
                let button = egui::Button::new(RichText::new("🔄 Reload Data").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::Reload;
                }
            });
        });

        ui.add_space(10.0);
        if self.is_loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(RichText::new(&self.status).size(11.0));
            });
        } else {
            let status_color = if self.status.contains("Error") {
                Color32::from_rgb(220, 53, 69)
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(&self.status).size(11.0).color(status_color));
        }

        if action == ControlPanelAction::None && self.settings != before {
            action = ControlPanelAction::FiltersChanged;
        }
        action
    }

    fn mode_radio(ui: &mut egui::Ui, label: &str, mode: &mut AggregationMode) {
        ui.horizontal(|ui| {
            ui.add_sized([90.0, 20.0], egui::Label::new(label));
            for option in [AggregationMode::Cumulative, AggregationMode::Daily] {
                ui.radio_value(mode, option, option.label());
            }
        });
    }

    /// Set status line text
    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    Reload,
    RegionChanged,
    FiltersChanged,
}
