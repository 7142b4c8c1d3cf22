//! Dashboard Main Application
//! Main window with control panel and dashboard viewer.

use crate::data::{DashboardData, DataLoader};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::query::{sub_region_options, DashboardView, ViewSettings};
use egui::SidePanel;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

/// Data loading result from background thread
enum LoadResult {
    Complete(DashboardData),
    Error(String),
}

/// Main application window.
pub struct DashboardApp {
    loader: Arc<DataLoader>,
    data: Option<DashboardData>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    last_settings: Option<ViewSettings>,

    // Async loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl DashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, loader: Arc<DataLoader>) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::light());

        let mut app = Self::with_loader(loader);
        app.start_loading(false);
        app
    }

    fn with_loader(loader: Arc<DataLoader>) -> Self {
        Self {
            loader,
            data: None,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            last_settings: None,
            load_rx: None,
            is_loading: false,
        }
    }

    /// Drop the current snapshot and fetch fresh data.
    fn reload(&mut self) {
        if self.is_loading {
            return;
        }
        // Filter changes during the reload must not render the old tables.
        self.data = None;
        self.last_settings = None;
        self.chart_viewer.clear();
        self.start_loading(true);
    }

    /// Load all datasets in a background thread.
    fn start_loading(&mut self, refresh: bool) {
        if self.is_loading {
            return;
        }
        if refresh {
            self.loader.refresh();
        }

        self.is_loading = true;
        self.control_panel.is_loading = true;
        self.control_panel.set_status("Loading data...");

        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        let loader = Arc::clone(&self.loader);

        thread::spawn(move || {
            let result = match loader.snapshot() {
                Ok(data) => LoadResult::Complete(data),
                Err(e) => {
                    tracing::error!(error = %e, "failed to load dashboard data");
                    LoadResult::Error(e.to_string())
                }
            };
            let _ = tx.send(result);
        });
    }

    /// Check for loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult::Complete(data)) => {
                self.control_panel.update_options(&data);
                self.control_panel.set_status(&format!(
                    "Loaded {} countries, {} days",
                    data.regions().len(),
                    data.dates().len()
                ));
                self.data = Some(data);
                self.handle_region_changed();
                self.finish_loading();
            }
            Ok(LoadResult::Error(error)) => {
                // Never render from partial tables.
                self.data = None;
                self.last_settings = None;
                self.chart_viewer.set_load_error(error.clone());
                self.control_panel.set_status(&format!("Error: {}", error));
                self.finish_loading();
            }
            Err(TryRecvError::Empty) => self.load_rx = Some(rx),
            Err(TryRecvError::Disconnected) => {
                self.chart_viewer
                    .set_load_error("loader thread exited unexpectedly".to_string());
                self.control_panel.set_status("Error: loader thread exited");
                self.finish_loading();
            }
        }
    }

    fn finish_loading(&mut self) {
        self.is_loading = false;
        self.control_panel.is_loading = false;
    }

    /// Update the province selector for the newly selected country.
    fn handle_region_changed(&mut self) {
        let Some(data) = &self.data else {
            return;
        };
        let options = sub_region_options(&data.locations, &self.control_panel.settings.region);
        self.control_panel.update_sub_regions(options);
        self.rebuild_view();
    }

    /// Re-derive the dashboard when the selection differs from the last one.
    fn rebuild_view(&mut self) {
        let (Some(data), Some(settings)) = (&self.data, self.control_panel.view_settings()) else {
            return;
        };
        if self.chart_viewer.view.is_some() && self.last_settings.as_ref() == Some(&settings) {
            return;
        }

        self.chart_viewer.set_view(DashboardView::build(data, &settings));
        self.last_settings = Some(settings);
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::Reload => self.reload(),
                        ControlPanelAction::RegionChanged => self.handle_region_changed(),
                        ControlPanelAction::FiltersChanged => self.rebuild_view(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        let is_loading = self.is_loading;
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, is_loading);
        });
    }
}
