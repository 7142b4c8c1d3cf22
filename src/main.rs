//! COVID-19 Dashboard binary.
//!
//! Reads `dashboard.toml` (optional) and `COVID_DASHBOARD_*` environment
//! overrides, then opens the dashboard window.

use anyhow::Context as _;
use covid_dashboard::data::{DataLoader, HttpSource};
use covid_dashboard::gui::DashboardApp;
use covid_dashboard::settings::{DashboardConfig, CONFIG_FILE};
use eframe::egui;
use std::path::Path;
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialise tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = DashboardConfig::load(Path::new(CONFIG_FILE))?;
    tracing::info!(
        confirmed_url = %config.confirmed_url,
        deaths_url = %config.deaths_url,
        cache_ttl_secs = config.cache_ttl_secs,
        "loaded configuration"
    );

    let source = HttpSource::new(&config).context("failed to create HTTP source")?;
    let loader = Arc::new(DataLoader::new(Box::new(source), config.cache_ttl()));

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 850.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("COVID-19 Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "COVID-19 Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, loader)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))
}
