//! Dashboard configuration.
//!
//! Built-in defaults, overridden by an optional `dashboard.toml` and then by
//! `COVID_DASHBOARD_*` environment variables.

use anyhow::Context as _;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIRMED_URL: &str = "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/refs/heads/master/csse_covid_19_data/csse_covid_19_time_series/time_series_covid19_confirmed_global.csv";
pub const DEFAULT_DEATHS_URL: &str = "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/refs/heads/master/csse_covid_19_data/csse_covid_19_time_series/time_series_covid19_deaths_global.csv";

pub const CONFIG_FILE: &str = "dashboard.toml";
pub const ENV_PREFIX: &str = "COVID_DASHBOARD";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DashboardConfig {
    pub confirmed_url: String,
    pub deaths_url: String,
    /// Seconds loaded data stays cached; 0 keeps it for the whole session.
    pub cache_ttl_secs: u64,
    pub request_timeout_secs: u64,
}

impl DashboardConfig {
    /// Load from `path` (if it exists) and the environment.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .set_default("confirmed_url", DEFAULT_CONFIRMED_URL)?
            .set_default("deaths_url", DEFAULT_DEATHS_URL)?
            .set_default("cache_ttl_secs", 3600_i64)?
            .set_default("request_timeout_secs", 30_i64)?
            .add_source(config::File::from(path.to_path_buf()).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .context("failed to read configuration")?;

        settings
            .try_deserialize()
            .context("failed to deserialise DashboardConfig")
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        (self.cache_ttl_secs > 0).then(|| Duration::from_secs(self.cache_ttl_secs))
    }
}
