//! Remote CSV Source Module
//! Fetches the raw time-series CSV text for each dataset.

use crate::settings::DashboardConfig;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },
}

/// The two source datasets shown by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    Cases,
    Deaths,
}

impl Dataset {
    pub const ALL: [Dataset; 2] = [Dataset::Cases, Dataset::Deaths];

    pub fn label(self) -> &'static str {
        match self {
            Dataset::Cases => "Cases",
            Dataset::Deaths => "Deaths",
        }
    }
}

/// Anything that can hand back the CSV text of a dataset.
pub trait CsvSource: Send + Sync {
    fn fetch(&self, dataset: Dataset) -> Result<String, FetchError>;
}

/// Fetches datasets over HTTP from the configured URLs.
pub struct HttpSource {
    client: Client,
    confirmed_url: String,
    deaths_url: String,
}

impl HttpSource {
    pub fn new(config: &DashboardConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            confirmed_url: config.confirmed_url.clone(),
            deaths_url: config.deaths_url.clone(),
        })
    }

    /// URL the given dataset is fetched from.
    pub fn url(&self, dataset: Dataset) -> &str {
        match dataset {
            Dataset::Cases => &self.confirmed_url,
            Dataset::Deaths => &self.deaths_url,
        }
    }
}

impl CsvSource for HttpSource {
    fn fetch(&self, dataset: Dataset) -> Result<String, FetchError> {
        let url = self.url(dataset).to_string();
        tracing::info!(dataset = dataset.label(), %url, "fetching dataset");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|source| FetchError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }

        let body = response.text().map_err(|source| FetchError::Request {
            url: url.clone(),
            source,
        })?;

        tracing::info!(
            dataset = dataset.label(),
            bytes = body.len(),
            "fetched dataset"
        );
        Ok(body)
    }
}
