//! Forecast data sources.
//!
//! The cache only needs something that can hand it the raw forecast document. The HTTP
//! implementation issues one GET per call and leaves retries to the caller.

use crate::config::SourceConfig;
use crate::forecast_data::ForecastError;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Supplier of raw forecast documents.
#[async_trait]
pub trait ForecastSource: Send + Sync {
    /// Fetch the current forecast document.
    async fn fetch(&self) -> Result<Value, ForecastError>;
}

/// Fetches the forecast document over HTTP.
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ForecastError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn from_config(config: &SourceConfig) -> Result<Self, ForecastError> {
        Self::new(
            config.url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ForecastSource for HttpSource {
    async fn fetch(&self) -> Result<Value, ForecastError> {
        tracing::debug!(url = %self.url, "fetching forecast");

        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForecastError::Status(status.as_u16()));
        }

        // Decode separately so a bad body is reported as a malformed payload.
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
