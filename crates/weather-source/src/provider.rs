//! The upstream weather collaborator.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tile_common::{GeoCoordinate, WeatherRecord};

/// Something that can report the current weather at a coordinate.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Fetch current weather at an already-rounded coordinate.
    async fn current_weather(&self, coordinate: GeoCoordinate) -> Result<WeatherRecord, FetchError>;
}

/// Why an upstream fetch produced no record.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Upstream request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Upstream returned status {0}")]
    Status(u16),

    #[error("Malformed weather payload: {0}")]
    MalformedPayload(String),
}

impl FetchError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Http(_) => "http",
            FetchError::Timeout(_) => "timeout",
            FetchError::Status(_) => "status",
            FetchError::MalformedPayload(_) => "malformed",
        }
    }

    /// Classify a reqwest error, keeping timeouts distinct.
    ///
    /// The request URL is stripped since it carries the API key.
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        let err = err.without_url();
        if err.is_timeout() {
            FetchError::Timeout(timeout)
        } else if err.is_decode() {
            FetchError::MalformedPayload(err.to_string())
        } else {
            FetchError::Http(err.to_string())
        }
    }
}
