//! Scriptable weather provider for tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tile_common::{GeoCoordinate, WeatherRecord};
use weather_source::{FetchError, WeatherProvider};

/// What the stub answers with.
#[derive(Debug, Clone)]
pub enum StubResponse {
    Record(WeatherRecord),
    Status(u16),
    Malformed,
}

/// A [`WeatherProvider`] that counts calls and returns a canned response,
/// optionally after a delay.
#[derive(Debug)]
pub struct StubWeatherProvider {
    response: Mutex<StubResponse>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    requested: Mutex<Vec<GeoCoordinate>>,
}

impl StubWeatherProvider {
    /// Always answer with `record`.
    pub fn returning(record: WeatherRecord) -> Self {
        Self::with_response(StubResponse::Record(record))
    }

    /// Always fail with an upstream status error.
    pub fn failing() -> Self {
        Self::with_response(StubResponse::Status(503))
    }

    pub fn with_response(response: StubResponse) -> Self {
        Self {
            response: Mutex::new(response),
            delay: None,
            calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Sleep for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Change the answer for subsequent calls.
    pub fn set_response(&self, response: StubResponse) {
        if let Ok(mut current) = self.response.lock() {
            *current = response;
        }
    }

    /// Number of calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Coordinates passed to the provider, in call order.
    pub fn requested(&self) -> Vec<GeoCoordinate> {
        self.requested.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl WeatherProvider for StubWeatherProvider {
    async fn current_weather(&self, coordinate: GeoCoordinate) -> Result<WeatherRecord, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(coordinate);
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let response = self
            .response
            .lock()
            .map(|r| r.clone())
            .unwrap_or(StubResponse::Malformed);

        match response {
            StubResponse::Record(record) => Ok(record),
            StubResponse::Status(code) => Err(FetchError::Status(code)),
            StubResponse::Malformed => Err(FetchError::MalformedPayload(
                "stubbed malformed payload".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[tokio::test]
    async fn test_stub_counts_calls() {
        let stub = StubWeatherProvider::returning(fixtures::clear_east_wind());
        let coord = GeoCoordinate::new(1.0, 2.0);

        assert!(stub.current_weather(coord).await.is_ok());
        assert!(stub.current_weather(coord).await.is_ok());
        assert_eq!(stub.calls(), 2);
        assert_eq!(stub.requested(), vec![coord, coord]);
    }

    #[tokio::test]
    async fn test_stub_switches_response() {
        let stub = StubWeatherProvider::returning(fixtures::clear_east_wind());
        stub.set_response(StubResponse::Status(500));
        assert!(matches!(
            stub.current_weather(GeoCoordinate::new(0.0, 0.0)).await,
            Err(FetchError::Status(500))
        ));
    }
}
