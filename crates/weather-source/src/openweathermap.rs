//! OpenWeatherMap current-weather client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tile_common::{GeoCoordinate, WeatherRecord};
use tracing::{debug, instrument};

use crate::provider::{FetchError, WeatherProvider};

/// Current-weather endpoint of the OpenWeatherMap 2.5 API.
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Connection settings for [`OpenWeatherMapClient`].
#[derive(Debug, Clone)]
pub struct OpenWeatherMapConfig {
    /// Full URL of the current-weather endpoint
    pub base_url: String,
    /// API credential sent as `appid`
    pub api_key: String,
    /// Bound on the whole request, connect included
    pub timeout: Duration,
}

impl OpenWeatherMapConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(5),
        }
    }
}

/// HTTP client for the OpenWeatherMap current-weather endpoint.
pub struct OpenWeatherMapClient {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl OpenWeatherMapClient {
    pub fn new(config: OpenWeatherMapConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::from_reqwest(e, config.timeout))?;

        Ok(Self {
            client,
            base_url: config.base_url,
            api_key: config.api_key,
            timeout: config.timeout,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherMapClient {
    #[instrument(skip(self))]
    async fn current_weather(&self, coordinate: GeoCoordinate) -> Result<WeatherRecord, FetchError> {
        let lat = format!("{:.2}", coordinate.latitude);
        let lon = format!("{:.2}", coordinate.longitude);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(e, self.timeout))?;
        debug!(bytes = body.len(), "Received current weather");

        parse_current_weather(&body)
    }
}

/// Parse a current-weather JSON body into a [`WeatherRecord`].
///
/// Any missing field, wrong type or empty `weather` array is a
/// [`FetchError::MalformedPayload`].
pub fn parse_current_weather(body: &[u8]) -> Result<WeatherRecord, FetchError> {
    let payload: CurrentWeatherResponse =
        serde_json::from_slice(body).map_err(|e| FetchError::MalformedPayload(e.to_string()))?;
    payload.into_record()
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    main: MainSection,
    weather: Vec<ConditionSection>,
    wind: WindSection,
}

#[derive(Debug, Deserialize)]
struct MainSection {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionSection {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct WindSection {
    speed: f64,
    deg: f64,
}

impl CurrentWeatherResponse {
    fn into_record(self) -> Result<WeatherRecord, FetchError> {
        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::MalformedPayload("empty weather array".to_string()))?;

        Ok(WeatherRecord::from_observation(
            self.main.temp,
            &condition.main,
            condition.description,
            self.wind.speed,
            self.wind.deg,
        ))
    }
}
