//! Common test fixtures for weather-tiles tests.

use serde_json::{json, Value};
use tile_common::WeatherRecord;

/// Record used for layout checks: 21°C, clear, wind from the east.
pub fn clear_east_wind() -> WeatherRecord {
    WeatherRecord::from_observation(21.0, "Clear", "clear sky", 3.5, 90.0)
}

/// Record used for end-to-end checks: 5°C, rain, wind from the south.
pub fn rain_south_wind() -> WeatherRecord {
    WeatherRecord::from_observation(5.0, "Rain", "light rain", 4.1, 180.0)
}

/// Build a record with the given headline values.
pub fn record(temperature: f64, condition: &str, wind_direction: f64) -> WeatherRecord {
    WeatherRecord::from_observation(temperature, condition, condition.to_lowercase(), 2.0, wind_direction)
}

/// An OpenWeatherMap current-weather response body.
pub fn openweathermap_payload(
    temperature: f64,
    condition: &str,
    description: &str,
    wind_speed: f64,
    wind_direction: f64,
) -> Value {
    json!({
        "coord": {"lon": 0.0, "lat": 0.0},
        "weather": [
            {"id": 800, "main": condition, "description": description, "icon": "01d"}
        ],
        "base": "stations",
        "main": {
            "temp": temperature,
            "feels_like": temperature,
            "pressure": 1013,
            "humidity": 60
        },
        "visibility": 10000,
        "wind": {"speed": wind_speed, "deg": wind_direction},
        "clouds": {"all": 0},
        "dt": 1_700_000_000,
        "name": "Test"
    })
}
