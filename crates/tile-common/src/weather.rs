//! Current-weather observation types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Weather condition category reported by the upstream provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionCode {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Fog,
    Haze,
    Unknown,
}

impl ConditionCode {
    /// Every category, including `Unknown`.
    pub const ALL: [ConditionCode; 10] = [
        ConditionCode::Clear,
        ConditionCode::Clouds,
        ConditionCode::Rain,
        ConditionCode::Drizzle,
        ConditionCode::Thunderstorm,
        ConditionCode::Snow,
        ConditionCode::Mist,
        ConditionCode::Fog,
        ConditionCode::Haze,
        ConditionCode::Unknown,
    ];

    /// Parse a provider category token (e.g. "Rain"), case-insensitively.
    ///
    /// Tokens outside the known set map to `Unknown`.
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_lowercase().as_str() {
            "clear" => Self::Clear,
            "clouds" => Self::Clouds,
            "rain" => Self::Rain,
            "drizzle" => Self::Drizzle,
            "thunderstorm" => Self::Thunderstorm,
            "snow" => Self::Snow,
            "mist" => Self::Mist,
            "fog" => Self::Fog,
            "haze" => Self::Haze,
            _ => Self::Unknown,
        }
    }

    /// Lower-case token for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Clouds => "clouds",
            Self::Rain => "rain",
            Self::Drizzle => "drizzle",
            Self::Thunderstorm => "thunderstorm",
            Self::Snow => "snow",
            Self::Mist => "mist",
            Self::Fog => "fog",
            Self::Haze => "haze",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ConditionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current weather at one rounded coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    /// Air temperature, rounded to whole degrees Celsius
    pub temperature_celsius: i32,
    pub condition: ConditionCode,
    /// Free-text description from the provider (e.g. "light rain")
    pub description: String,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Direction the wind comes from, degrees clockwise from north in [0, 360)
    pub wind_direction_degrees: f64,
}

impl WeatherRecord {
    /// Build a record from raw provider values.
    ///
    /// Temperature is rounded half-to-even and the wind direction is
    /// normalised into [0, 360).
    pub fn from_observation(
        temperature: f64,
        condition_token: &str,
        description: impl Into<String>,
        wind_speed: f64,
        wind_direction: f64,
    ) -> Self {
        Self {
            temperature_celsius: temperature.round_ties_even() as i32,
            condition: ConditionCode::from_token(condition_token),
            description: description.into(),
            wind_speed,
            wind_direction_degrees: normalize_degrees(wind_direction),
        }
    }

    /// Temperature label as drawn on tiles, e.g. "21°C".
    pub fn temperature_label(&self) -> String {
        format!("{}°C", self.temperature_celsius)
    }
}

fn normalize_degrees(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}
