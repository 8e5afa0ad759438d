//! Current-weather retrieval for tile rendering.
//!
//! - [`WeatherProvider`]: the upstream collaborator seam
//! - [`OpenWeatherMapClient`]: HTTP implementation against the
//!   OpenWeatherMap current-weather endpoint
//! - [`WeatherService`]: rounds coordinates, consults the shared
//!   [`storage::WeatherCache`] and falls back to "absent" on any failure

pub mod openweathermap;
pub mod provider;
pub mod service;

pub use openweathermap::{OpenWeatherMapClient, OpenWeatherMapConfig, DEFAULT_BASE_URL};
pub use provider::{FetchError, WeatherProvider};
pub use service::WeatherService;
