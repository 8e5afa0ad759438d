//! Command-line and environment configuration.

use clap::Parser;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use weather_source::DEFAULT_BASE_URL;

/// Raw command-line arguments. Every flag can also come from the
/// environment or a `.env` file.
#[derive(Parser, Clone)]
#[command(name = "tile-api")]
#[command(about = "Weather map tile server")]
pub struct Args {
    /// Listen address
    #[arg(short, long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8112")]
    pub listen: String,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Number of tokio worker threads (default: number of CPU cores)
    #[arg(long, env = "TOKIO_WORKER_THREADS")]
    pub worker_threads: Option<usize>,

    /// OpenWeatherMap API key
    #[arg(long, env = "OPENWEATHERMAP_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Current-weather endpoint URL
    #[arg(long, env = "WEATHER_API_URL", default_value = DEFAULT_BASE_URL)]
    pub weather_api_url: String,

    /// Maximum number of cached weather records
    #[arg(long, env = "WEATHER_CACHE_CAPACITY", default_value_t = 10_000)]
    pub cache_capacity: usize,

    /// Seconds a cached weather record stays fresh
    #[arg(long, env = "WEATHER_CACHE_TTL_SECS", default_value_t = 600)]
    pub cache_ttl_secs: u64,

    /// Upstream request timeout in seconds
    #[arg(long, env = "WEATHER_FETCH_TIMEOUT_SECS", default_value_t = 5)]
    pub fetch_timeout_secs: u64,

    /// TrueType font for PNG labels (built-in bitmap font if unset)
    #[arg(long, env = "TILE_FONT_PATH")]
    pub font_path: Option<PathBuf>,
}

/// Configuration problems that stop the server from starting.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("OPENWEATHERMAP_API_KEY is not set")]
    MissingApiKey,

    #[error("Invalid listen address: {0}")]
    InvalidListenAddress(String),

    #[error("{name} must be greater than zero")]
    NotPositive { name: &'static str },
}

/// Validated server configuration.
#[derive(Clone)]
pub struct Config {
    pub listen: SocketAddr,
    pub api_key: String,
    pub weather_api_url: String,
    pub cache_capacity: usize,
    pub cache_ttl: Duration,
    pub fetch_timeout: Duration,
    pub font_path: Option<PathBuf>,
}

impl Config {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let api_key = args
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?
            .to_string();

        let listen = args
            .listen
            .parse()
            .map_err(|_| ConfigError::InvalidListenAddress(args.listen.clone()))?;

        if args.cache_capacity == 0 {
            return Err(ConfigError::NotPositive {
                name: "cache capacity",
            });
        }
        if args.cache_ttl_secs == 0 {
            return Err(ConfigError::NotPositive { name: "cache TTL" });
        }
        if args.fetch_timeout_secs == 0 {
            return Err(ConfigError::NotPositive {
                name: "fetch timeout",
            });
        }

        Ok(Self {
            listen,
            api_key,
            weather_api_url: args.weather_api_url.clone(),
            cache_capacity: args.cache_capacity,
            cache_ttl: Duration::from_secs(args.cache_ttl_secs),
            fetch_timeout: Duration::from_secs(args.fetch_timeout_secs),
            font_path: args.font_path.clone(),
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("listen", &self.listen)
            .field("api_key", &"<redacted>")
            .field("weather_api_url", &self.weather_api_url)
            .field("cache_capacity", &self.cache_capacity)
            .field("cache_ttl", &self.cache_ttl)
            .field("fetch_timeout", &self.fetch_timeout)
            .field("font_path", &self.font_path)
            .finish()
    }
}
