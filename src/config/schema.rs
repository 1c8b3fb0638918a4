//! Configuration schema for tripcast.toml (TOML or YAML).

use serde::Deserialize;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TripcastConfig {
    /// Timeout applied to every outbound request, in seconds.
    pub timeout_secs: u64,

    /// Log level (debug, info, warn, error).
    pub log_level: String,

    /// Tripadvisor content API settings.
    pub trip: TripConfig,

    /// NWS and novelty API settings.
    pub weather: WeatherConfig,
}

/// Settings for the travel adapter.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TripConfig {
    /// Location API base URL.
    pub base_url: String,

    /// Static API key sent as the `key` query parameter.
    ///
    /// Left empty in files checked into source control; set
    /// `TRIPADVISOR_API_KEY` instead.
    pub api_key: String,

    /// User-Agent header for every travel request.
    pub user_agent: String,

    /// Language requested from the search endpoints.
    pub language: String,
}

/// Settings for the weather adapter.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// National Weather Service API base URL.
    pub nws_base_url: String,

    /// Random number API endpoint.
    pub random_base_url: String,

    /// Random joke API endpoint.
    pub joke_base_url: String,

    /// User-Agent header for every weather request.
    pub user_agent: String,

    /// Number of forecast periods rendered by `get_forecast`.
    pub forecast_periods: usize,
}

impl Default for TripcastConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            log_level: "info".into(),
            trip: TripConfig::default(),
            weather: WeatherConfig::default(),
        }
    }
}

impl Default for TripConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.content.tripadvisor.com/api/v1/location".into(),
            api_key: String::new(),
            user_agent: "trip-app/1.0".into(),
            language: "en".into(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            nws_base_url: "https://api.weather.gov".into(),
            random_base_url: "http://www.randomnumberapi.com/api/v1.0/random".into(),
            joke_base_url: "https://official-joke-api.appspot.com/random_joke".into(),
            user_agent: "weather-app/1.0".into(),
            forecast_periods: 5,
        }
    }
}

impl TripcastConfig {
    /// Outbound request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
