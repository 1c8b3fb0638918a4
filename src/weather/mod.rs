//! NWS weather tools plus the random joke / random number novelty tools.

pub mod format;

use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::{TripcastConfig, WeatherConfig};
use crate::server::ToolServer;
use crate::tools::{HandlerFuture, ToolArgs, ToolDefinition, ToolError, ToolRegistry};
use crate::upstream::{fetch, UpstreamProfile, ACCEPT_GEO_JSON, ACCEPT_JSON, ACCEPT_TEXT};

pub const SERVER_NAME: &str = "weather";

const INSTRUCTIONS: &str = "US weather from the National Weather Service: active alerts \
     by state and a five-period forecast by coordinates. Also serves a random dad joke \
     and random integers in an inclusive range.";

pub const ALERTS_UNAVAILABLE: &str = "Unable to fetch alerts or no alerts found.";
pub const NO_ACTIVE_ALERTS: &str = "No active alerts for this state.";
pub const FORECAST_LOCATION_UNAVAILABLE: &str = "Unable to fetch forecast data for this location.";
pub const FORECAST_UNAVAILABLE: &str = "Unable to fetch detailed forecast.";

/// Context shared by the weather tools.
#[derive(Debug, Clone)]
pub struct WeatherTools {
    nws_base_url: String,
    random_base_url: String,
    joke_base_url: String,
    forecast_periods: usize,
    profile: UpstreamProfile,
}

impl WeatherTools {
    pub fn new(config: &WeatherConfig, timeout: Duration) -> Self {
        Self {
            nws_base_url: config.nws_base_url.trim_end_matches('/').to_string(),
            random_base_url: config.random_base_url.trim_end_matches('/').to_string(),
            joke_base_url: config.joke_base_url.clone(),
            forecast_periods: config.forecast_periods,
            profile: UpstreamProfile::new(&config.user_agent, timeout),
        }
    }

    pub fn alerts_url(&self, state: &str) -> String {
        format!("{}/alerts/active/area/{}", self.nws_base_url, state)
    }

    pub fn points_url(&self, latitude: &str, longitude: &str) -> String {
        format!("{}/points/{},{}", self.nws_base_url, latitude, longitude)
    }

    /// The upstream range excludes `max`, so it is sent as `max + 1`.
    pub fn random_number_url(&self, min: &str, max: &str, count: &str) -> Result<String, ToolError> {
        let upper = max
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(|m| m.checked_add(1))
            .ok_or_else(|| ToolError::InvalidArgument {
                param: "max".into(),
                reason: format!("expected an integer, got {:?}", max),
            })?;
        Ok(format!(
            "{}/?min={}&max={}&count={}",
            self.random_base_url, min, upper, count
        ))
    }

    /// Active alerts for a two-letter state code, rendered as text.
    pub async fn alerts(&self, state: &str) -> String {
        let data = self
            .profile
            .get(self.alerts_url(state), ACCEPT_GEO_JSON)
            .await
            .data();

        // A present but null `features` means no alerts, like an empty list.
        let features = match data.as_ref().and_then(|d| d.get("features")) {
            Some(Value::Array(features)) if !features.is_empty() => features,
            Some(Value::Array(_)) | Some(Value::Null) => return NO_ACTIVE_ALERTS.into(),
            _ => return ALERTS_UNAVAILABLE.into(),
        };

        debug!(state, count = features.len(), "Formatting alerts");
        format::format_alerts(features)
    }

    /// Forecast for a point: resolve the grid forecast URL, then fetch it.
    pub async fn forecast(&self, latitude: &str, longitude: &str) -> String {
        let Some(points) = self
            .profile
            .get(self.points_url(latitude, longitude), ACCEPT_GEO_JSON)
            .await
            .data()
        else {
            return FORECAST_LOCATION_UNAVAILABLE.into();
        };

        let Some(forecast_url) = points["properties"]["forecast"].as_str() else {
            debug!("Points response has no forecast URL");
            return FORECAST_LOCATION_UNAVAILABLE.into();
        };

        let Some(forecast) = self
            .profile
            .get(forecast_url.to_string(), ACCEPT_GEO_JSON)
            .await
            .data()
        else {
            return FORECAST_UNAVAILABLE.into();
        };

        let Some(periods) = forecast["properties"]["periods"].as_array() else {
            debug!("Forecast response has no periods");
            return FORECAST_UNAVAILABLE.into();
        };

        format::format_forecast(periods, self.forecast_periods)
    }

    /// Raw JSON of one random joke, or `null`.
    pub async fn random_dad_joke(&self) -> String {
        let request = self
            .profile
            .text_request(self.joke_url(), ACCEPT_TEXT);
        fetch(&request).await.into_json_text()
    }

    /// Raw JSON list of random integers in `[min, max]`, or `null`.
    pub async fn random_number(&self, min: &str, max: &str, count: &str) -> Result<String, ToolError> {
        let url = self.random_number_url(min, max, count)?;
        Ok(self.profile.get(url, ACCEPT_JSON).await.into_json_text())
    }

    fn joke_url(&self) -> String {
        self.joke_base_url.clone()
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn get_alerts<'a>(tools: &'a WeatherTools, args: &'a ToolArgs) -> HandlerFuture<'a> {
    Box::pin(async move { Ok(tools.alerts(args.value("state")).await) })
}

fn get_forecast<'a>(tools: &'a WeatherTools, args: &'a ToolArgs) -> HandlerFuture<'a> {
    Box::pin(async move {
        Ok(tools
            .forecast(args.value("latitude"), args.value("longitude"))
            .await)
    })
}

fn get_random_dad_joke<'a>(tools: &'a WeatherTools, _args: &'a ToolArgs) -> HandlerFuture<'a> {
    Box::pin(async move { Ok(tools.random_dad_joke().await) })
}

fn get_random_number<'a>(tools: &'a WeatherTools, args: &'a ToolArgs) -> HandlerFuture<'a> {
    Box::pin(tools.random_number(args.value("min"), args.value("max"), args.value("count")))
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Build the weather tool registry.
pub fn registry() -> Result<ToolRegistry<WeatherTools>, ToolError> {
    let mut registry = ToolRegistry::new();

    registry.register(
        ToolDefinition::new("get_alerts", "Get active weather alerts for a US state.")
            .param("state", "Two-letter US state code (e.g. CA, NY)."),
        get_alerts,
    )?;

    registry.register(
        ToolDefinition::new("get_forecast", "Get the weather forecast for a location.")
            .number_param("latitude", "Latitude of the location.")
            .number_param("longitude", "Longitude of the location."),
        get_forecast,
    )?;

    registry.register(
        ToolDefinition::new("get_random_dad_joke", "Get a random dad joke."),
        get_random_dad_joke,
    )?;

    registry.register(
        ToolDefinition::new(
            "get_random_number",
            "Get random integers between min and max, both inclusive.",
        )
        .param("min", "Smallest number that may be returned.")
        .param("max", "Largest number that may be returned.")
        .param("count", "How many numbers to return."),
        get_random_number,
    )?;

    Ok(registry)
}

/// Build the weather MCP server.
pub fn server(config: &TripcastConfig) -> Result<ToolServer<WeatherTools>, ToolError> {
    let tools = WeatherTools::new(&config.weather, config.timeout());
    Ok(ToolServer::new(SERVER_NAME, INSTRUCTIONS, registry()?, tools))
}
