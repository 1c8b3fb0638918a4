//! Tripadvisor content API tools.
//!
//! Every tool builds one URL, performs one GET and returns the upstream JSON
//! unchanged (or `null` when the call fails). Arguments are interpolated as
//! given; the upstream API is the only validator.

use anyhow::{bail, Result};
use std::time::Duration;

use crate::config::{TripConfig, TripcastConfig, API_KEY_ENV};
use crate::server::ToolServer;
use crate::tools::{HandlerFuture, ToolArgs, ToolDefinition, ToolError, ToolRegistry};
use crate::upstream::{UpstreamProfile, ACCEPT_JSON};

pub const SERVER_NAME: &str = "trip-app";

const INSTRUCTIONS: &str = "Search Tripadvisor for hotels, restaurants, attractions and \
     geographic areas, then fetch details and recent reviews by location ID. \
     Results are the raw Tripadvisor JSON, or null when the request failed.";

const LAT_LONG_DOC: &str =
    "Latitude/longitude pair to scope the search around a point, e.g. \"42.3455,-71.10767\".";
const CATEGORY_DOC: &str =
    "Property type filter: \"hotels\", \"attractions\", \"restaurants\" or \"geos\".";
const RADIUS_DOC: &str = "Radius around the latitude/longitude pair used to filter results.";
const RADIUS_UNIT_DOC: &str = "Radius unit: \"km\", \"mi\" or \"m\".";
const LOCATION_ID_DOC: &str =
    "Tripadvisor location ID, as returned by a previous search (path parameter).";

/// Context shared by the travel tools.
#[derive(Debug, Clone)]
pub struct TripTools {
    base_url: String,
    api_key: String,
    language: String,
    profile: UpstreamProfile,
}

impl TripTools {
    pub fn new(config: &TripConfig, timeout: Duration) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            language: config.language.clone(),
            profile: UpstreamProfile::new(&config.user_agent, timeout),
        }
    }

    pub fn nearby_search_url(
        &self,
        lat_long: &str,
        category: &str,
        radius: &str,
        radius_unit: &str,
    ) -> String {
        format!(
            "{}/nearby_search/?key={}&latLong={}&category={}&radius={}&radiusUnit={}&language={}",
            self.base_url, self.api_key, lat_long, category, radius, radius_unit, self.language
        )
    }

    pub fn locations_search_url(
        &self,
        lat_long: &str,
        search_query: &str,
        category: &str,
        radius: &str,
        radius_unit: &str,
    ) -> String {
        format!(
            "{}/search/?key={}&searchQuery={}&latLong={}&category={}&radius={}&radiusUnit={}&language={}",
            self.base_url,
            self.api_key,
            search_query,
            lat_long,
            category,
            radius,
            radius_unit,
            self.language
        )
    }

    pub fn location_details_url(&self, location_id: &str) -> String {
        format!("{}/{}/details/?key={}", self.base_url, location_id, self.api_key)
    }

    pub fn location_reviews_url(&self, location_id: &str) -> String {
        format!("{}/{}/reviews/?key={}", self.base_url, location_id, self.api_key)
    }

    async fn fetch_raw(&self, url: String) -> Result<String, ToolError> {
        Ok(self.profile.get(url, ACCEPT_JSON).await.into_json_text())
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn nearby_search<'a>(tools: &'a TripTools, args: &'a ToolArgs) -> HandlerFuture<'a> {
    let url = tools.nearby_search_url(
        args.value("lat_long"),
        args.value("category"),
        args.value("radius"),
        args.value("radius_unit"),
    );
    Box::pin(tools.fetch_raw(url))
}

fn locations_search<'a>(tools: &'a TripTools, args: &'a ToolArgs) -> HandlerFuture<'a> {
    let url = tools.locations_search_url(
        args.value("lat_long"),
        args.value("search_query"),
        args.value("category"),
        args.value("radius"),
        args.value("radius_unit"),
    );
    Box::pin(tools.fetch_raw(url))
}

fn location_details<'a>(tools: &'a TripTools, args: &'a ToolArgs) -> HandlerFuture<'a> {
    let url = tools.location_details_url(args.value("location_id"));
    Box::pin(tools.fetch_raw(url))
}

fn location_reviews<'a>(tools: &'a TripTools, args: &'a ToolArgs) -> HandlerFuture<'a> {
    let url = tools.location_reviews_url(args.value("location_id"));
    Box::pin(tools.fetch_raw(url))
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Build the travel tool registry.
pub fn registry() -> Result<ToolRegistry<TripTools>, ToolError> {
    let mut registry = ToolRegistry::new();

    registry.register(
        ToolDefinition::new(
            "nearby_search",
            "Return up to 10 locations near the given latitude/longitude. \
             Narrow the search with a category, radius and radius unit.",
        )
        .param("lat_long", LAT_LONG_DOC)
        .param("category", CATEGORY_DOC)
        .param("radius", RADIUS_DOC)
        .param("radius_unit", RADIUS_UNIT_DOC),
        nearby_search,
    )?;

    registry.register(
        ToolDefinition::new(
            "locations_search",
            "Return up to 10 locations matching a search query, optionally \
             scoped by latitude/longitude, category and radius.",
        )
        .param("lat_long", LAT_LONG_DOC)
        .param("search_query", "Text matched against location names.")
        .param("category", CATEGORY_DOC)
        .param("radius", RADIUS_DOC)
        .param("radius_unit", RADIUS_UNIT_DOC),
        locations_search,
    )?;

    registry.register(
        ToolDefinition::new(
            "location_details",
            "Return details for a hotel, restaurant or attraction: name, address, \
             rating and Tripadvisor listing URLs.",
        )
        .param("location_id", LOCATION_ID_DOC),
        location_details,
    )?;

    registry.register(
        ToolDefinition::new(
            "location_reviews",
            "Return up to 5 of the most recent reviews for a location.",
        )
        .param("location_id", LOCATION_ID_DOC),
        location_reviews,
    )?;

    Ok(registry)
}

/// Build the travel MCP server. Fails when no API key is configured.
pub fn server(config: &TripcastConfig) -> Result<ToolServer<TripTools>> {
    if config.trip.api_key.trim().is_empty() {
        bail!(
            "No Tripadvisor API key configured: set {} or trip.api_key",
            API_KEY_ENV
        );
    }
    let tools = TripTools::new(&config.trip, config.timeout());
    Ok(ToolServer::new(SERVER_NAME, INSTRUCTIONS, registry()?, tools))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tools() -> TripTools {
        let config = TripConfig {
            base_url: "https://trip.test/api/v1/location/".into(),
            api_key: "KEY".into(),
            ..TripConfig::default()
        };
        TripTools::new(&config, Duration::from_secs(30))
    }

    #[test]
    fn nearby_search_url_matches_upstream_contract() {
        assert_eq!(
            tools().nearby_search_url("42.3455,-71.10767", "hotels", "5", "km"),
            "https://trip.test/api/v1/location/nearby_search/?key=KEY&latLong=42.3455,-71.10767\
             &category=hotels&radius=5&radiusUnit=km&language=en"
        );
    }

    #[test]
    fn locations_search_puts_query_before_coordinates() {
        let url = tools().locations_search_url("1,2", "Fenway Park", "attractions", "3", "mi");
        assert_eq!(
            url,
            "https://trip.test/api/v1/location/search/?key=KEY&searchQuery=Fenway Park&latLong=1,2\
             &category=attractions&radius=3&radiusUnit=mi&language=en"
        );
    }

    #[test]
    fn detail_and_review_urls_use_path_id() {
        let t = tools();
        assert_eq!(
            t.location_details_url("60745"),
            "https://trip.test/api/v1/location/60745/details/?key=KEY"
        );
        assert_eq!(
            t.location_reviews_url("60745"),
            "https://trip.test/api/v1/location/60745/reviews/?key=KEY"
        );
    }

    #[test]
    fn values_are_not_validated_or_escaped() {
        let url = tools().nearby_search_url("not-a-coord", "spaceships", "-1", "parsec");
        assert!(url.contains("latLong=not-a-coord&category=spaceships&radius=-1&radiusUnit=parsec"));
    }

    #[test]
    fn server_requires_api_key() {
        let mut config = TripcastConfig::default();
        let err = server(&config).err().unwrap();
        assert!(err.to_string().contains(API_KEY_ENV));

        config.trip.api_key = "KEY".into();
        assert_eq!(server(&config).unwrap().name(), SERVER_NAME);
    }

    #[test]
    fn registry_exposes_four_tools() {
        let registry = registry().unwrap();
        let names: Vec<_> = registry.definitions().map(|d| d.name).collect();
        assert_eq!(
            names,
            ["nearby_search", "locations_search", "location_details", "location_reviews"]
        );
        let search = registry.definition("locations_search").unwrap();
        assert_eq!(search.params.len(), 5);
    }
}
