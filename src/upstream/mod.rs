pub mod fetch;

pub use fetch::{fetch, FailureKind, Fetched, ResponseMode, UpstreamRequest};

use std::time::Duration;

pub const ACCEPT_JSON: &str = "application/json";
pub const ACCEPT_GEO_JSON: &str = "application/geo+json";
pub const ACCEPT_TEXT: &str = "text/plain";

/// Header and timeout settings shared by every call an adapter makes.
#[derive(Debug, Clone)]
pub struct UpstreamProfile {
    pub user_agent: String,
    pub timeout: Duration,
}

impl UpstreamProfile {
    pub fn new(user_agent: &str, timeout: Duration) -> Self {
        Self {
            user_agent: user_agent.to_string(),
            timeout,
        }
    }

    /// Build a JSON-mode request for `url` with the given Accept header.
    pub fn request(&self, url: String, accept: &'static str) -> UpstreamRequest {
        UpstreamRequest {
            url,
            user_agent: self.user_agent.clone(),
            accept,
            timeout: self.timeout,
            mode: ResponseMode::Json,
        }
    }

    /// Build a text-mode request for `url` with the given Accept header.
    pub fn text_request(&self, url: String, accept: &'static str) -> UpstreamRequest {
        UpstreamRequest {
            mode: ResponseMode::Text,
            ..self.request(url, accept)
        }
    }

    /// Shorthand for `fetch(&self.request(url, accept))`.
    pub async fn get(&self, url: String, accept: &'static str) -> Fetched {
        fetch(&self.request(url, accept)).await
    }
}
