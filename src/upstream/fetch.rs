//! One-shot outbound GET that collapses every failure into [`Fetched::Absent`].
//!
//! Each call builds its own `reqwest::Client` with the request timeout, so no
//! connection state survives between calls.

use encoding_rs::{Encoding, UTF_8};
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use serde_json::Value;
use std::borrow::Cow;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// How the response body is decoded before JSON parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// Parse the raw body bytes as JSON.
    Json,
    /// Decode the body strictly in its declared charset (UTF-8 when none is
    /// given) and parse that text as JSON.
    Text,
}

/// A fully-formed outbound request. Built fresh per call.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub url: String,
    pub user_agent: String,
    pub accept: &'static str,
    pub timeout: Duration,
    pub mode: ResponseMode,
}

/// Coarse reason an upstream call produced no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FailureKind {
    /// Connection, TLS, timeout or body read failure.
    #[error("network error")]
    Network,
    /// Non-2xx response.
    #[error("upstream returned HTTP {0}")]
    Status(u16),
    /// Body was not valid JSON.
    #[error("response body is not valid JSON")]
    Parse,
}

/// Outcome of [`fetch`].
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    Data(Value),
    Absent(FailureKind),
}

impl Fetched {
    /// Parsed body, discarding the failure reason.
    pub fn data(self) -> Option<Value> {
        match self {
            Self::Data(value) => Some(value),
            Self::Absent(_) => None,
        }
    }

    /// Failure reason, if the call failed.
    pub fn failure(&self) -> Option<FailureKind> {
        match self {
            Self::Data(_) => None,
            Self::Absent(kind) => Some(*kind),
        }
    }

    /// Body serialized back to JSON text, or `null` when absent.
    pub fn into_json_text(self) -> String {
        match self {
            Self::Data(value) => value.to_string(),
            Self::Absent(_) => "null".to_string(),
        }
    }
}

/// Perform exactly one GET and return the parsed JSON body or the absence value.
pub async fn fetch(request: &UpstreamRequest) -> Fetched {
    match try_fetch(request).await {
        Ok(value) => Fetched::Data(value),
        Err(kind) => {
            debug!(url = %without_query(&request.url), reason = %kind, "Upstream request failed");
            Fetched::Absent(kind)
        }
    }
}

async fn try_fetch(request: &UpstreamRequest) -> Result<Value, FailureKind> {
    let client = reqwest::Client::builder()
        .timeout(request.timeout)
        .build()
        .map_err(network)?;

    let resp = client
        .get(&request.url)
        .header(USER_AGENT, request.user_agent.as_str())
        .header(ACCEPT, request.accept)
        .send()
        .await
        .map_err(network)?;

    let status = resp.status();
    if !status.is_success() {
        return Err(FailureKind::Status(status.as_u16()));
    }

    match request.mode {
        ResponseMode::Json => {
            let bytes = resp.bytes().await.map_err(network)?;
            serde_json::from_slice(&bytes).map_err(|_| FailureKind::Parse)
        }
        ResponseMode::Text => {
            let content_type = resp.headers().get(CONTENT_TYPE).cloned();
            let bytes = resp.bytes().await.map_err(network)?;
            let text = decode_text(content_type.as_ref(), &bytes)?;
            serde_json::from_str(&text).map_err(|_| FailureKind::Parse)
        }
    }
}

/// Undecodable bytes and unknown charsets are parse failures, never replaced.
fn decode_text<'a>(content_type: Option<&HeaderValue>, bytes: &'a [u8]) -> Result<Cow<'a, str>, FailureKind> {
    let encoding = match charset(content_type) {
        Some(label) => Encoding::for_label(label.as_bytes()).ok_or(FailureKind::Parse)?,
        None => UTF_8,
    };
    let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
    if had_errors {
        debug!(charset = encoding.name(), "Response body is not valid text");
        return Err(FailureKind::Parse);
    }
    Ok(text)
}

fn charset(content_type: Option<&HeaderValue>) -> Option<String> {
    let parsed: mime::Mime = content_type?.to_str().ok()?.parse().ok()?;
    parsed.get_param(mime::CHARSET).map(|c| c.as_str().to_string())
}

fn network(err: reqwest::Error) -> FailureKind {
    debug!("Upstream transport error: {}", err.without_url());
    FailureKind::Network
}

/// Query strings may carry credentials; keep them out of logs.
fn without_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}
