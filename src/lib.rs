//! Tripcast: MCP tool adapters for third-party HTTP APIs.
//!
//! Two adapters share one request helper and one tool registry: a travel
//! adapter over the Tripadvisor content API and a weather adapter over the
//! National Weather Service API (plus two novelty endpoints).

pub mod config;
pub mod server;
pub mod tools;
pub mod trip;
pub mod types;
pub mod upstream;
pub mod weather;
