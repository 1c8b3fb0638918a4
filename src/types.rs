//! Shared types used across the tripcast adapters.

use std::fmt;

/// Which upstream adapter to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum AdapterKind {
    /// Tripadvisor content API.
    Trip,
    /// NWS weather plus the novelty APIs.
    Weather,
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trip => write!(f, "trip"),
            Self::Weather => write!(f, "weather"),
        }
    }
}
