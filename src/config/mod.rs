pub mod schema;

pub use schema::{TripConfig, TripcastConfig, WeatherConfig};

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable holding the Tripadvisor API key.
pub const API_KEY_ENV: &str = "TRIPADVISOR_API_KEY";

/// Environment variable overriding the outbound request timeout (seconds).
pub const TIMEOUT_ENV: &str = "TRIPCAST_TIMEOUT_SECS";

/// Default tripcast home directory (~/.tripcast).
pub fn default_home_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|d| d.home_dir().join(".tripcast"))
        .unwrap_or_else(|| PathBuf::from(".tripcast"))
}

/// Default config file location (~/.tripcast/tripcast.toml).
pub fn default_config_path() -> PathBuf {
    default_home_dir().join("tripcast.toml")
}

/// Load config from the given path, or return defaults.
///
/// `.yaml` / `.yml` files are parsed as YAML, everything else as TOML.
pub fn load_config(path: &Path) -> Result<TripcastConfig> {
    if !path.exists() {
        debug!("No config at {}, using defaults", path.display());
        return Ok(TripcastConfig::default());
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let config = if is_yaml {
        serde_yaml::from_str(&contents).context("Failed to parse tripcast config (YAML)")?
    } else {
        toml::from_str(&contents).context("Failed to parse tripcast config (TOML)")?
    };
    validate(&config)?;
    Ok(config)
}

fn validate(config: &TripcastConfig) -> Result<()> {
    if config.timeout_secs == 0 {
        bail!("timeout_secs must be at least 1 second");
    }
    Ok(())
}

/// Overlay environment variables on a loaded config.
pub fn apply_env_overrides(config: &mut TripcastConfig) {
    apply_overrides(config, |name| std::env::var(name).ok());
}

fn apply_overrides(config: &mut TripcastConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
        config.trip.api_key = key.trim().to_string();
    }

    if let Some(raw) = lookup(TIMEOUT_ENV) {
        match raw.trim().parse::<u64>() {
            Ok(0) => warn!("Ignoring {}=0: timeout must be at least 1 second", TIMEOUT_ENV),
            Ok(secs) => config.timeout_secs = secs,
            Err(_) => warn!("Ignoring {}={:?}: not an integer", TIMEOUT_ENV, raw),
        }
    }
}
