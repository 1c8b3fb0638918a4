//! Tripcast: MCP tool adapters for Tripadvisor and the NWS weather API.
//!
//! Usage:
//!   tripcast serve <trip|weather>                 Serve an adapter over stdio
//!   tripcast tools <trip|weather>                 List an adapter's tools
//!   tripcast call <trip|weather> <tool> [k=v...]  Invoke one tool and print the result

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing::debug;

use tripcast::config::{self, TripcastConfig};
use tripcast::server::{serve_stdio, ToolServer};
use tripcast::tools::{ToolArgs, ToolDefinition};
use tripcast::types::AdapterKind;
use tripcast::{trip, weather};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "tripcast")]
#[command(version)]
#[command(about = "MCP tool adapters for Tripadvisor and the NWS weather API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the config file (TOML, or YAML by extension).
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log level (debug, info, warn, error). Defaults to the config file value.
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve an adapter over stdio.
    Serve { adapter: AdapterKind },

    /// List an adapter's tools and their parameters.
    Tools { adapter: AdapterKind },

    /// Invoke one tool and print its result.
    Call {
        adapter: AdapterKind,

        /// Tool name, e.g. get_alerts.
        tool: String,

        /// Arguments as key=value pairs.
        #[arg(value_parser = parse_key_val)]
        args: Vec<(String, String)>,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .as_deref()
        .map(|p| PathBuf::from(shellexpand::tilde(p).into_owned()))
        .unwrap_or_else(config::default_config_path);
    let mut cfg = config::load_config(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    config::apply_env_overrides(&mut cfg);

    // stdout carries the MCP stream, so logs go to stderr
    let level = cli.log_level.as_deref().unwrap_or(cfg.log_level.as_str());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    debug!("Using config {}", config_path.display());

    match cli.command {
        Commands::Serve { adapter } => cmd_serve(adapter, &cfg).await,
        Commands::Tools { adapter } => cmd_tools(adapter),
        Commands::Call {
            adapter,
            tool,
            args,
        } => cmd_call(adapter, &cfg, &tool, &ToolArgs::from_pairs(args)).await,
    }
}

// ---------------------------------------------------------------------------
// Command implementations
// ---------------------------------------------------------------------------

async fn cmd_serve(adapter: AdapterKind, cfg: &TripcastConfig) -> Result<()> {
    match adapter {
        AdapterKind::Trip => serve_stdio(trip::server(cfg)?).await,
        AdapterKind::Weather => serve_stdio(weather::server(cfg)?).await,
    }
}

fn cmd_tools(adapter: AdapterKind) -> Result<()> {
    let definitions: Vec<ToolDefinition> = match adapter {
        AdapterKind::Trip => trip::registry()?.definitions().cloned().collect(),
        AdapterKind::Weather => weather::registry()?.definitions().cloned().collect(),
    };

    println!();
    println!("{}", format!("=== {} tools ===", adapter).bold());
    for def in &definitions {
        println!();
        println!("  {}", def.name.green().bold());
        println!("    {}", def.description);
        for param in &def.params {
            println!(
                "    {} {}",
                format!("{}:", param.name).cyan(),
                param.description.dimmed()
            );
        }
    }
    println!();
    Ok(())
}

async fn cmd_call(
    adapter: AdapterKind,
    cfg: &TripcastConfig,
    tool: &str,
    args: &ToolArgs,
) -> Result<()> {
    let output = match adapter {
        AdapterKind::Trip => invoke(trip::server(cfg)?, tool, args).await?,
        AdapterKind::Weather => invoke(weather::server(cfg)?, tool, args).await?,
    };
    println!("{}", output);
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn invoke<C: Send + Sync + 'static>(
    server: ToolServer<C>,
    tool: &str,
    args: &ToolArgs,
) -> Result<String> {
    server
        .invoke(tool, args)
        .await
        .with_context(|| format!("{} call failed", tool))
}

fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got {:?}", raw))
}
