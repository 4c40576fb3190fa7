//! `siap`, a command-line client for the SIAP-SPJ claim server.
//!
//! # Usage
//!
//! ```
//! siap --url http://localhost:3000 stats
//! siap list
//! siap show 12
//! siap submit claim.json
//! siap --config ~/.config/siap/config.toml log --limit 20
//! ```

mod client;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use serde::Deserialize;
use siap_core::claim::ClaimId;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:3000";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "siap", about = "Command-line client for the SIAP-SPJ claim server")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the server (default: http://localhost:3000).
  #[arg(long, env = "SIAP_URL")]
  url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List every claim, newest first.
  List,
  /// Show one claim with its team, partners, transport and lodging.
  Show { id: i64 },
  /// Submit a claim from a JSON file in the form's submission format.
  Submit { file: PathBuf },
  /// Show the dashboard summary.
  Stats,
  /// Show recent activity-log entries.
  Log {
    #[arg(short, long, default_value_t = 20)]
    limit: usize,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| DEFAULT_URL.to_string()),
  };
  tracing::debug!(url = %api_config.base_url, "using server");

  let client = ApiClient::new(api_config)?;

  let output = match args.command {
    Command::List => render::claims_table(&client.list_claims().await?),
    Command::Show { id } => render::claim_detail(&client.get_claim(ClaimId(id)).await?),
    Command::Submit { file } => {
      let raw = std::fs::read_to_string(&file)
        .with_context(|| format!("reading claim file {}", file.display()))?;
      let body: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("parsing claim file {}", file.display()))?;
      let receipt = client.submit_claim(&body).await?;
      format!("Data SPJ tersimpan dengan id {}\n", receipt.id)
    }
    Command::Stats => render::dashboard(&client.stats().await?),
    Command::Log { limit } => render::activity_log(&client.activity_log(limit).await?),
  };

  print!("{output}");
  Ok(())
}
