//! # Cadence — interval-driven remote action runner
//!
//! Usage:
//!   cadence                              # Serve the console on 0.0.0.0:5000
//!   cadence --port 8080                  # Custom port
//!   cadence --config ./cadence.toml      # Explicit config file
//!   cadence --verbose                    # Debug logging

use std::sync::Arc;

use anyhow::Result;
use cadence_core::config::CadenceConfig;
use cadence_remote::HttpRemoteClient;
use cadence_scheduler::{TaskRegistry, WorkerSettings};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "cadence",
    version,
    about = "⏰ Cadence — runs cancellable, interval-driven remote action jobs"
)]
struct Cli {
    /// Config file (default: $CADENCE_CONFIG or ~/.cadence/config.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Bind address (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Console port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn expand_path(p: &str) -> String {
    shellexpand::tilde(p).to_string()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "cadence=debug,cadence_scheduler=debug,cadence_remote=debug,cadence_gateway=debug,tower_http=debug"
    } else {
        "cadence=info,cadence_scheduler=info,cadence_remote=info,cadence_gateway=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    let mut config = match &cli.config {
        Some(path) => CadenceConfig::load_from(std::path::Path::new(&expand_path(path)))?,
        None => CadenceConfig::load()?,
    };
    if let Some(host) = cli.host {
        config.gateway.host = host;
    }
    if let Some(port) = cli.port {
        config.gateway.port = port;
    }

    let timeout = config.scheduler.request_timeout();
    let client = HttpRemoteClient::new(&config.remote, timeout)?;
    tracing::info!("🔗 Remote service: {}", client.base_url());

    let registry = Arc::new(TaskRegistry::with_settings(
        Arc::new(client),
        WorkerSettings { call_timeout: timeout },
    ));

    cadence_gateway::start(&config, registry).await
}
