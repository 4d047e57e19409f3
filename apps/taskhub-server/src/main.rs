#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
mod config;
mod telemetry;
mod wiring;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::AppConfig;

/// TaskHub server: task and audit APIs behind the guard chain.
#[derive(Debug, Parser)]
#[command(name = "taskhub-server", version, about)]
struct Cli {
    /// YAML configuration file. `TASKHUB__*` environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit. Secrets are redacted.
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    telemetry::init(&config.logging)?;
    tracing::info!(
        bind_addr = %config.server.bind_addr,
        authn = ?config.authn.mode,
        record_denials = config.audit.record_denials,
        "Starting taskhub-server"
    );

    let gateway = wiring::build_gateway(&config)?;
    gateway.serve(shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("HTTP server shutting down gracefully");
}
