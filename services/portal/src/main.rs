use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use common::{config::ClientConfig, notify::TracingNotifier};
use portal::AppState;

mod commands;

use crate::commands::Commands;

#[derive(Parser)]
#[command(name = "visa-portal")]
#[command(about = "Visa Portal - browse visa requirements, manage listings and applications", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stdout is kept for command output
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let cli = Cli::parse();

    let config = ClientConfig::from_env()?;
    info!("Using API at {}", config.api_base_url);

    let state = AppState::from_config(&config, Arc::new(TracingNotifier))?;

    commands::run(cli.command, &state).await
}
