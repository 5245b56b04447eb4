//! fleet - Fleet operator CLI
//!
//! Runs slash commands and the scheduled shutdown from a terminal, against
//! the same configuration fleet-server uses.

use anyhow::Result;
use clap::Parser;
use fleet_core::FleetConfig;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;
mod commands;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("fleet=warn".parse()?))
        .init();

    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        println!("fleet {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(FleetConfig::config_path);
    debug!("Loading config from {:?}", config_path);
    let config = FleetConfig::load_from(&config_path)?;

    // Execute command
    match cli.command {
        Commands::Exec { user, text } => commands::exec::execute(&user, &text, &config).await,
        Commands::Sweep => commands::sweep::execute(&config).await,
        Commands::Aliases { json } => commands::aliases::execute(json, &config),
        Commands::Version => Ok(()),
    }
}
