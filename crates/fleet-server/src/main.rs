//! fleet-server - Fleet backend server
//!
//! Slash command and scheduled event endpoints over HTTP.

use anyhow::Context;
use fleet_core::Fleet;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod middleware;
mod routes;
mod services;
mod state;

use services::DailySweep;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("fleet_server=info".parse()?)
                .add_directive("fleet_core=info".parse()?),
        )
        .init();

    info!("fleet-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = config::Config::load()?;
    info!("Config loaded from {:?}", config.config_path);

    let fleet = Fleet::from_config(&config.fleet)?;
    let bind = config.bind;
    let daily_at = config.daily_at;
    let state = AppState::new(config, &fleet)?;

    let scheduler = daily_at.map(|at| DailySweep::new(at).spawn(state.clone()));

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("binding {}", bind))?;
    info!("Listening on {}", bind);

    axum::serve(listener, routes::create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = scheduler {
        handle.abort();
    }
    info!("Shutting down...");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
