//! Startup helpers for the Food Forge server.

use std::process::ExitCode;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::server::{self, AppState};

/// Run the server (used by the `food-forge-server` binary).
///
/// # Returns
/// `ExitCode::SUCCESS` on graceful shutdown, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting Food Forge v{}", env!("CARGO_PKG_VERSION"));

    let (state, port) = match initialize() {
        Ok(ready) => ready,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::from(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    if let Err(e) = rt.block_on(server::run_server_with_shutdown(
        state,
        port,
        server::shutdown_signal(),
    )) {
        tracing::error!("Server error: {e}");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

/// Load configuration and build application state without starting the server.
///
/// # Errors
/// Returns an error if an API key is missing or state creation fails.
pub fn initialize() -> Result<(Arc<AppState>, u16), Box<dyn std::error::Error + Send + Sync>> {
    let config = AppConfig::from_env().map_err(|e| format!("Configuration error: {e}"))?;
    let port = config.port;
    tracing::info!(
        "Polling every {}s, giving up after {}s",
        config.poll.interval.as_secs(),
        config.poll.ceiling.as_secs()
    );

    let state = AppState::new(config).map_err(|e| format!("Failed to create state: {e}"))?;
    Ok((state, port))
}
