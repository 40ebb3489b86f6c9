//! Boot: logging init, config load, state creation.

use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::conf::StrucdbgConfig;
use crate::state::{AppState, SharedState};

/// Initialise the tracing / logging subsystem.
///
/// Stdout carries sink messages, so diagnostics go to stderr.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "strucdbg=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load config and build shared state.
pub fn boot() -> Result<SharedState, Box<dyn std::error::Error>> {
    info!("Starting strucdbg v{}", env!("CARGO_PKG_VERSION"));

    let config = StrucdbgConfig::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;
    info!(
        "Sessions: retention={}s, eviction_interval={}s, fallback={:?}",
        config.retention_secs, config.eviction_interval_secs, config.fallback_session_id
    );
    info!("Max candidate size: {} bytes", config.max_candidate_size);

    Ok(Arc::new(AppState::new(config)))
}
