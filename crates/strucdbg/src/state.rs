use std::sync::Arc;

use crate::conf::StrucdbgConfig;
use crate::parser::metrics::IngestMetrics;

/// Process-wide pieces shared between boot, the serve loop and shutdown
/// reporting. Session state itself is owned by the serve loop.
pub struct AppState {
    pub config: StrucdbgConfig,
    pub metrics: Arc<IngestMetrics>,
}

impl AppState {
    pub fn new(config: StrucdbgConfig) -> Self {
        Self {
            config,
            metrics: Arc::new(IngestMetrics::new()),
        }
    }
}

pub type SharedState = Arc<AppState>;
