use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parser::MAX_CANDIDATE_SIZE;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML in config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrucdbgConfig {
    /// How long an ended session's history is kept before eviction
    pub retention_secs: u64,
    /// How often the eviction scheduler runs
    pub eviction_interval_secs: u64,
    /// Permanent session that receives records with missing or unknown session ids
    pub fallback_session_id: String,
    pub fallback_session_name: String,
    /// Candidates above this size are kept as raw text without a JSON decode
    pub max_candidate_size: usize,
}

impl Default for StrucdbgConfig {
    fn default() -> Self {
        Self {
            retention_secs: 300,
            eviction_interval_secs: 30,
            fallback_session_id: "default".to_string(),
            fallback_session_name: "Default".to_string(),
            max_candidate_size: MAX_CANDIDATE_SIZE,
        }
    }
}

impl StrucdbgConfig {
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }

    pub fn eviction_interval(&self) -> Duration {
        Duration::from_secs(self.eviction_interval_secs)
    }

    /// Reject values the runtime cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.eviction_interval_secs == 0 {
            return Err(ConfigError::Invalid("eviction_interval_secs must be > 0".to_string()));
        }
        if self.max_candidate_size == 0 {
            return Err(ConfigError::Invalid("max_candidate_size must be > 0".to_string()));
        }
        if self.fallback_session_id.trim().is_empty() {
            return Err(ConfigError::Invalid("fallback_session_id must not be empty".to_string()));
        }
        Ok(())
    }
}
