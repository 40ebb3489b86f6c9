//! Load: config loading from file and environment variables.

use std::path::Path;

use super::model::{ConfigError, StrucdbgConfig};

const DEFAULT_CONFIG_PATH: &str = "/etc/strucdbg/strucdbg.toml";

impl StrucdbgConfig {
    /// Load configuration from file or environment variables
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = std::env::var("STRUCDBG_CONFIG_FILE")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut config = if Path::new(&config_path).exists() {
            tracing::info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            tracing::info!("Config file not found at {}, using environment variables", config_path);
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Override fields from environment variables. Unparsable numbers are
    /// ignored with a warning.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(secs) = parse_var(&lookup, "STRUCDBG_RETENTION_SECS") {
            self.retention_secs = secs;
        }
        if let Some(secs) = parse_var(&lookup, "STRUCDBG_EVICTION_INTERVAL_SECS") {
            self.eviction_interval_secs = secs;
        }
        if let Some(size) = parse_var(&lookup, "STRUCDBG_MAX_CANDIDATE_SIZE") {
            self.max_candidate_size = size;
        }
        if let Some(id) = lookup("STRUCDBG_FALLBACK_SESSION") {
            self.fallback_session_id = id;
        }
        if let Some(name) = lookup("STRUCDBG_FALLBACK_SESSION_NAME") {
            self.fallback_session_name = name;
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring {}={:?}: not a valid number", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_from_file_with_partial_settings() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "retention_secs = 60\nfallback_session_id = \"orphans\"").unwrap();

        let config = StrucdbgConfig::from_file(file.path()).unwrap();
        assert_eq!(config.retention_secs, 60);
        assert_eq!(config.fallback_session_id, "orphans");
        // Unset fields keep their defaults
        assert_eq!(config.eviction_interval_secs, 30);
        assert_eq!(config.fallback_session_name, "Default");
    }

    #[test]
    fn test_from_file_missing() {
        let result = StrucdbgConfig::from_file("/no/such/strucdbg.toml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_invalid_toml() {
        let result = StrucdbgConfig::from_toml("retention_secs = \"soon\"");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("STRUCDBG_RETENTION_SECS", "10"),
            ("STRUCDBG_EVICTION_INTERVAL_SECS", "nope"),
            ("STRUCDBG_FALLBACK_SESSION", "unrouted"),
        ]);
        let mut config = StrucdbgConfig::default();
        config.apply_env(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.retention_secs, 10);
        assert_eq!(config.eviction_interval_secs, 30);
        assert_eq!(config.fallback_session_id, "unrouted");
        assert_eq!(config.max_candidate_size, 1_048_576);
    }
}
