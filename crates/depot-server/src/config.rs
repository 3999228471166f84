//! Process configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Process level settings
///
/// Separate from the shared configuration document: these decide where the
/// document lives and how the process runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Path of the shared configuration document
    pub settings_path: PathBuf,

    /// Log level used when `RUST_LOG` is not set
    pub log_level: String,

    /// Seconds between statistics flushes
    pub flush_interval_secs: u64,

    /// Write the default document when `settings_path` does not exist
    pub write_default_settings: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            settings_path: PathBuf::from("depot.yaml"),
            log_level: "info".to_string(),
            flush_interval_secs: 60,
            write_default_settings: true,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables and config file
    pub fn load() -> anyhow::Result<Self> {
        // Load .env file if exists
        dotenvy::dotenv().ok();

        let config_result = config::Config::builder()
            .add_source(config::File::with_name("config/server").required(false))
            .add_source(config::Environment::with_prefix("DEPOT"))
            .build();

        match config_result {
            Ok(cfg) => cfg
                .try_deserialize()
                .map_err(|e| anyhow::anyhow!("Failed to deserialize config: {}", e)),
            Err(_) => {
                tracing::info!("No config file found, using default configuration");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from one file, format taken from its extension
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        config::Config::builder()
            .add_source(config::File::from(path))
            .build()
            .and_then(|cfg| cfg.try_deserialize())
            .map_err(|e| anyhow::anyhow!("Failed to load config from {}: {}", path.display(), e))
    }

    /// Flush period, never shorter than one second
    pub fn flush_interval(&self) -> Duration {
        Duration::from_secs(self.flush_interval_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();

        assert_eq!(config.settings_path, PathBuf::from("depot.yaml"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.flush_interval_secs, 60);
        assert!(config.write_default_settings);
    }

    #[test]
    fn test_flush_interval_has_floor() {
        let config = ServerConfig {
            flush_interval_secs: 0,
            ..ServerConfig::default()
        };

        assert_eq!(config.flush_interval(), Duration::from_secs(1));
        assert_eq!(ServerConfig::default().flush_interval(), Duration::from_secs(60));
    }
}
