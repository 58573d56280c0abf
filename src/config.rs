use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_RETRY_BASE_DELAY_SECS,
};
use crate::DynError;

fn default_storage_dir() -> PathBuf {
    PathBuf::from("storage")
}

fn default_max_attempts() -> i64 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_retry_base_delay_secs() -> u64 {
    DEFAULT_RETRY_BASE_DELAY_SECS
}

fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

/// Engine configuration file structure (TOML)
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Path to the SQLite database file (required)
    pub database_path: PathBuf,
    /// Base directory for uploaded file storage (default: storage)
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,
    /// Worker tunables (maps to [worker] section in TOML)
    #[serde(default)]
    pub worker: WorkerSettings,
}

/// Worker tunables
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerSettings {
    /// Maximum processing attempts before a job fails permanently (default: 3)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: i64,
    /// Base delay in seconds for exponential retry backoff (default: 5)
    #[serde(default = "default_retry_base_delay_secs")]
    pub retry_base_delay_secs: u64,
    /// Idle poll interval in seconds when no job is queued (default: 2)
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        WorkerSettings {
            max_attempts: default_max_attempts(),
            retry_base_delay_secs: default_retry_base_delay_secs(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl EngineConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, DynError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
        let config: EngineConfig = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate worker tunables
    pub fn validate(&self) -> Result<(), String> {
        if self.worker.max_attempts < 1 {
            return Err("worker.max_attempts must be at least 1".to_string());
        }
        if self.worker.poll_interval_secs == 0 {
            return Err("worker.poll_interval_secs must be non-zero".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_gets_defaults() {
        let config: EngineConfig = toml::from_str("database_path = \"data/ingest.sqlite\"").unwrap();
        assert_eq!(config.storage_dir, PathBuf::from("storage"));
        assert_eq!(config.worker.max_attempts, 3);
        assert_eq!(config.worker.retry_base_delay_secs, 5);
        assert_eq!(config.worker.poll_interval_secs, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn worker_section_overrides_defaults() {
        let text = r#"
database_path = "data/ingest.sqlite"
storage_dir = "/var/lib/ingest"

[worker]
max_attempts = 5
retry_base_delay_secs = 1
"#;
        let config: EngineConfig = toml::from_str(text).unwrap();
        assert_eq!(config.worker.max_attempts, 5);
        assert_eq!(config.worker.retry_base_delay_secs, 1);
        assert_eq!(config.worker.poll_interval_secs, 2);
    }

    #[test]
    fn zero_max_attempts_is_rejected() {
        let text = "database_path = \"x.sqlite\"\n[worker]\nmax_attempts = 0\n";
        let config: EngineConfig = toml::from_str(text).unwrap();
        assert!(config.validate().is_err());
    }
}
