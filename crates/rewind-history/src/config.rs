/// Configuration for the history system.
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Maximum number of committed batches kept for undo.
/// Oldest batches are evicted when this limit is exceeded.
pub const DEFAULT_MAX_LOGS: usize = 20;

/// Environment variable that overrides the default history depth.
pub const MAX_LOGS_ENV: &str = "REWIND_MAX_LOGS";

/// Configuration for a `HistoryManager`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Max committed batches that can be undone.
    pub max_logs: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_logs: resolve_max_logs(),
        }
    }
}

impl HistoryConfig {
    /// Loads config from a JSON file at `path`.
    /// Returns defaults on any error (missing file, parse error, etc.).
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("No history config at {}, using defaults", path.display());
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<HistoryConfig>(&contents) {
                Ok(mut config) => {
                    config.sanitize();
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse history config at {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read history config at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Writes the config as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }

    /// Clamps values into their valid ranges.
    pub fn sanitize(&mut self) {
        if self.max_logs == 0 {
            tracing::warn!("max_logs must be at least 1, using 1");
            self.max_logs = 1;
        }
    }
}

/// Resolves the default history depth.
///
/// Resolution order:
/// 1. `REWIND_MAX_LOGS` environment variable, if it parses as a positive integer
/// 2. `DEFAULT_MAX_LOGS`
pub fn resolve_max_logs() -> usize {
    match std::env::var(MAX_LOGS_ENV) {
        Ok(raw) => match raw.trim().parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => {
                tracing::warn!("Ignoring invalid {MAX_LOGS_ENV}={raw:?}");
                DEFAULT_MAX_LOGS
            }
        },
        Err(_) => DEFAULT_MAX_LOGS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Tests that touch REWIND_MAX_LOGS must not run concurrently.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_env<R>(value: Option<&str>, f: impl FnOnce() -> R) -> R {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let original = std::env::var(MAX_LOGS_ENV).ok();
        match value {
            Some(v) => std::env::set_var(MAX_LOGS_ENV, v),
            None => std::env::remove_var(MAX_LOGS_ENV),
        }
        let result = f();
        match original {
            Some(val) => std::env::set_var(MAX_LOGS_ENV, val),
            None => std::env::remove_var(MAX_LOGS_ENV),
        }
        result
    }

    #[test]
    fn test_default_config() {
        let config = with_env(None, HistoryConfig::default);
        assert_eq!(config.max_logs, 20);
    }

    #[test]
    fn test_env_var_overrides_default() {
        let config = with_env(Some("64"), HistoryConfig::default);
        assert_eq!(config.max_logs, 64);
    }

    #[test]
    fn test_invalid_env_var_falls_back() {
        assert_eq!(with_env(Some("zero"), resolve_max_logs), DEFAULT_MAX_LOGS);
        assert_eq!(with_env(Some("0"), resolve_max_logs), DEFAULT_MAX_LOGS);
    }

    #[test]
    fn test_sanitize_zero() {
        let mut config = HistoryConfig { max_logs: 0 };
        config.sanitize();
        assert_eq!(config.max_logs, 1);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("history.json");

        HistoryConfig { max_logs: 7 }.save(&path).expect("save");
        let loaded = HistoryConfig::load_or_default(&path);
        assert_eq!(loaded.max_logs, 7);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = TempDir::new().expect("create temp dir");
        let config = with_env(None, || {
            HistoryConfig::load_or_default(&dir.path().join("missing.json"))
        });
        assert_eq!(config.max_logs, DEFAULT_MAX_LOGS);
    }

    #[test]
    fn test_load_invalid_json_uses_defaults() {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").expect("write");

        let config = with_env(None, || HistoryConfig::load_or_default(&path));
        assert_eq!(config.max_logs, DEFAULT_MAX_LOGS);
    }

    #[test]
    fn test_load_sanitizes_zero() {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("zero.json");
        std::fs::write(&path, r#"{"max_logs": 0}"#).expect("write");

        assert_eq!(HistoryConfig::load_or_default(&path).max_logs, 1);
    }

    #[test]
    fn test_load_empty_object_uses_field_defaults() {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("empty.json");
        std::fs::write(&path, "{}").expect("write");

        let config = with_env(None, || HistoryConfig::load_or_default(&path));
        assert_eq!(config.max_logs, DEFAULT_MAX_LOGS);
    }
}
