//! Alert configuration
//!
//! Configuration lives in a TOML file supplied by the host. Defaults are
//! applied here, by the provider, so the capture pipeline always receives a
//! fully-populated snapshot and never has to probe for missing keys.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default configuration file path
pub const CONFIG_PATH: &str = "/etc/fatalert/config.toml";

/// Alert configuration snapshot
///
/// Read-only from the capture pipeline's perspective: it is handed in whole
/// per invocation and never persisted by the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Recipient address; empty means "use the host fallback admin address"
    #[serde(default)]
    pub to_email: String,

    /// Subject prefix, trimmed before use
    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,

    /// Minimum minutes between two alerts sharing a signature (0 = no throttle)
    #[serde(default = "default_throttle_minutes")]
    pub throttle_minutes: u64,

    /// Operator-supplied URL of the hosting provider's error logs
    #[serde(default)]
    pub hosting_logs_url: String,

    /// Include request URI/method/IP/user-agent in the alert body
    #[serde(default = "default_true")]
    pub include_request: bool,

    /// Include the current user id in the alert body
    #[serde(default = "default_true")]
    pub include_user: bool,

    /// Only alert for front-end contexts (skip admin contexts)
    #[serde(default)]
    pub only_frontend: bool,

    /// Skip captures from CLI invocations
    #[serde(default = "default_true")]
    pub ignore_cli: bool,

    /// Skip captures from scheduled-task (cron) invocations
    #[serde(default = "default_true")]
    pub ignore_cron: bool,
}

fn default_subject_prefix() -> String {
    "Critical error".to_string()
}

fn default_throttle_minutes() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            to_email: String::new(),
            subject_prefix: default_subject_prefix(),
            throttle_minutes: default_throttle_minutes(),
            hosting_logs_url: String::new(),
            include_request: true,
            include_user: true,
            only_frontend: false,
            ignore_cli: true,
            ignore_cron: true,
        }
    }
}

impl AlertConfig {
    /// Load configuration from a TOML file, falling back to defaults when the
    /// file does not exist. Unset keys take their defaults.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse config at {}", path.display()))?;
        Ok(config)
    }

    /// Load from the default path
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_PATH)
    }

    /// Write configuration back to a TOML file
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("failed to write config at {}", path.display()))?;
        Ok(())
    }
}

/// Source of the configuration snapshot.
///
/// The capture pipeline depends on this interface, not on a file: hosts that
/// keep settings elsewhere implement it over their own storage.
pub trait ConfigProvider {
    fn get(&self) -> AlertConfig;
}

/// TOML-file backed provider
pub struct FileConfigProvider {
    path: std::path::PathBuf,
}

impl FileConfigProvider {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ConfigProvider for FileConfigProvider {
    fn get(&self) -> AlertConfig {
        AlertConfig::load_from(&self.path).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AlertConfig::default();
        assert_eq!(config.throttle_minutes, 30);
        assert_eq!(config.subject_prefix, "Critical error");
        assert!(config.include_request);
        assert!(config.include_user);
        assert!(config.ignore_cli);
        assert!(config.ignore_cron);
        assert!(!config.only_frontend);
        assert!(config.to_email.is_empty());
        assert!(config.hosting_logs_url.is_empty());
    }

    #[test]
    fn test_partial_file_takes_defaults() {
        let config: AlertConfig = toml::from_str(
            r#"
            to_email = "ops@example.com"
            throttle_minutes = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.to_email, "ops@example.com");
        assert_eq!(config.throttle_minutes, 5);
        // Unset keys fall back to defaults
        assert!(config.ignore_cli);
        assert_eq!(config.subject_prefix, "Critical error");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = AlertConfig::default();
        config.to_email = "admin@example.com".to_string();
        config.only_frontend = true;
        config.save_to(&path).unwrap();

        let loaded = AlertConfig::load_from(&path).unwrap();
        assert_eq!(loaded.to_email, "admin@example.com");
        assert!(loaded.only_frontend);
        assert_eq!(loaded.throttle_minutes, 30);
    }

    #[test]
    fn test_missing_file_is_defaults() {
        let config = AlertConfig::load_from("/nonexistent/fatalert/config.toml").unwrap();
        assert_eq!(config.throttle_minutes, 30);
    }

    #[test]
    fn test_file_provider() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "throttle_minutes = 0\n").unwrap();

        let provider = FileConfigProvider::new(&path);
        assert_eq!(provider.get().throttle_minutes, 0);
    }
}
