//! Cadence configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{CadenceError, Result};

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "CADENCE_CONFIG";

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CadenceConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
}

impl CadenceConfig {
    /// Load config from `$CADENCE_CONFIG` or the default path, falling back to defaults.
    pub fn load() -> Result<Self> {
        let path = Self::resolve_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CadenceError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| CadenceError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Save config to a specific path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| CadenceError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// `$CADENCE_CONFIG` if set, otherwise [`default_path`](Self::default_path).
    pub fn resolve_path() -> PathBuf {
        std::env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_path())
    }

    /// Get the default config path (~/.cadence/config.toml).
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the Cadence home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".cadence")
    }
}

/// Gateway (HTTP console) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 { 5000 }
fn default_host() -> String { "0.0.0.0".into() }

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

/// Worker loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Interval applied when a submission omits one.
    #[serde(default = "default_interval_secs")]
    pub default_interval_secs: u64,
    /// Fixed network timeout for every remote call.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// How long shutdown waits for workers after signalling cancellation.
    #[serde(default = "default_shutdown_grace_secs")]
    pub shutdown_grace_secs: u64,
}

fn default_interval_secs() -> u64 { 10 }
fn default_request_timeout_secs() -> u64 { 10 }
fn default_shutdown_grace_secs() -> u64 { 5 }

impl SchedulerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            default_interval_secs: default_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            shutdown_grace_secs: default_shutdown_grace_secs(),
        }
    }
}

/// Remote service endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String { "http://127.0.0.1:8080".into() }
fn default_user_agent() -> String { format!("cadence/{}", env!("CARGO_PKG_VERSION")) }

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CadenceConfig::default();
        assert_eq!(config.gateway.port, 5000);
        assert_eq!(config.gateway.host, "0.0.0.0");
        assert_eq!(config.scheduler.default_interval_secs, 10);
        assert_eq!(config.scheduler.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
            [gateway]
            port = 8088

            [scheduler]
            default_interval_secs = 30

            [remote]
            base_url = "https://api.example.test"
        "#;

        let config: CadenceConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.gateway.port, 8088);
        assert_eq!(config.gateway.host, "0.0.0.0");
        assert_eq!(config.scheduler.default_interval_secs, 30);
        assert_eq!(config.scheduler.request_timeout_secs, 10);
        assert_eq!(config.remote.base_url, "https://api.example.test");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = std::env::temp_dir().join("cadence-test-config");
        let path = dir.join("config.toml");
        let mut config = CadenceConfig::default();
        config.gateway.port = 9123;
        config.save_to(&path).unwrap();

        let loaded = CadenceConfig::load_from(&path).unwrap();
        assert_eq!(loaded.gateway.port, 9123);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_from_bad_toml() {
        let dir = std::env::temp_dir().join("cadence-test-bad-config");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[gateway\nport = ").unwrap();
        let err = CadenceConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, CadenceError::Config(_)));
        std::fs::remove_dir_all(&dir).ok();
    }
}
