//! Configuration management for verad.
//!
//! Loads settings from /etc/vera/config.toml or uses defaults. The
//! upstream URL can additionally be overridden with VERA_MESSAGES_API,
//! matching how deployments point the daemon at staging corpora.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Config file path
pub const CONFIG_PATH: &str = "/etc/vera/config.toml";

/// Environment variable overriding the config file path
pub const CONFIG_PATH_ENV: &str = "VERA_CONFIG";

/// Environment variable overriding the upstream messages URL
pub const MESSAGES_API_ENV: &str = "VERA_MESSAGES_API";

/// Upstream message source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Messages API endpoint
    #[serde(default = "default_upstream_url")]
    pub url: String,

    /// Request timeout in seconds
    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,

    /// Corpus refresh interval in seconds
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address; localhost only by default
    #[serde(default = "default_bind")]
    pub bind: String,
}

/// Top-level daemon configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VeradConfig {
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

fn default_upstream_url() -> String {
    "https://november7-730026606190.europe-west1.run.app/messages".to_string()
}

fn default_upstream_timeout() -> u64 {
    20
}

fn default_refresh_interval() -> u64 {
    300
}

fn default_bind() -> String {
    "127.0.0.1:7870".to_string()
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: default_upstream_url(),
            timeout_secs: default_upstream_timeout(),
            refresh_interval_secs: default_refresh_interval(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Default for VeradConfig {
    fn default() -> Self {
        Self {
            upstream: UpstreamConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl VeradConfig {
    /// Load config from disk, falling back to defaults.
    ///
    /// A missing file is normal (fresh install); a malformed file is
    /// logged and ignored rather than taking the daemon down.
    pub fn load() -> Self {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| CONFIG_PATH.to_string());
        let mut config = Self::load_from(Path::new(&path));

        if let Ok(url) = std::env::var(MESSAGES_API_ENV) {
            if !url.trim().is_empty() {
                info!("Upstream URL overridden by {}", MESSAGES_API_ENV);
                config.upstream.url = url;
            }
        }

        config
    }

    fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Malformed config at {}: {}; using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let config = VeradConfig::default();
        assert!(config.upstream.url.starts_with("https://"));
        assert_eq!(config.upstream.timeout_secs, 20);
        assert_eq!(config.server.bind, "127.0.0.1:7870");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: VeradConfig = toml::from_str(
            r#"
            [upstream]
            url = "http://localhost:9000/messages"
            "#,
        )
        .expect("valid toml");
        assert_eq!(config.upstream.url, "http://localhost:9000/messages");
        assert_eq!(config.upstream.timeout_secs, 20);
        assert_eq!(config.server.bind, "127.0.0.1:7870");
    }

    #[test]
    fn test_empty_toml_is_all_defaults() {
        let config: VeradConfig = toml::from_str("").expect("valid toml");
        assert_eq!(config.upstream.refresh_interval_secs, 300);
    }
}
