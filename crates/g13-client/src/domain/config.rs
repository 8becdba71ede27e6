//! Client configuration.
//!
//! [`ClientConfig`] is the single source of truth for runtime settings.  It
//! is built from code defaults, optionally overlaid with a TOML file, and
//! finally overridden by CLI arguments (see `main.rs`).  Parsing works on a
//! string so this module never touches the filesystem — the caller reads the
//! file.
//!
//! # File format
//!
//! Every key is optional; absent keys keep their defaults:
//!
//! ```toml
//! daemon_url = "ws://127.0.0.1:8765/ws"
//! api_base_url = "http://127.0.0.1:8765/api"
//! reconnect_delay_ms = 2000
//! ```

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Default WebSocket endpoint of the device-owning daemon.
pub const DEFAULT_DAEMON_URL: &str = "ws://127.0.0.1:8765/ws";

/// Default base URL of the daemon's REST persistence API.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8765/api";

/// Fixed delay between reconnect attempts.
///
/// Deliberately constant and unbounded-retry — no backoff.  The daemon runs
/// on the same host; hammering it every two seconds is the intended
/// behaviour, not an oversight.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(2000);

/// Errors from parsing a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// All runtime configuration for the control-surface client.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// WebSocket URL of the daemon's duplex channel.
    pub daemon_url: String,
    /// Base URL of the daemon's REST API (profiles, macros, status).
    pub api_base_url: String,
    /// Delay between reconnect attempts after the channel drops.
    pub reconnect_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            daemon_url: DEFAULT_DAEMON_URL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }
}

/// On-disk schema.  All keys optional so partial files work and older files
/// survive new settings being added.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    daemon_url: Option<String>,
    api_base_url: Option<String>,
    reconnect_delay_ms: Option<u64>,
}

impl ClientConfig {
    /// Parses TOML text and overlays it on the defaults.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] when the text is not valid TOML or a key has
    /// the wrong type.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text)?;
        let mut config = Self::default();
        if let Some(url) = file.daemon_url {
            config.daemon_url = url;
        }
        if let Some(url) = file.api_base_url {
            config.api_base_url = url;
        }
        if let Some(ms) = file.reconnect_delay_ms {
            config.reconnect_delay = Duration::from_millis(ms);
        }
        Ok(config)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_the_local_daemon() {
        let config = ClientConfig::default();
        assert_eq!(config.daemon_url, "ws://127.0.0.1:8765/ws");
        assert_eq!(config.api_base_url, "http://127.0.0.1:8765/api");
    }

    #[test]
    fn test_default_reconnect_delay_is_two_seconds() {
        let config = ClientConfig::default();
        assert_eq!(config.reconnect_delay, Duration::from_millis(2000));
    }

    #[test]
    fn test_empty_file_keeps_defaults() {
        let config = ClientConfig::from_toml_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_partial_file_overrides_only_named_keys() {
        let config = ClientConfig::from_toml_str("reconnect_delay_ms = 250\n").unwrap();
        assert_eq!(config.reconnect_delay, Duration::from_millis(250));
        assert_eq!(config.daemon_url, DEFAULT_DAEMON_URL);
    }

    #[test]
    fn test_full_file_overrides_everything() {
        let text = r#"
            daemon_url = "ws://10.0.0.9:9000/ws"
            api_base_url = "http://10.0.0.9:9000/api"
            reconnect_delay_ms = 500
        "#;
        let config = ClientConfig::from_toml_str(text).unwrap();
        assert_eq!(config.daemon_url, "ws://10.0.0.9:9000/ws");
        assert_eq!(config.api_base_url, "http://10.0.0.9:9000/api");
        assert_eq!(config.reconnect_delay, Duration::from_millis(500));
    }

    #[test]
    fn test_wrongly_typed_key_is_a_parse_error() {
        let result = ClientConfig::from_toml_str("reconnect_delay_ms = \"soon\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
