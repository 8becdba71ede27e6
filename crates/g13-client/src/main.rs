//! G13 control surface client — entry point.
//!
//! Maintains the live mirror of the device state owned by the G13 daemon:
//! connects the WebSocket session, folds inbound events into the published
//! snapshot, and logs state transitions.  The interactive surfaces (button
//! grid, mapping editor, macro panel) embed the library crate and drive the
//! same [`DeviceSession`]/[`StateMirror`]/[`CommandEmitter`] wiring built
//! here.
//!
//! # Usage
//!
//! ```text
//! g13-client [OPTIONS]
//!
//! Options:
//!   --daemon-url <URL>     Daemon WebSocket URL [default: ws://127.0.0.1:8765/ws]
//!   --api-url <URL>        Daemon REST base URL [default: http://127.0.0.1:8765/api]
//!   --config <PATH>        TOML config file (CLI flags win over file values)
//!   --reconnect-ms <MS>    Delay between reconnect attempts [default: 2000]
//! ```
//!
//! # Environment variable overrides
//!
//! CLI args take precedence when both are present.
//!
//! | Variable           | Description                      |
//! |--------------------|----------------------------------|
//! | `G13_DAEMON_URL`   | Daemon WebSocket URL             |
//! | `G13_API_URL`      | Daemon REST base URL             |
//! | `G13_CONFIG`       | Config file path                 |
//! | `G13_RECONNECT_MS` | Reconnect delay in milliseconds  |
//!
//! Log verbosity is controlled by `RUST_LOG` (e.g. `RUST_LOG=debug`).

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use g13_client::application::StateMirror;
use g13_client::domain::ClientConfig;
use g13_client::infrastructure::session::{DeviceSession, SessionConfig, SessionEvent};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// G13 control surface client.
///
/// Mirrors the device state owned by the G13 daemon and keeps it in sync
/// over a persistent WebSocket session.
#[derive(Debug, Parser)]
#[command(name = "g13-client", about = "Control surface client for the G13 daemon", version)]
struct Cli {
    /// WebSocket URL of the daemon's duplex channel.
    #[arg(long, env = "G13_DAEMON_URL")]
    daemon_url: Option<String>,

    /// Base URL of the daemon's REST API (profiles, macros, status).
    #[arg(long, env = "G13_API_URL")]
    api_url: Option<String>,

    /// Path to a TOML config file.  CLI flags override file values.
    #[arg(long, env = "G13_CONFIG")]
    config: Option<PathBuf>,

    /// Delay between reconnect attempts, in milliseconds.
    #[arg(long, env = "G13_RECONNECT_MS")]
    reconnect_ms: Option<u64>,
}

impl Cli {
    /// Resolves the effective configuration: defaults, then the config file
    /// (when given), then CLI/env overrides.
    fn into_client_config(self) -> anyhow::Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("could not read config file {}", path.display()))?;
                ClientConfig::from_toml_str(&text)
                    .with_context(|| format!("invalid config file {}", path.display()))?
            }
            None => ClientConfig::default(),
        };

        if let Some(url) = self.daemon_url {
            config.daemon_url = url;
        }
        if let Some(url) = self.api_url {
            config.api_base_url = url;
        }
        if let Some(ms) = self.reconnect_ms {
            config.reconnect_delay = Duration::from_millis(ms);
        }
        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_client_config()?;
    info!(
        "G13 control surface starting — daemon={}, api={}",
        config.daemon_url, config.api_base_url
    );

    let (session, mut events) = DeviceSession::new(SessionConfig::from(&config));
    let mirror = StateMirror::new();

    session.clone().connect();

    // ── Dispatch loop ─────────────────────────────────────────────────────────
    //
    // One event at a time, in delivery order.  Runs until Ctrl+C or until
    // the session is gone.
    let dispatch = async {
        while let Some(event) = events.recv().await {
            match event {
                SessionEvent::Connected => {
                    info!("transport connected");
                }
                SessionEvent::Disconnected => {
                    warn!("transport disconnected; reconnect scheduled");
                }
                SessionEvent::EventReceived(device_event) => {
                    mirror.apply_event(&device_event);
                    let snapshot = mirror.current();
                    info!(
                        device_connected = snapshot.connected,
                        mode = ?snapshot.active_mode,
                        profile = snapshot.active_profile.as_deref().unwrap_or("-"),
                        held = snapshot.pressed_keys.len(),
                        "state updated"
                    );
                }
            }
        }
    };

    tokio::select! {
        _ = dispatch => {}
        result = tokio::signal::ctrl_c() => {
            match result {
                Ok(()) => info!("shutdown signal received"),
                Err(e) => warn!("failed to listen for Ctrl+C: {e}"),
            }
        }
    }

    session.disconnect().await;
    info!("G13 control surface stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_resolve_to_default_config() {
        let cli = Cli::parse_from(["g13-client"]);
        let config = cli.into_client_config().unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_cli_daemon_url_override() {
        let cli = Cli::parse_from(["g13-client", "--daemon-url", "ws://10.0.0.2:9000/ws"]);
        let config = cli.into_client_config().unwrap();
        assert_eq!(config.daemon_url, "ws://10.0.0.2:9000/ws");
        assert_eq!(config.api_base_url, ClientConfig::default().api_base_url);
    }

    #[test]
    fn test_cli_reconnect_override() {
        let cli = Cli::parse_from(["g13-client", "--reconnect-ms", "250"]);
        let config = cli.into_client_config().unwrap();
        assert_eq!(config.reconnect_delay, Duration::from_millis(250));
    }

    #[test]
    fn test_cli_missing_config_file_is_an_error() {
        let cli = Cli::parse_from(["g13-client", "--config", "/nonexistent/g13.toml"]);
        assert!(cli.into_client_config().is_err());
    }

    #[test]
    fn test_cli_flags_win_over_config_file() {
        let dir = std::env::temp_dir();
        let path = dir.join("g13-client-test-config.toml");
        std::fs::write(&path, "daemon_url = \"ws://from-file:1/ws\"\n").unwrap();

        let cli = Cli::parse_from([
            "g13-client",
            "--config",
            path.to_str().unwrap(),
            "--daemon-url",
            "ws://from-flag:2/ws",
        ]);
        let config = cli.into_client_config().unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.daemon_url, "ws://from-flag:2/ws");
    }
}
