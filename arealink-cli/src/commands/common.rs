//! Common types and utilities shared across CLI commands.

use std::path::{Path, PathBuf};
use std::time::Duration;

use arealink::config::ConfigFile;
use arealink::relay::{ConnectionState, RelayClient, RelayConfig};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::error::CliError;

/// How long one-shot commands wait for a socket to open.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Options shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub config: Option<PathBuf>,
    pub relay_url: Option<String>,
}

impl GlobalOptions {
    /// Load the config file named on the command line, or the default one.
    pub fn load_config(&self) -> Result<ConfigFile, CliError> {
        let config = match &self.config {
            Some(path) => load_explicit(path)?,
            None => ConfigFile::load()?,
        };
        Ok(config)
    }

    /// Relay settings: CLI takes precedence, then config.
    pub fn relay_config(&self, config: &ConfigFile) -> RelayConfig {
        let mut relay = config.relay.clone();
        if let Some(url) = &self.relay_url {
            relay.url = url.clone();
        }
        relay
    }
}

fn load_explicit(path: &Path) -> Result<ConfigFile, CliError> {
    if !path.exists() {
        return Err(CliError::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }
    Ok(ConfigFile::load_from(path)?)
}

/// Build the multi-threaded runtime used by async commands.
pub fn build_runtime() -> Result<Runtime, CliError> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::RuntimeCreation(e.to_string()))
}

/// Token cancelled on Ctrl+C.
pub fn shutdown_token() -> Result<CancellationToken, CliError> {
    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();

    ctrlc::set_handler(move || {
        eprintln!();
        eprintln!("Received shutdown signal, closing connections...");
        handler_token.cancel();
    })
    .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;

    Ok(cancel)
}

/// Connect `client` and wait for the socket to open.
///
/// Returns `Ok(false)` if cancelled first.
pub async fn connect_relay(
    client: &RelayClient,
    cancel: &CancellationToken,
    timeout: Duration,
) -> Result<bool, CliError> {
    client.connect();
    tokio::select! {
        _ = cancel.cancelled() => Ok(false),
        result = tokio::time::timeout(timeout, client.wait_for_state(ConnectionState::Connected)) => {
            result
                .map(|_| true)
                .map_err(|_| CliError::Timeout(format!("relay at {}", client.endpoint())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_relay_url_overrides_config() {
        let mut config = ConfigFile::default();
        config.relay.url = "ws://from-file:1".to_string();

        let options = GlobalOptions {
            config: None,
            relay_url: Some("ws://from-cli:2".to_string()),
        };
        assert_eq!(options.relay_config(&config).url, "ws://from-cli:2");

        let options = GlobalOptions::default();
        assert_eq!(options.relay_config(&config).url, "ws://from-file:1");
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let options = GlobalOptions {
            config: Some(dir.path().join("missing.ini")),
            relay_url: None,
        };
        assert!(matches!(options.load_config(), Err(CliError::Config(_))));
    }

    #[test]
    fn test_explicit_config_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[relay]\nurl = ws://10.1.1.1:49322\n").unwrap();

        let options = GlobalOptions {
            config: Some(path),
            relay_url: None,
        };
        let config = options.load_config().unwrap();
        assert_eq!(config.relay.url, "ws://10.1.1.1:49322");
    }
}
