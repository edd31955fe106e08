//! INI configuration file.
//!
//! Default location: `<config dir>/arealink/config.ini` (for example
//! `~/.config/arealink/config.ini` on Linux).
//!
//! ```ini
//! [relay]
//! url = ws://localhost:49322
//! reconnect_delay_secs = 3
//! debug = false
//! debug_filters = game:clock_updated_seconds, game:ball_hit
//!
//! [export]
//! url = ws://localhost:8080
//! reconnect_delay_secs = 3
//! ```
//!
//! Missing files, sections and keys fall back to defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

use crate::export::ExportConfig;
use crate::relay::RelayConfig;

/// Directory name under the platform config dir.
pub const CONFIG_DIR_NAME: &str = "arealink";

/// Config file name.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Errors loading or saving the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] ini::ParseError),

    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },

    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Path of the default config file.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
        .ok_or(ConfigError::NoConfigDir)
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub relay: RelayConfig,
    pub export: ExportConfig,
}

impl ConfigFile {
    /// Load from the default location, or defaults if the file is absent.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path()?)
    }

    /// Load from `path`, or defaults if the file is absent.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parse INI text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text)?;
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("relay")) {
            if let Some(url) = section.get("url") {
                config.relay.url = url.trim().to_string();
            }
            if let Some(secs) = section.get("reconnect_delay_secs") {
                config.relay.reconnect_delay = parse_secs("relay.reconnect_delay_secs", secs)?;
            }
            if let Some(debug) = section.get("debug") {
                config.relay.debug = parse_bool("relay.debug", debug)?;
            }
            if let Some(filters) = section.get("debug_filters") {
                config.relay.debug_filters = filters
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
            }
        }

        if let Some(section) = ini.section(Some("export")) {
            if let Some(url) = section.get("url") {
                config.export.url = url.trim().to_string();
            }
            if let Some(secs) = section.get("reconnect_delay_secs") {
                config.export.reconnect_delay = parse_secs("export.reconnect_delay_secs", secs)?;
            }
        }

        Ok(config)
    }

    /// Render as INI text.
    pub fn to_ini_string(&self) -> Result<String, ConfigError> {
        let mut filters: Vec<&str> = self.relay.debug_filters.iter().map(String::as_str).collect();
        filters.sort_unstable();

        let mut ini = Ini::new();
        ini.with_section(Some("relay"))
            .set("url", self.relay.url.as_str())
            .set(
                "reconnect_delay_secs",
                self.relay.reconnect_delay.as_secs().to_string(),
            )
            .set("debug", self.relay.debug.to_string())
            .set("debug_filters", filters.join(", "));
        ini.with_section(Some("export"))
            .set("url", self.export.url.as_str())
            .set(
                "reconnect_delay_secs",
                self.export.reconnect_delay.as_secs().to_string(),
            );

        let mut buf = Vec::new();
        ini.write_to(&mut buf)?;
        String::from_utf8(buf).map_err(|e| ConfigError::InvalidValue {
            key: "config".to_string(),
            value: e.to_string(),
        })
    }

    /// Write to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_ini_string()?)?;
        Ok(())
    }
}

fn parse_secs(key: &str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
