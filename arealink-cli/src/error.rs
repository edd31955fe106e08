//! CLI error type.

use std::fmt;

use arealink::config::ConfigError;
use arealink::drawing::DrawingError;
use arealink::export::ExportError;
use arealink::logging::LoggingError;
use arealink::relay::RelayError;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Configuration error.
    Config(String),

    /// A command-line argument could not be interpreted.
    InvalidArgument(String),

    /// Logging could not be initialized.
    Logging(LoggingError),

    /// Failed to create the Tokio runtime.
    RuntimeCreation(String),

    /// Relay connection or publish failure.
    Relay(RelayError),

    /// Polygon could not be built.
    Drawing(DrawingError),

    /// Polygon could not be exported.
    Export(ExportError),

    /// Timed out waiting for a connection.
    Timeout(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Logging(e) => write!(f, "{}", e),
            CliError::RuntimeCreation(msg) => {
                write!(f, "Failed to create Tokio runtime: {}", msg)
            }
            CliError::Relay(e) => write!(f, "Relay error: {}", e),
            CliError::Drawing(e) => write!(f, "Polygon error: {}", e),
            CliError::Export(e) => write!(f, "Export error: {}", e),
            CliError::Timeout(what) => write!(f, "Timed out waiting for {}", what),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Logging(e) => Some(e),
            CliError::Relay(e) => Some(e),
            CliError::Drawing(e) => Some(e),
            CliError::Export(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<RelayError> for CliError {
    fn from(e: RelayError) -> Self {
        CliError::Relay(e)
    }
}

impl From<DrawingError> for CliError {
    fn from(e: DrawingError) -> Self {
        CliError::Drawing(e)
    }
}

impl From<ExportError> for CliError {
    fn from(e: ExportError) -> Self {
        CliError::Export(e)
    }
}
