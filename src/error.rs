//! Cleanfeed Dashboard Error Types

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, Error>;

/// Dashboard error types
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Missing required configuration: {}", .0.join(", "))]
    ConfigurationMissing(Vec<String>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    // Request errors
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // Object storage errors
    #[error("Storage backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Storage backend did not respond within {0:?}")]
    BackendTimeout(Duration),

    // Forwarding config persistence
    #[error("Failed to persist forwarding config to {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Network errors
    #[error("Network error: {0}")]
    Network(String),
}

impl Error {
    /// Check if this error was caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }

    /// Check if this error came from the object storage backend
    pub fn is_backend(&self) -> bool {
        matches!(
            self,
            Error::BackendUnavailable(_) | Error::BackendTimeout(_)
        )
    }
}
