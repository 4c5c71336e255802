//! Error types for configuration operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The user's home directory could not be determined.
    #[error("failed to get home directory")]
    HomeDirUnavailable,
    /// A key other than the supported ones was supplied.
    #[error("unknown config key \"{key}\"; valid keys: endpoint, api-key")]
    UnknownKey {
        /// Key supplied by the caller.
        key: String,
    },
    /// An endpoint value was not an absolute URL.
    #[error("invalid endpoint URL '{value}'")]
    InvalidEndpoint {
        /// Offending value.
        value: String,
        /// Parse failure detail.
        source: url::ParseError,
    },
    /// The persisted file exists but is not a valid record.
    #[error("failed to parse config file {}", path.display())]
    Parse {
        /// Location of the corrupt file.
        path: PathBuf,
        /// Source JSON error.
        source: serde_json::Error,
    },
    /// The record could not be serialised.
    #[error("failed to marshal config")]
    Serialize {
        /// Source JSON error.
        source: serde_json::Error,
    },
    /// File system operation failed.
    #[error("failed to {operation} {}", path.display())]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// Path the operation targeted.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
}

impl ConfigError {
    /// Whether the error was caused by a value the user supplied, as opposed
    /// to the environment or the file on disk.
    #[must_use]
    pub const fn is_user_input(&self) -> bool {
        matches!(self, Self::UnknownKey { .. } | Self::InvalidEndpoint { .. })
    }
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
