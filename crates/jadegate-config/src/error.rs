//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure reading a config file.
    #[error("config I/O error at {path}: {source}")]
    Io {
        /// The file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file was not valid TOML.
    #[error("config parse error in {path}: {source}")]
    Parse {
        /// The file that failed to parse.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// An environment variable held a value that could not be parsed
    /// into the expected field type.
    #[error("environment variable {var} has an invalid value {value:?}: {reason}")]
    InvalidEnvVar {
        /// The variable name, e.g. `JADEGATE_DEFAULT_TIMEOUT_SECS`.
        var: &'static str,
        /// The raw value read from the environment.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The home directory could not be resolved, and no explicit
    /// override was given.
    #[error("could not resolve a home directory; pass an explicit config path")]
    NoHomeDir,
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
