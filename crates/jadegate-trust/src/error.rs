//! Error type for certificate, trust-store, and TOFU operations.

use std::path::PathBuf;

/// Errors arising from the trust subsystem.
#[derive(Debug, thiserror::Error)]
pub enum TrustError {
    /// A filesystem operation failed.
    #[error("trust store I/O error at {path}: {source}")]
    Io {
        /// Path the operation was attempted against.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A certificate file could not be parsed as JSON.
    #[error("malformed certificate at {path}: {source}")]
    Parse {
        /// Path of the offending file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// A cryptographic operation (signing or verification) failed.
    #[error(transparent)]
    Crypto(#[from] jadegate_crypto::CryptoError),

    /// No certificate exists for the given tool id.
    #[error("no certificate for tool '{tool_id}'")]
    NotFound {
        /// The tool id that was looked up.
        tool_id: String,
    },
}

/// Convenience alias for trust subsystem results.
pub type TrustResult<T> = Result<T, TrustError>;
