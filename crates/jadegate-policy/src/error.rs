//! Policy error types.

use thiserror::Error;

/// Errors that can occur while loading, saving, or validating a policy.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// I/O failure reading or writing a policy file.
    #[error("policy I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The policy file was not valid JSON, or did not match the expected shape.
    #[error("policy parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A glob pattern in the policy could not be compiled.
    #[error("invalid glob pattern {pattern:?}: {source}")]
    InvalidGlob {
        /// The offending pattern.
        pattern: String,
        /// Underlying glob compiler error.
        #[source]
        source: globset::Error,
    },
}

/// Result type for policy operations.
pub type PolicyResult<T> = Result<T, PolicyError>;
