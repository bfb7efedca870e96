//! Error types for the stdio JSON-RPC splice.

use thiserror::Error;

/// Errors that can arise while running the proxy.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Failed to spawn the upstream tool-server process.
    #[error("failed to spawn upstream command: {0}")]
    Spawn(#[source] std::io::Error),

    /// An I/O error occurred talking to downstream or upstream.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A line received from either side was not valid JSON.
    #[error("invalid JSON-RPC message: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// No upstream process is configured or it has already exited.
    #[error("no upstream server connected")]
    NoUpstream,
}

/// Convenience alias for proxy results.
pub type ProxyResult<T> = Result<T, ProxyError>;
