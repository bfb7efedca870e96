//! Structured logging and the on-disk audit sink for JadeGate.
//!
//! Every binary in the workspace calls [`setup_logging`] (or
//! [`setup_default_logging`]) exactly once at startup, before building
//! any session. Output always goes to stderr, since the proxy binary
//! speaks JSON-RPC over stdout and nothing in this process may write a
//! log line there. [`AuditSink`] is the optional file-backed half of a
//! session's audit trail; the in-memory half lives in
//! `jadegate_interceptor::AuditEntry` and is always kept regardless of
//! whether a sink is configured.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod audit;
mod error;
mod logging;

pub use audit::AuditSink;
pub use error::{TelemetryError, TelemetryResult};
pub use logging::{setup_default_logging, setup_logging, LogConfig, LogFormat};
