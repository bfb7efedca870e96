//! Per-session dynamic call-chain graph and anomaly detection.
//!
//! Every intercepted tool call is appended as a node to a
//! [`DynamicDag`]; a fixed pipeline of pattern-based detectors runs on
//! each append and may surface [`Anomaly`] values that the interceptor
//! folds into its verdict. The graph itself never denies anything — it
//! only observes and reports.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod categories;
mod graph;
mod types;

pub use categories::{
    is_high_risk, is_network_send, is_sensitive_read, HIGH_RISK_TOOLS, NETWORK_SEND_TOOLS,
    SENSITIVE_READ_TOOLS,
};
pub use graph::DynamicDag;
pub use types::{
    Anomaly, AnomalyKind, CallId, CallOutcome, DagEdge, DagNode, RiskLevel, Severity,
};

#[cfg(test)]
mod tests;
