//! The point-in-time snapshot returned by [`crate::JadeSession::get_status`].

use std::collections::HashMap;

use jadegate_breaker::BreakerStatus;
use serde::{Deserialize, Serialize};

/// A snapshot of a session's health and activity so far.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatus {
    /// This session's id.
    pub session_id: String,
    /// Seconds since the session was created.
    pub uptime_sec: f64,
    /// `"default"` if the session is running `Policy::default()` verbatim,
    /// `"custom"` otherwise.
    pub policy: String,
    /// Total calls evaluated by `before_call`, including denied ones.
    pub total_calls: u64,
    /// How many of those calls were not `Allow`.
    pub blocked_calls: u64,
    /// `blocked_calls / max(total_calls, 1)`, rounded to three decimals.
    pub block_rate: f64,
    /// Number of calls that reached the call graph.
    pub dag_depth: usize,
    /// Number of anomalies detected so far.
    pub anomalies: usize,
    /// Per-tool circuit breaker snapshots.
    pub circuit_breakers: HashMap<String, BreakerStatus>,
    /// Whether the session has been closed.
    pub closed: bool,
}
