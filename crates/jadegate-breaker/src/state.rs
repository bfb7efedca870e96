//! Per-tool breaker state and its externally visible snapshot.

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// The three states a single tool's breaker can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakerState {
    /// Normal operation; calls pass through.
    Closed,
    /// Tripped; all calls blocked until the cooldown elapses.
    Open,
    /// Cooldown elapsed; exactly one probe call is allowed through.
    HalfOpen,
}

impl std::fmt::Display for BreakerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BreakerState::Closed => "closed",
            BreakerState::Open => "open",
            BreakerState::HalfOpen => "half_open",
        };
        write!(f, "{s}")
    }
}

/// Internal per-tool bookkeeping. Not exposed directly; see
/// [`BreakerStatus`] for the read-only view.
#[derive(Debug, Clone)]
pub(crate) struct ToolBreaker {
    pub state: BreakerState,
    pub failure_count: u32,
    pub success_count: u64,
    pub trip_count: u32,
    pub last_failure: Option<Instant>,
}

impl Default for ToolBreaker {
    fn default() -> Self {
        Self {
            state: BreakerState::Closed,
            failure_count: 0,
            success_count: 0,
            trip_count: 0,
            last_failure: None,
        }
    }
}

/// A read-only snapshot of one tool's breaker, as returned by
/// [`crate::CircuitBreaker::get_status`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakerStatus {
    /// Current state.
    pub state: BreakerState,
    /// Consecutive failures recorded since the last reset/success.
    pub failure_count: u32,
    /// Total successful calls recorded.
    pub success_count: u64,
    /// Number of times this tool's breaker has tripped to `Open`.
    pub trip_count: u32,
}
