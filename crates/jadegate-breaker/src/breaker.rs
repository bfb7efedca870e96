//! The [`CircuitBreaker`] manager itself.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::state::{BreakerState, BreakerStatus, ToolBreaker};

/// Manages one breaker per tool name. Tools that have never failed are
/// lazily allocated a `Closed` breaker on first access.
#[derive(Debug)]
pub struct CircuitBreaker {
    threshold: u32,
    timeout: Duration,
    state: HashMap<String, ToolBreaker>,
}

impl CircuitBreaker {
    /// Create a breaker manager. `threshold` consecutive failures trips a
    /// tool's breaker open; `timeout` is how long it stays open before
    /// allowing a half-open probe.
    #[must_use]
    pub fn new(threshold: u32, timeout: Duration) -> Self {
        Self {
            threshold,
            timeout,
            state: HashMap::new(),
        }
    }

    fn entry(&mut self, tool_name: &str) -> &mut ToolBreaker {
        self.state.entry(tool_name.to_string()).or_default()
    }

    /// Check whether a call to `tool_name` is currently allowed. `Open`
    /// breakers are lazily promoted to `HalfOpen` here once the cooldown
    /// has elapsed.
    pub fn can_call(&mut self, tool_name: &str) -> bool {
        let timeout = self.timeout;
        let tool = tool_name.to_string();
        let entry = self.entry(&tool);

        match entry.state {
            BreakerState::Closed => true,
            BreakerState::Open => {
                let elapsed = entry
                    .last_failure
                    .map_or(Duration::MAX, |t| t.elapsed());
                if elapsed >= timeout {
                    entry.state = BreakerState::HalfOpen;
                    tracing::info!(tool = %tool_name, "circuit breaker -> half_open (probe allowed)");
                    true
                } else {
                    false
                }
            }
            BreakerState::HalfOpen => true,
        }
    }

    /// Record a successful call. Closes a half-open breaker (recovery) and
    /// clears the consecutive-failure counter for a closed one.
    pub fn record_success(&mut self, tool_name: &str) {
        let entry = self.entry(tool_name);
        entry.success_count = entry.success_count.saturating_add(1);

        match entry.state {
            BreakerState::HalfOpen => {
                entry.state = BreakerState::Closed;
                entry.failure_count = 0;
                tracing::info!(tool = %tool_name, "circuit breaker -> closed (recovered)");
            }
            BreakerState::Closed => {
                entry.failure_count = 0;
            }
            BreakerState::Open => {}
        }
    }

    /// Record a failed call. Returns `true` if this failure just tripped
    /// the breaker open (either from a failed probe, or from crossing the
    /// consecutive-failure threshold while closed).
    pub fn record_failure(&mut self, tool_name: &str) -> bool {
        let threshold = self.threshold;
        let entry = self.entry(tool_name);
        entry.failure_count = entry.failure_count.saturating_add(1);
        entry.last_failure = Some(Instant::now());

        match entry.state {
            BreakerState::HalfOpen => {
                entry.state = BreakerState::Open;
                entry.trip_count = entry.trip_count.saturating_add(1);
                tracing::warn!(tool = %tool_name, "circuit breaker -> open (probe failed)");
                true
            }
            BreakerState::Closed if entry.failure_count >= threshold => {
                entry.state = BreakerState::Open;
                entry.trip_count = entry.trip_count.saturating_add(1);
                tracing::warn!(
                    tool = %tool_name,
                    failures = entry.failure_count,
                    "circuit breaker -> open (consecutive failure threshold reached)"
                );
                true
            }
            _ => false,
        }
    }

    /// Manually reset one tool's breaker back to a fresh `Closed` state.
    pub fn reset(&mut self, tool_name: &str) {
        if self.state.remove(tool_name).is_some() {
            tracing::info!(tool = %tool_name, "circuit breaker manually reset");
        }
    }

    /// Reset every tool's breaker.
    pub fn reset_all(&mut self) {
        self.state.clear();
    }

    /// A read-only snapshot of every tool's breaker, with any `Open`
    /// breakers whose cooldown has elapsed reported as `HalfOpen`.
    #[must_use]
    pub fn get_status(&mut self) -> HashMap<String, BreakerStatus> {
        let timeout = self.timeout;
        for entry in self.state.values_mut() {
            if entry.state == BreakerState::Open {
                let elapsed = entry
                    .last_failure
                    .map_or(Duration::MAX, |t| t.elapsed());
                if elapsed >= timeout {
                    entry.state = BreakerState::HalfOpen;
                }
            }
        }

        self.state
            .iter()
            .map(|(name, s)| {
                (
                    name.clone(),
                    BreakerStatus {
                        state: s.state,
                        failure_count: s.failure_count,
                        success_count: s.success_count,
                        trip_count: s.trip_count,
                    },
                )
            })
            .collect()
    }
}
