//! [`JadeSession`]: the security context for one agent conversation or MCP
//! connection.

use std::time::{Duration, Instant};

use jadegate_breaker::CircuitBreaker;
use jadegate_dag::{Anomaly, CallId, DynamicDag};
use jadegate_interceptor::{AuditEntry, InterceptResult, ToolCallInterceptor, Verdict};
use jadegate_policy::Policy;
use serde_json::Value;
use uuid::Uuid;

use crate::status::SessionStatus;

/// A security session. One per agent conversation or MCP connection,
/// wiring together a [`Policy`], a [`DynamicDag`], a [`CircuitBreaker`],
/// and the [`ToolCallInterceptor`] that ties them together.
pub struct JadeSession {
    session_id: String,
    default_policy: bool,
    interceptor: ToolCallInterceptor,
    created_at: Instant,
    call_count: u64,
    blocked_count: u64,
    closed: bool,
}

impl JadeSession {
    /// Start a session with the default policy and a freshly minted id.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(Policy::default())
    }

    /// Start a session with a caller-supplied policy and a freshly minted
    /// id.
    #[must_use]
    pub fn with_policy(policy: Policy) -> Self {
        Self::with_policy_and_id(policy, session_id())
    }

    /// Start a session with a caller-supplied policy and session id.
    #[must_use]
    pub fn with_policy_and_id(policy: Policy, session_id: String) -> Self {
        let default_policy = policy == Policy::default();
        let dag = DynamicDag::new(policy.max_call_depth);
        let breaker = CircuitBreaker::new(
            policy.breaker_threshold,
            Duration::from_secs_f64(policy.breaker_timeout_sec),
        );
        let interceptor = ToolCallInterceptor::new(policy, dag, breaker);

        tracing::info!(session_id = %session_id, "session created");

        Self {
            session_id,
            default_policy,
            interceptor,
            created_at: Instant::now(),
            call_count: 0,
            blocked_count: 0,
            closed: false,
        }
    }

    /// This session's id.
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// The policy this session is enforcing.
    #[must_use]
    pub fn policy(&self) -> &Policy {
        self.interceptor.policy()
    }

    /// The call graph this session has built so far.
    #[must_use]
    pub fn dag(&self) -> &DynamicDag {
        self.interceptor.dag()
    }

    /// The circuit breaker this session is consulting.
    #[must_use]
    pub fn breaker(&self) -> &CircuitBreaker {
        self.interceptor.breaker()
    }

    /// Direct access to the underlying interceptor, for callers that need
    /// more than the session's own convenience surface.
    #[must_use]
    pub fn interceptor(&self) -> &ToolCallInterceptor {
        &self.interceptor
    }

    /// Total calls evaluated, including denied ones.
    #[must_use]
    pub fn call_count(&self) -> u64 {
        self.call_count
    }

    /// How many of those calls were not `Allow`.
    #[must_use]
    pub fn blocked_count(&self) -> u64 {
        self.blocked_count
    }

    /// Every anomaly the call graph has detected so far.
    #[must_use]
    pub fn anomalies(&self) -> &[Anomaly] {
        self.interceptor.dag().anomalies()
    }

    /// Whether the session has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Evaluate a tool call before it executes. Once the session is
    /// closed this always returns a synthetic `Deny` without touching the
    /// policy, DAG, or breaker, and without counting against
    /// `call_count`/`blocked_count`.
    pub fn before_call(&mut self, tool_name: &str, params: &Value) -> InterceptResult {
        if self.closed {
            return InterceptResult {
                verdict: Verdict::Deny,
                call_id: CallId::new(),
                tool_name: tool_name.to_string(),
                reasons: vec!["Session is closed".to_string()],
                anomalies: Vec::new(),
                risk_level: jadegate_dag::RiskLevel::High,
            };
        }

        let result = self.interceptor.before_call(tool_name, params);
        self.call_count = self.call_count.saturating_add(1);
        if !result.allowed() {
            self.blocked_count = self.blocked_count.saturating_add(1);
        }
        result
    }

    /// Report the result of a tool call after execution. A no-op once the
    /// session is closed.
    pub fn after_call(
        &mut self,
        call_id: CallId,
        tool_name: &str,
        success: bool,
        duration_ms: f64,
        error_message: Option<&str>,
    ) {
        if !self.closed {
            self.interceptor
                .after_call(call_id, tool_name, success, duration_ms, error_message);
        }
    }

    /// A point-in-time snapshot of this session's health and activity.
    /// Takes `&mut self` because reading the circuit breaker's status
    /// lazily promotes any cooled-down `Open` breaker to `HalfOpen`.
    pub fn get_status(&mut self) -> SessionStatus {
        let uptime_sec = self.created_at.elapsed().as_secs_f64();
        let dag_depth = self.interceptor.dag().depth();
        let anomaly_count = self.interceptor.dag().anomalies().len();
        SessionStatus {
            session_id: self.session_id.clone(),
            uptime_sec: round3(uptime_sec),
            policy: if self.default_policy { "default" } else { "custom" }.to_string(),
            total_calls: self.call_count,
            blocked_calls: self.blocked_count,
            block_rate: round3(self.blocked_count as f64 / self.call_count.max(1) as f64),
            dag_depth,
            anomalies: anomaly_count,
            circuit_breakers: self.interceptor.breaker_mut().get_status(),
            closed: self.closed,
        }
    }

    /// The full audit log recorded so far.
    #[must_use]
    pub fn get_audit_log(&self) -> &[AuditEntry] {
        self.interceptor.audit_log()
    }

    /// Close the session and return its final status. Idempotent: calling
    /// this more than once simply re-reports the same closed status.
    pub fn close(&mut self) -> SessionStatus {
        self.closed = true;
        let status = self.get_status();
        tracing::info!(
            session_id = %self.session_id,
            calls = self.call_count,
            blocked = self.blocked_count,
            anomalies = status.anomalies,
            "session closed",
        );
        status
    }
}

impl Default for JadeSession {
    fn default() -> Self {
        Self::new()
    }
}

fn session_id() -> String {
    Uuid::new_v4().simple().to_string()[..16].to_string()
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
