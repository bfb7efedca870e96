//! [`ToolCallInterceptor`]: the ordered pre-call evaluation pipeline and
//! its post-call bookkeeping.

use chrono::{DateTime, Utc};
use jadegate_breaker::CircuitBreaker;
use jadegate_dag::{DagNode, DynamicDag, RiskLevel, Severity};
use jadegate_policy::Policy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::scan::{sanitize_params, scan_dangerous_patterns, scan_domains, scan_file_paths};
use crate::types::{InterceptResult, Verdict};

/// One audit-log entry. Recorded at `before_call` and patched in place by
/// the matching `after_call`. Serializable so a caller can persist it to
/// the optional append-only audit log file, one JSON object per line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// The call this entry describes.
    pub call_id: jadegate_dag::CallId,
    /// Tool name as invoked.
    pub tool_name: String,
    /// Parameter keys only — never the values, to keep the audit log safe
    /// to persist or display.
    pub params_keys: Vec<String>,
    /// The verdict reached at `before_call` time.
    pub verdict: Verdict,
    /// Every reason behind that verdict.
    pub reasons: Vec<String>,
    /// When `before_call` ran.
    pub timestamp: DateTime<Utc>,
    /// Filled in by `after_call`, if it was ever reported.
    pub success: Option<bool>,
    /// Filled in by `after_call`, if a failure message was given.
    pub error: Option<String>,
}

/// The gatekeeper. Every tool call passes through `before_call` before it
/// may execute, and the result of actually running it is reported back
/// through `after_call`.
pub struct ToolCallInterceptor {
    policy: Policy,
    dag: DynamicDag,
    breaker: CircuitBreaker,
    audit_log: Vec<AuditEntry>,
}

impl ToolCallInterceptor {
    /// Build an interceptor around an already-configured policy, call
    /// graph, and circuit breaker.
    #[must_use]
    pub fn new(policy: Policy, dag: DynamicDag, breaker: CircuitBreaker) -> Self {
        Self {
            policy,
            dag,
            breaker,
            audit_log: Vec::new(),
        }
    }

    /// The policy this interceptor is enforcing.
    #[must_use]
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// The call graph this interceptor is building.
    #[must_use]
    pub fn dag(&self) -> &DynamicDag {
        &self.dag
    }

    /// The circuit breaker this interceptor is consulting.
    #[must_use]
    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    /// Mutable access to the circuit breaker, for callers that need to
    /// read a status snapshot (which lazily promotes cooled-down `Open`
    /// breakers to `HalfOpen`) without going through `before_call`.
    pub fn breaker_mut(&mut self) -> &mut CircuitBreaker {
        &mut self.breaker
    }

    /// A read-only view of every audit-log entry recorded so far. Empty
    /// if `Policy::enable_audit_log` is `false`.
    #[must_use]
    pub fn audit_log(&self) -> &[AuditEntry] {
        &self.audit_log
    }

    /// Evaluate a tool call before it executes.
    ///
    /// Runs, in order: the circuit-breaker gate (an open breaker denies
    /// immediately and never reaches the DAG), the blocked-action check,
    /// the approval-required check, the dangerous-pattern parameter scan,
    /// the network-domain scan, the file-path scan, the DAG append (which
    /// always happens once the breaker gate has passed, regardless of the
    /// verdict so far, so the graph's anomaly detectors see every call),
    /// and finally an anomaly-driven verdict escalation that only fires
    /// while the verdict is still `Allow`.
    pub fn before_call(&mut self, tool_name: &str, params: &Value) -> InterceptResult {
        let call_id = jadegate_dag::CallId::new();
        let mut reasons = Vec::new();
        let mut verdict = Verdict::Allow;
        let mut risk_level = RiskLevel::Low;

        // 1. Circuit breaker gate.
        if !self.breaker.can_call(tool_name) {
            reasons.push(format!("Circuit breaker OPEN for '{tool_name}'"));
            tracing::warn!(tool = %tool_name, %call_id, "call denied: circuit breaker open");
            self.log_audit(call_id, tool_name, params, Verdict::Deny, &reasons);
            return InterceptResult {
                verdict: Verdict::Deny,
                call_id,
                tool_name: tool_name.to_string(),
                reasons,
                anomalies: Vec::new(),
                risk_level: RiskLevel::High,
            };
        }

        // 2. Blocked actions.
        if self.policy.is_action_blocked(tool_name) {
            reasons.push(format!("Action '{tool_name}' is blocked by policy"));
            verdict = Verdict::Deny;
            risk_level = RiskLevel::High;
        }

        // 3. Human approval.
        if verdict == Verdict::Allow && self.policy.needs_approval(tool_name) {
            reasons.push(format!("Action '{tool_name}' requires human approval"));
            verdict = Verdict::NeedsApproval;
            risk_level = RiskLevel::Medium;
        }

        // 4. Parameter scanning.
        if verdict == Verdict::Allow
            && self.policy.enable_dangerous_pattern_scan
        {
            if let Some(reason) = scan_dangerous_patterns(params) {
                reasons.push(reason);
                verdict = Verdict::Deny;
                risk_level = RiskLevel::High;
            }
        }

        // 5. Network domain check.
        if verdict == Verdict::Allow {
            let domain_issues = scan_domains(params, &self.policy);
            if !domain_issues.is_empty() {
                reasons.extend(domain_issues);
                verdict = Verdict::Deny;
                risk_level = RiskLevel::High;
            }
        }

        // 6. File path check.
        if verdict == Verdict::Allow {
            let file_issues = scan_file_paths(params, &self.policy);
            if !file_issues.is_empty() {
                reasons.extend(file_issues);
                verdict = Verdict::Deny;
                risk_level = RiskLevel::High;
            }
        }

        // 7. DAG append: always happens once the breaker gate has passed,
        // so every detector sees every call regardless of verdict so far.
        let node = DagNode {
            call_id,
            ..DagNode::new(tool_name, sanitize_params(params), risk_level)
        };
        let anomalies = self.dag.add_call(node);

        // 8. Anomaly-driven escalation: only fires while still Allow, and
        // fires at most once (the first high-or-critical anomaly found).
        for anomaly in &anomalies {
            if verdict == Verdict::Allow
                && matches!(anomaly.severity, Severity::High | Severity::Critical)
            {
                verdict = Verdict::Deny;
                reasons.push(format!("Anomaly detected: {}", anomaly.message));
                risk_level = RiskLevel::High;
            }
        }

        self.log_audit(call_id, tool_name, params, verdict, &reasons);

        InterceptResult {
            verdict,
            call_id,
            tool_name: tool_name.to_string(),
            reasons,
            anomalies,
            risk_level,
        }
    }

    /// Report the outcome of a call previously admitted by `before_call`.
    /// Updates the DAG node's outcome (a no-op if the breaker gate
    /// short-circuited before the call reached the DAG), records the
    /// result against that tool's circuit breaker, and patches the
    /// matching audit-log entry in place.
    pub fn after_call(
        &mut self,
        call_id: jadegate_dag::CallId,
        tool_name: &str,
        success: bool,
        duration_ms: f64,
        error_message: Option<&str>,
    ) {
        self.dag.update_call(call_id, success, duration_ms);

        if success {
            self.breaker.record_success(tool_name);
        } else {
            self.breaker.record_failure(tool_name);
        }

        if let Some(entry) = self
            .audit_log
            .iter_mut()
            .rev()
            .find(|e| e.call_id == call_id)
        {
            entry.success = Some(success);
            entry.error = error_message.map(str::to_string);
        }
    }

    fn log_audit(
        &mut self,
        call_id: jadegate_dag::CallId,
        tool_name: &str,
        params: &Value,
        verdict: Verdict,
        reasons: &[String],
    ) {
        if !self.policy.enable_audit_log {
            return;
        }
        let params_keys = match params {
            Value::Object(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        };
        self.audit_log.push(AuditEntry {
            call_id,
            tool_name: tool_name.to_string(),
            params_keys,
            verdict,
            reasons: reasons.to_vec(),
            timestamp: Utc::now(),
            success: None,
            error: None,
        });
    }
}
