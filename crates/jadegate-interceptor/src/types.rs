//! The verdict shape returned by [`crate::interceptor::ToolCallInterceptor`].

use jadegate_dag::{Anomaly, CallId, RiskLevel};
use serde::{Deserialize, Serialize};

/// The interceptor's decision on a tool call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The call may proceed.
    Allow,
    /// The call is refused outright.
    Deny,
    /// The call is withheld pending out-of-band human approval.
    NeedsApproval,
}

impl Verdict {
    /// Escalate `self` to `other` if `other` is strictly more restrictive.
    /// Ordering: `Allow < NeedsApproval < Deny`. Once a verdict reaches
    /// `Deny` nothing escalates it further.
    #[must_use]
    pub fn escalate(self, other: Verdict) -> Verdict {
        fn rank(v: Verdict) -> u8 {
            match v {
                Verdict::Allow => 0,
                Verdict::NeedsApproval => 1,
                Verdict::Deny => 2,
            }
        }
        if rank(other) > rank(self) {
            other
        } else {
            self
        }
    }
}

/// The full result of [`crate::interceptor::ToolCallInterceptor::before_call`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterceptResult {
    /// The decision.
    pub verdict: Verdict,
    /// The call id assigned to this call. Always minted, even when the
    /// breaker gate short-circuits before the call ever reaches the DAG —
    /// in that case the id simply never appears among the graph's nodes,
    /// and a later `after_call` for it is a no-op.
    pub call_id: CallId,
    /// The tool name as invoked.
    pub tool_name: String,
    /// Every reason contributing to the verdict, in the order the pipeline
    /// found them.
    pub reasons: Vec<String>,
    /// Anomalies the DAG surfaced for this call.
    pub anomalies: Vec<Anomaly>,
    /// Risk level assigned to this call.
    pub risk_level: RiskLevel,
}

impl InterceptResult {
    /// Shorthand for `verdict == Verdict::Allow`.
    #[must_use]
    pub fn allowed(&self) -> bool {
        self.verdict == Verdict::Allow
    }
}
