//! The append-only [`DynamicDag`] and its fixed detector pipeline.

use std::collections::HashMap;

use chrono::Utc;

use crate::categories::{is_high_risk, is_network_send, is_sensitive_read};
use crate::types::{Anomaly, AnomalyKind, CallId, CallOutcome, DagEdge, DagNode, Severity};

/// One per session. Append-only: nodes and anomalies are never removed
/// except by [`DynamicDag::reset`].
#[derive(Debug)]
pub struct DynamicDag {
    nodes: HashMap<CallId, DagNode>,
    edges: Vec<DagEdge>,
    anomalies: Vec<Anomaly>,
    call_order: Vec<CallId>,
    tool_history: Vec<String>,
    max_depth: u32,
    recent_reads: Vec<(CallId, String)>,
}

impl DynamicDag {
    /// Create a new, empty graph with the given depth limit.
    #[must_use]
    pub fn new(max_depth: u32) -> Self {
        Self {
            nodes: HashMap::new(),
            edges: Vec::new(),
            anomalies: Vec::new(),
            call_order: Vec::new(),
            tool_history: Vec::new(),
            max_depth,
            recent_reads: Vec::new(),
        }
    }

    /// All nodes recorded so far.
    #[must_use]
    pub fn nodes(&self) -> &HashMap<CallId, DagNode> {
        &self.nodes
    }

    /// All edges recorded so far.
    #[must_use]
    pub fn edges(&self) -> &[DagEdge] {
        &self.edges
    }

    /// All anomalies detected so far.
    #[must_use]
    pub fn anomalies(&self) -> &[Anomaly] {
        &self.anomalies
    }

    /// Number of calls that have reached the graph (i.e. were not
    /// short-circuited before DAG append).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.call_order.len()
    }

    /// Append a call node and run the fixed detector pipeline. Returns the
    /// anomalies newly found by this call (also appended to
    /// [`DynamicDag::anomalies`]).
    ///
    /// Detector order is fixed: depth, data exfiltration, circular call,
    /// privilege escalation.
    pub fn add_call(&mut self, node: DagNode) -> Vec<Anomaly> {
        let mut new_anomalies = Vec::new();
        let call_id = node.call_id;
        let tool_name = node.tool_name.clone();

        if let Some(&prev_id) = self.call_order.last() {
            self.edges.push(DagEdge {
                from: prev_id,
                to: call_id,
                edge_type: "sequential".to_string(),
            });
        }

        self.nodes.insert(call_id, node);
        self.call_order.push(call_id);
        self.tool_history.push(tool_name.clone());

        // 1. Depth check.
        if self.call_order.len() as u32 > self.max_depth {
            new_anomalies.push(Anomaly {
                kind: AnomalyKind::DepthExceeded,
                severity: Severity::High,
                message: format!(
                    "call chain depth {} exceeds limit {}",
                    self.call_order.len(),
                    self.max_depth
                ),
                involved_call_ids: vec![call_id],
                timestamp: Utc::now(),
            });
        }

        // 2. Data exfiltration: sensitive read -> network send.
        if is_sensitive_read(&tool_name) {
            self.recent_reads.push((call_id, tool_name.clone()));
        }
        if is_network_send(&tool_name) && !self.recent_reads.is_empty() {
            let start = self.recent_reads.len().saturating_sub(3);
            let mut involved: Vec<CallId> =
                self.recent_reads[start..].iter().map(|(id, _)| *id).collect();
            involved.push(call_id);
            new_anomalies.push(Anomaly {
                kind: AnomalyKind::DataExfiltration,
                severity: Severity::Critical,
                message: format!("potential data exfiltration: read -> {tool_name}"),
                involved_call_ids: involved,
                timestamp: Utc::now(),
            });
        }

        // 3. Circular call detection: A -> B -> A.
        if self.tool_history.len() >= 3 {
            let n = self.tool_history.len();
            let recent = &self.tool_history[n - 3..];
            if recent[0] == recent[2] && recent[0] != recent[1] {
                new_anomalies.push(Anomaly {
                    kind: AnomalyKind::CircularCall,
                    severity: Severity::Medium,
                    message: format!(
                        "circular call pattern: {} -> {} -> {}",
                        recent[0], recent[1], recent[2]
                    ),
                    involved_call_ids: self.call_order[n - 3..].to_vec(),
                    timestamp: Utc::now(),
                });
            }
        }

        // 4. Privilege escalation: high-risk tool following a non-high-risk one.
        if is_high_risk(&tool_name) && self.tool_history.len() >= 2 {
            let n = self.tool_history.len();
            let prev = &self.tool_history[n - 2];
            if !is_high_risk(prev) {
                new_anomalies.push(Anomaly {
                    kind: AnomalyKind::PrivilegeEscalation,
                    severity: Severity::High,
                    message: format!("privilege escalation: {prev} -> {tool_name}"),
                    involved_call_ids: self.call_order[n - 2..].to_vec(),
                    timestamp: Utc::now(),
                });
            }
        }

        self.anomalies.extend(new_anomalies.clone());
        new_anomalies
    }

    /// Record the outcome and duration of a previously-appended call.
    /// Does nothing if `call_id` was never appended (e.g. the breaker gate
    /// short-circuited it before DAG append).
    pub fn update_call(&mut self, call_id: CallId, success: bool, duration_ms: f64) {
        if let Some(node) = self.nodes.get_mut(&call_id) {
            node.outcome = if success {
                CallOutcome::Ok
            } else {
                CallOutcome::Fail
            };
            node.duration_ms = Some(duration_ms);
        }
    }

    /// Clear the graph back to its initial empty state.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.anomalies.clear();
        self.call_order.clear();
        self.tool_history.clear();
        self.recent_reads.clear();
    }
}
