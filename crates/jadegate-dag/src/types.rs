//! Data types that make up the dynamic call graph.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An opaque, unique identifier for a single tool call within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallId(pub Uuid);

impl CallId {
    /// Mint a fresh call id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CallId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a call's outcome is known yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallOutcome {
    /// `after_call` has not yet been recorded for this node.
    Unknown,
    /// The upstream call succeeded.
    Ok,
    /// The upstream call failed.
    Fail,
}

/// A qualitative risk level, ordered `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Lowest risk tier.
    Low,
    /// Default tier when nothing else is known.
    Unknown,
    /// Elevated risk.
    Medium,
    /// High risk.
    High,
    /// Critical risk.
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "low",
            RiskLevel::Unknown => "unknown",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        };
        write!(f, "{s}")
    }
}

/// A single tool call recorded in the graph.
///
/// Created at `before_call` with `outcome = Unknown` and `duration_ms =
/// None`; `after_call` fills in the outcome and duration once the upstream
/// response is known.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DagNode {
    /// Unique id for this call.
    pub call_id: CallId,
    /// The tool name as invoked.
    pub tool_name: String,
    /// A bounded-size summary of parameters (string keys/values, not the
    /// full argument tree).
    pub param_summary: HashMap<String, String>,
    /// When the node was created.
    pub timestamp: DateTime<Utc>,
    /// Outcome, filled in at `after_call`.
    pub outcome: CallOutcome,
    /// Duration in milliseconds, filled in at `after_call`.
    pub duration_ms: Option<f64>,
    /// Risk level assigned at creation time.
    pub risk_level: RiskLevel,
}

impl DagNode {
    /// Create a fresh node with an unknown outcome.
    #[must_use]
    pub fn new(
        tool_name: impl Into<String>,
        param_summary: HashMap<String, String>,
        risk_level: RiskLevel,
    ) -> Self {
        Self {
            call_id: CallId::new(),
            tool_name: tool_name.into(),
            param_summary,
            timestamp: Utc::now(),
            outcome: CallOutcome::Unknown,
            duration_ms: None,
            risk_level,
        }
    }
}

/// A directed edge linking two calls. Edges currently form a single
/// ordered chain (not an arbitrary DAG) — the name reflects the design
/// intent to generalize, not the current topology.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DagEdge {
    /// Source call id.
    pub from: CallId,
    /// Destination call id.
    pub to: CallId,
    /// Edge kind; always `"sequential"` today.
    pub edge_type: String,
}

/// The kind of anomaly a detector found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    /// A sensitive read was followed by a network-send call.
    DataExfiltration,
    /// An A→B→A call pattern.
    CircularCall,
    /// The call chain exceeded the configured maximum depth.
    DepthExceeded,
    /// Reserved: not enforced by this core (see module docs).
    RapidFire,
    /// A high-risk tool followed a non-high-risk one.
    PrivilegeEscalation,
}

/// Anomaly severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational.
    Low,
    /// Worth noting.
    Medium,
    /// Should usually deny.
    High,
    /// Always escalates the verdict.
    Critical,
}

/// A detected anomaly. Anomalies are append-only within a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Anomaly {
    /// What kind of anomaly this is.
    pub kind: AnomalyKind,
    /// How severe it is.
    pub severity: Severity,
    /// Human-readable explanation.
    pub message: String,
    /// Call ids this anomaly references. Every id here is guaranteed to
    /// be present in the graph's nodes at the time the anomaly fires.
    pub involved_call_ids: Vec<CallId>,
    /// When the anomaly fired.
    pub timestamp: DateTime<Utc>,
}
