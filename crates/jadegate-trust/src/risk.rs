//! Risk levels and the keyword-based [`RiskProfile`] heuristic.
//!
//! This heuristic classifies a tool from its *name and description
//! text*, independent of any particular call — it is the one shared
//! function behind both the certificate a new tool gets baselined
//! with and the risk annotation the protocol proxy attaches to a
//! `tools/list` response. It is intentionally distinct from
//! `jadegate_dag`'s category sets, which classify a tool *by exact
//! name* for the call-graph detectors; the two serve different
//! purposes and are not meant to be unified.

use serde::{Deserialize, Serialize};

/// Qualitative risk level assigned to a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// No elevated capability detected.
    Low,
    /// Some elevated capability (network, file access) detected.
    Medium,
    /// Both network and file access, or exfiltration-shaped behavior.
    High,
    /// Shell or process execution capability.
    Critical,
    /// No classification has been made yet.
    Unknown,
}

impl RiskLevel {
    /// Numeric rank used to compare levels, with `Unknown` ranked below
    /// every known level (so a tool moving from `Unknown` to anything
    /// else, or from a known level to a strictly higher one, counts as
    /// an escalation). Deliberately not a derived `Ord` impl: the
    /// declaration order of the enum documents the level names, not
    /// their comparison order.
    #[must_use]
    pub fn rank(self) -> i8 {
        match self {
            RiskLevel::Unknown => -1,
            RiskLevel::Low => 0,
            RiskLevel::Medium => 1,
            RiskLevel::High => 2,
            RiskLevel::Critical => 3,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
            RiskLevel::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

impl Default for RiskLevel {
    fn default() -> Self {
        RiskLevel::Unknown
    }
}

/// A capability/risk assessment for a tool, either auto-generated from
/// its metadata via [`RiskProfile::from_tool_info`] or loaded from a
/// stored certificate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    /// Overall qualitative risk level.
    pub level: RiskLevel,
    /// Capability tags detected (`"network"`, `"filesystem"`, `"shell"`,
    /// `"data_send"`, `"read_only"`).
    pub capabilities: Vec<String>,
    /// Whether the tool appears to make network calls.
    pub network_access: bool,
    /// Whether the tool appears to access the filesystem.
    pub file_access: bool,
    /// Whether the tool appears to execute shell commands or processes.
    pub shell_access: bool,
    /// Whether the tool's description suggests it sends data out.
    pub data_exfil_risk: bool,
}

impl Default for RiskProfile {
    fn default() -> Self {
        Self {
            level: RiskLevel::Unknown,
            capabilities: Vec::new(),
            network_access: false,
            file_access: false,
            shell_access: false,
            data_exfil_risk: false,
        }
    }
}

const NETWORK_KEYWORDS: &[&str] = &["http", "fetch", "request", "url", "api", "webhook", "curl"];
const FILE_KEYWORDS: &[&str] = &["file", "read", "write", "path", "directory", "folder"];
const SHELL_KEYWORDS: &[&str] = &["exec", "shell", "command", "run", "bash", "terminal"];
const EXFIL_KEYWORDS: &[&str] = &["send", "email", "post", "upload", "push"];
const READ_ONLY_KEYWORDS: &[&str] = &["search", "query", "list", "get"];

impl RiskProfile {
    /// Classify a tool from its name and description text. A tool with
    /// shell access is always `critical`; network-plus-file access is
    /// `high`; network access or exfiltration-shaped behavior alone is
    /// `medium`; file access alone is `medium`; otherwise `low`.
    #[must_use]
    pub fn from_tool_info(name: &str, description: &str) -> Self {
        let text = format!("{name} {description}").to_lowercase();
        let mut capabilities = Vec::new();

        let network_access = NETWORK_KEYWORDS.iter().any(|kw| text.contains(kw));
        if network_access {
            capabilities.push("network".to_string());
        }
        let file_access = FILE_KEYWORDS.iter().any(|kw| text.contains(kw));
        if file_access {
            capabilities.push("filesystem".to_string());
        }
        let shell_access = SHELL_KEYWORDS.iter().any(|kw| text.contains(kw));
        if shell_access {
            capabilities.push("shell".to_string());
        }
        let data_exfil_risk = EXFIL_KEYWORDS.iter().any(|kw| text.contains(kw));
        if data_exfil_risk {
            capabilities.push("data_send".to_string());
        }
        if READ_ONLY_KEYWORDS.iter().any(|kw| text.contains(kw)) {
            capabilities.push("read_only".to_string());
        }

        let level = if shell_access {
            RiskLevel::Critical
        } else if network_access && file_access {
            RiskLevel::High
        } else if network_access || data_exfil_risk {
            RiskLevel::Medium
        } else if file_access {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };

        Self {
            level,
            capabilities,
            network_access,
            file_access,
            shell_access,
            data_exfil_risk,
        }
    }
}
