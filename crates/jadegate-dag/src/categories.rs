//! Fixed keyword categories used by the call-graph detectors and by the
//! trust/certificate risk heuristics in `jadegate-trust`.
//!
//! These are first-class configuration data, not code: a new tool
//! ecosystem's naming conventions (an app that calls a file read
//! `fetchBlob`, say) can be taught to the gateway by editing these slices
//! rather than recompiling a detector.

/// Tool names, case-folded, in the sensitive-read category (exact match).
pub const SENSITIVE_READ_TOOLS: &[&str] = &[
    "file_read",
    "read_file",
    "readfile",
    "cat",
    "read",
    "database_query",
    "db_query",
    "sql_query",
];

/// Tool names, case-folded, in the network-send category (exact match).
pub const NETWORK_SEND_TOOLS: &[&str] = &[
    "http_post",
    "http_put",
    "fetch",
    "curl",
    "request",
    "email_send",
    "send_email",
    "webhook",
    "http_request",
    "api_call",
];

/// Tool names, case-folded, considered high risk (exact match): shell
/// execution, process spawning, destructive filesystem operations.
pub const HIGH_RISK_TOOLS: &[&str] = &[
    "shell_exec",
    "execute",
    "run_command",
    "exec",
    "file_delete",
    "rm",
    "process_spawn",
];

/// A tool name matches the sensitive-read category if it is exactly one of
/// [`SENSITIVE_READ_TOOLS`], or contains the token `read` or `file_read`.
#[must_use]
pub fn is_sensitive_read(name: &str) -> bool {
    let lower = name.to_lowercase();
    SENSITIVE_READ_TOOLS.contains(&lower.as_str())
        || lower.contains("read")
        || lower.contains("file_read")
}

/// A tool name matches the network-send category if it is exactly one of
/// [`NETWORK_SEND_TOOLS`], or contains the token `http_post` or `send`.
#[must_use]
pub fn is_network_send(name: &str) -> bool {
    let lower = name.to_lowercase();
    NETWORK_SEND_TOOLS.contains(&lower.as_str())
        || lower.contains("http_post")
        || lower.contains("send")
}

/// A tool name matches the high-risk category iff it is exactly one of
/// [`HIGH_RISK_TOOLS`].
#[must_use]
pub fn is_high_risk(name: &str) -> bool {
    HIGH_RISK_TOOLS.contains(&name.to_lowercase().as_str())
}
