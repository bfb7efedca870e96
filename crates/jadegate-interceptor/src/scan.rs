//! Bounded-depth parameter scanning: the dangerous-pattern, domain, and
//! file-path checks run by [`crate::interceptor::ToolCallInterceptor`].

use std::collections::HashMap;

use jadegate_policy::Policy;
use serde_json::Value;

use crate::patterns::first_dangerous_match;

/// Maximum nesting depth the scanners will walk into. Matches the
/// reference implementation's bound; deeper structures are silently
/// truncated rather than scanned, which is acceptable for a heuristic
/// scanner (see the error-handling design note on failing open, not
/// closed, for pattern/anomaly detectors).
const MAX_SCAN_DEPTH: usize = 10;

/// Longest a single string value is kept verbatim in a [`DagNode`]'s
/// param summary before being truncated with an ellipsis.
///
/// [`DagNode`]: jadegate_dag::DagNode
const MAX_SUMMARY_STRING_LEN: usize = 200;

/// Collect every string value reachable from `value`, stopping at
/// [`MAX_SCAN_DEPTH`] nested levels.
#[must_use]
pub fn deep_string_scan(value: &Value) -> Vec<&str> {
    let mut out = Vec::new();
    collect_strings(value, 0, &mut out);
    out
}

fn collect_strings<'a>(value: &'a Value, depth: usize, out: &mut Vec<&'a str>) {
    if depth > MAX_SCAN_DEPTH {
        return;
    }
    match value {
        Value::String(s) => out.push(s.as_str()),
        Value::Array(items) => {
            for item in items {
                collect_strings(item, depth.saturating_add(1), out);
            }
        }
        Value::Object(map) => {
            for v in map.values() {
                collect_strings(v, depth.saturating_add(1), out);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

/// Build a bounded-size summary of a call's parameters for storage in the
/// call graph: strings are truncated, scalars copied as-is, and
/// collections reduced to a short description rather than their full
/// contents.
#[must_use]
pub fn sanitize_params(params: &Value) -> HashMap<String, String> {
    let Value::Object(map) = params else {
        return HashMap::new();
    };
    map.iter()
        .map(|(k, v)| (k.clone(), summarize_value(v)))
        .collect()
}

fn summarize_value(value: &Value) -> String {
    match value {
        Value::String(s) if s.chars().count() > MAX_SUMMARY_STRING_LEN => {
            let truncated: String = s.chars().take(MAX_SUMMARY_STRING_LEN).collect();
            format!("{truncated}...")
        }
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => format!("[list, len={}]", items.len()),
        Value::Object(map) => {
            let keys: Vec<&str> = map.keys().take(5).map(String::as_str).collect();
            format!("{{dict, keys={keys:?}}}")
        }
        Value::Null => "null".to_string(),
    }
}

/// Scan every string in `params` against the fixed dangerous-pattern set.
/// Returns a reason for the first match found, if any.
#[must_use]
pub fn scan_dangerous_patterns(params: &Value) -> Option<String> {
    for s in deep_string_scan(params) {
        if let Some(pattern) = first_dangerous_match(s) {
            return Some(format!("Dangerous pattern detected: {pattern}"));
        }
    }
    None
}

/// Scan every string in `params` that looks like a URL (contains
/// `"://"`), parse its host, and check it against the network policy.
/// Returns one reason per disallowed host found.
#[must_use]
pub fn scan_domains(params: &Value, policy: &Policy) -> Vec<String> {
    let mut reasons = Vec::new();
    for s in deep_string_scan(params) {
        if !s.contains("://") {
            continue;
        }
        let Ok(url) = url::Url::parse(s) else {
            continue;
        };
        let Some(host) = url.host_str() else {
            continue;
        };
        if !policy.is_domain_allowed(host) {
            reasons.push(format!("Domain '{host}' not allowed by network policy"));
        }
    }
    reasons
}

/// Scan every string in `params` for a substring match against the
/// policy's file blocklist. Deliberately uses only the substring half of
/// `Policy::is_file_path_allowed`'s blocklist check — not the glob
/// allowlist, and no read/write mode distinction, since at scan time an
/// arbitrary string isn't known to be a path at all, let alone which mode
/// it would be opened in.
#[must_use]
pub fn scan_file_paths(params: &Value, policy: &Policy) -> Vec<String> {
    let mut reasons = Vec::new();
    for s in deep_string_scan(params) {
        for pattern in &policy.file_blocklist {
            if s.contains(pattern.as_str()) {
                reasons.push(format!("Sensitive file path detected: {s}"));
                break;
            }
        }
    }
    reasons
}
