//! Security profile annotation attached to `tools/list` responses.

use jadegate_trust::RiskProfile;
use serde_json::{json, Value};

/// Build the `jade_security` annotation for one tool descriptor, using
/// the same name/description risk heuristic the trust subsystem uses to
/// baseline a certificate — not a separate proxy-local heuristic.
/// `seen_before` marks tools this proxy has already profiled in an
/// earlier `tools/list` response this session.
#[must_use]
pub fn tool_security_profile(tool: &Value, seen_before: bool) -> Value {
    let name = tool.get("name").and_then(Value::as_str).unwrap_or_default();
    let description = tool
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default();

    let profile = RiskProfile::from_tool_info(name, description);

    json!({
        "tool_name": name,
        "risk_level": profile.level.to_string(),
        "capabilities": profile.capabilities,
        "jade_verified": seen_before,
    })
}
