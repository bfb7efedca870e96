use jadegate_interceptor::Verdict;
use jadegate_policy::Policy;
use serde_json::json;

use crate::JadeSession;

#[test]
fn new_session_reports_default_policy_and_zero_activity() {
    let mut session = JadeSession::new();
    let status = session.get_status();
    assert_eq!(status.policy, "default");
    assert_eq!(status.total_calls, 0);
    assert_eq!(status.blocked_calls, 0);
    assert!((status.block_rate - 0.0).abs() < f64::EPSILON);
    assert!(!status.closed);
}

#[test]
fn custom_policy_is_reported_as_custom() {
    let mut policy = Policy::default();
    policy.max_calls_per_minute = 999;
    let mut session = JadeSession::with_policy(policy);
    assert_eq!(session.get_status().policy, "custom");
}

#[test]
fn call_count_and_blocked_count_track_before_call_outcomes() {
    let mut session = JadeSession::new();
    session.before_call("search_docs", &json!({"q": "x"}));
    session.before_call("shell_exec", &json!({"cmd": "ls"}));

    assert_eq!(session.call_count(), 2);
    assert_eq!(session.blocked_count(), 1);
    let status = session.get_status();
    assert_eq!(status.total_calls, 2);
    assert_eq!(status.blocked_calls, 1);
    assert!((status.block_rate - 0.5).abs() < 1e-9);
}

#[test]
fn closed_session_synthesizes_deny_without_counting_or_touching_dag() {
    let mut session = JadeSession::new();
    session.before_call("search_docs", &json!({}));
    let depth_before = session.dag().depth();
    session.close();

    let result = session.before_call("search_docs", &json!({}));
    assert_eq!(result.verdict, Verdict::Deny);
    assert_eq!(result.reasons, vec!["Session is closed".to_string()]);
    assert_eq!(session.call_count(), 1, "closed calls must not increment call_count");
    assert_eq!(session.dag().depth(), depth_before);
}

#[test]
fn close_is_idempotent() {
    let mut session = JadeSession::new();
    let first = session.close();
    let second = session.close();
    assert!(first.closed);
    assert!(second.closed);
    assert_eq!(first.total_calls, second.total_calls);
}

#[test]
fn after_call_on_closed_session_is_a_no_op() {
    let mut session = JadeSession::new();
    let result = session.before_call("search_docs", &json!({}));
    session.close();
    // Must not panic even though the session is closed and the dag/breaker
    // are no longer being driven by this call.
    session.after_call(result.call_id, "search_docs", true, 1.0, None);
}

#[test]
fn audit_log_is_populated_through_the_session() {
    let mut session = JadeSession::new();
    session.before_call("search_docs", &json!({"q": "x"}));
    assert_eq!(session.get_audit_log().len(), 1);
}

#[test]
fn session_id_defaults_to_a_sixteen_character_id() {
    let session = JadeSession::new();
    assert_eq!(session.session_id().len(), 16);
}
