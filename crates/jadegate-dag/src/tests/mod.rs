use std::collections::HashMap;

use crate::{AnomalyKind, CallOutcome, DagNode, DynamicDag, RiskLevel};

fn node(tool_name: &str) -> DagNode {
    DagNode::new(tool_name, HashMap::new(), RiskLevel::Unknown)
}

#[test]
fn single_call_produces_no_anomalies() {
    let mut dag = DynamicDag::new(20);
    let anomalies = dag.add_call(node("file_read"));
    assert!(anomalies.is_empty());
    assert_eq!(dag.depth(), 1);
}

#[test]
fn depth_exceeded_fires_once_past_limit() {
    let mut dag = DynamicDag::new(2);
    assert!(dag.add_call(node("a")).is_empty());
    assert!(dag.add_call(node("b")).is_empty());
    let anomalies = dag.add_call(node("c"));
    assert_eq!(anomalies.len(), 1);
    assert_eq!(anomalies[0].kind, AnomalyKind::DepthExceeded);
}

#[test]
fn sensitive_read_then_network_send_flags_data_exfiltration() {
    let mut dag = DynamicDag::new(20);
    dag.add_call(node("file_read"));
    let anomalies = dag.add_call(node("http_post"));
    assert!(anomalies.iter().any(|a| a.kind == AnomalyKind::DataExfiltration));
}

#[test]
fn network_send_without_prior_read_is_clean() {
    let mut dag = DynamicDag::new(20);
    let anomalies = dag.add_call(node("http_post"));
    assert!(anomalies.iter().all(|a| a.kind != AnomalyKind::DataExfiltration));
}

#[test]
fn circular_call_pattern_a_b_a_detected() {
    let mut dag = DynamicDag::new(20);
    dag.add_call(node("tool_a"));
    dag.add_call(node("tool_b"));
    let anomalies = dag.add_call(node("tool_a"));
    assert!(anomalies.iter().any(|a| a.kind == AnomalyKind::CircularCall));
}

#[test]
fn identical_repeated_call_is_not_circular() {
    let mut dag = DynamicDag::new(20);
    dag.add_call(node("tool_a"));
    dag.add_call(node("tool_a"));
    let anomalies = dag.add_call(node("tool_a"));
    assert!(anomalies.iter().all(|a| a.kind != AnomalyKind::CircularCall));
}

#[test]
fn privilege_escalation_after_benign_call_detected() {
    let mut dag = DynamicDag::new(20);
    dag.add_call(node("read_file"));
    let anomalies = dag.add_call(node("shell_exec"));
    assert!(anomalies
        .iter()
        .any(|a| a.kind == AnomalyKind::PrivilegeEscalation));
}

#[test]
fn privilege_escalation_first_call_never_fires() {
    let mut dag = DynamicDag::new(20);
    let anomalies = dag.add_call(node("shell_exec"));
    assert!(anomalies
        .iter()
        .all(|a| a.kind != AnomalyKind::PrivilegeEscalation));
}

#[test]
fn two_high_risk_calls_in_a_row_do_not_escalate() {
    let mut dag = DynamicDag::new(20);
    dag.add_call(node("shell_exec"));
    let anomalies = dag.add_call(node("execute"));
    assert!(anomalies
        .iter()
        .all(|a| a.kind != AnomalyKind::PrivilegeEscalation));
}

#[test]
fn edge_chain_length_matches_call_count() {
    let mut dag = DynamicDag::new(20);
    for name in ["a", "b", "c", "d"] {
        dag.add_call(node(name));
    }
    assert_eq!(dag.depth(), 4);
    assert_eq!(dag.edges().len(), 3);
}

#[test]
fn anomalies_only_reference_existing_call_ids() {
    let mut dag = DynamicDag::new(2);
    dag.add_call(node("file_read"));
    dag.add_call(node("tool_b"));
    dag.add_call(node("file_read"));
    dag.add_call(node("http_post"));

    for anomaly in dag.anomalies() {
        for id in &anomaly.involved_call_ids {
            assert!(dag.nodes().contains_key(id));
        }
    }
}

#[test]
fn update_call_fills_in_outcome_and_duration() {
    let mut dag = DynamicDag::new(20);
    dag.add_call(node("file_read"));
    let call_id = *dag.nodes().keys().next().unwrap();
    dag.update_call(call_id, true, 12.5);
    let updated = dag.nodes().get(&call_id).unwrap();
    assert_eq!(updated.outcome, CallOutcome::Ok);
    assert_eq!(updated.duration_ms, Some(12.5));
}

#[test]
fn update_call_for_unknown_id_is_a_no_op() {
    let mut dag = DynamicDag::new(20);
    dag.add_call(node("file_read"));
    let bogus = crate::CallId::new();
    dag.update_call(bogus, true, 1.0);
    assert!(!dag.nodes().contains_key(&bogus));
}

#[test]
fn reset_clears_everything() {
    let mut dag = DynamicDag::new(1);
    dag.add_call(node("a"));
    dag.add_call(node("b"));
    assert!(!dag.anomalies().is_empty());
    dag.reset();
    assert!(dag.nodes().is_empty());
    assert!(dag.edges().is_empty());
    assert!(dag.anomalies().is_empty());
    assert_eq!(dag.depth(), 0);
}
