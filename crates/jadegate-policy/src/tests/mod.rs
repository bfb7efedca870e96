use crate::{FileMode, Policy};

#[test]
fn default_blocks_metadata_endpoints() {
    let policy = Policy::default();
    assert!(!policy.is_domain_allowed("169.254.169.254"));
    assert!(!policy.is_domain_allowed("metadata.google.internal"));
    assert!(policy.is_domain_allowed("example.com"));
}

#[test]
fn blocklist_wins_even_if_host_is_also_allowlisted() {
    let mut policy = Policy::default();
    policy.network_allowlist.push("169.254.169.254".to_string());
    assert!(!policy.is_domain_allowed("169.254.169.254"));
}

#[test]
fn subdomain_of_blocked_host_is_denied() {
    let policy = Policy::default();
    assert!(!policy.is_domain_allowed("evil.metadata.google.internal"));
}

#[test]
fn wildcard_allowlist_permits_everything_not_blocked() {
    let policy = Policy {
        network_allowlist: vec!["*".to_string()],
        ..Policy::default()
    };
    assert!(policy.is_domain_allowed("anything.example"));
    assert!(!policy.is_domain_allowed("169.254.169.254"));
}

#[test]
fn suffix_pattern_matches_subdomains_only() {
    let policy = Policy {
        network_allowlist: vec!["*.example.com".to_string()],
        ..Policy::default()
    };
    assert!(policy.is_domain_allowed("api.example.com"));
    assert!(!policy.is_domain_allowed("evil.com"));
}

#[test]
fn empty_allowlist_permits_all_non_blocked_hosts() {
    let policy = Policy::default();
    assert!(policy.is_domain_allowed("totally-unknown-host.example"));
}

#[test]
fn blocked_action_and_approval_membership() {
    let policy = Policy::default();
    assert!(policy.is_action_blocked("shell_exec"));
    assert!(!policy.is_action_blocked("search_docs"));
    assert!(policy.needs_approval("email_send"));
    assert!(!policy.needs_approval("shell_exec"));
}

#[test]
fn file_blocklist_denies_by_substring_and_glob() {
    let policy = Policy::default();
    assert!(!policy.is_file_path_allowed("/etc/shadow", FileMode::Read));
    assert!(!policy.is_file_path_allowed("/home/user/.aws/credentials", FileMode::Read));
}

#[test]
fn empty_file_allowlist_permits_non_blocked_paths() {
    let policy = Policy::default();
    assert!(policy.is_file_path_allowed("/tmp/notes.txt", FileMode::Read));
}

#[test]
fn file_allowlist_restricts_to_glob_matches() {
    let policy = Policy {
        file_read_allow: vec!["/workspace/*".to_string()],
        ..Policy::default()
    };
    assert!(policy.is_file_path_allowed("/workspace/notes.txt", FileMode::Read));
    assert!(!policy.is_file_path_allowed("/etc/hosts", FileMode::Read));
}

#[test]
fn upload_allowlist_is_case_insensitive() {
    let policy = Policy::default();
    assert!(policy.is_upload_allowed("report.PDF"));
    assert!(!policy.is_upload_allowed("payload.exe"));
}

#[test]
fn upload_with_empty_allowlist_permits_all() {
    let policy = Policy {
        upload_ext_allowlist: Vec::new(),
        ..Policy::default()
    };
    assert!(policy.is_upload_allowed("payload.exe"));
}

#[test]
fn presets_differ_from_default() {
    let permissive = Policy::permissive();
    let strict = Policy::strict();
    assert!(permissive.is_domain_allowed("anything.example"));
    assert!(strict.is_action_blocked("http_post"));
    assert!(strict.needs_approval("file_read"));
}

#[test]
fn merge_unions_lists_and_keeps_base_scalar_when_override_matches_default() {
    let base = Policy {
        blocked_actions: vec!["shell_exec".to_string(), "custom_tool".to_string()],
        max_call_depth: 15,
        ..Policy::default()
    };
    let over = Policy::default(); // override equal to default scalar and list values
    let merged = base.merge(&over);
    assert!(merged.blocked_actions.contains(&"custom_tool".to_string()));
    assert!(merged.blocked_actions.contains(&"process_spawn".to_string()));
    // override's max_call_depth equals the default (20), so base's 15 survives
    assert_eq!(merged.max_call_depth, 15);
}

#[test]
fn merge_takes_override_scalar_when_it_differs_from_default() {
    let base = Policy::default();
    let over = Policy {
        max_call_depth: 99,
        ..Policy::default()
    };
    let merged = base.merge(&over);
    assert_eq!(merged.max_call_depth, 99);
}

#[test]
fn merge_dedupes_list_union_preserving_order() {
    let base = Policy {
        blocked_actions: vec!["a".to_string(), "b".to_string()],
        ..Policy::default()
    };
    let over = Policy {
        blocked_actions: vec!["b".to_string(), "c".to_string()],
        ..Policy::default()
    };
    let merged = base.merge(&over);
    assert_eq!(merged.blocked_actions, vec!["a", "b", "c"]);
}

#[test]
fn roundtrip_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("policy.json");
    let policy = Policy::strict();
    policy.save(&path).unwrap();
    let loaded = Policy::from_file(&path).unwrap();
    assert_eq!(policy, loaded);
}

#[test]
fn saved_file_wraps_under_jadegate_policy_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("policy.json");
    Policy::default().save(&path).unwrap();
    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert!(raw.get("jadegate_policy").is_some());
}
