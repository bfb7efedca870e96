use jadegate_crypto::KeyPair;

use crate::{Certificate, RiskLevel, RiskProfile, TofuAlertKind, TofuChecker, TrustStore};

fn temp_store() -> (tempfile::TempDir, TrustStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = TrustStore::open(dir.path()).unwrap();
    (dir, store)
}

#[test]
fn risk_profile_shell_access_is_always_critical() {
    let profile = RiskProfile::from_tool_info("shell_exec", "Execute shell commands");
    assert_eq!(profile.level, RiskLevel::Critical);
    assert!(profile.shell_access);
}

#[test]
fn risk_profile_read_only_search_is_low() {
    let profile = RiskProfile::from_tool_info("search_docs", "Search internal documents");
    assert_eq!(profile.level, RiskLevel::Low);
    assert!(profile.capabilities.contains(&"read_only".to_string()));
}

#[test]
fn risk_profile_network_and_file_is_high() {
    let profile = RiskProfile::from_tool_info("fetch_file", "Fetch a file over http and write it");
    assert_eq!(profile.level, RiskLevel::High);
    assert!(profile.network_access && profile.file_access);
}

#[test]
fn trust_score_follows_laplace_smoothed_posterior() {
    let mut cert = Certificate::new("t1", "s1", "Tool", "desc", RiskProfile::default());
    assert!((cert.trust_score - 0.5).abs() < f64::EPSILON);

    cert.update_trust(true);
    assert!((cert.trust_score - (2.0 / 3.0)).abs() < 1e-9);

    cert.update_trust(true);
    assert!((cert.trust_score - (3.0 / 4.0)).abs() < 1e-9);

    cert.update_trust(false);
    assert!((cert.trust_score - (3.0 / 5.0)).abs() < 1e-9);
}

#[test]
fn sign_then_verify_round_trips() {
    let keypair = KeyPair::generate();
    let mut cert = Certificate::new("t1", "s1", "Tool", "desc", RiskProfile::default());
    cert.sign(&keypair).unwrap();
    assert!(!cert.signature.is_empty());
    assert!(cert.verify(&keypair.export_public_key()));
}

#[test]
fn mutating_a_signable_field_invalidates_the_signature() {
    let keypair = KeyPair::generate();
    let mut cert = Certificate::new("t1", "s1", "Tool", "desc", RiskProfile::default());
    cert.sign(&keypair).unwrap();
    cert.display_name = "Renamed Tool".to_string();
    assert!(!cert.verify(&keypair.export_public_key()));
}

#[test]
fn mutating_trust_score_does_not_affect_verification() {
    let keypair = KeyPair::generate();
    let mut cert = Certificate::new("t1", "s1", "Tool", "desc", RiskProfile::default());
    cert.sign(&keypair).unwrap();
    cert.update_trust(true);
    assert!(cert.verify(&keypair.export_public_key()));
}

#[test]
fn unsigned_certificate_never_verifies() {
    let keypair = KeyPair::generate();
    let cert = Certificate::new("t1", "s1", "Tool", "desc", RiskProfile::default());
    assert!(!cert.verify(&keypair.export_public_key()));
}

#[test]
fn wrong_key_fails_verification() {
    let keypair = KeyPair::generate();
    let other = KeyPair::generate();
    let mut cert = Certificate::new("t1", "s1", "Tool", "desc", RiskProfile::default());
    cert.sign(&keypair).unwrap();
    assert!(!cert.verify(&other.export_public_key()));
}

#[test]
fn store_save_get_roundtrip_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = TrustStore::open(dir.path()).unwrap();
        let cert = Certificate::new("srv/tool", "srv", "Tool", "desc", RiskProfile::default());
        store.save(cert).unwrap();
    }
    let reopened = TrustStore::open(dir.path()).unwrap();
    let cert = reopened.get("srv/tool").expect("certificate persisted across reopen");
    assert_eq!(cert.tool_id, "srv/tool");
}

#[test]
fn store_tool_id_with_slash_is_filesystem_safe() {
    let (dir, store) = temp_store();
    let cert = Certificate::new("server/tool_name", "server", "T", "d", RiskProfile::default());
    store.save(cert).unwrap();
    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert!(entries.iter().any(|f| f == "server_tool_name.cert.json"));
}

#[test]
fn update_trust_persists_new_score() {
    let (_dir, store) = temp_store();
    let cert = Certificate::new("t1", "s1", "Tool", "desc", RiskProfile::default());
    store.save(cert).unwrap();

    let score = store.update_trust("t1", true).unwrap().unwrap();
    assert!((score - (2.0 / 3.0)).abs() < 1e-9);
    assert!((store.get("t1").unwrap().trust_score - (2.0 / 3.0)).abs() < 1e-9);
}

#[test]
fn update_trust_on_unknown_tool_is_none() {
    let (_dir, store) = temp_store();
    assert!(store.update_trust("nope", true).unwrap().is_none());
}

#[test]
fn is_trusted_and_is_signed_predicates() {
    let (_dir, store) = temp_store();
    let keypair = KeyPair::generate();
    let mut cert = Certificate::new("t1", "s1", "Tool", "desc", RiskProfile::default());
    cert.sign(&keypair).unwrap();
    store.save(cert).unwrap();

    assert!(store.is_signed("t1"));
    assert!(!store.is_trusted("t1", 0.6)); // still at the 0.5 prior
    store.update_trust("t1", true).unwrap();
    assert!(store.is_trusted("t1", 0.6));
}

#[test]
fn remove_deletes_file_and_cache_entry() {
    let (_dir, store) = temp_store();
    store
        .save(Certificate::new("t1", "s1", "Tool", "desc", RiskProfile::default()))
        .unwrap();
    assert!(store.remove("t1").unwrap());
    assert!(store.get("t1").is_none());
    assert!(!store.remove("t1").unwrap());
}

#[test]
fn summary_counts_signed_trusted_and_high_risk() {
    let (_dir, store) = temp_store();
    store
        .save(Certificate::new(
            "low",
            "s",
            "Low",
            "search docs",
            RiskProfile::from_tool_info("search", "search docs"),
        ))
        .unwrap();
    let mut critical = Certificate::new(
        "crit",
        "s",
        "Crit",
        "shell_exec",
        RiskProfile::from_tool_info("shell_exec", "run shell commands"),
    );
    critical.sign(&KeyPair::generate()).unwrap();
    store.save(critical).unwrap();

    let summary = store.summary();
    assert_eq!(summary.total_certificates, 2);
    assert_eq!(summary.signed, 1);
    assert_eq!(summary.high_risk, 1);
}

#[test]
fn tofu_first_sighting_emits_new_tool_alert() {
    let (_dir, store) = temp_store();
    let tofu = TofuChecker::new(&store);
    let alerts = tofu
        .check_tool("t", "T", "Search documents", "srv")
        .unwrap();
    assert_eq!(alerts.len(), 1);
    assert!(matches!(alerts[0].kind, TofuAlertKind::NewTool { risk_level: RiskLevel::Low }));
}

#[test]
fn tofu_risk_escalation_and_capability_change_both_fire() {
    let (_dir, store) = temp_store();
    let tofu = TofuChecker::new(&store);
    tofu.check_tool("t", "T", "Search documents", "srv").unwrap();

    let alerts = tofu
        .check_tool("t", "T", "Execute shell commands and read files", "srv")
        .unwrap();

    assert!(alerts.iter().any(|a| matches!(
        a.kind,
        TofuAlertKind::RiskEscalation { old_level: RiskLevel::Low, new_level: RiskLevel::Critical }
    )));
    let cap_change = alerts
        .iter()
        .find_map(|a| match &a.kind {
            TofuAlertKind::CapabilityChange { added } => Some(added.clone()),
            TofuAlertKind::NewTool { .. } | TofuAlertKind::RiskEscalation { .. } => None,
        })
        .expect("capability_change alert");
    assert!(cap_change.contains(&"shell".to_string()));
    assert!(cap_change.contains(&"filesystem".to_string()));
}

#[test]
fn tofu_does_not_silently_rebaseline_stored_risk_level() {
    let (_dir, store) = temp_store();
    let tofu = TofuChecker::new(&store);
    tofu.check_tool("t", "T", "Search documents", "srv").unwrap();
    tofu.check_tool("t", "T", "Execute shell commands", "srv")
        .unwrap();

    // The same escalation alert fires again on the next encounter, because
    // the stored baseline was never widened.
    let alerts = tofu
        .check_tool("t", "T", "Execute shell commands", "srv")
        .unwrap();
    assert!(alerts
        .iter()
        .any(|a| matches!(a.kind, TofuAlertKind::RiskEscalation { .. })));
    assert_eq!(tofu.baseline("t").unwrap().risk_profile.level, RiskLevel::Low);
}

#[test]
fn tofu_unchanged_tool_emits_no_alerts() {
    let (_dir, store) = temp_store();
    let tofu = TofuChecker::new(&store);
    tofu.check_tool("t", "T", "Search documents", "srv").unwrap();
    let alerts = tofu.check_tool("t", "T", "Search documents", "srv").unwrap();
    assert!(alerts.is_empty());
}

#[test]
fn reset_baseline_forgets_the_tool() {
    let (_dir, store) = temp_store();
    let tofu = TofuChecker::new(&store);
    tofu.check_tool("t", "T", "Search documents", "srv").unwrap();
    assert!(tofu.reset_baseline("t").unwrap());
    assert!(tofu.baseline("t").is_none());
}
