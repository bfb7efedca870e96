//! `jadegate status` — a point-in-time snapshot of the trust store and
//! which policy-driven checks are active, without running a proxy.

use anyhow::Result;
use jadegate_config::Config;
use jadegate_policy::Policy;
use jadegate_trust::TrustStore;

use crate::theme::Theme;

pub(crate) fn run(config: &Config) -> Result<()> {
    println!("{}", Theme::header("JadeGate status"));
    println!();

    println!("{}", Theme::dimmed("Configuration"));
    println!("  Trust directory:   {}", config.trust_dir.display());
    println!(
        "  Policy file:       {}",
        config
            .policy_path
            .as_ref()
            .map_or_else(|| "(default policy, no file)".to_string(), |p| p.display().to_string())
    );
    println!(
        "  Audit log:         {}",
        config
            .audit_log_path
            .as_ref()
            .map_or_else(|| "(in-memory only)".to_string(), |p| p.display().to_string())
    );
    println!("  Log level/format:  {}/{}", config.log_level, config.log_format);
    println!("  Upstream timeout:  {}s", config.default_timeout_secs);
    println!();

    let policy = match &config.policy_path {
        Some(path) if path.exists() => Policy::from_file(path)?,
        _ => Policy::default(),
    };
    println!("{}", Theme::dimmed("Active checks"));
    print_toggle("Dangerous-pattern scan", policy.enable_dangerous_pattern_scan);
    print_toggle("Audit log", policy.enable_audit_log);
    println!("  Blocked actions:   {}", policy.blocked_actions.join(", "));
    println!("  Approval required: {}", policy.approval_required.join(", "));
    println!(
        "  Breaker threshold: {} failures / {}s cooldown",
        policy.breaker_threshold, policy.breaker_timeout_sec
    );
    println!("  Max call depth:    {}", policy.max_call_depth);
    println!();

    let store = TrustStore::open(&config.trust_dir)?;
    let summary = store.summary();
    println!("{}", Theme::dimmed("Trust store"));
    println!("  Directory:         {}", summary.trust_dir.display());
    println!("  Certificates:      {}", summary.total_certificates);
    println!("  Signed:            {}", summary.signed);
    println!("  Trusted (>=0.6):   {}", summary.trusted);
    println!("  High/critical risk:{}", summary.high_risk);
    println!();

    Ok(())
}

fn print_toggle(label: &str, enabled: bool) {
    let state = if enabled {
        Theme::success("enabled")
    } else {
        Theme::warning("disabled")
    };
    println!("  {label:<18} {state}");
}
