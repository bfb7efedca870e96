//! `jadegate cert list` — tabulate stored certificates.

use anyhow::Result;
use jadegate_config::Config;
use jadegate_trust::TrustStore;

use crate::theme::Theme;

fn risk_label(level: jadegate_trust::RiskLevel) -> &'static str {
    match level {
        jadegate_trust::RiskLevel::Low => "low",
        jadegate_trust::RiskLevel::Medium => "medium",
        jadegate_trust::RiskLevel::High => "high",
        jadegate_trust::RiskLevel::Critical => "critical",
        jadegate_trust::RiskLevel::Unknown => "unknown",
    }
}

pub(crate) fn list(config: &Config) -> Result<()> {
    let store = TrustStore::open(&config.trust_dir)?;
    let mut certs = store.list_all();
    certs.sort_by(|a, b| a.tool_id.cmp(&b.tool_id));

    if certs.is_empty() {
        println!(
            "{}",
            Theme::dimmed(&format!(
                "No certificates found in {}",
                config.trust_dir.display()
            ))
        );
        return Ok(());
    }

    println!(
        "{:<32} {:<10} {:<8} {:<8} {}",
        "TOOL ID", "RISK", "TRUST", "SIGNED", "LAST SEEN"
    );
    for cert in &certs {
        println!(
            "{:<32} {:<10} {:<8.2} {:<8} {}",
            cert.tool_id,
            risk_label(cert.risk_profile.level),
            cert.trust_score,
            if cert.signature.is_empty() { "no" } else { "yes" },
            cert.last_seen.format("%Y-%m-%d %H:%M"),
        );
    }

    Ok(())
}
