//! Trust-on-first-use: pin a tool's capability baseline on first sighting,
//! alert on deviation thereafter.
//!
//! Stateless around the [`TrustStore`] it's handed — all baseline state
//! lives in the store's certificates, not in the checker itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::certificate::Certificate;
use crate::error::TrustResult;
use crate::risk::{RiskLevel, RiskProfile};
use crate::store::TrustStore;

/// What kind of deviation a [`TofuAlert`] is reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "alert_type", rename_all = "snake_case")]
pub enum TofuAlertKind {
    /// First time this tool id has ever been seen.
    NewTool {
        /// The risk level assigned to the freshly baselined certificate.
        risk_level: RiskLevel,
    },
    /// The tool's recomputed risk level is strictly higher than the
    /// baseline's. The baseline itself is *not* rewritten (see
    /// `jadegate-trust`'s module docs on the no-silent-rebaseline policy).
    RiskEscalation {
        /// The level recorded in the existing certificate.
        old_level: RiskLevel,
        /// The level just computed from current tool metadata.
        new_level: RiskLevel,
    },
    /// The tool's recomputed capability set contains tags the baseline
    /// never had.
    CapabilityChange {
        /// Capability tags present now but absent from the baseline.
        added: Vec<String>,
    },
}

/// An alert raised when a tool's observed behavior deviates from its
/// stored baseline, or when a tool is seen for the very first time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TofuAlert {
    /// The tool id this alert concerns.
    pub tool_id: String,
    /// What kind of deviation this is.
    pub kind: TofuAlertKind,
    /// Human-readable summary.
    pub message: String,
    /// When the alert was raised.
    pub timestamp: DateTime<Utc>,
}

/// Checks tools against their stored trust baseline, creating one on
/// first sighting.
pub struct TofuChecker<'a> {
    store: &'a TrustStore,
}

impl<'a> TofuChecker<'a> {
    /// Wrap a trust store for baseline lookups and updates.
    #[must_use]
    pub fn new(store: &'a TrustStore) -> Self {
        Self { store }
    }

    /// Check one tool's current metadata against its stored baseline.
    ///
    /// On first encounter (no certificate for `tool_id`), a fresh
    /// certificate is stored from the heuristic risk profile and a single
    /// `new_tool` alert is returned. On later encounters, the recomputed
    /// profile is compared against the stored one: a strictly higher risk
    /// level yields a `risk_escalation` alert, and any capability present
    /// now but absent from the baseline yields a `capability_change`
    /// alert. Neither alert rewrites the stored risk profile — widening a
    /// baseline is an explicit operator action, not an automatic one — but
    /// `last_seen` is always refreshed and the certificate re-saved.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::TrustError`] if persisting the certificate fails.
    pub fn check_tool(
        &self,
        tool_id: &str,
        name: &str,
        description: &str,
        server_id: &str,
    ) -> TrustResult<Vec<TofuAlert>> {
        let mut alerts = Vec::new();
        let now = Utc::now();

        match self.store.get(tool_id) {
            None => {
                let risk = RiskProfile::from_tool_info(name, description);
                let display_name = if name.is_empty() { tool_id } else { name };
                let cert = Certificate::new(
                    tool_id,
                    server_id,
                    display_name,
                    description,
                    risk.clone(),
                );
                self.store.save(cert)?;

                alerts.push(TofuAlert {
                    tool_id: tool_id.to_string(),
                    kind: TofuAlertKind::NewTool {
                        risk_level: risk.level,
                    },
                    message: format!(
                        "New tool '{display_name}' seen for the first time (risk: {})",
                        risk.level
                    ),
                    timestamp: now,
                });
                tracing::info!(tool_id, risk = %risk.level, "TOFU: new tool baselined");
            }
            Some(mut existing) => {
                let new_risk = RiskProfile::from_tool_info(name, description);
                let old_level = existing.risk_profile.level;

                if new_risk.level.rank() > old_level.rank() {
                    alerts.push(TofuAlert {
                        tool_id: tool_id.to_string(),
                        kind: TofuAlertKind::RiskEscalation {
                            old_level,
                            new_level: new_risk.level,
                        },
                        message: format!(
                            "Tool '{tool_id}' risk escalated: {old_level} -> {}",
                            new_risk.level
                        ),
                        timestamp: now,
                    });
                    tracing::warn!(tool_id, %old_level, new_level = %new_risk.level, "TOFU: risk escalation");
                }

                let added: Vec<String> = new_risk
                    .capabilities
                    .iter()
                    .filter(|c| !existing.risk_profile.capabilities.contains(c))
                    .cloned()
                    .collect();
                if !added.is_empty() {
                    alerts.push(TofuAlert {
                        tool_id: tool_id.to_string(),
                        kind: TofuAlertKind::CapabilityChange {
                            added: added.clone(),
                        },
                        message: format!("Tool '{tool_id}' gained new capabilities: {added:?}"),
                        timestamp: now,
                    });
                    tracing::warn!(tool_id, ?added, "TOFU: new capabilities observed");
                }

                existing.last_seen = now;
                self.store.save(existing)?;
            }
        }

        Ok(alerts)
    }

    /// The stored baseline certificate for a tool, if any.
    #[must_use]
    pub fn baseline(&self, tool_id: &str) -> Option<Certificate> {
        self.store.get(tool_id)
    }

    /// Forget a tool's baseline so the next [`TofuChecker::check_tool`]
    /// re-establishes it from scratch. Returns `true` if one was removed.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::TrustError`] if the certificate file exists but
    /// cannot be removed.
    pub fn reset_baseline(&self, tool_id: &str) -> TrustResult<bool> {
        self.store.remove(tool_id)
    }
}
