//! [`Certificate`]: a signed, persisted trust record for one tool.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use jadegate_crypto::{KeyPair, PublicKey, Signature};

use crate::error::{TrustError, TrustResult};
use crate::risk::RiskProfile;

/// A certificate is a local, signable record of what a tool is
/// believed to be capable of and how trustworthy it has been so far.
/// Loosely analogous to an X.509 certificate, but scoped to a single
/// tool and entirely local — nothing here is a certificate authority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certificate {
    /// Stable identifier for the tool (often `server_id/tool_name`).
    pub tool_id: String,
    /// Id of the MCP server (or equivalent) that exposes this tool.
    #[serde(default)]
    pub server_id: String,
    /// Human-readable name.
    #[serde(default)]
    pub display_name: String,
    /// Human-readable description, as advertised by the tool.
    #[serde(default)]
    pub description: String,
    /// Capability/risk assessment.
    #[serde(default)]
    pub risk_profile: RiskProfile,
    /// Bayesian trust score in `[0, 1]`, Laplace-smoothed.
    #[serde(default = "default_trust_score")]
    pub trust_score: f64,
    /// Total successful calls recorded.
    #[serde(default)]
    pub success_count: u64,
    /// Total failed calls recorded.
    #[serde(default)]
    pub failure_count: u64,
    /// When this certificate was first created.
    #[serde(default = "Utc::now")]
    pub first_seen: DateTime<Utc>,
    /// When this certificate was last updated.
    #[serde(default = "Utc::now")]
    pub last_seen: DateTime<Utc>,
    /// Fingerprint of the signer's public key, if signed.
    #[serde(default)]
    pub signed_by: String,
    /// Base64 Ed25519 signature over the signable content, if signed.
    #[serde(default)]
    pub signature: String,
    /// Certificate schema version.
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_trust_score() -> f64 {
    0.5
}

fn default_version() -> String {
    "1.0".to_string()
}

/// The subset of a certificate's fields that participate in signing
/// and fingerprinting. Excludes trust-score/counters/signature, which
/// change independently of what the certificate attests to.
#[derive(Debug, Serialize)]
struct SignableContent<'a> {
    tool_id: &'a str,
    server_id: &'a str,
    display_name: &'a str,
    risk_profile: &'a RiskProfile,
    version: &'a str,
}

impl Certificate {
    /// Create a fresh, unsigned certificate with a `0.5` trust prior.
    #[must_use]
    pub fn new(
        tool_id: impl Into<String>,
        server_id: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
        risk_profile: RiskProfile,
    ) -> Self {
        let now = Utc::now();
        Self {
            tool_id: tool_id.into(),
            server_id: server_id.into(),
            display_name: display_name.into(),
            description: description.into(),
            risk_profile,
            trust_score: default_trust_score(),
            success_count: 0,
            failure_count: 0,
            first_seen: now,
            last_seen: now,
            signed_by: String::new(),
            signature: String::new(),
            version: default_version(),
        }
    }

    fn signable_json(&self) -> TrustResult<String> {
        let content = SignableContent {
            tool_id: &self.tool_id,
            server_id: &self.server_id,
            display_name: &self.display_name,
            risk_profile: &self.risk_profile,
            version: &self.version,
        };
        // `serde_json::Map` is BTreeMap-backed by default, so round-tripping
        // through `Value` yields keys in sorted order with compact
        // separators — the same canonical form the reference signs over.
        let value = serde_json::to_value(&content).map_err(|source| TrustError::Parse {
            path: std::path::PathBuf::from(format!("<signable:{}>", self.tool_id)),
            source,
        })?;
        serde_json::to_string(&value).map_err(|source| TrustError::Parse {
            path: std::path::PathBuf::from(format!("<signable:{}>", self.tool_id)),
            source,
        })
    }

    /// Compute the SHA-256 fingerprint of this certificate's signable
    /// content, truncated to its first 32 hex characters.
    pub fn compute_fingerprint(&self) -> TrustResult<String> {
        let json = self.signable_json()?;
        let digest = Sha256::digest(json.as_bytes());
        let hex = hex::encode(digest);
        Ok(hex[..32].to_string())
    }

    /// Sign this certificate's signable content with `key_pair`, setting
    /// `signature` and `signed_by` (the signer's public-key fingerprint).
    pub fn sign(&mut self, key_pair: &KeyPair) -> TrustResult<()> {
        let json = self.signable_json()?;
        let signature = key_pair.sign(json.as_bytes());
        self.signature = signature.to_base64();
        self.signed_by = key_pair.export_public_key().key_id_hex();
        Ok(())
    }

    /// Verify this certificate's signature against `public_key`. Returns
    /// `false` (not an error) if the certificate is unsigned or the
    /// signature doesn't verify.
    #[must_use]
    pub fn verify(&self, public_key: &PublicKey) -> bool {
        if self.signature.is_empty() {
            return false;
        }
        let Ok(json) = self.signable_json() else {
            return false;
        };
        let Ok(signature) = Signature::from_base64(&self.signature) else {
            return false;
        };
        public_key.verify(json.as_bytes(), &signature).is_ok()
    }

    /// Bayesian (Laplace-smoothed) trust update: `score = (successes +
    /// 1) / (successes + failures + 2)`. Returns the new score.
    pub fn update_trust(&mut self, success: bool) -> f64 {
        if success {
            self.success_count = self.success_count.saturating_add(1);
        } else {
            self.failure_count = self.failure_count.saturating_add(1);
        }
        let alpha = self.success_count as f64 + 1.0;
        let beta = self.failure_count as f64 + 1.0;
        self.trust_score = alpha / (alpha + beta);
        self.last_seen = Utc::now();
        self.trust_score
    }
}
