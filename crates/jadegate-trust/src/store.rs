//! [`TrustStore`]: a local, write-through cache of tool certificates
//! persisted one JSON file per tool under a trust directory.

use std::path::{Path, PathBuf};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::certificate::Certificate;
use crate::error::{TrustError, TrustResult};
use crate::risk::RiskLevel;

/// Default trust directory, `${HOME}/.jadegate/trust`. Independent of
/// `jadegate-policy`'s copy of the same default so this crate can be used
/// standalone; both resolve to the same path.
#[must_use]
pub fn default_trust_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".jadegate").join("trust"))
        .unwrap_or_else(|| PathBuf::from(".jadegate/trust"))
}

/// Aggregate counts over every certificate currently in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustSummary {
    /// Total number of certificates on file.
    pub total_certificates: usize,
    /// Number of certificates with a non-empty signature.
    pub signed: usize,
    /// Number of certificates at or above the default trust threshold (0.6).
    pub trusted: usize,
    /// Number of certificates whose risk level is `high` or `critical`.
    pub high_risk: usize,
    /// The trust directory this summary was computed from.
    pub trust_dir: PathBuf,
}

const DEFAULT_TRUST_THRESHOLD: f64 = 0.6;

/// Local certificate store. One JSON document per tool, keyed by a
/// filesystem-safe rendering of its `tool_id`. An in-memory cache is
/// populated on open and kept in sync with every write-through save.
#[derive(Debug)]
pub struct TrustStore {
    trust_dir: PathBuf,
    cache: DashMap<String, Certificate>,
}

impl TrustStore {
    /// Open (creating if absent) a trust store at `trust_dir`, loading every
    /// `*.cert.json` file found there into the in-memory cache.
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::Io`] if `trust_dir` cannot be created.
    pub fn open(trust_dir: impl Into<PathBuf>) -> TrustResult<Self> {
        let trust_dir = trust_dir.into();
        std::fs::create_dir_all(&trust_dir).map_err(|source| TrustError::Io {
            path: trust_dir.clone(),
            source,
        })?;
        let store = Self {
            trust_dir,
            cache: DashMap::new(),
        };
        store.load_all();
        Ok(store)
    }

    /// Open the store at the default trust directory.
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::Io`] if the default trust directory cannot be
    /// created.
    pub fn open_default() -> TrustResult<Self> {
        Self::open(default_trust_dir())
    }

    fn load_all(&self) {
        let Ok(entries) = std::fs::read_dir(&self.trust_dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if path
                .file_name()
                .and_then(|n| n.to_str())
                .is_none_or(|n| !n.ends_with(".cert.json"))
            {
                continue;
            }
            match std::fs::read_to_string(&path) {
                Ok(text) => match serde_json::from_str::<Certificate>(&text) {
                    Ok(cert) => {
                        self.cache.insert(cert.tool_id.clone(), cert);
                    }
                    Err(source) => {
                        tracing::warn!(path = %path.display(), error = %source, "failed to parse certificate, skipping");
                    }
                },
                Err(source) => {
                    tracing::warn!(path = %path.display(), error = %source, "failed to read certificate, skipping");
                }
            }
        }
    }

    fn cert_path(&self, tool_id: &str) -> PathBuf {
        let safe_id = tool_id.replace(['/', '\\'], "_");
        self.trust_dir.join(format!("{safe_id}.cert.json"))
    }

    /// Look up a certificate by tool id, from the in-memory cache.
    #[must_use]
    pub fn get(&self, tool_id: &str) -> Option<Certificate> {
        self.cache.get(tool_id).map(|c| c.clone())
    }

    /// Persist a certificate to disk (temp-file + rename, to avoid torn
    /// reads from a concurrent reader) and update the cache.
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::Io`] on any filesystem failure, or
    /// [`TrustError::Parse`] if the certificate cannot be serialized.
    pub fn save(&self, cert: Certificate) -> TrustResult<()> {
        let path = self.cert_path(&cert.tool_id);
        let text = serde_json::to_string_pretty(&cert).map_err(|source| TrustError::Parse {
            path: path.clone(),
            source,
        })?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.trust_dir).map_err(|source| {
            TrustError::Io {
                path: self.trust_dir.clone(),
                source,
            }
        })?;
        use std::io::Write;
        tmp.write_all(text.as_bytes())
            .map_err(|source| TrustError::Io {
                path: path.clone(),
                source,
            })?;
        tmp.persist(&path).map_err(|e| TrustError::Io {
            path: path.clone(),
            source: e.error,
        })?;

        tracing::debug!(tool_id = %cert.tool_id, path = %path.display(), "saved certificate");
        self.cache.insert(cert.tool_id.clone(), cert);
        Ok(())
    }

    /// Remove a certificate from disk and cache. Returns `true` if one was
    /// present.
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::Io`] if the file exists but cannot be removed.
    pub fn remove(&self, tool_id: &str) -> TrustResult<bool> {
        self.cache.remove(tool_id);
        let path = self.cert_path(tool_id);
        if path.exists() {
            std::fs::remove_file(&path).map_err(|source| TrustError::Io { path, source })?;
            return Ok(true);
        }
        Ok(false)
    }

    /// All certificates currently in the store.
    #[must_use]
    pub fn list_all(&self) -> Vec<Certificate> {
        self.cache.iter().map(|e| e.value().clone()).collect()
    }

    /// Is this tool trusted? True iff a certificate exists with
    /// `trust_score >= min_score`.
    #[must_use]
    pub fn is_trusted(&self, tool_id: &str, min_score: f64) -> bool {
        self.get(tool_id)
            .is_some_and(|c| c.trust_score >= min_score)
    }

    /// Does this tool have a signed certificate?
    #[must_use]
    pub fn is_signed(&self, tool_id: &str) -> bool {
        self.get(tool_id).is_some_and(|c| !c.signature.is_empty())
    }

    /// Apply a Bayesian trust update to a tool's certificate and persist it.
    /// Returns the new score, or `None` if no certificate exists for
    /// `tool_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::Io`]/[`TrustError::Parse`] if the updated
    /// certificate cannot be persisted. In-memory state is updated
    /// regardless (a failed persist doesn't roll back the score).
    pub fn update_trust(&self, tool_id: &str, success: bool) -> TrustResult<Option<f64>> {
        let Some(mut cert) = self.get(tool_id) else {
            return Ok(None);
        };
        let score = cert.update_trust(success);
        self.save(cert)?;
        Ok(Some(score))
    }

    /// Aggregate counts over the current store contents.
    #[must_use]
    pub fn summary(&self) -> TrustSummary {
        let total = self.cache.len();
        let mut signed = 0;
        let mut trusted = 0;
        let mut high_risk = 0;
        for entry in &self.cache {
            let cert = entry.value();
            if !cert.signature.is_empty() {
                signed = signed.saturating_add(1);
            }
            if cert.trust_score >= DEFAULT_TRUST_THRESHOLD {
                trusted = trusted.saturating_add(1);
            }
            if matches!(cert.risk_profile.level, RiskLevel::High | RiskLevel::Critical) {
                high_risk = high_risk.saturating_add(1);
            }
        }
        TrustSummary {
            total_certificates: total,
            signed,
            trusted,
            high_risk,
            trust_dir: self.trust_dir.clone(),
        }
    }

    /// The trust directory this store was opened against.
    #[must_use]
    pub fn trust_dir(&self) -> &Path {
        &self.trust_dir
    }
}
