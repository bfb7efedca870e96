//! The [`Config`] value object.

use std::path::PathBuf;

use jadegate_telemetry::LogFormat;
use serde::{Deserialize, Serialize};

/// Ambient runtime configuration: logging, where the trust store and
/// policy file live, and the default upstream response timeout. This is
/// deliberately narrower than a per-workspace build config — JadeGate
/// has no project-local tier, only embedded defaults, one user file,
/// environment variables, and whatever a binary's CLI flags override
/// last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `tracing` level filter, e.g. `"info"`, `"debug"`.
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormat,
    /// Directory holding one `<tool_id>.cert.json` file per tool.
    pub trust_dir: PathBuf,
    /// Optional path to a policy JSON file. `None` means use
    /// [`jadegate_policy::Policy::default`] with no file on disk.
    pub policy_path: Option<PathBuf>,
    /// Optional path to an append-only JSON-lines audit log. `None`
    /// means the audit trail stays in memory only, even when
    /// `Policy::enable_audit_log` is set.
    pub audit_log_path: Option<PathBuf>,
    /// Default upstream response timeout, in seconds.
    pub default_timeout_secs: f64,
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Default trust directory, `${HOME}/.jadegate/trust`.
#[must_use]
pub fn default_trust_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".jadegate").join("trust"))
        .unwrap_or_else(|| PathBuf::from(".jadegate/trust"))
}

/// Default path JadeGate looks for a user config file at,
/// `${HOME}/.jadegate/config.toml`.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".jadegate").join("config.toml"))
}

const fn default_timeout_secs() -> f64 {
    10.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            trust_dir: default_trust_dir(),
            policy_path: None,
            audit_log_path: None,
            default_timeout_secs: default_timeout_secs(),
        }
    }
}

/// On-disk shape of a user config file: the same fields, all optional,
/// so a file only needs to mention what it overrides.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ConfigFile {
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub trust_dir: Option<PathBuf>,
    pub policy_path: Option<PathBuf>,
    pub audit_log_path: Option<PathBuf>,
    pub default_timeout_secs: Option<f64>,
}

impl Config {
    fn apply_file(&mut self, file: ConfigFile) {
        if let Some(v) = file.log_level {
            self.log_level = v;
        }
        if let Some(v) = file.log_format {
            self.log_format = v;
        }
        if let Some(v) = file.trust_dir {
            self.trust_dir = v;
        }
        if file.policy_path.is_some() {
            self.policy_path = file.policy_path;
        }
        if file.audit_log_path.is_some() {
            self.audit_log_path = file.audit_log_path;
        }
        if let Some(v) = file.default_timeout_secs {
            self.default_timeout_secs = v;
        }
    }

    pub(crate) fn merge_file(mut self, file: ConfigFile) -> Self {
        self.apply_file(file);
        self
    }
}
