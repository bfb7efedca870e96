//! The declarative [`Policy`] value object and its predicates.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use globset::Glob;
use serde::{Deserialize, Serialize};

use crate::error::{PolicyError, PolicyResult};

/// Which direction a file-path check is being made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    /// Reading a file.
    Read,
    /// Writing a file.
    Write,
}

/// A declarative, immutable-after-construction security policy.
///
/// All fields are plain data: blocked tool names, host allow/deny lists,
/// file glob patterns, and numeric limits. `Policy` never reaches the
/// filesystem or network on its own behalf except through [`Policy::from_file`]
/// and [`Policy::save`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    /// Host patterns that are permitted (`*`, exact host, or `*.suffix`).
    #[serde(default)]
    pub network_allowlist: Vec<String>,

    /// Hosts that are always refused, regardless of the allowlist.
    #[serde(default = "default_network_blocklist")]
    pub network_blocklist: Vec<String>,

    /// Glob patterns of paths permitted for reads. Empty means "allow all
    /// except blocklist".
    #[serde(default)]
    pub file_read_allow: Vec<String>,

    /// Glob patterns of paths permitted for writes. Empty means "allow all
    /// except blocklist".
    #[serde(default)]
    pub file_write_allow: Vec<String>,

    /// Substring/glob patterns for paths that are always denied.
    #[serde(default = "default_file_blocklist")]
    pub file_blocklist: Vec<String>,

    /// Tool names that are always denied.
    #[serde(default = "default_blocked_actions")]
    pub blocked_actions: Vec<String>,

    /// Tool names that require out-of-band human approval.
    #[serde(default = "default_approval_required")]
    pub approval_required: Vec<String>,

    /// File extensions (including the leading dot, case-folded) allowed
    /// for uploads. Empty means "allow all".
    #[serde(default = "default_upload_ext_allowlist")]
    pub upload_ext_allowlist: Vec<String>,

    /// Soft rate limit, informational to the DAG's reserved rapid-fire detector.
    #[serde(default = "default_max_calls_per_minute")]
    pub max_calls_per_minute: u32,

    /// Maximum call-chain depth before the DAG's depth detector fires.
    #[serde(default = "default_max_call_depth")]
    pub max_call_depth: u32,

    /// Consecutive failures before a tool's breaker trips to OPEN.
    #[serde(default = "default_breaker_threshold")]
    pub breaker_threshold: u32,

    /// Seconds an OPEN breaker waits before allowing a HALF_OPEN probe.
    #[serde(default = "default_breaker_timeout_sec")]
    pub breaker_timeout_sec: f64,

    /// Whether the interceptor's dangerous-pattern parameter scan runs.
    #[serde(default = "default_true")]
    pub enable_dangerous_pattern_scan: bool,

    /// Whether the session keeps an audit log.
    #[serde(default = "default_true")]
    pub enable_audit_log: bool,
}

fn default_network_blocklist() -> Vec<String> {
    vec![
        "169.254.169.254".to_string(),
        "metadata.google.internal".to_string(),
    ]
}

fn default_file_blocklist() -> Vec<String> {
    vec![
        "/etc/shadow".to_string(),
        "/etc/passwd".to_string(),
        "~/.ssh/id_".to_string(),
        "~/.gnupg/".to_string(),
        "~/.aws/credentials".to_string(),
        "~/.config/gcloud".to_string(),
    ]
}

fn default_blocked_actions() -> Vec<String> {
    vec![
        "shell_exec".to_string(),
        "process_spawn".to_string(),
        "kernel_module".to_string(),
    ]
}

fn default_approval_required() -> Vec<String> {
    vec![
        "email_send".to_string(),
        "git_push".to_string(),
        "file_delete".to_string(),
    ]
}

fn default_upload_ext_allowlist() -> Vec<String> {
    [
        ".json", ".txt", ".md", ".csv", ".yaml", ".yml", ".png", ".jpg", ".jpeg", ".gif", ".svg",
        ".pdf",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

const fn default_max_calls_per_minute() -> u32 {
    60
}
const fn default_max_call_depth() -> u32 {
    20
}
const fn default_breaker_threshold() -> u32 {
    5
}
const fn default_breaker_timeout_sec() -> f64 {
    60.0
}
const fn default_true() -> bool {
    true
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            network_allowlist: Vec::new(),
            network_blocklist: default_network_blocklist(),
            file_read_allow: Vec::new(),
            file_write_allow: Vec::new(),
            file_blocklist: default_file_blocklist(),
            blocked_actions: default_blocked_actions(),
            approval_required: default_approval_required(),
            upload_ext_allowlist: default_upload_ext_allowlist(),
            max_calls_per_minute: default_max_calls_per_minute(),
            max_call_depth: default_max_call_depth(),
            breaker_threshold: default_breaker_threshold(),
            breaker_timeout_sec: default_breaker_timeout_sec(),
            enable_dangerous_pattern_scan: true,
            enable_audit_log: true,
        }
    }
}

/// Wrapper matching the on-disk schema: `{"jadegate_policy": { ... }}`.
#[derive(Debug, Serialize, Deserialize)]
struct PolicyFile {
    jadegate_policy: Policy,
}

impl Policy {
    /// Sensible defaults. Identical to [`Policy::default`]; kept as an
    /// explicit constructor to mirror the three named presets.
    #[must_use]
    pub fn default_preset() -> Self {
        Self::default()
    }

    /// A permissive policy: still blocks `kernel_module`, but otherwise
    /// allows network and filesystem access and raises the rate limits.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            network_allowlist: vec!["*".to_string()],
            file_read_allow: vec!["*".to_string()],
            file_write_allow: vec!["*".to_string()],
            blocked_actions: vec!["kernel_module".to_string()],
            approval_required: Vec::new(),
            max_calls_per_minute: 300,
            max_call_depth: 50,
            ..Self::default()
        }
    }

    /// A strict lockdown policy: empty allowlists, a wider blocked-action
    /// set, and a lower breaker threshold.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            network_allowlist: Vec::new(),
            file_read_allow: Vec::new(),
            file_write_allow: Vec::new(),
            blocked_actions: vec![
                "shell_exec".to_string(),
                "process_spawn".to_string(),
                "kernel_module".to_string(),
                "file_delete".to_string(),
                "file_write".to_string(),
                "http_post".to_string(),
            ],
            approval_required: vec![
                "http_get".to_string(),
                "file_read".to_string(),
                "email_send".to_string(),
                "git_push".to_string(),
            ],
            max_calls_per_minute: 20,
            max_call_depth: 10,
            breaker_threshold: 3,
            ..Self::default()
        }
    }

    /// Load a policy from a JSON file wrapping the fields under the
    /// `jadegate_policy` key.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::Io`] or [`PolicyError::Parse`] on failure.
    pub fn from_file(path: impl AsRef<Path>) -> PolicyResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let wrapped: PolicyFile = serde_json::from_str(&text)?;
        Ok(wrapped.jadegate_policy)
    }

    /// Persist this policy to a JSON file, creating parent directories as
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::Io`] or [`PolicyError::Parse`] on failure.
    pub fn save(&self, path: impl AsRef<Path>) -> PolicyResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let wrapped = PolicyFile {
            jadegate_policy: self.clone(),
        };
        let text = serde_json::to_string_pretty(&wrapped)?;
        std::fs::write(path, text)?;
        tracing::info!(path = %path.display(), "policy saved");
        Ok(())
    }

    /// Is this tool name always denied?
    #[must_use]
    pub fn is_action_blocked(&self, action: &str) -> bool {
        self.blocked_actions.iter().any(|a| a == action)
    }

    /// Does this tool name require out-of-band human approval?
    #[must_use]
    pub fn needs_approval(&self, action: &str) -> bool {
        self.approval_required.iter().any(|a| a == action)
    }

    /// Blocklist-first domain predicate: a blocked host (exact match or a
    /// subdomain of one) is always denied. An empty allowlist permits
    /// everything else; otherwise the host must match `"*"`, an exact
    /// entry, or a `"*.suffix"` pattern.
    #[must_use]
    pub fn is_domain_allowed(&self, host: &str) -> bool {
        for blocked in &self.network_blocklist {
            if host == blocked || host.ends_with(&format!(".{blocked}")) {
                return false;
            }
        }
        if self.network_allowlist.is_empty() {
            return true;
        }
        for allowed in &self.network_allowlist {
            if allowed == "*" || host == allowed {
                return true;
            }
            if let Some(suffix) = allowed.strip_prefix('*') {
                if host.ends_with(suffix) {
                    return true;
                }
            }
        }
        false
    }

    /// File-path predicate: user-home expansion and `${VAR}` environment
    /// substitution happen first; the blocklist (glob match or substring
    /// containment) always wins; then an empty mode-appropriate allowlist
    /// permits everything else, otherwise the path must match `"*"` or a
    /// glob pattern in that allowlist.
    #[must_use]
    pub fn is_file_path_allowed(&self, path: &str, mode: FileMode) -> bool {
        let expanded = expand_path(path);

        for pattern in &self.file_blocklist {
            let pattern_expanded = expand_path(pattern);
            if glob_match(&pattern_expanded, &expanded) || expanded.contains(&pattern_expanded) {
                return false;
            }
        }

        let allowlist = match mode {
            FileMode::Read => &self.file_read_allow,
            FileMode::Write => &self.file_write_allow,
        };
        if allowlist.is_empty() {
            return true;
        }
        for allowed in allowlist {
            if allowed == "*" {
                return true;
            }
            if glob_match(&expand_path(allowed), &expanded) {
                return true;
            }
        }
        false
    }

    /// Upload predicate: the case-folded extension must be in the
    /// allowlist, or the allowlist is empty.
    #[must_use]
    pub fn is_upload_allowed(&self, filename: &str) -> bool {
        if self.upload_ext_allowlist.is_empty() {
            return true;
        }
        let ext = Path::new(filename)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()));
        match ext {
            Some(ext) => self.upload_ext_allowlist.iter().any(|a| *a == ext),
            None => false,
        }
    }

    /// Merge `override_policy` on top of `self`: list fields are unioned
    /// with order-preserving de-duplication; scalar fields take the
    /// override's value only if it differs from [`Policy::default`]'s value
    /// for that field, otherwise the base value is kept.
    #[must_use]
    pub fn merge(&self, override_policy: &Policy) -> Policy {
        let default = Policy::default();

        fn union(base: &[String], over: &[String]) -> Vec<String> {
            let mut seen = HashMap::new();
            let mut out = Vec::new();
            for item in base.iter().chain(over.iter()) {
                if seen.insert(item.clone(), ()).is_none() {
                    out.push(item.clone());
                }
            }
            out
        }

        Policy {
            network_allowlist: union(&self.network_allowlist, &override_policy.network_allowlist),
            network_blocklist: union(&self.network_blocklist, &override_policy.network_blocklist),
            file_read_allow: union(&self.file_read_allow, &override_policy.file_read_allow),
            file_write_allow: union(&self.file_write_allow, &override_policy.file_write_allow),
            file_blocklist: union(&self.file_blocklist, &override_policy.file_blocklist),
            blocked_actions: union(&self.blocked_actions, &override_policy.blocked_actions),
            approval_required: union(&self.approval_required, &override_policy.approval_required),
            upload_ext_allowlist: union(
                &self.upload_ext_allowlist,
                &override_policy.upload_ext_allowlist,
            ),
            max_calls_per_minute: pick_scalar(
                self.max_calls_per_minute,
                override_policy.max_calls_per_minute,
                default.max_calls_per_minute,
            ),
            max_call_depth: pick_scalar(
                self.max_call_depth,
                override_policy.max_call_depth,
                default.max_call_depth,
            ),
            breaker_threshold: pick_scalar(
                self.breaker_threshold,
                override_policy.breaker_threshold,
                default.breaker_threshold,
            ),
            breaker_timeout_sec: pick_scalar(
                self.breaker_timeout_sec,
                override_policy.breaker_timeout_sec,
                default.breaker_timeout_sec,
            ),
            enable_dangerous_pattern_scan: pick_scalar(
                self.enable_dangerous_pattern_scan,
                override_policy.enable_dangerous_pattern_scan,
                default.enable_dangerous_pattern_scan,
            ),
            enable_audit_log: pick_scalar(
                self.enable_audit_log,
                override_policy.enable_audit_log,
                default.enable_audit_log,
            ),
        }
    }
}

fn pick_scalar<T: PartialEq + Copy>(base: T, over: T, default: T) -> T {
    if over != default { over } else { base }
}

/// Expand a leading `~` to the user's home directory and substitute any
/// `${VAR}` environment references. Best-effort: unresolvable references
/// are left untouched rather than failing the predicate.
fn expand_path(path: &str) -> String {
    let home_expanded = if let Some(rest) = path.strip_prefix('~') {
        directories::UserDirs::new()
            .map(|dirs| format!("{}{}", dirs.home_dir().display(), rest))
            .unwrap_or_else(|| path.to_string())
    } else {
        path.to_string()
    };
    substitute_env_vars(&home_expanded)
}

fn substitute_env_vars(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c == '$' && input[i..].starts_with("${") {
            if let Some(end) = input[i..].find('}') {
                let name = &input[i + 2..i + end];
                if let Ok(value) = std::env::var(name) {
                    out.push_str(&value);
                } else {
                    out.push_str(&input[i..=i + end]);
                }
                for _ in 0..end {
                    chars.next();
                }
                continue;
            }
        }
        out.push(c);
    }
    out
}

fn glob_match(pattern: &str, candidate: &str) -> bool {
    Glob::new(pattern)
        .map(|g| g.compile_matcher().is_match(candidate))
        .unwrap_or(false)
}

/// Compile a user-supplied glob pattern, surfacing a typed error instead of
/// silently treating malformed patterns as non-matching. Used by policy
/// validation tooling (e.g. `policy show`); the hot predicate path above
/// intentionally treats a bad pattern as "does not match" rather than
/// failing a security check.
pub fn validate_glob(pattern: &str) -> PolicyResult<()> {
    Glob::new(pattern).map(|_| ()).map_err(|source| PolicyError::InvalidGlob {
        pattern: pattern.to_string(),
        source,
    })
}

/// Default filesystem-independent trust directory, `${HOME}/.jadegate/trust`.
#[must_use]
pub fn default_trust_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".jadegate").join("trust"))
        .unwrap_or_else(|| PathBuf::from(".jadegate/trust"))
}
