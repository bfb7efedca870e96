//! Append-only JSON-lines audit sink.
//!
//! Sessions always keep their audit trail in memory (see
//! `jadegate_interceptor::AuditEntry`). This sink is the optional
//! on-disk half: when `Policy::enable_audit_log` and a configured
//! `audit_log_path` are both set, every entry is additionally appended
//! here as one JSON object per line, so a long-running proxy doesn't
//! lose its trail on an ungraceful exit.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;

use crate::error::{TelemetryError, TelemetryResult};

/// An append-only JSON-lines file sink. Safe to share across tasks: each
/// write takes a lock around the underlying file handle, matching the
/// session's own single-writer discipline one layer up.
pub struct AuditSink {
    path: PathBuf,
    file: Mutex<std::fs::File>,
}

impl AuditSink {
    /// Open (creating, including parent directories, if absent) an
    /// append-only audit log at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::Io`] if the parent directory or file
    /// cannot be created.
    pub fn open(path: impl Into<PathBuf>) -> TelemetryResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// The path this sink appends to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record as a single minified JSON line.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::Io`] if the write fails. A poisoned
    /// lock (a prior panic while holding it) is treated the same way
    /// rather than propagating the panic to this caller.
    pub fn append<T: Serialize>(&self, record: &T) -> TelemetryResult<()> {
        let mut line = serde_json::to_vec(record).map_err(|e| {
            TelemetryError::ConfigError(format!("audit record does not serialize: {e}"))
        })?;
        line.push(b'\n');

        let mut file = self
            .file
            .lock()
            .map_err(|_| TelemetryError::InitError("audit sink lock poisoned".to_string()))?;
        file.write_all(&line)?;
        file.flush()?;
        Ok(())
    }
}
