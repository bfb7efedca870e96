//! The upstream tool-server child process: line-delimited JSON-RPC over
//! its stdin/stdout, stderr forwarded unchanged.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::process::{Child, ChildStdin, ChildStdout};

use crate::error::{ProxyError, ProxyResult};

/// How long a shutdown waits for the upstream to exit after SIGTERM
/// before escalating to SIGKILL.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Default timeout waiting for a single response line from upstream.
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(10);

/// A running upstream tool-server process, wired for line-delimited
/// JSON-RPC over stdio. `stderr` is inherited by the parent so the host
/// app sees server diagnostics directly; it is never read by this type.
pub struct UpstreamProcess {
    child: Child,
    stdin: BufWriter<ChildStdin>,
    stdout: BufReader<ChildStdout>,
}

impl UpstreamProcess {
    /// Spawn `command` (and `args`) with piped stdin/stdout and inherited
    /// stderr, using the current process's environment plus `env`.
    pub fn spawn(
        command: &str,
        args: &[String],
        env: &[(String, String)],
    ) -> ProxyResult<Self> {
        let mut cmd = tokio::process::Command::new(command);
        cmd.args(args)
            .envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::inherit());

        let mut child = cmd.spawn().map_err(ProxyError::Spawn)?;
        let stdin = child.stdin.take().ok_or(ProxyError::NoUpstream)?;
        let stdout = child.stdout.take().ok_or(ProxyError::NoUpstream)?;

        tracing::info!(command, ?args, "started upstream tool server");

        Ok(Self {
            child,
            stdin: BufWriter::new(stdin),
            stdout: BufReader::new(stdout),
        })
    }

    /// Write one JSON-RPC message, newline-terminated, and flush.
    pub async fn write_message(&mut self, message: &serde_json::Value) -> ProxyResult<()> {
        let mut bytes = serde_json::to_vec(message).map_err(ProxyError::InvalidJson)?;
        bytes.push(b'\n');
        self.stdin.write_all(&bytes).await?;
        self.stdin.flush().await?;
        Ok(())
    }

    /// Read one JSON-RPC response line, bounded by `timeout`. Returns
    /// `Ok(None)` on upstream EOF, matching the reference's "closed
    /// pipe" case — the caller turns that into a synthesized error.
    pub async fn read_message(
        &mut self,
        timeout: Duration,
    ) -> ProxyResult<Option<serde_json::Value>> {
        let mut line = String::new();
        let read = tokio::time::timeout(timeout, self.stdout.read_line(&mut line)).await;
        let n = match read {
            Ok(result) => result?,
            Err(_) => return Err(ProxyError::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "timed out waiting for upstream response",
            ))),
        };
        if n == 0 {
            return Ok(None);
        }
        let value = serde_json::from_str(line.trim_end()).map_err(ProxyError::InvalidJson)?;
        Ok(Some(value))
    }

    /// SIGTERM the process, wait up to [`SHUTDOWN_GRACE`], SIGKILL if it
    /// is still alive, then reap it.
    pub async fn shutdown(&mut self) {
        terminate(&self.child);

        if tokio::time::timeout(SHUTDOWN_GRACE, self.child.wait())
            .await
            .is_err()
        {
            tracing::warn!("upstream did not exit after SIGTERM, sending SIGKILL");
            let _ = self.child.start_kill();
            let _ = self.child.wait().await;
        }
    }
}

/// Send SIGTERM to `child` on Unix. There is no safe standard-library
/// primitive for delivering a specific signal to an already-spawned
/// child; `tokio::process::Child` only exposes SIGKILL via `start_kill`.
#[cfg(unix)]
#[allow(unsafe_code)]
fn terminate(child: &Child) {
    let Some(pid) = child.id() else {
        return;
    };
    // Safety: `pid` is a valid process id obtained from `Child::id`, and
    // `kill` with a valid pid and signal number has no memory-safety
    // implications; it can only fail (ESRCH/EPERM), which this ignores
    // since the subsequent wait-then-SIGKILL path handles a process that
    // didn't respond.
    unsafe {
        libc::kill(pid as libc::pid_t, libc::SIGTERM);
    }
}

#[cfg(not(unix))]
fn terminate(child: &Child) {
    let _ = child;
}
