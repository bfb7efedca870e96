//! [`JadeMcpProxy`]: the stdio JSON-RPC splice itself.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use jadegate_interceptor::Verdict;
use jadegate_session::JadeSession;
use jadegate_telemetry::AuditSink;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{ProxyError, ProxyResult};
use crate::profile::tool_security_profile;
use crate::transport::Transport;
use crate::upstream::{UpstreamProcess, DEFAULT_RESPONSE_TIMEOUT};

/// Transparent MCP stdio proxy: reads line-delimited JSON-RPC from a
/// downstream host application, intercepts `tools/call` through a
/// [`JadeSession`], annotates `tools/list` responses, and passes
/// everything else through unchanged.
pub struct JadeMcpProxy {
    session: JadeSession,
    upstream: Option<UpstreamProcess>,
    tools_seen: HashSet<String>,
    running: bool,
    response_timeout: Duration,
    audit_sink: Option<Arc<AuditSink>>,
}

impl JadeMcpProxy {
    /// Build a proxy around an already-configured session. The upstream
    /// process is not started until [`Transport::start`].
    #[must_use]
    pub fn new(session: JadeSession) -> Self {
        Self {
            session,
            upstream: None,
            tools_seen: HashSet::new(),
            running: false,
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
            audit_sink: None,
        }
    }

    /// Override the default 10s upstream response timeout.
    #[must_use]
    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    /// Also persist every recorded audit entry to `sink`, one JSON line
    /// per call, in addition to the session's own in-memory log. Has no
    /// effect on calls the session drops without recording (a closed
    /// session's synthetic denial never reaches the audit log at all).
    #[must_use]
    pub fn with_audit_sink(mut self, sink: Arc<AuditSink>) -> Self {
        self.audit_sink = Some(sink);
        self
    }

    /// Append the most recently recorded audit entry to the configured
    /// sink, if any. A write failure is logged, not propagated — the
    /// in-memory audit log remains authoritative for this session
    /// regardless of whether the on-disk copy succeeded.
    fn persist_last_audit_entry(&self) {
        let Some(sink) = self.audit_sink.as_ref() else {
            return;
        };
        let Some(entry) = self.session.get_audit_log().last() else {
            return;
        };
        if let Err(e) = sink.append(entry) {
            tracing::warn!(error = %e, "failed to persist audit entry to disk");
        }
    }

    /// The session this proxy is driving.
    #[must_use]
    pub fn session(&self) -> &JadeSession {
        &self.session
    }

    /// Launch the upstream tool-server process.
    pub async fn start_upstream(
        &mut self,
        command: &str,
        args: &[String],
        env: &[(String, String)],
    ) -> ProxyResult<()> {
        self.upstream = Some(UpstreamProcess::spawn(command, args, env)?);
        self.running = true;
        Ok(())
    }

    /// Read line-delimited JSON-RPC from `reader` until EOF, handling
    /// each message and writing its response to `writer`. Closes the
    /// session and reaps the upstream child on exit.
    pub async fn run<R, W>(&mut self, mut reader: R, mut writer: W) -> ProxyResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();
        loop {
            line.clear();
            let n = reader.read_line(&mut line).await?;
            if n == 0 {
                break;
            }
            let trimmed = line.trim_end();
            if trimmed.is_empty() {
                continue;
            }
            let message: Value = match serde_json::from_str(trimmed) {
                Ok(v) => v,
                Err(e) => {
                    tracing::error!(error = %e, "invalid JSON-RPC message from downstream, skipping");
                    continue;
                }
            };

            let response = self.handle_message(message).await;
            let mut out = serde_json::to_vec(&response).map_err(ProxyError::InvalidJson)?;
            out.push(b'\n');
            writer.write_all(&out).await?;
            writer.flush().await?;
        }

        <Self as Transport>::stop(self).await;
        Ok(())
    }

    /// Handle one parsed JSON-RPC message and return its response.
    pub async fn handle_message(&mut self, message: Value) -> Value {
        match message.get("method").and_then(Value::as_str) {
            Some("tools/list") => self.handle_tools_list(message).await,
            Some("tools/call") => self.handle_tools_call(message).await,
            _ => self.forward_to_upstream(&message).await,
        }
    }

    async fn forward_to_upstream(&mut self, message: &Value) -> Value {
        let id = message.get("id").cloned().unwrap_or(Value::Null);
        let Some(upstream) = self.upstream.as_mut() else {
            return error_response(id, -32603, "No upstream MCP server connected", None);
        };

        if let Err(e) = upstream.write_message(message).await {
            tracing::error!(error = %e, "upstream write error");
            return error_response(id, -32603, &format!("Upstream error: {e}"), None);
        }

        match upstream.read_message(self.response_timeout).await {
            Ok(Some(response)) => response,
            Ok(None) => error_response(id, -32603, "Upstream server closed", None),
            Err(e) => {
                tracing::error!(error = %e, "upstream read error");
                error_response(id, -32603, &format!("Upstream error: {e}"), None)
            }
        }
    }

    async fn handle_tools_list(&mut self, message: Value) -> Value {
        let mut response = self.forward_to_upstream(&message).await;

        let tools = response
            .get_mut("result")
            .and_then(|r| r.get_mut("tools"))
            .and_then(Value::as_array_mut);
        if let Some(tools) = tools {
            for tool in tools.iter_mut() {
                let name = tool
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let seen_before = self.tools_seen.contains(&name);
                let profile = tool_security_profile(tool, seen_before);
                if let Some(obj) = tool.as_object_mut() {
                    obj.insert("jade_security".to_string(), profile);
                }
                self.tools_seen.insert(name);
            }
        }

        response
    }

    async fn handle_tools_call(&mut self, message: Value) -> Value {
        let id = message.get("id").cloned().unwrap_or(Value::Null);
        let params = message.get("params").cloned().unwrap_or(Value::Null);
        let tool_name = params
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let arguments = params
            .get("arguments")
            .cloned()
            .unwrap_or_else(|| json!({}));

        let result = self.session.before_call(&tool_name, &arguments);
        let result_json = serde_json::to_value(&result).unwrap_or(Value::Null);

        match result.verdict {
            Verdict::Deny => {
                let reason = result.reasons.join("; ");
                tracing::warn!(tool = %tool_name, reason = %reason, "tool call denied");
                self.session.after_call(
                    result.call_id,
                    &tool_name,
                    false,
                    0.0,
                    Some(reason.as_str()),
                );
                self.persist_last_audit_entry();
                error_response(
                    id,
                    -32600,
                    &format!("JadeGate: call denied — {reason}"),
                    Some(result_json),
                )
            }
            Verdict::NeedsApproval => {
                tracing::info!(tool = %tool_name, "tool call needs human approval");
                self.persist_last_audit_entry();
                error_response(
                    id,
                    -32001,
                    &format!("JadeGate: human approval required for '{tool_name}'"),
                    Some(result_json),
                )
            }
            Verdict::Allow => {
                let start = Instant::now();
                let upstream_response = self.forward_to_upstream(&message).await;
                let success = upstream_response.get("error").is_none();
                let error_msg = if success {
                    None
                } else {
                    upstream_response
                        .get("error")
                        .and_then(|e| e.get("message"))
                        .and_then(Value::as_str)
                        .map(str::to_string)
                };
                self.session.after_call(
                    result.call_id,
                    &tool_name,
                    success,
                    start.elapsed().as_secs_f64() * 1000.0,
                    error_msg.as_deref(),
                );
                self.persist_last_audit_entry();
                upstream_response
            }
        }
    }
}

#[async_trait::async_trait]
impl Transport for JadeMcpProxy {
    async fn start(&mut self) -> ProxyResult<()> {
        self.running = true;
        Ok(())
    }

    async fn stop(&mut self) {
        self.running = false;
        if let Some(mut upstream) = self.upstream.take() {
            upstream.shutdown().await;
        }
        let status = self.session.close();
        eprintln!(
            "jadegate: session {} closed — {} calls, {} blocked, {} anomalies",
            status.session_id, status.total_calls, status.blocked_calls, status.anomalies
        );
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

fn error_response(id: Value, code: i64, message: &str, data: Option<Value>) -> Value {
    let mut error = json!({"code": code, "message": message});
    if let Some(data) = data {
        error["data"] = data;
    }
    json!({"jsonrpc": "2.0", "id": id, "error": error})
}
