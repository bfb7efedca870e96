//! The [`Transport`] trait: the boundary a future non-stdio splice (a
//! Unix-domain-socket proxy, say) would implement without touching the
//! interceptor itself.

use jadegate_interceptor::InterceptResult;
use jadegate_session::JadeSession;
use serde_json::Value;

use crate::error::ProxyResult;

/// A transport adapter sitting between an AI client and a tool server,
/// intercepting tool calls for security validation.
#[async_trait::async_trait]
pub trait Transport {
    /// Start the transport (begin intercepting).
    async fn start(&mut self) -> ProxyResult<()>;

    /// Stop the transport.
    async fn stop(&mut self);

    /// Whether the transport is currently active.
    fn is_running(&self) -> bool;
}

/// Run interception on a tool call. A thin convenience wrapper so
/// transport implementations don't reach into the session directly.
pub fn intercept_call(session: &mut JadeSession, tool_name: &str, params: &Value) -> InterceptResult {
    session.before_call(tool_name, params)
}

/// Report a tool call's result back to the session.
pub fn report_result(
    session: &mut JadeSession,
    call_id: jadegate_dag::CallId,
    tool_name: &str,
    success: bool,
    duration_ms: f64,
    error: Option<&str>,
) {
    session.after_call(call_id, tool_name, success, duration_ms, error);
}
