//! `jadegate proxy` — launch the stdio security splice in front of an
//! upstream MCP tool server.

use std::sync::Arc;

use anyhow::{Context, Result};
use jadegate_config::Config;
use jadegate_policy::Policy;
use jadegate_proxy::{JadeMcpProxy, Transport};
use jadegate_session::JadeSession;
use jadegate_telemetry::AuditSink;

/// Resolve the policy a proxy session should enforce: the file at
/// `config.policy_path`, if set, otherwise the embedded default.
fn resolve_policy(config: &Config) -> Result<Policy> {
    match &config.policy_path {
        Some(path) => Policy::from_file(path)
            .with_context(|| format!("loading policy from {}", path.display())),
        None => Ok(Policy::default()),
    }
}

/// Run the proxy: `command` is the upstream tool server's own argv[0],
/// `args` its arguments. Blocks until the downstream host closes stdin.
pub(crate) async fn run(config: Config, command: &str, args: &[String]) -> Result<()> {
    let policy = resolve_policy(&config)?;
    let session = JadeSession::with_policy(policy);
    tracing::info!(session_id = %session.session_id(), upstream = %command, "starting proxy");

    let mut proxy = JadeMcpProxy::new(session)
        .with_response_timeout(std::time::Duration::from_secs_f64(
            config.default_timeout_secs,
        ));

    if let Some(path) = &config.audit_log_path {
        let sink = AuditSink::open(path)
            .with_context(|| format!("opening audit log at {}", path.display()))?;
        proxy = proxy.with_audit_sink(Arc::new(sink));
    }

    proxy.start_upstream(command, args, &[]).await?;
    Transport::start(&mut proxy).await?;

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    proxy.run(stdin, stdout).await?;

    Ok(())
}
