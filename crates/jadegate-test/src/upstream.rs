//! A scripted fake upstream tool server, for exercising the proxy splice
//! end to end without depending on a real MCP server binary.
//!
//! Built on a tiny POSIX shell script rather than a purpose-built Rust
//! binary: every request line it reads bumps a counter, and it replies
//! with the environment variable `R<n>` for the n-th request, letting a
//! test script a fixed, ordered sequence of JSON-RPC responses while
//! still exercising a real child process over real pipes — the same
//! "trivial echo script" shape already used by `jadegate-proxy`'s own
//! `cat`/`sh` based unit tests, just parameterized per request instead
//! of echoing stdin back.

use serde_json::Value;

const SCRIPT: &str = "n=0; while IFS= read -r _; do n=$((n+1)); eval \"v=\\$R$n\"; printf '%s\\n' \"$v\"; done";

/// Build the `(command, args, env)` triple for `JadeMcpProxy::start_upstream`
/// (or `UpstreamProcess::spawn`) that replies to the n-th request it reads
/// with the n-th entry of `responses`, in order.
///
/// # Panics
///
/// Panics if any response fails to serialize to JSON, which would
/// indicate a bug in the test calling this, not in the harness itself.
#[must_use]
pub fn scripted_upstream(responses: &[Value]) -> (&'static str, Vec<String>, Vec<(String, String)>) {
    let env = responses
        .iter()
        .enumerate()
        .map(|(i, response)| {
            (
                format!("R{}", i.saturating_add(1)),
                serde_json::to_string(response).expect("response serializes"),
            )
        })
        .collect();

    ("/bin/sh", vec!["-c".to_string(), SCRIPT.to_string()], env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scripted_upstream_shapes_one_env_var_per_response() {
        let (command, args, env) = scripted_upstream(&[json!({"a": 1}), json!({"b": 2})]);
        assert_eq!(command, "/bin/sh");
        assert_eq!(args.len(), 2);
        assert_eq!(env.len(), 2);
        assert_eq!(env[0].0, "R1");
        assert_eq!(env[1].0, "R2");
    }
}
