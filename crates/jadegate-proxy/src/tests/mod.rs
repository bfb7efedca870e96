use jadegate_session::JadeSession;
use serde_json::json;

use crate::JadeMcpProxy;

fn proxy() -> JadeMcpProxy {
    JadeMcpProxy::new(JadeSession::new())
}

#[tokio::test]
async fn tools_call_denied_by_policy_never_reaches_upstream() {
    let mut proxy = proxy();
    let message = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "tools/call",
        "params": {"name": "shell_exec", "arguments": {"cmd": "ls"}},
    });

    let response = proxy.handle_message(message).await;
    let error = response.get("error").expect("denied call returns an error");
    assert_eq!(error["code"], json!(-32600));
    assert!(error["message"].as_str().unwrap().starts_with("JadeGate: call denied"));
    assert!(error.get("data").is_some());
    assert_eq!(proxy.session().call_count(), 1);
    assert_eq!(proxy.session().blocked_count(), 1);
}

#[tokio::test]
async fn tools_call_needs_approval_is_never_forwarded() {
    let mut proxy = proxy();
    let message = json!({
        "jsonrpc": "2.0",
        "id": 2,
        "method": "tools/call",
        "params": {"name": "delete_production_database", "arguments": {}},
    });

    let response = proxy.handle_message(message).await;
    let error = response.get("error").expect("needs-approval call returns an error");
    assert_eq!(error["code"], json!(-32001));
    assert!(error["message"]
        .as_str()
        .unwrap()
        .contains("human approval required"));
}

#[tokio::test]
async fn tool_call_with_no_upstream_connected_synthesizes_dash_32603() {
    let mut proxy = proxy();
    let message = json!({
        "jsonrpc": "2.0",
        "id": 3,
        "method": "tools/call",
        "params": {"name": "search_docs", "arguments": {"q": "hello"}},
    });

    let response = proxy.handle_message(message).await;
    let error = response.get("error").expect("no upstream connected is an error");
    assert_eq!(error["code"], json!(-32603));
    assert_eq!(error["message"], json!("No upstream MCP server connected"));
}

#[tokio::test]
async fn arbitrary_non_tool_methods_pass_through_untouched_when_no_upstream() {
    let mut proxy = proxy();
    let message = json!({"jsonrpc": "2.0", "id": 4, "method": "ping", "params": {}});
    let response = proxy.handle_message(message).await;
    assert_eq!(response["error"]["code"], json!(-32603));
    assert_eq!(response["error"]["message"], json!("No upstream MCP server connected"));
}

#[tokio::test]
async fn tools_list_response_gets_a_jade_security_annotation_per_tool() {
    let mut proxy = proxy();
    proxy
        .start_upstream("cat", &[], &[])
        .await
        .expect("cat is available on the test host");

    // `cat` echoes stdin back on stdout, so the request itself doubles as
    // the "upstream response" as far as `handle_tools_list` is concerned:
    // it only cares that the object it gets back has `result.tools`.
    let message = json!({
        "jsonrpc": "2.0",
        "id": 5,
        "method": "tools/list",
        "result": {
            "tools": [
                {"name": "run_command", "description": "execute a shell command"},
            ],
        },
    });

    let response = proxy.handle_message(message).await;
    let tool = &response["result"]["tools"][0];
    assert_eq!(tool["jade_security"]["risk_level"], json!("critical"));
    assert_eq!(tool["jade_security"]["jade_verified"], json!(false));
    assert!(tool["jade_security"]["capabilities"]
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c == "shell"));
}

#[tokio::test]
async fn a_tool_seen_in_an_earlier_tools_list_is_marked_jade_verified() {
    let mut proxy = proxy();
    proxy.start_upstream("cat", &[], &[]).await.unwrap();

    let message = |id: i64| {
        json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "tools/list",
            "result": {"tools": [{"name": "search_docs", "description": "search the docs"}]},
        })
    };

    let first = proxy.handle_message(message(1)).await;
    assert_eq!(first["result"]["tools"][0]["jade_security"]["jade_verified"], json!(false));

    let second = proxy.handle_message(message(2)).await;
    assert_eq!(second["result"]["tools"][0]["jade_security"]["jade_verified"], json!(true));
}

#[tokio::test]
async fn allowed_tool_call_is_forwarded_and_counted_as_allowed() {
    let mut proxy = proxy();
    proxy.start_upstream("cat", &[], &[]).await.unwrap();

    let message = json!({
        "jsonrpc": "2.0",
        "id": 6,
        "method": "tools/call",
        "params": {"name": "search_docs", "arguments": {"q": "hello"}},
    });

    let response = proxy.handle_message(message.clone()).await;
    // `cat` echoed the request verbatim, so the "response" has no `error`
    // key and the session records it as a successful allowed call.
    assert_eq!(response, message);
    assert_eq!(proxy.session().call_count(), 1);
    assert_eq!(proxy.session().blocked_count(), 0);
}

#[tokio::test]
async fn upstream_closing_its_pipe_without_responding_synthesizes_dash_32603() {
    let mut proxy = proxy();
    // Reads (and discards) one line, then exits without ever writing a
    // response, closing its stdout out from under the proxy.
    proxy
        .start_upstream(
            "sh",
            &["-c".to_string(), "read x; exit 0".to_string()],
            &[],
        )
        .await
        .unwrap();

    let message = json!({
        "jsonrpc": "2.0",
        "id": 7,
        "method": "tools/call",
        "params": {"name": "search_docs", "arguments": {"q": "hello"}},
    });

    let response = proxy.handle_message(message).await;
    assert_eq!(response["error"]["code"], json!(-32603));
    assert_eq!(response["error"]["message"], json!("Upstream server closed"));
}

#[tokio::test]
async fn invalid_json_on_a_downstream_line_is_skipped_not_fatal() {
    let mut proxy = proxy();
    let input = b"not json at all\n{\"jsonrpc\":\"2.0\",\"id\":8,\"method\":\"ping\"}\n" as &[u8];
    let mut output = Vec::new();
    let result = proxy.run(tokio::io::BufReader::new(input), &mut output).await;
    assert!(result.is_ok());

    let text = String::from_utf8(output).unwrap();
    // Only the second, valid line produced a response line.
    assert_eq!(text.lines().count(), 1);
    let response: serde_json::Value = serde_json::from_str(text.lines().next().unwrap()).unwrap();
    assert_eq!(response["error"]["code"], json!(-32603));
}
