//! Integration tests for the JSON-RPC dispatcher.
//!
//! Tests drive `handlers::dispatch` directly against in-memory providers
//! and assert on the produced response objects.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use mcp_lm_bridge::handlers;
use mcp_lm_bridge::protocol::{JsonRpcRequest, RpcId};
use mcp_lm_bridge::provider::{
    ProviderError, StaticToolProvider, ToolDescriptor, ToolProvider,
};
use mcp_lm_bridge::server::ServerContext;

fn request(method: &str, id: Option<RpcId>, params: Option<Value>) -> JsonRpcRequest {
    JsonRpcRequest {
        jsonrpc: "2.0".into(),
        id,
        method: method.into(),
        params,
    }
}

fn descriptor(name: &str) -> ToolDescriptor {
    ToolDescriptor {
        name: name.into(),
        description: None,
        input_schema: None,
    }
}

fn context(provider: StaticToolProvider) -> ServerContext {
    ServerContext::new(Arc::new(provider))
}

/// Provider whose registry query always faults.
struct FailingProvider;

#[async_trait]
impl ToolProvider for FailingProvider {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, ProviderError> {
        Err(ProviderError::RegistryUnavailable("host went away".into()))
    }

    async fn invoke_tool(
        &self,
        _name: &str,
        _input: Value,
        _cancel: CancellationToken,
    ) -> Result<Value, ProviderError> {
        Err(ProviderError::InvocationFailed("unreachable".into()))
    }
}

// ---------------------------------------------------------------------------
// Protocol plumbing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn initialize_is_a_static_echo() {
    let ctx = context(StaticToolProvider::new());
    let req = request("initialize", Some(RpcId::Number(1)), None);

    let resp = handlers::dispatch(&req, &ctx).await.unwrap();
    assert_eq!(resp.id, Some(RpcId::Number(1)));

    let result = resp.result.unwrap();
    assert_eq!(result["protocolVersion"], "2024-11-05");
    assert_eq!(result["capabilities"]["tools"], json!({}));
    assert_eq!(result["serverInfo"]["name"], "mcp-lm-bridge");
    assert!(result["serverInfo"]["version"].is_string());
}

#[tokio::test]
async fn ping_returns_empty_result() {
    let ctx = context(StaticToolProvider::new());
    let req = request("ping", Some(RpcId::Number(7)), None);

    let resp = handlers::dispatch(&req, &ctx).await.unwrap();
    assert_eq!(resp.id, Some(RpcId::Number(7)));
    assert_eq!(resp.result.unwrap(), json!({}));
    assert!(resp.error.is_none());
}

#[tokio::test]
async fn response_id_matches_request_id() {
    let ctx = context(StaticToolProvider::new());

    let ids = [
        Some(RpcId::Number(42)),
        Some(RpcId::Str("abc-123".into())),
        Some(RpcId::Null),
        None,
    ];

    for id in ids {
        let req = request("ping", id.clone(), None);
        let resp = handlers::dispatch(&req, &ctx).await.unwrap();
        assert_eq!(resp.id, id, "response id must be copied from the request");
    }
}

#[tokio::test]
async fn initialized_notification_yields_no_response() {
    let ctx = context(StaticToolProvider::new());
    let req = request("notifications/initialized", None, None);

    assert!(handlers::dispatch(&req, &ctx).await.is_none());
}

#[tokio::test]
async fn unknown_method_echoes_its_name() {
    let ctx = context(StaticToolProvider::new());
    let req = request("foo/bar", Some(RpcId::Number(5)), None);

    let resp = handlers::dispatch(&req, &ctx).await.unwrap();
    let err = resp.error.unwrap();
    assert_eq!(err.code, -32601);
    assert!(
        err.message.contains("foo/bar"),
        "message should name the unrecognized method: {}",
        err.message
    );
}

#[tokio::test]
async fn uninitialized_context_fails_every_method() {
    let ctx = ServerContext::uninitialized();

    for method in [
        "initialize",
        "notifications/initialized",
        "ping",
        "tools/list",
        "tools/call",
        "foo/bar",
    ] {
        let req = request(method, Some(RpcId::Number(1)), None);
        let resp = handlers::dispatch(&req, &ctx)
            .await
            .expect("uninitialized context must answer even notifications");
        let err = resp.error.unwrap();
        assert_eq!(err.code, -32603, "method {method}");
        assert_eq!(err.message, "Server not initialized");
    }
}

// ---------------------------------------------------------------------------
// tools/list
// ---------------------------------------------------------------------------

#[tokio::test]
async fn tools_list_normalizes_and_generates_descriptions() {
    let mut provider = StaticToolProvider::new();
    provider.register(descriptor("echo"));
    provider.register(ToolDescriptor {
        name: "search".into(),
        description: Some("Search the workspace".into()),
        input_schema: Some(json!({
            "type": "object",
            "properties": { "query": { "type": "string" } }
        })),
    });

    let ctx = context(provider);
    let req = request("tools/list", Some(RpcId::Number(1)), None);

    let resp = handlers::dispatch(&req, &ctx).await.unwrap();
    let result = resp.result.unwrap();
    let tools = result["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 2);

    assert_eq!(tools[0]["name"], "echo");
    assert_eq!(tools[0]["description"], "VS Code LM Tool: echo");
    assert_eq!(
        tools[0]["inputSchema"],
        json!({
            "type": "object",
            "properties": {
                "input": { "type": "string", "description": "Input for the tool" }
            }
        })
    );

    assert_eq!(tools[1]["name"], "search");
    assert_eq!(tools[1]["description"], "Search the workspace");
    assert_eq!(
        tools[1]["inputSchema"]["properties"]["query"]["type"],
        "string"
    );
}

#[tokio::test]
async fn tools_list_treats_empty_description_as_absent() {
    let mut provider = StaticToolProvider::new();
    provider.register(ToolDescriptor {
        name: "blank".into(),
        description: Some(String::new()),
        input_schema: None,
    });

    let ctx = context(provider);
    let req = request("tools/list", Some(RpcId::Number(1)), None);

    let resp = handlers::dispatch(&req, &ctx).await.unwrap();
    let result = resp.result.unwrap();
    assert_eq!(result["tools"][0]["description"], "VS Code LM Tool: blank");
}

#[tokio::test]
async fn registry_fault_degrades_to_empty_listing() {
    let ctx = ServerContext::new(Arc::new(FailingProvider));
    let req = request("tools/list", Some(RpcId::Number(1)), None);

    let resp = handlers::dispatch(&req, &ctx).await.unwrap();
    let result = resp.result.unwrap();
    assert_eq!(
        result["tools"],
        json!([]),
        "a provider fault must degrade to an empty listing, not an error"
    );
}

// ---------------------------------------------------------------------------
// tools/call
// ---------------------------------------------------------------------------

#[tokio::test]
async fn tools_call_executes_and_serializes_the_result() {
    let mut provider = StaticToolProvider::new();
    provider.register_with_handler(descriptor("echo"), |input| {
        Ok(json!({ "echoed": input }))
    });

    let ctx = context(provider);
    let req = request(
        "tools/call",
        Some(RpcId::Number(2)),
        Some(json!({ "name": "echo", "arguments": { "text": "hi" } })),
    );

    let resp = handlers::dispatch(&req, &ctx).await.unwrap();
    let result = resp.result.unwrap();
    assert_eq!(result["content"][0]["type"], "text");

    let text = result["content"][0]["text"].as_str().unwrap();
    let payload: Value = serde_json::from_str(text).unwrap();
    assert_eq!(payload, json!({ "echoed": { "text": "hi" } }));
}

#[tokio::test]
async fn tools_call_defaults_arguments_to_empty_object() {
    let mut provider = StaticToolProvider::new();
    provider.register_with_handler(descriptor("echo"), |input| Ok(input));

    let ctx = context(provider);
    let req = request(
        "tools/call",
        Some(RpcId::Number(3)),
        Some(json!({ "name": "echo" })),
    );

    let resp = handlers::dispatch(&req, &ctx).await.unwrap();
    let result = resp.result.unwrap();
    let text = result["content"][0]["text"].as_str().unwrap();
    assert_eq!(text, "{}");
}

#[tokio::test]
async fn refused_invocation_falls_back_to_description() {
    let mut provider = StaticToolProvider::new();
    provider.register(ToolDescriptor {
        name: "deploy".into(),
        description: Some("Deploy the workspace".into()),
        input_schema: Some(json!({ "type": "object", "properties": {} })),
    });

    let ctx = context(provider);
    let req = request(
        "tools/call",
        Some(RpcId::Number(4)),
        Some(json!({ "name": "deploy", "arguments": {} })),
    );

    let resp = handlers::dispatch(&req, &ctx).await.unwrap();
    assert!(
        resp.error.is_none(),
        "a refused invocation must not surface as a protocol error"
    );

    let result = resp.result.unwrap();
    let text = result["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("Tool deploy is available"), "got: {text}");
    assert!(text.contains("cannot be invoked"), "got: {text}");
    assert!(
        text.contains("Deploy the workspace"),
        "fallback text should carry the descriptor: {text}"
    );
}

#[tokio::test]
async fn tools_call_unknown_tool_is_invalid_params() {
    let ctx = context(StaticToolProvider::new());
    let req = request(
        "tools/call",
        Some(RpcId::Number(5)),
        Some(json!({ "name": "missing", "arguments": {} })),
    );

    let resp = handlers::dispatch(&req, &ctx).await.unwrap();
    let err = resp.error.unwrap();
    assert_eq!(err.code, -32602);
    assert_eq!(err.message, "Tool missing not found");
}

#[tokio::test]
async fn tools_call_without_params_is_invalid_params() {
    let ctx = context(StaticToolProvider::new());
    let req = request("tools/call", Some(RpcId::Number(6)), None);

    let resp = handlers::dispatch(&req, &ctx).await.unwrap();
    assert_eq!(resp.error.unwrap().code, -32602);
}

#[tokio::test]
async fn tools_call_with_malformed_params_is_invalid_params() {
    let ctx = context(StaticToolProvider::new());
    let req = request(
        "tools/call",
        Some(RpcId::Number(7)),
        Some(json!({ "arguments": {} })),
    );

    let resp = handlers::dispatch(&req, &ctx).await.unwrap();
    assert_eq!(resp.error.unwrap().code, -32602);
}

#[tokio::test]
async fn registry_fault_makes_every_tool_unknown() {
    let ctx = ServerContext::new(Arc::new(FailingProvider));
    let req = request(
        "tools/call",
        Some(RpcId::Number(8)),
        Some(json!({ "name": "echo", "arguments": {} })),
    );

    let resp = handlers::dispatch(&req, &ctx).await.unwrap();
    let err = resp.error.unwrap();
    assert_eq!(err.code, -32602);
    assert_eq!(err.message, "Tool echo not found");
}
