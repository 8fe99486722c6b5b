pub mod call_tool;
pub mod list_tools;

use crate::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, ToolCallParams};
use crate::server::ServerContext;

/// Dispatch a JSON-RPC request to the appropriate handler.
///
/// Returns `None` for notifications (no response required). A context
/// without a provider handle answers every method with an internal error —
/// the window between the listener accepting traffic and the provider being
/// attached.
pub async fn dispatch(req: &JsonRpcRequest, ctx: &ServerContext) -> Option<JsonRpcResponse> {
    let Some(provider) = ctx.provider() else {
        return Some(JsonRpcResponse::error(
            req.id.clone(),
            JsonRpcError::internal_error("Server not initialized"),
        ));
    };

    match req.method.as_str() {
        "initialize" => {
            // Static echo; no negotiation against client params.
            let result = serde_json::json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": "mcp-lm-bridge",
                    "version": env!("CARGO_PKG_VERSION")
                }
            });
            Some(JsonRpcResponse::success(req.id.clone(), result))
        }

        "notifications/initialized" => None,

        "ping" => Some(JsonRpcResponse::success(
            req.id.clone(),
            serde_json::json!({}),
        )),

        "tools/list" => Some(match list_tools::handle(provider.as_ref()).await {
            Ok(result) => JsonRpcResponse::success(req.id.clone(), result),
            Err(err) => JsonRpcResponse::error(req.id.clone(), err),
        }),

        "tools/call" => {
            let params: ToolCallParams = match &req.params {
                Some(v) => match serde_json::from_value(v.clone()) {
                    Ok(p) => p,
                    Err(e) => {
                        return Some(JsonRpcResponse::error(
                            req.id.clone(),
                            JsonRpcError::invalid_params(format!(
                                "Invalid tools/call params: {e}"
                            )),
                        ));
                    }
                },
                None => {
                    return Some(JsonRpcResponse::error(
                        req.id.clone(),
                        JsonRpcError::invalid_params("Missing params for tools/call"),
                    ));
                }
            };

            Some(match call_tool::handle(params, provider.as_ref()).await {
                Ok(tool_result) => match serde_json::to_value(&tool_result) {
                    Ok(v) => JsonRpcResponse::success(req.id.clone(), v),
                    Err(e) => JsonRpcResponse::error(
                        req.id.clone(),
                        JsonRpcError::internal_error(format!(
                            "Error serializing tool result: {e}"
                        )),
                    ),
                },
                Err(err) => JsonRpcResponse::error(req.id.clone(), err),
            })
        }

        _ => Some(JsonRpcResponse::error(
            req.id.clone(),
            JsonRpcError::method_not_found(&req.method),
        )),
    }
}
