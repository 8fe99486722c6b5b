use crate::invoker::{self, InvocationOutcome};
use crate::protocol::{JsonRpcError, ToolCallParams, ToolResult};
use crate::provider::ToolProvider;

/// Handle a `tools/call` request.
///
/// An unknown tool is an invalid-params fault. A tool the provider refuses
/// to run is *not* a fault: the response is a successful informational text
/// describing the tool, distinguishable from an executed result only by
/// content.
pub async fn handle(
    params: ToolCallParams,
    provider: &dyn ToolProvider,
) -> Result<ToolResult, JsonRpcError> {
    let name = &params.name;

    match invoker::invoke(provider, name, params.arguments).await {
        Ok(InvocationOutcome::Executed(text)) => Ok(ToolResult::text(text)),

        Ok(InvocationOutcome::Described(tool)) => {
            let info = serde_json::to_string(&tool).map_err(|e| {
                JsonRpcError::internal_error(format!("Error invoking tool {name}: {e}"))
            })?;
            Ok(ToolResult::text(format!(
                "Tool {name} is available but cannot be invoked outside of a chat context. \
                 Tool info: {info}"
            )))
        }

        Ok(InvocationOutcome::NotFound) => Err(JsonRpcError::invalid_params(format!(
            "Tool {name} not found"
        ))),

        Err(e) => Err(JsonRpcError::internal_error(format!(
            "Error invoking tool {name}: {e}"
        ))),
    }
}
