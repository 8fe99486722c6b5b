use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use crate::provider::{ToolDescriptor, ToolProvider};
use crate::registry;

/// Outcome of a tool invocation attempt.
///
/// `Described` is not an error: when the provider refuses to run a tool in
/// the current execution context, the caller still learns the tool exists
/// and how it is shaped. The distinction between `Executed` and `Described`
/// is visible here to library callers; both serialize to the same wire
/// shape.
#[derive(Debug, Clone, PartialEq)]
pub enum InvocationOutcome {
    /// The tool ran; payload is its serialized result.
    Executed(String),
    /// The tool exists but could not be run here; its descriptor is
    /// returned instead.
    Described(ToolDescriptor),
    /// No tool by that name in the current registry snapshot.
    NotFound,
}

/// Faults the invoker itself can raise. Provider invocation faults are
/// recovered into [`InvocationOutcome::Described`] and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    #[error("result serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Attempt to execute `name` with `args` against the provider.
///
/// The lookup runs against a fresh registry snapshot on every call — the
/// provider is the source of truth and its tool set may have changed since
/// the last listing. The cancellation token handed to the provider is fresh
/// and never triggered; no timeout is imposed at this layer.
pub async fn invoke(
    provider: &dyn ToolProvider,
    name: &str,
    args: Option<Value>,
) -> Result<InvocationOutcome, InvokeError> {
    let tools = registry::snapshot(provider).await;
    let Some(tool) = tools.into_iter().find(|t| t.name == name) else {
        return Ok(InvocationOutcome::NotFound);
    };

    let input = args.unwrap_or_else(|| json!({}));
    match provider
        .invoke_tool(&tool.name, input, CancellationToken::new())
        .await
    {
        Ok(result) => Ok(InvocationOutcome::Executed(serde_json::to_string(
            &result,
        )?)),
        Err(e) => {
            tracing::info!("tool {name} not invocable in this context: {e}");
            Ok(InvocationOutcome::Described(tool))
        }
    }
}
