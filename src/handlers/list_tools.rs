use serde::Serialize;
use serde_json::Value;

use crate::protocol::JsonRpcError;
use crate::provider::{ToolDescriptor, ToolProvider};
use crate::{registry, schema};

#[derive(Debug, Serialize)]
struct ToolListing {
    tools: Vec<AdvertisedTool>,
}

#[derive(Debug, Serialize)]
struct AdvertisedTool {
    name: String,
    description: String,
    #[serde(rename = "inputSchema")]
    input_schema: Value,
}

/// Handle a `tools/list` request.
///
/// Takes a fresh registry snapshot and advertises each tool with a
/// normalized input schema and a generated description where the registry
/// left one out. A registry fault has already degraded to an empty snapshot
/// by the time we get here.
pub async fn handle(provider: &dyn ToolProvider) -> Result<Value, JsonRpcError> {
    let tools = registry::snapshot(provider).await;
    let listing = ToolListing {
        tools: tools.into_iter().map(advertise).collect(),
    };

    serde_json::to_value(&listing)
        .map_err(|e| JsonRpcError::internal_error(format!("Error listing tools: {e}")))
}

fn advertise(tool: ToolDescriptor) -> AdvertisedTool {
    let ToolDescriptor {
        name,
        description,
        input_schema,
    } = tool;

    let description = description
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| format!("VS Code LM Tool: {name}"));

    AdvertisedTool {
        description,
        input_schema: schema::normalize(input_schema.as_ref()),
        name,
    }
}
