use crate::provider::{ToolDescriptor, ToolProvider};

/// Fetch the provider's current tool listing.
///
/// A provider fault degrades to an empty listing instead of failing the
/// request; the fault is logged so operators can distinguish it from a
/// genuinely empty registry, which wire clients cannot.
pub async fn snapshot(provider: &dyn ToolProvider) -> Vec<ToolDescriptor> {
    match provider.list_tools().await {
        Ok(tools) => tools,
        Err(e) => {
            tracing::warn!("tool registry query failed: {e}");
            Vec::new()
        }
    }
}
