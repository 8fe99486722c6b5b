use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// A single invocable tool as reported by the host registry.
///
/// `input_schema` is carried verbatim — it may be absent, malformed, or
/// typed as something other than an object. Normalization happens at the
/// listing boundary, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        rename = "inputSchema",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub input_schema: Option<Value>,
}

/// Faults a capability provider can report.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The tool registry could not be queried at all.
    #[error("tool registry unavailable: {0}")]
    RegistryUnavailable(String),
    /// The tool exists but refused to run in this execution context,
    /// typically because no interactive session is present to authorize it.
    #[error("invocation refused: {0}")]
    InvocationRefused(String),
    /// The tool ran and failed.
    #[error("invocation failed: {0}")]
    InvocationFailed(String),
}

/// Boundary to the host environment's tool registry and execution engine.
///
/// The bridge owns nothing behind this seam: listings are snapshots of the
/// provider's current state and may change between calls, and invocation
/// semantics (authorization, side effects, latency) belong entirely to the
/// host.
#[async_trait]
pub trait ToolProvider: Send + Sync {
    /// Current tool listing. Ownership of the tool set stays with the
    /// provider; callers must not cache the result.
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, ProviderError>;

    /// Execute `name` with `input`. The token lets the host observe
    /// cancellation; the bridge itself never triggers it.
    async fn invoke_tool(
        &self,
        name: &str,
        input: Value,
        cancel: CancellationToken,
    ) -> Result<Value, ProviderError>;
}

/// Errors loading a tool manifest into a [`StaticToolProvider`].
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("cannot read tool manifest: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid tool manifest: {0}")]
    Parse(#[from] serde_json::Error),
}

type ToolHandler = Arc<dyn Fn(Value) -> Result<Value, ProviderError> + Send + Sync>;

struct StaticTool {
    descriptor: ToolDescriptor,
    handler: Option<ToolHandler>,
}

/// In-memory capability provider.
///
/// Hosts embedding the bridge register their tools here; tools registered
/// without a handler are descriptor-only and refuse invocation, which is
/// exactly how a headless context behaves against an interactive-only host
/// registry.
#[derive(Default)]
pub struct StaticToolProvider {
    tools: Vec<StaticTool>,
}

impl StaticToolProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor-only tool. Listing advertises it; invocation
    /// is refused.
    pub fn register(&mut self, descriptor: ToolDescriptor) {
        self.tools.push(StaticTool {
            descriptor,
            handler: None,
        });
    }

    /// Register an executable tool.
    pub fn register_with_handler(
        &mut self,
        descriptor: ToolDescriptor,
        handler: impl Fn(Value) -> Result<Value, ProviderError> + Send + Sync + 'static,
    ) {
        self.tools.push(StaticTool {
            descriptor,
            handler: Some(Arc::new(handler)),
        });
    }

    /// Load a descriptor-only catalog from a JSON array of tool descriptors.
    pub fn from_manifest(json: &str) -> Result<Self, ManifestError> {
        let descriptors: Vec<ToolDescriptor> = serde_json::from_str(json)?;
        let mut provider = Self::new();
        for descriptor in descriptors {
            provider.register(descriptor);
        }
        Ok(provider)
    }

    pub fn from_manifest_file(path: &Path) -> Result<Self, ManifestError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_manifest(&json)
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[async_trait]
impl ToolProvider for StaticToolProvider {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, ProviderError> {
        Ok(self.tools.iter().map(|t| t.descriptor.clone()).collect())
    }

    async fn invoke_tool(
        &self,
        name: &str,
        input: Value,
        _cancel: CancellationToken,
    ) -> Result<Value, ProviderError> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.descriptor.name == name)
            .ok_or_else(|| ProviderError::InvocationFailed(format!("unknown tool: {name}")))?;

        match &tool.handler {
            Some(handler) => handler(input),
            None => Err(ProviderError::InvocationRefused(format!(
                "no interactive session is available to authorize {name}"
            ))),
        }
    }
}
