//! Embeddable MCP server bridging a host application's language-model tools.
//!
//! Exposes the host's tool registry over JSON-RPC 2.0 HTTP (`tools/list`,
//! `tools/call`), compatible with any MCP-aware client. The host plugs in
//! through [`provider::ToolProvider`]; everything downstream of that seam —
//! schema normalization, method dispatch, the HTTP transport — lives here.

pub mod config;
pub mod handlers;
pub mod invoker;
pub mod protocol;
pub mod provider;
pub mod registry;
pub mod schema;
pub mod server;
