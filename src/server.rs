use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderName, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;

use crate::config::ServerConfig;
use crate::handlers;
use crate::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RpcId};
use crate::provider::ToolProvider;

/// Process-wide server state: the shared handle to the capability provider.
///
/// Constructed once at startup and passed to every dispatch; no per-request
/// state is retained. An uninitialized context makes every method report
/// "Server not initialized".
pub struct ServerContext {
    provider: Option<Arc<dyn ToolProvider>>,
}

impl ServerContext {
    pub fn new(provider: Arc<dyn ToolProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// Context with no provider attached.
    pub fn uninitialized() -> Self {
        Self { provider: None }
    }

    pub fn provider(&self) -> Option<&Arc<dyn ToolProvider>> {
        self.provider.as_ref()
    }
}

/// MCP server speaking JSON-RPC 2.0 over plain HTTP POST.
pub struct BridgeServer {
    config: ServerConfig,
    ctx: Arc<ServerContext>,
}

impl BridgeServer {
    pub fn new(config: ServerConfig, provider: Arc<dyn ToolProvider>) -> Self {
        Self {
            config,
            ctx: Arc::new(ServerContext::new(provider)),
        }
    }

    /// Bind the listener and serve until interrupted.
    ///
    /// Shutdown closes the accept loop; in-flight requests are allowed to
    /// finish.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let listener = tokio::net::TcpListener::bind(self.config.bind_addr()).await?;
        tracing::info!("MCP server listening on http://{}", listener.local_addr()?);

        axum::serve(listener, router(self.ctx))
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

/// The transport is path-agnostic: a single fallback handler routes by
/// HTTP method only, as clients are expected to POST to any path.
pub fn router(ctx: Arc<ServerContext>) -> Router {
    Router::new().fallback(handle_request).with_state(ctx)
}

async fn handle_request(
    State(ctx): State<Arc<ServerContext>>,
    method: Method,
    body: Bytes,
) -> Response {
    if method == Method::OPTIONS {
        // CORS preflight.
        (StatusCode::OK, cors_headers()).into_response()
    } else if method == Method::POST {
        handle_post(&ctx, &body).await
    } else {
        (StatusCode::NOT_FOUND, cors_headers(), "Not Found").into_response()
    }
}

async fn handle_post(ctx: &ServerContext, body: &[u8]) -> Response {
    // The full body is buffered before parsing; no streaming parse.
    let req: JsonRpcRequest = match serde_json::from_slice(body) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!("request body rejected: {e}");
            let resp = JsonRpcResponse::error(Some(RpcId::Null), JsonRpcError::parse_error());
            return json_response(StatusCode::BAD_REQUEST, &Some(resp));
        }
    };

    tracing::debug!(method = %req.method, "mcp request");
    let resp = handlers::dispatch(&req, ctx).await;
    json_response(StatusCode::OK, &resp)
}

/// Serialize a response body. Notifications have no response object and
/// produce the literal body `null`.
fn json_response(status: StatusCode, resp: &Option<JsonRpcResponse>) -> Response {
    match serde_json::to_string(resp) {
        Ok(body) => (
            status,
            cors_headers(),
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("response serialization failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, cors_headers()).into_response()
        }
    }
}

fn cors_headers() -> [(HeaderName, &'static str); 3] {
    [
        (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, GET, OPTIONS"),
        (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
    ]
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("cannot listen for shutdown signal: {e}");
    }
}
