use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use mcp_lm_bridge::config::ServerConfig;
use mcp_lm_bridge::provider::StaticToolProvider;
use mcp_lm_bridge::server::BridgeServer;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("mcp-lm-bridge: configuration error: {e}");
            std::process::exit(1);
        }
    };

    let provider = match &config.tools_manifest {
        Some(path) => match StaticToolProvider::from_manifest_file(path) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("mcp-lm-bridge: configuration error: {e}");
                std::process::exit(1);
            }
        },
        None => StaticToolProvider::new(),
    };

    if provider.is_empty() {
        tracing::warn!("no tools registered; tools/list will be empty until a host provider is attached");
    }

    let server = BridgeServer::new(config, Arc::new(provider));
    if let Err(e) = server.run().await {
        eprintln!("mcp-lm-bridge: fatal error: {e}");
        std::process::exit(1);
    }
}
