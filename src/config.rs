use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Default bind port of the bridge.
const DEFAULT_PORT: u16 = 22333;

/// Default bind host. Loopback only — the wire carries no authentication.
const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub tools_manifest: Option<PathBuf>,
}

impl ServerConfig {
    /// Load configuration from environment.
    ///
    /// - `LM_BRIDGE_HOST` (optional, default 127.0.0.1) — bind address
    /// - `LM_BRIDGE_PORT` (optional, default 22333) — bind port
    /// - `LM_BRIDGE_TOOLS` (optional) — path to a JSON manifest of
    ///   descriptor-only tools to serve
    pub fn from_env() -> Result<Self, String> {
        let host = match std::env::var("LM_BRIDGE_HOST") {
            Ok(val) => val
                .parse::<IpAddr>()
                .map_err(|_| "LM_BRIDGE_HOST must be an IP address".to_string())?,
            Err(_) => DEFAULT_HOST,
        };

        let port = match std::env::var("LM_BRIDGE_PORT") {
            Ok(val) => val
                .parse::<u16>()
                .map_err(|_| "LM_BRIDGE_PORT must be a port number".to_string())?,
            Err(_) => DEFAULT_PORT,
        };

        let tools_manifest = std::env::var("LM_BRIDGE_TOOLS").ok().map(PathBuf::from);

        Ok(Self {
            host,
            port,
            tools_manifest,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
