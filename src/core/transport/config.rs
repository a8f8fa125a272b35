//! Transport selection and listener settings.
//!
//! `MCP_TRANSPORT` picks the transport (`stdio`, `tcp` or `http`). Unknown or
//! missing values fall back to the first transport compiled in.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

#[cfg(any(feature = "tcp", feature = "http"))]
const DEFAULT_HOST: &str = "127.0.0.1";
#[cfg(feature = "tcp")]
const DEFAULT_TCP_PORT: u16 = 3000;
#[cfg(feature = "http")]
const DEFAULT_HTTP_PORT: u16 = 8080;

#[cfg(not(any(feature = "stdio", feature = "tcp", feature = "http")))]
compile_error!("At least one transport feature must be enabled: stdio, tcp, or http");

/// Which transport the server listens on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    #[cfg(feature = "stdio")]
    Stdio,

    #[cfg(feature = "tcp")]
    Tcp(TcpConfig),

    #[cfg(feature = "http")]
    Http(HttpConfig),
}

/// Raw TCP listener; every connection gets its own MCP session.
#[cfg(feature = "tcp")]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TcpConfig {
    pub host: String,
    pub port: u16,
}

/// Stateless HTTP listener for JSON-RPC calls and tool discovery.
#[cfg(feature = "http")]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,

    /// POST endpoint accepting JSON-RPC requests.
    pub rpc_path: String,

    /// GET endpoint listing the experiment tools and their schemas.
    pub tools_path: String,

    pub enable_cors: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        #[cfg(feature = "stdio")]
        let fallback = Self::Stdio;
        #[cfg(all(not(feature = "stdio"), feature = "tcp"))]
        let fallback = Self::Tcp(TcpConfig::default());
        #[cfg(all(not(feature = "stdio"), not(feature = "tcp"), feature = "http"))]
        let fallback = Self::Http(HttpConfig::default());
        fallback
    }
}

#[cfg(feature = "tcp")]
impl Default for TcpConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_TCP_PORT,
        }
    }
}

#[cfg(feature = "http")]
impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_HTTP_PORT,
            rpc_path: "/mcp".to_string(),
            tools_path: "/tools".to_string(),
            enable_cors: true,
        }
    }
}

impl TransportConfig {
    /// Read the transport choice and its listener settings from `MCP_*` variables.
    pub fn from_env() -> Self {
        let transport = std::env::var("MCP_TRANSPORT")
            .unwrap_or_default()
            .to_lowercase();

        match transport.as_str() {
            #[cfg(feature = "tcp")]
            "tcp" => Self::Tcp(TcpConfig::from_env()),
            #[cfg(feature = "http")]
            "http" => Self::Http(HttpConfig::from_env()),
            "" => Self::default(),
            other => {
                let fallback = Self::default();
                warn!("Unknown MCP_TRANSPORT '{}', using {}", other, fallback);
                fallback
            }
        }
    }
}

#[cfg(feature = "tcp")]
impl TcpConfig {
    fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("MCP_TCP_HOST").unwrap_or(defaults.host),
            port: env_port("MCP_TCP_PORT", defaults.port),
        }
    }
}

#[cfg(feature = "http")]
impl HttpConfig {
    fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("MCP_HTTP_HOST").unwrap_or(defaults.host),
            port: env_port("MCP_HTTP_PORT", defaults.port),
            rpc_path: std::env::var("MCP_HTTP_PATH").unwrap_or(defaults.rpc_path),
            tools_path: std::env::var("MCP_HTTP_TOOLS_PATH").unwrap_or(defaults.tools_path),
            enable_cors: std::env::var("MCP_HTTP_CORS")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(defaults.enable_cors),
        }
    }
}

#[cfg(any(feature = "tcp", feature = "http"))]
fn env_port(var: &str, default: u16) -> u16 {
    match std::env::var(var) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {} '{}', using {}", var, raw, default);
            default
        }),
        Err(_) => default,
    }
}

impl fmt::Display for TransportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "stdio")]
            Self::Stdio => write!(f, "STDIO"),
            #[cfg(feature = "tcp")]
            Self::Tcp(cfg) => write!(f, "TCP on {}:{}", cfg.host, cfg.port),
            #[cfg(feature = "http")]
            Self::Http(cfg) => write!(
                f,
                "HTTP on {}:{} (rpc {}, tools {})",
                cfg.host, cfg.port, cfg.rpc_path, cfg.tools_path
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[cfg(feature = "stdio")]
    #[test]
    fn test_default_is_stdio() {
        let config = TransportConfig::default();
        assert_eq!(config, TransportConfig::Stdio);
        assert_eq!(config.to_string(), "STDIO");
    }

    #[cfg(feature = "stdio")]
    #[test]
    fn test_unknown_transport_falls_back() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_TRANSPORT", "carrier-pigeon");
        }
        assert_eq!(TransportConfig::from_env(), TransportConfig::Stdio);
        unsafe {
            std::env::remove_var("MCP_TRANSPORT");
        }
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_TRANSPORT", "HTTP");
            std::env::set_var("MCP_HTTP_PORT", "not-a-port");
            std::env::set_var("MCP_HTTP_TOOLS_PATH", "/catalog");
            std::env::set_var("MCP_HTTP_CORS", "0");
        }
        let config = TransportConfig::from_env();
        unsafe {
            std::env::remove_var("MCP_TRANSPORT");
            std::env::remove_var("MCP_HTTP_PORT");
            std::env::remove_var("MCP_HTTP_TOOLS_PATH");
            std::env::remove_var("MCP_HTTP_CORS");
        }

        let TransportConfig::Http(http) = config else {
            panic!("expected HTTP transport");
        };
        assert_eq!(http.port, DEFAULT_HTTP_PORT);
        assert_eq!(http.rpc_path, "/mcp");
        assert_eq!(http.tools_path, "/catalog");
        assert!(!http.enable_cors);
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_config_deserializes_with_defaults() {
        let config: TransportConfig =
            serde_json::from_value(serde_json::json!({ "type": "http", "port": 8081 })).unwrap();
        assert_eq!(
            config.to_string(),
            "HTTP on 127.0.0.1:8081 (rpc /mcp, tools /tools)"
        );
    }

    #[cfg(feature = "tcp")]
    #[test]
    fn test_tcp_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_TRANSPORT", "tcp");
            std::env::set_var("MCP_TCP_PORT", "4100");
        }
        let config = TransportConfig::from_env();
        unsafe {
            std::env::remove_var("MCP_TRANSPORT");
            std::env::remove_var("MCP_TCP_PORT");
        }
        assert_eq!(config.to_string(), "TCP on 127.0.0.1:4100");
    }
}
