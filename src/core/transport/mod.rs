//! Transports that carry MCP traffic to the experiment tools.
//!
//! Each transport is behind a cargo feature:
//! - `stdio` (default): one session over stdin/stdout, for MCP clients that
//!   spawn the server as a subprocess.
//! - `tcp`: line-delimited JSON-RPC, one rmcp session per connection.
//! - `http`: stateless JSON-RPC over POST plus `GET` tool discovery, built on
//!   axum and tower-http.
//!
//! [`TransportService`] picks the transport named by [`TransportConfig`].

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;
#[cfg(feature = "stdio")]
pub mod stdio;
#[cfg(feature = "tcp")]
pub mod tcp;

#[cfg(feature = "http")]
pub use config::HttpConfig;
#[cfg(feature = "tcp")]
pub use config::TcpConfig;
pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;
