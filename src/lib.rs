//! Experiment Tools Server Library
//!
//! An MCP server exposing stateless tools for planning A/B experiments:
//! metric variance analysis, sample size and duration estimation, feature
//! flag naming checks and experiment conflict detection, plus a few general
//! utilities.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the MCP server and transports
//! - **domains**: business logic organized by bounded contexts
//!   - **analysis**: pure statistics (descriptive stats, outliers, stability, duration)
//!   - **validation**: rule evaluators (flag naming, experiment conflicts)
//!   - **tools**: MCP tool definitions wrapping the two domains above
//!
//! # Example
//!
//! ```rust,no_run
//! use experiment_tools_server::{core::McpServer, core::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config);
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
