//! Tools domain module.
//!
//! Tools are the only capability this server exposes. Every tool is
//! stateless: it parses its arguments, runs one calculation or one outbound
//! request, and returns a text summary plus structured content.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `router.rs` - Dynamic ToolRouter builder for STDIO/TCP transport
//! - `registry.rs` - Central tool registry and HTTP dispatch
//! - `error.rs` - Dispatch errors
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/experiment/` or `definitions/utility/`
//! 2. Define params, execute(), http_handler(), to_tool() and create_route()
//! 3. Export it in the group's `mod.rs` and in `definitions/mod.rs`
//! 4. Add the route in `router.rs` using `with_route()`
//! 5. Register it in `registry.rs` for listing and HTTP dispatch

pub mod definitions;
mod error;
mod registry;
pub mod router;

pub use error::ToolError;
pub use registry::ToolRegistry;
pub use router::build_tool_router;
