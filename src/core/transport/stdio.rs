//! STDIO transport: a single MCP session over the process's stdin and stdout.
//!
//! Only JSON-RPC frames may reach stdout, so all logging goes to stderr.

use rmcp::ServiceExt;
use tracing::{info, instrument};

use super::{TransportError, TransportResult};
use crate::core::McpServer;

/// Serve `server` until the client closes stdin.
#[instrument(skip_all, fields(server = %server.name()))]
pub async fn run(server: McpServer) -> TransportResult<()> {
    let tool_count = server.list_tools().len();

    let session = server
        .serve(rmcp::transport::stdio())
        .await
        .map_err(|e| TransportError::init(format!("MCP handshake over stdio failed: {}", e)))?;

    info!("Session open on stdio with {} experiment tools", tool_count);

    let reason = session
        .waiting()
        .await
        .map_err(|e| TransportError::service(format!("stdio session ended abnormally: {}", e)))?;

    info!("Stdio session closed: {:?}", reason);
    Ok(())
}
