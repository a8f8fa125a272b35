//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol. Tools are the only capability: every tool is routed through the
//! rmcp `ToolRouter` for STDIO/TCP and through the `ToolRegistry` for HTTP.
//!
//! The ToolRouter is built dynamically in `domains/tools/router.rs`.
//! **Adding a new tool does NOT require modifying this file!**

use rmcp::{ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler};
use std::sync::Arc;
#[cfg(feature = "http")]
use tracing::debug;

use super::config::Config;
use crate::domains::tools::build_tool_router;

#[cfg(feature = "http")]
use crate::domains::tools::{ToolError, ToolRegistry};

const INSTRUCTIONS: &str = "Experiment planning tools. Use analyze_metric_variance to check whether a metric is stable enough to test on, estimate_test_duration to size an A/B test, validate_flag_name to check feature flag names, and detect_experiment_conflicts to find overlapping experiments. greet, format_date and http_request are general utilities.";

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp and owns the
/// tool router built from the tool definitions.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);

        Self {
            tool_router: build_tool_router::<Self>(config.clone()),
            config,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration (for tool access).
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport and discovery).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    ///
    /// Dispatches through the ToolRegistry; each tool's http_handler is
    /// defined in its own file under `domains/tools/definitions/`.
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        debug!("Dispatching HTTP tool call: {}", name);
        let registry = ToolRegistry::new(self.config.clone());
        registry.call_tool(name, arguments)
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_info_tools_only() {
        let server = McpServer::new(Config::default());
        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_none());
        assert!(info.capabilities.prompts.is_none());
        assert_eq!(info.server_info.name, server.name());
    }

    #[test]
    fn test_list_tools_has_schemas() {
        let server = McpServer::new(Config::default());
        let tools = server.list_tools();
        assert_eq!(tools.len(), 7);
        for tool in &tools {
            assert!(tool["inputSchema"].is_object());
        }
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_call_tool_variance() {
        let server = McpServer::new(Config::default());
        let response = server
            .call_tool(
                "analyze_metric_variance",
                serde_json::json!({ "metricValues": [10, 12, 11, 13, 10] }),
            )
            .await
            .unwrap();
        assert_eq!(response["isError"], false);
        assert_eq!(response["structuredContent"]["statistics"]["sampleSize"], 5);
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_call_tool_reports_domain_error() {
        let server = McpServer::new(Config::default());
        let response = server
            .call_tool(
                "estimate_test_duration",
                serde_json::json!({
                    "dailyTraffic": 10000,
                    "baselineConversionRate": 1.5,
                    "minimumDetectableEffect": 0.1
                }),
            )
            .await
            .unwrap();
        assert_eq!(response["isError"], true);
        let text = response["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("baselineConversionRate"));
    }
}
