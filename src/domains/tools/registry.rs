//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools
//! - HTTP dispatch for tool calls (when http feature is enabled)
//! - Tool metadata for listing

use std::sync::Arc;
#[cfg(feature = "http")]
use tracing::warn;

use rmcp::model::Tool;

use crate::core::config::Config;
#[cfg(feature = "http")]
use super::ToolError;

use super::definitions::{
    ExperimentConflictsTool, FlagNameTool, FormatDateTool, GreetTool, HttpRequestTool,
    MetricVarianceTool, TestDurationTool,
};

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
///
/// This struct provides a central point for:
/// - Listing all available tools
/// - Dispatching HTTP tool calls (when http feature is enabled)
pub struct ToolRegistry {
    #[cfg_attr(not(feature = "http"), allow(dead_code))]
    config: Arc<Config>,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![
            GreetTool::NAME,
            FormatDateTool::NAME,
            HttpRequestTool::NAME,
            MetricVarianceTool::NAME,
            TestDurationTool::NAME,
            FlagNameTool::NAME,
            ExperimentConflictsTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// This is the single source of truth for all available tools.
    /// Both HTTP and STDIO/TCP transports use this to get tool metadata.
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            GreetTool::to_tool(),
            FormatDateTool::to_tool(),
            HttpRequestTool::to_tool(),
            MetricVarianceTool::to_tool(),
            TestDurationTool::to_tool(),
            FlagNameTool::to_tool(),
            ExperimentConflictsTool::to_tool(),
        ]
    }

    /// Dispatch an HTTP tool call to the appropriate handler.
    ///
    /// This is used by the HTTP transport to call tools.
    #[cfg(feature = "http")]
    pub fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        match name {
            GreetTool::NAME => GreetTool::http_handler(arguments),
            FormatDateTool::NAME => FormatDateTool::http_handler(arguments),
            HttpRequestTool::NAME => HttpRequestTool::http_handler(arguments, self.config.clone()),
            MetricVarianceTool::NAME => MetricVarianceTool::http_handler(arguments),
            TestDurationTool::NAME => TestDurationTool::http_handler(arguments),
            FlagNameTool::NAME => FlagNameTool::http_handler(arguments),
            ExperimentConflictsTool::NAME => ExperimentConflictsTool::http_handler(arguments),
            _ => {
                warn!("Unknown tool requested: {}", name);
                Err(ToolError::not_found(name))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Arc<Config> {
        Arc::new(Config::default())
    }

    #[test]
    fn test_registry_tool_names() {
        let registry = ToolRegistry::new(test_config());
        let names = registry.tool_names();
        assert_eq!(names.len(), 7);
        assert!(names.contains(&"greet"));
        assert!(names.contains(&"format_date"));
        assert!(names.contains(&"http_request"));
        assert!(names.contains(&"analyze_metric_variance"));
        assert!(names.contains(&"estimate_test_duration"));
        assert!(names.contains(&"validate_flag_name"));
        assert!(names.contains(&"detect_experiment_conflicts"));
    }

    #[test]
    fn test_all_tools_match_names() {
        let registry = ToolRegistry::new(test_config());
        let tools = ToolRegistry::get_all_tools();
        assert_eq!(tools.len(), registry.tool_names().len());
        for tool in &tools {
            assert!(registry.tool_names().contains(&tool.name.as_ref()));
            assert!(tool.description.is_some());
        }
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_registry_call_duration() {
        let registry = ToolRegistry::new(test_config());
        let result = registry
            .call_tool(
                "estimate_test_duration",
                serde_json::json!({
                    "dailyTraffic": 10000,
                    "baselineConversionRate": 0.05,
                    "minimumDetectableEffect": 0.1
                }),
            )
            .unwrap();
        assert_eq!(result["structuredContent"]["estimatedDays"], 7);
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_registry_call_unknown() {
        let registry = ToolRegistry::new(test_config());
        let result = registry.call_tool("unknown", serde_json::json!({}));
        assert!(matches!(result, Err(ToolError::NotFound(_))));
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_registry_call_invalid_arguments() {
        let registry = ToolRegistry::new(test_config());
        let result = registry.call_tool("greet", serde_json::json!({ "language": "fr" }));
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }
}
