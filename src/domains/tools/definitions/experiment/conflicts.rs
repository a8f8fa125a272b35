//! Experiment conflict detection tool definition.
//!
//! Compares running experiments pairwise and reports shared pages, traffic
//! over-allocation and shared metrics.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::domains::analysis::AnalysisResult;
use crate::domains::tools::definitions::common::{JsonList, error_result, structured_result};
#[cfg(feature = "http")]
use crate::domains::tools::{ToolError, definitions::common::http_response};
use crate::domains::validation::{ConflictReport, ExperimentDescriptor, detect_conflicts};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the experiment conflict tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentConflictsParams {
    /// Experiments as an array (or JSON-encoded array string) of objects with
    /// id, name, trafficAllocation, pages, metrics, audience, startDate and
    /// endDate.
    pub experiments: JsonList,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Experiment conflict tool - pairwise overlap heuristics.
pub struct ExperimentConflictsTool;

impl ExperimentConflictsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "detect_experiment_conflicts";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Detect conflicts between concurrently running experiments: shared pages, combined traffic allocation above 100% for the same audience, and shared success metrics. Experiments whose date ranges do not overlap are never compared.";

    /// Compare the experiments without wrapping the report in a tool result.
    pub fn detect(params: &ExperimentConflictsParams) -> AnalysisResult<ConflictReport> {
        let experiments: Vec<ExperimentDescriptor> =
            params.experiments.clone().into_items("experiments")?;
        detect_conflicts(&experiments)
    }

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    #[instrument(skip_all)]
    pub fn execute(params: &ExperimentConflictsParams) -> CallToolResult {
        let report = match Self::detect(params) {
            Ok(report) => report,
            Err(e) => return error_result(&format!("Conflict detection failed: {}", e)),
        };

        info!(
            experiments = report.total_experiments,
            conflicts = report.conflicts.len(),
            "Experiment conflicts checked"
        );

        let summary = if report.has_conflicts {
            format!(
                "{} conflict(s) across {} experiments ({} high severity)",
                report.conflicts.len(),
                report.total_experiments,
                report.high_severity_count
            )
        } else {
            format!(
                "No conflicts across {} experiments ({} overlapping pair(s) compared)",
                report.total_experiments, report.pairs_compared
            )
        };

        structured_result(summary, report)
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub fn http_handler(arguments: serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let params: ExperimentConflictsParams = serde_json::from_value(arguments)
            .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;
        Ok(http_response(Self::execute(&params)))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<ExperimentConflictsParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    pub fn create_route<S>() -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            async move {
                let params: ExperimentConflictsParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params))
            }
            .boxed()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: serde_json::Value) -> ExperimentConflictsParams {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_detects_page_and_traffic_overlap() {
        let report = ExperimentConflictsTool::detect(&params(json!({
            "experiments": [
                { "id": "checkout-a", "trafficAllocation": 60, "pages": ["/checkout"] },
                { "id": "checkout-b", "trafficAllocation": 50, "pages": ["/Checkout "] }
            ]
        })))
        .unwrap();

        assert!(report.has_conflicts);
        assert_eq!(report.high_severity_count, 1);
        assert_eq!(report.conflicts.len(), 2);
    }

    #[test]
    fn test_accepts_encoded_array() {
        let encoded = r#"[{"id": "a", "metrics": ["ctr"]}, {"id": "b", "metrics": ["CTR"]}]"#;
        let report =
            ExperimentConflictsTool::detect(&params(json!({ "experiments": encoded }))).unwrap();
        assert_eq!(report.conflicts.len(), 1);
        assert_eq!(report.high_severity_count, 0);
    }

    #[test]
    fn test_missing_id_names_record() {
        let err = ExperimentConflictsTool::detect(&params(json!({
            "experiments": [{ "id": "a" }, { "pages": ["/home"] }]
        })))
        .unwrap_err();
        assert_eq!(err.field(), Some("experiments[1]"));
    }

    #[test]
    fn test_execute_reports_invalid_allocation() {
        let result = ExperimentConflictsTool::execute(&params(json!({
            "experiments": [{ "id": "a", "trafficAllocation": 140 }]
        })));
        assert!(result.is_error.unwrap_or(false));
    }

    #[test]
    fn test_execute_structured_content() {
        let result = ExperimentConflictsTool::execute(&params(json!({
            "experiments": [
                { "id": "a", "pages": ["/home"], "startDate": "2026-01-01", "endDate": "2026-01-31" },
                { "id": "b", "pages": ["/home"], "startDate": "2026-02-01" }
            ]
        })));
        let structured = result.structured_content.unwrap();
        assert_eq!(structured["hasConflicts"], false);
        assert_eq!(structured["pairsCompared"], 0);
    }
}
