//! Metric variance tool definition.
//!
//! Summarises a series of metric observations and judges whether the metric
//! is stable enough to drive an experiment.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::domains::analysis::{AnalysisResult, ObservationSet, VarianceAnalysis};
use crate::domains::tools::definitions::common::{JsonList, error_result, structured_result};
#[cfg(feature = "http")]
use crate::domains::tools::{ToolError, definitions::common::http_response};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the metric variance tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricVarianceParams {
    /// Historical observations of the metric, as an array of numbers or a
    /// JSON-encoded array string.
    pub metric_values: JsonList,

    /// Optional metric label echoed in the report.
    #[serde(default)]
    pub metric_name: Option<String>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Metric variance tool - descriptive statistics, outliers and stability.
pub struct MetricVarianceTool;

impl MetricVarianceTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "analyze_metric_variance";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Analyze the variance of a metric series. Returns mean, median, variance, standard deviation, coefficient of variation and quartiles, flags outliers with Tukey fences, and scores the metric's stability for A/B testing.";

    /// Run the analysis without wrapping it in a tool result.
    pub fn analyze(params: &MetricVarianceParams) -> AnalysisResult<VarianceAnalysis> {
        let values = params.metric_values.clone().into_numbers("metricValues")?;
        let set = ObservationSet::new(values, "metricValues")?;
        VarianceAnalysis::analyze(&set, params.metric_name.clone())
    }

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    #[instrument(skip_all, fields(metric = ?params.metric_name))]
    pub fn execute(params: &MetricVarianceParams) -> CallToolResult {
        let analysis = match Self::analyze(params) {
            Ok(analysis) => analysis,
            Err(e) => return error_result(&format!("Metric variance analysis failed: {}", e)),
        };

        info!(
            sample_size = analysis.statistics.sample_size,
            score = analysis.stability.score,
            "Metric variance analysed"
        );

        let summary = format!(
            "{}: n={}, mean={:.4}, sd={:.4}, CV={:.2}%, {} outlier(s), stability {:.1} ({}){}",
            analysis.metric_name.as_deref().unwrap_or("Metric"),
            analysis.statistics.sample_size,
            analysis.statistics.mean,
            analysis.statistics.standard_deviation,
            analysis.statistics.coefficient_of_variation,
            analysis.outliers.count,
            analysis.stability.score,
            analysis.stability.rating.as_str(),
            if analysis.stability.usable_for_testing {
                ""
            } else {
                ", not usable for testing"
            }
        );

        structured_result(summary, analysis)
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub fn http_handler(arguments: serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let params: MetricVarianceParams = serde_json::from_value(arguments)
            .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;
        Ok(http_response(Self::execute(&params)))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<MetricVarianceParams>(),
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
                let params: MetricVarianceParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params))
            }
            .boxed()
        })
    }
}
