//! Test duration tool definition.
//!
//! Estimates the sample size and number of days an A/B test needs to detect
//! a relative lift at the requested power and significance.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::domains::analysis::duration::{DEFAULT_POWER, DEFAULT_SIGNIFICANCE, DEFAULT_VARIANTS};
use crate::domains::analysis::{AnalysisResult, DurationEstimate, DurationInput};
use crate::domains::tools::definitions::common::{
    NumberArg, error_result, resolve_or, structured_result,
};
#[cfg(feature = "http")]
use crate::domains::tools::{ToolError, definitions::common::http_response};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the test duration tool. Numbers may be sent as strings.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestDurationParams {
    /// Visitors entering the experiment per day.
    pub daily_traffic: NumberArg,

    /// Current conversion rate, strictly between 0 and 1.
    pub baseline_conversion_rate: NumberArg,

    /// Relative lift to detect, e.g. 0.1 for +10%.
    pub minimum_detectable_effect: NumberArg,

    /// Probability of detecting a real effect (default 0.8).
    #[serde(default)]
    pub statistical_power: Option<NumberArg>,

    /// Two-sided false positive rate (default 0.05).
    #[serde(default)]
    pub significance_level: Option<NumberArg>,

    /// Arms including control (default 2).
    #[serde(default)]
    pub number_of_variants: Option<NumberArg>,
}

impl TestDurationParams {
    /// Resolve loosely typed arguments into a calculation input.
    pub fn to_input(&self) -> AnalysisResult<DurationInput> {
        let number_of_variants = match &self.number_of_variants {
            Some(arg) => arg.resolve_count("numberOfVariants")?,
            None => DEFAULT_VARIANTS,
        };

        Ok(DurationInput {
            daily_traffic: self.daily_traffic.resolve("dailyTraffic")?,
            baseline_conversion_rate: self
                .baseline_conversion_rate
                .resolve("baselineConversionRate")?,
            minimum_detectable_effect: self
                .minimum_detectable_effect
                .resolve("minimumDetectableEffect")?,
            statistical_power: resolve_or(
                self.statistical_power.as_ref(),
                "statisticalPower",
                DEFAULT_POWER,
            )?,
            significance_level: resolve_or(
                self.significance_level.as_ref(),
                "significanceLevel",
                DEFAULT_SIGNIFICANCE,
            )?,
            number_of_variants,
        })
    }
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Test duration tool - required sample size and calendar duration.
pub struct TestDurationTool;

impl TestDurationTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "estimate_test_duration";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Estimate how long an A/B test must run. Given daily traffic, baseline conversion rate and minimum detectable effect (relative), returns the required sample size per variant, total sample size, estimated days and weeks, and planning recommendations.";

    /// Run the estimate without wrapping it in a tool result.
    pub fn estimate(params: &TestDurationParams) -> AnalysisResult<DurationEstimate> {
        DurationEstimate::estimate(&params.to_input()?)
    }

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    #[instrument(skip_all)]
    pub fn execute(params: &TestDurationParams) -> CallToolResult {
        let estimate = match Self::estimate(params) {
            Ok(estimate) => estimate,
            Err(e) => return error_result(&format!("Test duration estimate failed: {}", e)),
        };

        info!(
            per_variant = estimate.required_sample_size_per_variant,
            days = estimate.estimated_days,
            "Test duration estimated"
        );

        let summary = format!(
            "{} visitors per variant ({} total) across {} variants: about {} day(s) ({} week(s)) at {:.0} visitors/day per variant",
            estimate.required_sample_size_per_variant,
            estimate.total_sample_size,
            estimate.number_of_variants,
            estimate.estimated_days,
            estimate.estimated_weeks,
            estimate.daily_traffic_per_variant
        );

        structured_result(summary, estimate)
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub fn http_handler(arguments: serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let params: TestDurationParams = serde_json::from_value(arguments)
            .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;
        Ok(http_response(Self::execute(&params)))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<TestDurationParams>(),
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
                let params: TestDurationParams =
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

    fn params(value: serde_json::Value) -> TestDurationParams {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_reference_estimate() {
        let estimate = TestDurationTool::estimate(&params(json!({
            "dailyTraffic": 10000,
            "baselineConversionRate": 0.05,
            "minimumDetectableEffect": 0.1
        })))
        .unwrap();

        assert_eq!(estimate.required_sample_size_per_variant, 31232);
        assert_eq!(estimate.total_sample_size, 62464);
        assert_eq!(estimate.estimated_days, 7);
        assert_eq!(estimate.number_of_variants, 2);
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let estimate = TestDurationTool::estimate(&params(json!({
            "dailyTraffic": "10000",
            "baselineConversionRate": "0.05",
            "minimumDetectableEffect": "0.1",
            "statisticalPower": "0.8",
            "significanceLevel": "0.05",
            "numberOfVariants": "2"
        })))
        .unwrap();
        assert_eq!(estimate.required_sample_size_per_variant, 31232);
    }

    #[test]
    fn test_invalid_baseline_names_field() {
        let err = TestDurationTool::estimate(&params(json!({
            "dailyTraffic": 10000,
            "baselineConversionRate": 1.5,
            "minimumDetectableEffect": 0.1
        })))
        .unwrap_err();
        assert_eq!(err.field(), Some("baselineConversionRate"));
    }

    #[test]
    fn test_non_numeric_traffic_names_field() {
        let err = TestDurationTool::estimate(&params(json!({
            "dailyTraffic": "plenty",
            "baselineConversionRate": 0.05,
            "minimumDetectableEffect": 0.1
        })))
        .unwrap_err();
        assert_eq!(err.field(), Some("dailyTraffic"));
    }

    #[test]
    fn test_fractional_variants_rejected() {
        let err = TestDurationTool::estimate(&params(json!({
            "dailyTraffic": 10000,
            "baselineConversionRate": 0.05,
            "minimumDetectableEffect": 0.1,
            "numberOfVariants": 2.5
        })))
        .unwrap_err();
        assert_eq!(err.field(), Some("numberOfVariants"));
    }

    #[test]
    fn test_execute_reports_error_result() {
        let result = TestDurationTool::execute(&params(json!({
            "dailyTraffic": 0,
            "baselineConversionRate": 0.05,
            "minimumDetectableEffect": 0.1
        })));
        assert!(result.is_error.unwrap_or(false));
    }

    #[test]
    fn test_execute_structured_content() {
        let result = TestDurationTool::execute(&params(json!({
            "dailyTraffic": 10000,
            "baselineConversionRate": 0.05,
            "minimumDetectableEffect": 0.1
        })));
        let structured = result.structured_content.unwrap();
        assert_eq!(structured["requiredSampleSizePerVariant"], 31232);
        assert_eq!(structured["estimatedWeeks"], 1);
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_handler_missing_traffic() {
        let result = TestDurationTool::http_handler(json!({
            "baselineConversionRate": 0.05,
            "minimumDetectableEffect": 0.1
        }));
        assert!(result.is_err());
    }
}
