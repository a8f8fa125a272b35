//! Feature flag naming tool definition.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::domains::analysis::AnalysisResult;
use crate::domains::tools::definitions::common::{NumberArg, error_result, structured_result};
#[cfg(feature = "http")]
use crate::domains::tools::{ToolError, definitions::common::http_response};
use crate::domains::validation::naming::DEFAULT_MAX_LENGTH;
use crate::domains::validation::{FlagNameReport, NamingConvention, check_flag_name};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the flag name validation tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlagNameParams {
    /// Flag name to check.
    pub flag_name: String,

    /// snake_case (default), camelCase, PascalCase, kebab-case or
    /// SCREAMING_SNAKE_CASE.
    #[serde(default)]
    pub convention: Option<String>,

    /// Longest accepted name (default 64).
    #[serde(default)]
    pub max_length: Option<NumberArg>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Flag name tool - checks a flag name against a naming convention.
pub struct FlagNameTool;

impl FlagNameTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "validate_flag_name";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Validate a feature flag name against a naming convention (snake_case, camelCase, PascalCase, kebab-case, SCREAMING_SNAKE_CASE). Reports each rule as pass, fail or warning and suggests a corrected name.";

    /// Run every rule without wrapping the report in a tool result.
    pub fn check(params: &FlagNameParams) -> AnalysisResult<FlagNameReport> {
        let convention = match params.convention.as_deref() {
            Some(value) => NamingConvention::parse(value)?,
            None => NamingConvention::SnakeCase,
        };
        let max_length = match &params.max_length {
            Some(arg) => arg.resolve_count("maxLength")? as usize,
            None => DEFAULT_MAX_LENGTH,
        };
        check_flag_name(&params.flag_name, convention, max_length)
    }

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    #[instrument(skip_all, fields(flag = %params.flag_name))]
    pub fn execute(params: &FlagNameParams) -> CallToolResult {
        let report = match Self::check(params) {
            Ok(report) => report,
            Err(e) => return error_result(&format!("Flag name validation failed: {}", e)),
        };

        debug!(valid = report.valid, failed = report.failed_count, "Flag name checked");

        let mut summary = format!(
            "'{}' is {} as {} ({} failed, {} warning(s))",
            report.flag_name,
            if report.valid { "valid" } else { "invalid" },
            report.convention.as_str(),
            report.failed_count,
            report.warning_count
        );
        if let Some(suggested) = &report.suggested_name {
            summary.push_str(&format!("; suggested name: {}", suggested));
        }

        structured_result(summary, report)
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub fn http_handler(arguments: serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let params: FlagNameParams = serde_json::from_value(arguments)
            .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;
        Ok(http_response(Self::execute(&params)))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<FlagNameParams>(),
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
                let params: FlagNameParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params))
            }
            .boxed()
        })
    }
}
