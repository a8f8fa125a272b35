//! Date formatting tool definition.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domains::analysis::{AnalysisError, AnalysisResult};
use crate::domains::tools::definitions::common::{NumberArg, error_result, structured_result};
#[cfg(feature = "http")]
use crate::domains::tools::{ToolError, definitions::common::http_response};

const DEFAULT_FORMAT: &str = "%Y-%m-%d";
const MAX_OFFSET_MINUTES: i32 = 24 * 60 - 1;

/// Parameters for the date formatting tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormatDateParams {
    /// RFC 3339 timestamp or YYYY-MM-DD date; defaults to now (UTC).
    #[serde(default)]
    pub date: Option<String>,

    /// strftime pattern, e.g. "%d/%m/%Y %H:%M" (default "%Y-%m-%d").
    #[serde(default)]
    pub format: Option<String>,

    /// Offset from UTC in minutes used for rendering (default 0).
    #[serde(default)]
    pub timezone_offset_minutes: Option<NumberArg>,
}

/// A rendered date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedDate {
    pub formatted: String,
    pub format: String,
    pub iso8601: String,
    pub unix_timestamp: i64,
    pub timezone_offset_minutes: i32,
}

/// Date formatting tool.
pub struct FormatDateTool;

impl FormatDateTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "format_date";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Format a date with a strftime pattern. Accepts an RFC 3339 timestamp or a YYYY-MM-DD date (default: now, UTC) and an optional timezone offset in minutes. Returns the formatted text, the ISO 8601 form and the Unix timestamp.";

    /// Render `params`, treating a missing date as `now`.
    pub fn format(params: &FormatDateParams, now: DateTime<Utc>) -> AnalysisResult<FormattedDate> {
        let offset_minutes = match &params.timezone_offset_minutes {
            Some(arg) => {
                let minutes = arg.resolve("timezoneOffsetMinutes")?;
                if minutes.fract() != 0.0 || minutes.abs() > f64::from(MAX_OFFSET_MINUTES) {
                    return Err(AnalysisError::validation(
                        "timezoneOffsetMinutes",
                        format!(
                            "must be a whole number between -{0} and {0}, got {1}",
                            MAX_OFFSET_MINUTES, minutes
                        ),
                    ));
                }
                minutes as i32
            }
            None => 0,
        };
        let offset = FixedOffset::east_opt(offset_minutes * 60).ok_or_else(|| {
            AnalysisError::validation("timezoneOffsetMinutes", "is out of range")
        })?;

        let instant = match params.date.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => parse_date(raw)?,
            _ => now,
        };

        let pattern = params.format.as_deref().unwrap_or(DEFAULT_FORMAT);
        validate_pattern(pattern)?;

        let local = instant.with_timezone(&offset);
        Ok(FormattedDate {
            formatted: local.format(pattern).to_string(),
            format: pattern.to_string(),
            iso8601: local.to_rfc3339(),
            unix_timestamp: instant.timestamp(),
            timezone_offset_minutes: offset_minutes,
        })
    }

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    #[instrument(skip_all)]
    pub fn execute(params: &FormatDateParams) -> CallToolResult {
        match Self::format(params, Utc::now()) {
            Ok(date) => structured_result(date.formatted.clone(), date),
            Err(e) => error_result(&format!("Date formatting failed: {}", e)),
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub fn http_handler(arguments: serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let params: FormatDateParams = serde_json::from_value(arguments)
            .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;
        Ok(http_response(Self::execute(&params)))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<FormatDateParams>(),
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
                let params: FormatDateParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params))
            }
            .boxed()
        })
    }
}

fn parse_date(raw: &str) -> AnalysisResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            AnalysisError::validation(
                "date",
                format!("'{}' is neither RFC 3339 nor YYYY-MM-DD", raw),
            )
        })
}

// Rendering an invalid pattern panics inside chrono's Display impl.
fn validate_pattern(pattern: &str) -> AnalysisResult<()> {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(AnalysisError::validation(
            "format",
            format!("'{}' is not a valid strftime pattern", pattern),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 15, 9, 26).unwrap()
    }

    fn params(value: serde_json::Value) -> FormatDateParams {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_defaults_to_now() {
        let date = FormatDateTool::format(&FormatDateParams::default(), fixed_now()).unwrap();
        assert_eq!(date.formatted, "2026-03-14");
        assert_eq!(date.unix_timestamp, fixed_now().timestamp());
    }

    #[test]
    fn test_plain_date_and_pattern() {
        let date = FormatDateTool::format(
            &params(json!({ "date": "2024-02-29", "format": "%d/%m/%Y" })),
            fixed_now(),
        )
        .unwrap();
        assert_eq!(date.formatted, "29/02/2024");
        assert_eq!(date.iso8601, "2024-02-29T00:00:00+00:00");
    }

    #[test]
    fn test_offset_shifts_rendering() {
        let date = FormatDateTool::format(
            &params(json!({
                "date": "2026-03-14T23:30:00Z",
                "format": "%Y-%m-%d %H:%M",
                "timezoneOffsetMinutes": 120
            })),
            fixed_now(),
        )
        .unwrap();
        assert_eq!(date.formatted, "2026-03-15 01:30");
        assert_eq!(date.iso8601, "2026-03-15T01:30:00+02:00");
    }

    #[test]
    fn test_invalid_inputs_name_fields() {
        let err = FormatDateTool::format(&params(json!({ "date": "14 March" })), fixed_now())
            .unwrap_err();
        assert_eq!(err.field(), Some("date"));

        let err = FormatDateTool::format(&params(json!({ "format": "%Q" })), fixed_now())
            .unwrap_err();
        assert_eq!(err.field(), Some("format"));

        let err = FormatDateTool::format(
            &params(json!({ "timezoneOffsetMinutes": 5000 })),
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err.field(), Some("timezoneOffsetMinutes"));
    }

    #[test]
    fn test_execute_structured_content() {
        let result = FormatDateTool::execute(&params(json!({ "date": "2024-01-01T00:00:00Z" })));
        let structured = result.structured_content.unwrap();
        assert_eq!(structured["unixTimestamp"], 1704067200);
    }
}
