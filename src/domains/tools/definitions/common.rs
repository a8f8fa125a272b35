//! Common utilities shared across tool definitions.
//!
//! Argument coercion for loosely typed callers, result builders, and the
//! HTTP response shape.

use rmcp::model::{CallToolResult, Content};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::domains::analysis::{AnalysisError, AnalysisResult};

/// A number that may arrive as a JSON number or as a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct NumberArg(pub Value);

impl NumberArg {
    /// Resolve to a finite `f64`, attributing failures to `field`.
    pub fn resolve(&self, field: &str) -> AnalysisResult<f64> {
        let value = match &self.0 {
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| AnalysisError::validation(field, "is not representable as a number"))?,
            Value::String(s) => s.trim().parse::<f64>().map_err(|_| {
                AnalysisError::validation(field, format!("'{}' is not a number", s))
            })?,
            other => {
                return Err(AnalysisError::validation(
                    field,
                    format!("expected a number, got {}", describe(other)),
                ));
            }
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(AnalysisError::validation(field, "must be a finite number"))
        }
    }

    /// Resolve to a non-negative whole number.
    pub fn resolve_count(&self, field: &str) -> AnalysisResult<u32> {
        let value = self.resolve(field)?;
        if value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
            return Err(AnalysisError::validation(
                field,
                format!("must be a whole number, got {}", value),
            ));
        }
        Ok(value as u32)
    }
}

/// Resolve an optional numeric argument, falling back to `default`.
pub fn resolve_or(arg: Option<&NumberArg>, field: &str, default: f64) -> AnalysisResult<f64> {
    arg.map_or(Ok(default), |a| a.resolve(field))
}

/// A list that may arrive as a JSON array or as a JSON-encoded string.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JsonList(pub Value);

impl JsonList {
    fn into_elements(self, field: &str) -> AnalysisResult<Vec<Value>> {
        let value = match self.0 {
            Value::String(raw) => serde_json::from_str(&raw).map_err(|e| {
                AnalysisError::validation(field, format!("is not valid JSON: {}", e))
            })?,
            other => other,
        };
        match value {
            Value::Array(items) => Ok(items),
            other => Err(AnalysisError::validation(
                field,
                format!("expected an array, got {}", describe(&other)),
            )),
        }
    }

    /// Decode every element as a `T`, attributing failures to `field`.
    pub fn into_items<T: DeserializeOwned>(self, field: &str) -> AnalysisResult<Vec<T>> {
        self.into_elements(field)?
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                serde_json::from_value(item).map_err(|e| {
                    AnalysisError::validation(format!("{}[{}]", field, i), e.to_string())
                })
            })
            .collect()
    }

    /// Decode every element as a number (numeric strings accepted).
    pub fn into_numbers(self, field: &str) -> AnalysisResult<Vec<f64>> {
        self.into_elements(field)?
            .into_iter()
            .enumerate()
            .map(|(i, item)| NumberArg(item).resolve(&format!("{}[{}]", field, i)))
            .collect()
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Create an error result with a formatted message.
pub fn error_result(message: &str) -> CallToolResult {
    warn!("{}", message);
    CallToolResult::error(vec![Content::text(message.to_string())])
}

/// Create a result carrying a text summary and structured content.
pub fn structured_result<T: Serialize>(summary: String, data: T) -> CallToolResult {
    match serde_json::to_value(&data) {
        Ok(structured) => CallToolResult {
            content: vec![Content::text(summary)],
            structured_content: Some(structured),
            is_error: Some(false),
            meta: None,
        },
        Err(e) => {
            warn!("Failed to serialize structured content: {}", e);
            CallToolResult::success(vec![Content::text(summary)])
        }
    }
}

/// Shape a tool result as the HTTP transport returns it.
#[cfg(feature = "http")]
pub fn http_response(result: CallToolResult) -> serde_json::Value {
    let mut response = serde_json::json!({
        "content": result.content,
        "isError": result.is_error.unwrap_or(false)
    });

    if let (Some(structured), Some(object)) = (result.structured_content, response.as_object_mut()) {
        object.insert("structuredContent".to_string(), structured);
    }

    response
}
