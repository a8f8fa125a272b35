//! Greeting tool definition.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domains::analysis::{AnalysisError, AnalysisResult};
use crate::domains::tools::definitions::common::{error_result, structured_result};
#[cfg(feature = "http")]
use crate::domains::tools::{ToolError, definitions::common::http_response};

/// Parameters for the greeting tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GreetParams {
    /// Who to greet.
    pub name: String,

    /// Language code: en (default), es, fr or de.
    #[serde(default)]
    pub language: Option<String>,
}

/// Greeting returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Greeting {
    pub greeting: String,
    pub language: &'static str,
}

/// Greeting tool - says hello in a handful of languages.
pub struct GreetTool;

impl GreetTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "greet";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Greet someone by name. Supports English (en), Spanish (es), French (fr) and German (de); other languages fall back to English.";

    /// Build the greeting for `params`.
    pub fn greet(params: &GreetParams) -> AnalysisResult<Greeting> {
        let name = params.name.trim();
        if name.is_empty() {
            return Err(AnalysisError::validation("name", "must not be empty"));
        }

        let language = params
            .language
            .as_deref()
            .map(|l| l.trim().to_ascii_lowercase())
            .unwrap_or_default();

        let (language, greeting) = match language.as_str() {
            "es" => ("es", format!("¡Hola, {}!", name)),
            "fr" => ("fr", format!("Bonjour, {} !", name)),
            "de" => ("de", format!("Hallo, {}!", name)),
            _ => ("en", format!("Hello, {}!", name)),
        };

        Ok(Greeting { greeting, language })
    }

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    #[instrument(skip_all)]
    pub fn execute(params: &GreetParams) -> CallToolResult {
        match Self::greet(params) {
            Ok(greeting) => {
                debug!(language = greeting.language, "Greeting built");
                structured_result(greeting.greeting.clone(), greeting)
            }
            Err(e) => error_result(&format!("Greeting failed: {}", e)),
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub fn http_handler(arguments: serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let params: GreetParams = serde_json::from_value(arguments)
            .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;
        Ok(http_response(Self::execute(&params)))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<GreetParams>(),
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
                let params: GreetParams = serde_json::from_value(serde_json::Value::Object(args))
                    .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params))
            }
            .boxed()
        })
    }
}
