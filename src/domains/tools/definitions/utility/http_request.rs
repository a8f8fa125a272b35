//! HTTP request tool definition.
//!
//! A generic outbound HTTP proxy. Requests use the blocking reqwest client,
//! so callers on the async runtime hand them to a dedicated OS thread.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use reqwest::blocking::Client;
use reqwest::{Method, Url};
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::core::config::{Config, HttpClientConfig};
use crate::domains::tools::definitions::common::{error_result, structured_result};
#[cfg(feature = "http")]
use crate::domains::tools::{ToolError, definitions::common::http_response};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the HTTP request tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct HttpRequestParams {
    /// Absolute http or https URL.
    pub url: String,

    /// HTTP method (default GET).
    #[serde(default)]
    pub method: Option<String>,

    /// Extra request headers.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Query parameters appended to the URL.
    #[serde(default)]
    pub query: BTreeMap<String, Value>,

    /// Request body. Strings are sent verbatim, anything else as JSON.
    #[serde(default)]
    pub body: Option<Value>,
}

/// What came back from the remote server.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponseSummary {
    pub url: String,
    pub method: String,
    pub status: u16,
    pub ok: bool,
    pub headers: BTreeMap<String, String>,
    /// Parsed JSON when the payload is JSON, raw text otherwise.
    pub body: Value,
    pub elapsed_ms: u64,
}

/// Errors raised while preparing or sending a request.
#[derive(Debug, thiserror::Error)]
pub enum HttpRequestError {
    #[error("Invalid 'url': {0}")]
    InvalidUrl(String),

    #[error("Invalid 'method': {0}")]
    InvalidMethod(String),

    #[error("Invalid header '{0}'")]
    InvalidHeader(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

// ============================================================================
// Tool Definition
// ============================================================================

/// HTTP request tool - proxies one request and reports the response.
pub struct HttpRequestTool;

impl HttpRequestTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "http_request";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Send an HTTP request (GET by default) to an http or https URL with optional headers, query parameters and body. Returns the status code, response headers, body (parsed as JSON when possible) and elapsed time.";

    /// Send the request described by `params`.
    pub fn send(
        params: &HttpRequestParams,
        settings: &HttpClientConfig,
    ) -> Result<HttpResponseSummary, HttpRequestError> {
        let mut url = parse_url(&params.url)?;
        let method = parse_method(params.method.as_deref())?;

        if !params.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &params.query {
                pairs.append_pair(key, &query_value(value));
            }
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.clone())
            .build()?;

        let mut request = client.request(method.clone(), url.clone());
        for (name, value) in &params.headers {
            if reqwest::header::HeaderName::from_bytes(name.as_bytes()).is_err() {
                return Err(HttpRequestError::InvalidHeader(name.clone()));
            }
            request = request.header(name.as_str(), value.as_str());
        }
        request = match &params.body {
            None | Some(Value::Null) => request,
            Some(Value::String(text)) => request.body(text.clone()),
            Some(other) => request.json(other),
        };

        let started = Instant::now();
        let response = request.send()?;
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let text = response.text()?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

        Ok(HttpResponseSummary {
            url: url.to_string(),
            method: method.to_string(),
            status: status.as_u16(),
            ok: status.is_success(),
            headers,
            body,
            elapsed_ms,
        })
    }

    /// Execute the tool logic. Blocks the calling thread.
    #[instrument(skip_all, fields(url = %params.url))]
    pub fn execute(params: &HttpRequestParams, config: &Config) -> CallToolResult {
        match Self::send(params, &config.http_client) {
            Ok(summary) => {
                info!(status = summary.status, elapsed_ms = summary.elapsed_ms, "HTTP request completed");
                let line = format!(
                    "{} {} -> HTTP {} in {} ms",
                    summary.method, summary.url, summary.status, summary.elapsed_ms
                );
                structured_result(line, summary)
            }
            Err(e) => {
                warn!("HTTP request to {} failed: {}", params.url, e);
                error_result(&e.to_string())
            }
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub fn http_handler(
        arguments: Value,
        config: Arc<Config>,
    ) -> Result<Value, ToolError> {
        let params: HttpRequestParams = serde_json::from_value(arguments)
            .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;

        // The blocking client starts its own runtime, so it needs a thread
        // outside the async runtime.
        let handle = std::thread::spawn(move || Self::execute(&params, &config));
        let result = handle
            .join()
            .map_err(|_| ToolError::internal("Thread panicked during HTTP request"))?;

        Ok(http_response(result))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<HttpRequestParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    pub fn create_route<S>(config: Arc<Config>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let config = config.clone();
            async move {
                let params: HttpRequestParams =
                    serde_json::from_value(Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

                let handle = std::thread::spawn(move || Self::execute(&params, &config));
                handle
                    .join()
                    .map_err(|_| McpError::internal_error("Thread panicked".to_string(), None))
            }
            .boxed()
        })
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn parse_url(raw: &str) -> Result<Url, HttpRequestError> {
    let url = Url::parse(raw.trim()).map_err(|e| HttpRequestError::InvalidUrl(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(HttpRequestError::InvalidUrl(format!(
            "scheme '{}' is not supported; use http or https",
            other
        ))),
    }
}

fn parse_method(raw: Option<&str>) -> Result<Method, HttpRequestError> {
    let name = raw.map(str::trim).filter(|m| !m.is_empty()).unwrap_or("GET");
    Method::from_bytes(name.to_ascii_uppercase().as_bytes())
        .map_err(|_| HttpRequestError::InvalidMethod(name.to_string()))
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
