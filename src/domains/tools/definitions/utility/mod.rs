//! General-purpose utility tools.

pub mod format_date;
pub mod greet;
pub mod http_request;

pub use format_date::{FormatDateParams, FormatDateTool};
pub use greet::{GreetParams, GreetTool};
pub use http_request::{HttpRequestParams, HttpRequestTool};
