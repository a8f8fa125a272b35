//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod common;
pub mod experiment;
pub mod utility;

pub use experiment::{
    ExperimentConflictsParams, ExperimentConflictsTool, FlagNameParams, FlagNameTool,
    MetricVarianceParams, MetricVarianceTool, TestDurationParams, TestDurationTool,
};
pub use utility::{
    FormatDateParams, FormatDateTool, GreetParams, GreetTool, HttpRequestParams, HttpRequestTool,
};
