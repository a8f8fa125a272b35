//! Experiment planning tools.
//!
//! Thin adapters over the analysis and validation domains: each one coerces
//! loosely typed arguments, runs the calculation and shapes the result.

pub mod conflicts;
pub mod flag_name;
pub mod metric_variance;
pub mod test_duration;

pub use conflicts::{ExperimentConflictsParams, ExperimentConflictsTool};
pub use flag_name::{FlagNameParams, FlagNameTool};
pub use metric_variance::{MetricVarianceParams, MetricVarianceTool};
pub use test_duration::{TestDurationParams, TestDurationTool};
