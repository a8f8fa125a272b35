//! Analysis domain module.
//!
//! Pure, synchronous statistics used by the experiment tools. Nothing in
//! this module performs I/O or keeps state between calls; every function
//! takes explicit inputs and returns a value object or an [`AnalysisError`].
//!
//! - `descriptive` - mean, variance, quartiles
//! - `outliers` - Tukey-fence outlier detection
//! - `stability` - stability score and rating
//! - `normal` - inverse normal CDF lookup
//! - `duration` - required sample size and test duration
//! - `variance` - combined metric variance report

pub mod descriptive;
pub mod duration;
mod error;
pub mod normal;
pub mod outliers;
pub mod stability;
pub mod variance;

pub use descriptive::{DescriptiveStatistics, ObservationSet, Quartiles};
pub use duration::{DurationEstimate, DurationInput};
pub use error::{AnalysisError, AnalysisResult};
pub use normal::inverse_normal_cdf;
pub use outliers::{Outlier, OutlierReport};
pub use stability::{StabilityAssessment, StabilityRating};
pub use variance::VarianceAnalysis;
