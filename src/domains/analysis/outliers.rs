//! Tukey-fence outlier detection.

use schemars::JsonSchema;
use serde::Serialize;

use super::descriptive::{ObservationSet, Quartiles};

/// Fence multiplier applied to the interquartile range.
pub const IQR_MULTIPLIER: f64 = 1.5;

/// A single flagged observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Outlier {
    /// Zero-based position in the original input.
    pub index: usize,
    pub value: f64,
}

/// Outliers found in an observation set, in original input order.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutlierReport {
    pub outliers: Vec<Outlier>,
    pub count: usize,
    pub percentage: f64,
    pub lower_fence: f64,
    pub upper_fence: f64,
}

impl OutlierReport {
    /// Detect outliers using fences derived from `quartiles`.
    pub fn detect(set: &ObservationSet, quartiles: &Quartiles) -> Self {
        let (lower_fence, upper_fence) = fences(quartiles);
        Self::detect_with_fences(set.values(), lower_fence, upper_fence)
    }

    /// Detect outliers against explicit fences.
    ///
    /// A value is an outlier only when it lies strictly outside the fences.
    pub fn detect_with_fences(values: &[f64], lower_fence: f64, upper_fence: f64) -> Self {
        let outliers: Vec<Outlier> = values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v < lower_fence || **v > upper_fence)
            .map(|(index, value)| Outlier {
                index,
                value: *value,
            })
            .collect();

        let count = outliers.len();
        let percentage = if values.is_empty() {
            0.0
        } else {
            100.0 * count as f64 / values.len() as f64
        };

        Self {
            outliers,
            count,
            percentage,
            lower_fence,
            upper_fence,
        }
    }

    /// The observations that were not flagged, in original order.
    pub fn retained(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.outliers.iter().any(|o| o.index == *i))
            .map(|(_, v)| *v)
            .collect()
    }
}

/// Lower and upper Tukey fences.
pub fn fences(quartiles: &Quartiles) -> (f64, f64) {
    (
        quartiles.q1 - IQR_MULTIPLIER * quartiles.iqr,
        quartiles.q3 + IQR_MULTIPLIER * quartiles.iqr,
    )
}
