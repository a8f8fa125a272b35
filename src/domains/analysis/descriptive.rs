//! Descriptive statistics over an observation set.
//!
//! Variance is the population variance (divides by N). Quartiles split the
//! sorted data into a lower and an upper half around the median; when N is
//! odd the median element belongs to neither half.

use schemars::JsonSchema;
use serde::Serialize;

use super::error::{AnalysisError, AnalysisResult};

/// An ordered, non-empty sequence of finite observations.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSet {
    values: Vec<f64>,
}

impl ObservationSet {
    /// Validate raw values, attributing failures to `field`.
    pub fn new(values: Vec<f64>, field: &str) -> AnalysisResult<Self> {
        if values.is_empty() {
            return Err(AnalysisError::validation(field, "must contain at least one value"));
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(AnalysisError::validation(
                field,
                format!("value at index {} is not a finite number", index),
            ));
        }
        Ok(Self { values })
    }

    /// Values in original input order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values sorted ascending.
    pub fn sorted(&self) -> Vec<f64> {
        let mut sorted = self.values.clone();
        sorted.sort_by(f64::total_cmp);
        sorted
    }
}

/// First, second and third quartile plus the interquartile range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quartiles {
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
    pub iqr: f64,
}

impl Quartiles {
    /// Compute quartiles from ascending values.
    pub fn from_sorted(sorted: &[f64]) -> Self {
        debug_assert!(!sorted.is_empty());
        let n = sorted.len();
        let q2 = median_of_sorted(sorted);

        if n < 2 {
            return Self {
                q1: q2,
                q2,
                q3: q2,
                iqr: 0.0,
            };
        }

        let lower = &sorted[..n / 2];
        let upper = &sorted[(n + 1) / 2..];
        let q1 = median_of_sorted(lower);
        let q3 = median_of_sorted(upper);

        Self {
            q1,
            q2,
            q3,
            iqr: q3 - q1,
        }
    }
}

/// Summary statistics for an observation set.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DescriptiveStatistics {
    pub sample_size: usize,
    pub mean: f64,
    pub median: f64,
    pub variance: f64,
    pub standard_deviation: f64,
    /// Standard deviation as a percentage of the absolute mean.
    pub coefficient_of_variation: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub quartiles: Quartiles,
}

impl DescriptiveStatistics {
    /// Compute the statistics.
    ///
    /// Fails with a computation error when the mean is zero, since the
    /// coefficient of variation is undefined there, or when any summary
    /// overflows the range of `f64`.
    pub fn compute(set: &ObservationSet) -> AnalysisResult<Self> {
        let values = set.values();
        let n = values.len() as f64;

        let mean = running_mean(values);
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let standard_deviation = variance.sqrt();

        if mean == 0.0 {
            return Err(AnalysisError::computation(
                "coefficient of variation is undefined because the mean is zero",
            ));
        }
        let coefficient_of_variation = 100.0 * standard_deviation / mean.abs();

        let sorted = set.sorted();
        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        let quartiles = Quartiles::from_sorted(&sorted);

        for (name, value) in [
            ("mean", mean),
            ("variance", variance),
            ("coefficient of variation", coefficient_of_variation),
            ("range", max - min),
            ("interquartile range", quartiles.iqr),
        ] {
            if !value.is_finite() {
                return Err(AnalysisError::computation(format!(
                    "{} overflows the representable range ({})",
                    name, value
                )));
            }
        }

        Ok(Self {
            sample_size: values.len(),
            mean,
            median: quartiles.q2,
            variance,
            standard_deviation,
            coefficient_of_variation,
            min,
            max,
            range: max - min,
            quartiles,
        })
    }
}

/// Incremental mean. Each step adds `v/k - mean/k`, so no partial sum
/// exceeds the largest observation in magnitude.
fn running_mean(values: &[f64]) -> f64 {
    values.iter().enumerate().fold(0.0, |mean, (i, v)| {
        let k = (i + 1) as f64;
        mean + (v / k - mean / k)
    })
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}
