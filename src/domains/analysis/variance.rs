//! Metric variance analysis: statistics, outliers and stability in one report.

use schemars::JsonSchema;
use serde::Serialize;

use super::descriptive::{DescriptiveStatistics, ObservationSet};
use super::error::AnalysisResult;
use super::outliers::OutlierReport;
use super::stability::{MIN_RELIABLE_SAMPLE, StabilityAssessment, StabilityRating};

/// Full variance report for one metric series.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VarianceAnalysis {
    pub metric_name: Option<String>,
    pub statistics: DescriptiveStatistics,
    pub outliers: OutlierReport,
    pub stability: StabilityAssessment,
    pub recommendations: Vec<String>,
}

impl VarianceAnalysis {
    /// Analyse an observation set.
    pub fn analyze(set: &ObservationSet, metric_name: Option<String>) -> AnalysisResult<Self> {
        let statistics = DescriptiveStatistics::compute(set)?;
        let outliers = OutlierReport::detect(set, &statistics.quartiles);
        let stability = StabilityAssessment::assess(
            statistics.coefficient_of_variation,
            outliers.percentage,
            statistics.sample_size,
        );
        let recommendations = recommendations(&statistics, &outliers, &stability);

        Ok(Self {
            metric_name,
            statistics,
            outliers,
            stability,
            recommendations,
        })
    }
}

fn recommendations(
    statistics: &DescriptiveStatistics,
    outliers: &OutlierReport,
    stability: &StabilityAssessment,
) -> Vec<String> {
    let mut out = Vec::new();
    let cv = statistics.coefficient_of_variation;

    if cv > 30.0 {
        out.push(format!(
            "High variability (CV {:.1}%). Expect long test durations; consider a less noisy metric or variance reduction such as CUPED.",
            cv
        ));
    } else if cv > 20.0 {
        out.push(format!(
            "Moderate variability (CV {:.1}%). Plan for a larger sample than a stable metric would need.",
            cv
        ));
    }

    if outliers.count > 0 {
        out.push(format!(
            "{} outlier(s) ({:.1}% of observations) fall outside [{:.2}, {:.2}]. Investigate them or cap extreme values before testing.",
            outliers.count, outliers.percentage, outliers.lower_fence, outliers.upper_fence
        ));
    }

    if statistics.sample_size < MIN_RELIABLE_SAMPLE {
        out.push(format!(
            "Only {} observations. Collect at least {} for a reliable variance estimate.",
            statistics.sample_size, MIN_RELIABLE_SAMPLE
        ));
    }

    match stability.rating {
        StabilityRating::Excellent | StabilityRating::Good => out.push(format!(
            "Metric stability is {} (score {:.1}); it is suitable as a test metric.",
            stability.rating.as_str(),
            stability.score
        )),
        _ => out.push(format!(
            "Metric stability is {} (score {:.1}); it is not recommended as a primary test metric.",
            stability.rating.as_str(),
            stability.score
        )),
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::analysis::AnalysisError;

    fn analyze(values: &[f64]) -> AnalysisResult<VarianceAnalysis> {
        let set = ObservationSet::new(values.to_vec(), "metricValues")?;
        VarianceAnalysis::analyze(&set, Some("revenue".to_string()))
    }

    #[test]
    fn test_reference_series() {
        let report = analyze(&[10.0, 12.0, 11.0, 13.0, 10.0]).unwrap();
        assert_eq!(report.statistics.sample_size, 5);
        assert_eq!(report.outliers.count, 0);
        assert_eq!(report.stability.rating, StabilityRating::Excellent);
        assert!(report.stability.usable_for_testing);
        assert!(report.recommendations.iter().any(|r| r.contains("Only 5 observations")));
        assert!(report.recommendations.iter().any(|r| r.contains("suitable as a test metric")));
    }

    #[test]
    fn test_noisy_series_is_not_usable() {
        let report = analyze(&[1.0, 50.0, 3.0, 80.0, 2.0, 400.0, 5.0, 60.0]).unwrap();
        assert!(report.statistics.coefficient_of_variation > 50.0);
        assert!(!report.stability.usable_for_testing);
        assert!(report.recommendations.iter().any(|r| r.starts_with("High variability")));
        assert!(report.recommendations.iter().any(|r| r.contains("not recommended")));
    }

    #[test]
    fn test_outliers_feed_into_score() {
        let mut values = vec![10.0; 40];
        values[3] = 11.0;
        values[7] = 9.0;
        values.push(500.0);
        let report = analyze(&values).unwrap();
        assert_eq!(report.outliers.count, 3);
        assert!(report.stability.outlier_penalty > 0.0);
        assert!(report.recommendations.iter().any(|r| r.contains("outlier(s)")));
    }

    #[test]
    fn test_zero_mean_is_computation_error() {
        let err = analyze(&[-2.0, 2.0, 0.0]).unwrap_err();
        assert!(matches!(err, AnalysisError::Computation(_)));
    }

    #[test]
    fn test_serialized_field_names() {
        let report = analyze(&[10.0, 12.0, 11.0, 13.0, 10.0]).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["metricName"], "revenue");
        assert!(json["statistics"]["coefficientOfVariation"].is_number());
        assert!(json["statistics"]["quartiles"]["iqr"].is_number());
        assert!(json["outliers"]["lowerFence"].is_number());
        assert_eq!(json["stability"]["usableForTesting"], true);
        assert_eq!(json["stability"]["rating"], "Excellent");
    }
}
