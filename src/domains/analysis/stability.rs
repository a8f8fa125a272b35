//! Stability scoring for metric series.

use schemars::JsonSchema;
use serde::Serialize;

/// Sample size below which a penalty is applied.
pub const MIN_RELIABLE_SAMPLE: usize = 30;

/// Minimum score for a metric to be considered usable in a test.
pub const USABLE_THRESHOLD: f64 = 60.0;

/// Discrete stability bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub enum StabilityRating {
    Excellent,
    Good,
    Fair,
    Poor,
    #[serde(rename = "Very Poor")]
    VeryPoor,
}

impl StabilityRating {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Excellent
        } else if score >= 60.0 {
            Self::Good
        } else if score >= 40.0 {
            Self::Fair
        } else if score >= 20.0 {
            Self::Poor
        } else {
            Self::VeryPoor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
        }
    }
}

/// Stability score with its rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StabilityAssessment {
    pub score: f64,
    pub rating: StabilityRating,
    pub usable_for_testing: bool,
    pub cv_penalty: f64,
    pub outlier_penalty: f64,
    pub sample_size_penalty: f64,
}

impl StabilityAssessment {
    /// Score a metric from its coefficient of variation (percent), outlier
    /// percentage and sample size.
    pub fn assess(coefficient_of_variation: f64, outlier_percentage: f64, sample_size: usize) -> Self {
        let cv_penalty = cv_penalty(coefficient_of_variation);
        let outlier_penalty = 0.8 * outlier_percentage.max(0.0);
        let sample_size_penalty = 0.5 * MIN_RELIABLE_SAMPLE.saturating_sub(sample_size) as f64;

        let score = (100.0 - cv_penalty - outlier_penalty - sample_size_penalty).clamp(0.0, 100.0);

        Self {
            score,
            rating: StabilityRating::from_score(score),
            usable_for_testing: score >= USABLE_THRESHOLD,
            cv_penalty,
            outlier_penalty,
            sample_size_penalty,
        }
    }
}

/// Piecewise-linear penalty on the coefficient of variation.
pub fn cv_penalty(cv: f64) -> f64 {
    if cv <= 10.0 {
        0.0
    } else if cv <= 20.0 {
        1.5 * (cv - 10.0)
    } else if cv <= 30.0 {
        15.0 + 2.0 * (cv - 20.0)
    } else if cv <= 50.0 {
        35.0 + 1.5 * (cv - 30.0)
    } else {
        65.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_penalty_schedule_breakpoints() {
        assert_eq!(cv_penalty(5.0), 0.0);
        assert_eq!(cv_penalty(10.0), 0.0);
        assert_eq!(cv_penalty(20.0), 15.0);
        assert_eq!(cv_penalty(30.0), 35.0);
        assert_eq!(cv_penalty(50.0), 65.0);
        assert_eq!(cv_penalty(120.0), 65.0);
    }

    #[test]
    fn test_reference_series_score() {
        // CV of [10, 12, 11, 13, 10] with five samples.
        let a = StabilityAssessment::assess(10.412_414_097_938, 0.0, 5);
        assert!((a.score - 86.881_378_853).abs() < 1e-6);
        assert_eq!(a.rating, StabilityRating::Excellent);
        assert!(a.usable_for_testing);
        assert_eq!(a.sample_size_penalty, 12.5);
    }

    #[test]
    fn test_score_is_clamped() {
        let a = StabilityAssessment::assess(80.0, 100.0, 1);
        assert_eq!(a.score, 0.0);
        assert_eq!(a.rating, StabilityRating::VeryPoor);
        assert!(!a.usable_for_testing);
    }

    #[test]
    fn test_rating_buckets() {
        assert_eq!(StabilityRating::from_score(80.0), StabilityRating::Excellent);
        assert_eq!(StabilityRating::from_score(79.9), StabilityRating::Good);
        assert_eq!(StabilityRating::from_score(60.0), StabilityRating::Good);
        assert_eq!(StabilityRating::from_score(40.0), StabilityRating::Fair);
        assert_eq!(StabilityRating::from_score(20.0), StabilityRating::Poor);
        assert_eq!(StabilityRating::from_score(19.9), StabilityRating::VeryPoor);
    }

    #[test]
    fn test_usable_threshold() {
        let a = StabilityAssessment::assess(0.0, 50.0, 30);
        assert_eq!(a.score, 60.0);
        assert!(a.usable_for_testing);
    }

    #[test]
    fn test_very_poor_serializes_with_space() {
        let json = serde_json::to_string(&StabilityRating::VeryPoor).unwrap();
        assert_eq!(json, "\"Very Poor\"");
    }

    #[test]
    fn test_lower_cv_scores_higher() {
        let low = StabilityAssessment::assess(10.0, 0.0, 50);
        let high = StabilityAssessment::assess(40.0, 0.0, 50);
        assert!(low.score >= high.score);
    }

    proptest! {
        #[test]
        fn score_non_increasing_in_cv(
            cv in 0.0f64..100.0,
            delta in 0.0f64..50.0,
            outliers in 0.0f64..100.0,
            n in 1usize..100,
        ) {
            let a = StabilityAssessment::assess(cv, outliers, n);
            let b = StabilityAssessment::assess(cv + delta, outliers, n);
            prop_assert!(a.score >= b.score);
        }

        #[test]
        fn score_non_increasing_in_outliers(
            cv in 0.0f64..100.0,
            outliers in 0.0f64..50.0,
            delta in 0.0f64..50.0,
        ) {
            let a = StabilityAssessment::assess(cv, outliers, 40);
            let b = StabilityAssessment::assess(cv, outliers + delta, 40);
            prop_assert!(a.score >= b.score);
        }

        #[test]
        fn score_stays_in_range(cv in 0.0f64..500.0, outliers in 0.0f64..100.0, n in 1usize..1000) {
            let a = StabilityAssessment::assess(cv, outliers, n);
            prop_assert!((0.0..=100.0).contains(&a.score));
        }
    }
}
