//! Required sample size and test duration for a two-proportion z-test.
//!
//! The test is always two-tailed and traffic is split evenly across variants.

use schemars::JsonSchema;
use serde::Serialize;

use super::error::{AnalysisError, AnalysisResult};
use super::normal::inverse_normal_cdf;

pub const DEFAULT_POWER: f64 = 0.8;
pub const DEFAULT_SIGNIFICANCE: f64 = 0.05;
pub const DEFAULT_VARIANTS: u32 = 2;

const MIN_RECOMMENDED_DAYS: u64 = 7;
const MAX_RECOMMENDED_DAYS: u64 = 30;

/// Validated inputs for [`DurationEstimate::estimate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationInput {
    pub daily_traffic: f64,
    pub baseline_conversion_rate: f64,
    pub minimum_detectable_effect: f64,
    pub statistical_power: f64,
    pub significance_level: f64,
    pub number_of_variants: u32,
}

impl DurationInput {
    /// Build an input with default power, significance and variant count.
    pub fn new(daily_traffic: f64, baseline_conversion_rate: f64, minimum_detectable_effect: f64) -> Self {
        Self {
            daily_traffic,
            baseline_conversion_rate,
            minimum_detectable_effect,
            statistical_power: DEFAULT_POWER,
            significance_level: DEFAULT_SIGNIFICANCE,
            number_of_variants: DEFAULT_VARIANTS,
        }
    }

    /// Check every field, reporting the first offending one.
    pub fn validate(&self) -> AnalysisResult<()> {
        if !(self.daily_traffic.is_finite() && self.daily_traffic > 0.0) {
            return Err(AnalysisError::validation(
                "dailyTraffic",
                format!("must be a positive number, got {}", self.daily_traffic),
            ));
        }
        check_open_unit("baselineConversionRate", self.baseline_conversion_rate)?;
        if !(self.minimum_detectable_effect.is_finite() && self.minimum_detectable_effect > 0.0) {
            return Err(AnalysisError::validation(
                "minimumDetectableEffect",
                format!("must be a positive relative lift, got {}", self.minimum_detectable_effect),
            ));
        }
        check_open_unit("statisticalPower", self.statistical_power)?;
        check_open_unit("significanceLevel", self.significance_level)?;
        if self.number_of_variants < 2 {
            return Err(AnalysisError::validation(
                "numberOfVariants",
                format!("must be at least 2, got {}", self.number_of_variants),
            ));
        }

        let variant_rate = self.variant_conversion_rate();
        if variant_rate >= 1.0 {
            return Err(AnalysisError::validation(
                "minimumDetectableEffect",
                format!(
                    "implies a variant conversion rate of {:.4}, which must stay below 1",
                    variant_rate
                ),
            ));
        }
        Ok(())
    }

    /// Expected conversion rate of the treatment arm.
    pub fn variant_conversion_rate(&self) -> f64 {
        self.baseline_conversion_rate * (1.0 + self.minimum_detectable_effect)
    }
}

fn check_open_unit(field: &str, value: f64) -> AnalysisResult<()> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(AnalysisError::validation(
            field,
            format!("must be strictly between 0 and 1, got {}", value),
        ))
    }
}

/// Round a non-negative quantity up to a whole count, rejecting values a
/// `u64` cannot hold.
fn to_count(what: &str, value: f64) -> AnalysisResult<u64> {
    let rounded = value.ceil();
    // u64::MAX as f64 rounds up to 2^64, which is itself out of range.
    if !rounded.is_finite() || rounded < 0.0 || rounded >= u64::MAX as f64 {
        return Err(AnalysisError::computation(format!(
            "{} is too large to represent ({:e})",
            what, value
        )));
    }
    Ok(rounded as u64)
}

/// Sample size and calendar duration needed to power a test.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DurationEstimate {
    pub daily_traffic: f64,
    pub baseline_conversion_rate: f64,
    pub variant_conversion_rate: f64,
    pub minimum_detectable_effect: f64,
    pub statistical_power: f64,
    pub significance_level: f64,
    pub number_of_variants: u32,
    pub z_alpha: f64,
    pub z_beta: f64,
    pub required_sample_size_per_variant: u64,
    pub total_sample_size: u64,
    pub daily_traffic_per_variant: f64,
    pub estimated_days: u64,
    pub estimated_weeks: u64,
    pub recommendations: Vec<String>,
}

impl DurationEstimate {
    /// Validate the input and compute the estimate.
    pub fn estimate(input: &DurationInput) -> AnalysisResult<Self> {
        input.validate()?;

        let p1 = input.baseline_conversion_rate;
        let p2 = input.variant_conversion_rate();
        let delta = p2 - p1;
        if delta == 0.0 {
            return Err(AnalysisError::computation(
                "baseline and variant conversion rates are identical; the effect is too small to represent",
            ));
        }

        let z_alpha = inverse_normal_cdf(1.0 - input.significance_level / 2.0)?;
        let z_beta = inverse_normal_cdf(input.statistical_power)?;

        let pooled_variance = p1 * (1.0 - p1) + p2 * (1.0 - p2);
        let raw = (z_alpha + z_beta).powi(2) * pooled_variance / delta.powi(2);
        let per_variant = to_count("required sample size per variant", raw)?;
        let total = per_variant
            .checked_mul(u64::from(input.number_of_variants))
            .ok_or_else(|| {
                AnalysisError::computation(format!(
                    "total sample size for {} variants of {} overflows",
                    input.number_of_variants, per_variant
                ))
            })?;

        let daily_per_variant = input.daily_traffic / f64::from(input.number_of_variants);
        let days = to_count("estimated days", per_variant as f64 / daily_per_variant)?;
        let weeks = days.div_ceil(7);

        let mut estimate = Self {
            daily_traffic: input.daily_traffic,
            baseline_conversion_rate: p1,
            variant_conversion_rate: p2,
            minimum_detectable_effect: input.minimum_detectable_effect,
            statistical_power: input.statistical_power,
            significance_level: input.significance_level,
            number_of_variants: input.number_of_variants,
            z_alpha,
            z_beta,
            required_sample_size_per_variant: per_variant,
            total_sample_size: total,
            daily_traffic_per_variant: daily_per_variant,
            estimated_days: days,
            estimated_weeks: weeks,
            recommendations: Vec::new(),
        };
        estimate.recommendations = estimate.derive_recommendations();
        Ok(estimate)
    }

    fn derive_recommendations(&self) -> Vec<String> {
        let mut out = Vec::new();

        if self.estimated_days > MAX_RECOMMENDED_DAYS {
            out.push(format!(
                "Estimated duration of {} days exceeds {} days. Consider a larger minimum detectable effect, fewer variants, or more traffic.",
                self.estimated_days, MAX_RECOMMENDED_DAYS
            ));
        } else if self.estimated_days < MIN_RECOMMENDED_DAYS {
            out.push(format!(
                "Estimated duration of {} days is under a week. Run for at least {} days to cover weekly seasonality.",
                self.estimated_days, MIN_RECOMMENDED_DAYS
            ));
        }

        if self.minimum_detectable_effect < 0.05 {
            out.push(format!(
                "A minimum detectable effect of {:.1}% is very small and needs large samples. Confirm such a small lift matters to the business.",
                self.minimum_detectable_effect * 100.0
            ));
        }

        if self.number_of_variants > 3 {
            out.push(format!(
                "Testing {} variants splits traffic thinly. Consider testing at most 3 variants at a time.",
                self.number_of_variants
            ));
        }

        if self.daily_traffic_per_variant < 100.0 {
            out.push(format!(
                "Only {:.0} daily visitors per variant. Low traffic makes results slow and noisy.",
                self.daily_traffic_per_variant
            ));
        }

        if self.baseline_conversion_rate < 0.01 {
            out.push(format!(
                "Baseline conversion rate of {:.2}% is below 1%. Consider a higher-funnel metric with more conversions.",
                self.baseline_conversion_rate * 100.0
            ));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn reference_input() -> DurationInput {
        DurationInput::new(10_000.0, 0.05, 0.1)
    }

    #[test]
    fn test_reference_scenario() {
        let estimate = DurationEstimate::estimate(&reference_input()).unwrap();

        let p1: f64 = 0.05;
        let p2: f64 = 0.05 * 1.1;
        let expected = ((1.96f64 + 0.8416).powi(2) * (p1 * (1.0 - p1) + p2 * (1.0 - p2))
            / (p2 - p1).powi(2))
        .ceil() as u64;

        assert_eq!(estimate.z_alpha, 1.96);
        assert_eq!(estimate.z_beta, 0.8416);
        assert_eq!(estimate.required_sample_size_per_variant, expected);
        assert_eq!(estimate.required_sample_size_per_variant, 31_232);
        assert_eq!(estimate.total_sample_size, 62_464);
        assert_eq!(estimate.daily_traffic_per_variant, 5_000.0);
        assert_eq!(estimate.estimated_days, 7);
        assert_eq!(estimate.estimated_weeks, 1);
        assert!(estimate.recommendations.is_empty());
    }

    #[test]
    fn test_baseline_out_of_range() {
        let mut input = reference_input();
        input.baseline_conversion_rate = 1.5;
        let err = DurationEstimate::estimate(&input).unwrap_err();
        assert_eq!(err.field(), Some("baselineConversionRate"));
        assert!(err.to_string().contains("between 0 and 1"));
    }

    #[test]
    fn test_each_field_is_validated() {
        let cases: Vec<(&str, Box<dyn Fn(&mut DurationInput)>)> = vec![
            ("dailyTraffic", Box::new(|i: &mut DurationInput| i.daily_traffic = 0.0)),
            ("minimumDetectableEffect", Box::new(|i: &mut DurationInput| i.minimum_detectable_effect = -0.1)),
            ("statisticalPower", Box::new(|i: &mut DurationInput| i.statistical_power = 1.0)),
            ("significanceLevel", Box::new(|i: &mut DurationInput| i.significance_level = 0.0)),
            ("numberOfVariants", Box::new(|i: &mut DurationInput| i.number_of_variants = 1)),
        ];
        for (field, mutate) in cases {
            let mut input = reference_input();
            mutate(&mut input);
            let err = DurationEstimate::estimate(&input).unwrap_err();
            assert_eq!(err.field(), Some(field));
        }
    }

    #[test]
    fn test_variant_rate_must_stay_below_one() {
        let input = DurationInput::new(1_000.0, 0.6, 1.0);
        let err = DurationEstimate::estimate(&input).unwrap_err();
        assert_eq!(err.field(), Some("minimumDetectableEffect"));
    }

    #[test]
    fn test_more_variants_scale_total() {
        let mut input = reference_input();
        input.number_of_variants = 4;
        let estimate = DurationEstimate::estimate(&input).unwrap();
        assert_eq!(estimate.total_sample_size, 31_232 * 4);
        assert_eq!(estimate.daily_traffic_per_variant, 2_500.0);
        assert_eq!(estimate.estimated_days, 13);
        assert_eq!(estimate.estimated_weeks, 2);
        assert!(estimate.recommendations.iter().any(|r| r.contains("4 variants")));
    }

    #[test]
    fn test_recommendations_for_small_experiment() {
        let input = DurationInput::new(150.0, 0.005, 0.02);
        let estimate = DurationEstimate::estimate(&input).unwrap();
        let text = estimate.recommendations.join("\n");
        assert!(text.contains("exceeds 30 days"));
        assert!(text.contains("minimum detectable effect of 2.0%"));
        assert!(text.contains("daily visitors per variant"));
        assert!(text.contains("below 1%"));
    }

    #[test]
    fn test_short_test_recommendation() {
        let input = DurationInput::new(1_000_000.0, 0.2, 0.2);
        let estimate = DurationEstimate::estimate(&input).unwrap();
        assert_eq!(estimate.estimated_days, 1);
        assert!(estimate.recommendations.iter().any(|r| r.contains("under a week")));
    }

    #[test]
    fn test_tiny_rates_report_oversized_sample() {
        let input = DurationInput::new(10_000.0, 1e-8, 1e-8);
        let err = DurationEstimate::estimate(&input).unwrap_err();
        assert!(matches!(err, AnalysisError::Computation(_)));
        assert!(err.to_string().contains("sample size per variant"));
    }

    #[test]
    fn test_vanishing_traffic_reports_oversized_duration() {
        let mut input = reference_input();
        input.daily_traffic = 1e-300;
        let err = DurationEstimate::estimate(&input).unwrap_err();
        assert!(matches!(err, AnalysisError::Computation(_)));
        assert!(err.to_string().contains("estimated days"));
    }

    #[test]
    fn test_total_overflow_is_reported() {
        // Fits per variant but not once multiplied across variants.
        let mut input = DurationInput::new(1e30, 1e-6, 1e-5);
        input.number_of_variants = u32::MAX;
        let err = DurationEstimate::estimate(&input).unwrap_err();
        assert!(err.to_string().contains("total sample size"));
    }

    #[test]
    fn test_to_count_bounds() {
        assert_eq!(to_count("n", 2.1).unwrap(), 3);
        assert!(to_count("n", f64::INFINITY).is_err());
        assert!(to_count("n", u64::MAX as f64).is_err());
    }

    proptest! {
        #[test]
        fn doubling_traffic_never_extends_duration(
            traffic in 10.0f64..1e6,
            baseline in 0.01f64..0.5,
            mde in 0.05f64..0.5,
            variants in 2u32..6,
        ) {
            let mut input = DurationInput::new(traffic, baseline, mde);
            input.number_of_variants = variants;
            let base = DurationEstimate::estimate(&input).unwrap();
            input.daily_traffic = traffic * 2.0;
            let doubled = DurationEstimate::estimate(&input).unwrap();
            prop_assert!(doubled.estimated_days <= base.estimated_days);
            prop_assert_eq!(doubled.required_sample_size_per_variant, base.required_sample_size_per_variant);
        }
    }
}
