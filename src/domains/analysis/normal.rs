//! Inverse standard normal CDF.
//!
//! Common confidence levels come from a fixed table with linear
//! interpolation between entries. Probabilities below one half are reflected
//! (`z(p) = -z(1 - p)`). Beyond the table's upper edge the upper-tail branch
//! of Acklam's rational approximation is used.

use super::error::{AnalysisError, AnalysisResult};

/// (cumulative probability, z) pairs, ascending.
const Z_TABLE: &[(f64, f64)] = &[
    (0.5, 0.0),
    (0.6, 0.2533),
    (0.7, 0.5244),
    (0.75, 0.6745),
    (0.8, 0.8416),
    (0.85, 1.0364),
    (0.9, 1.2816),
    (0.95, 1.6449),
    (0.975, 1.96),
    (0.99, 2.3263),
    (0.995, 2.5758),
    (0.999, 3.0902),
];

const TABLE_EPSILON: f64 = 1e-12;

/// z-score such that `P(Z <= z) = p` for a standard normal `Z`.
pub fn inverse_normal_cdf(p: f64) -> AnalysisResult<f64> {
    if !(p > 0.0 && p < 1.0) {
        return Err(AnalysisError::computation(format!(
            "inverse normal CDF is only defined on (0, 1), got {}",
            p
        )));
    }

    if p < 0.5 {
        return inverse_normal_cdf(1.0 - p).map(|z| -z);
    }

    let (last_p, _) = Z_TABLE[Z_TABLE.len() - 1];
    if p > last_p + TABLE_EPSILON {
        return Ok(acklam_upper_tail(p));
    }

    for window in Z_TABLE.windows(2) {
        let (p0, z0) = window[0];
        let (p1, z1) = window[1];
        if (p - p0).abs() < TABLE_EPSILON {
            return Ok(z0);
        }
        if (p - p1).abs() < TABLE_EPSILON {
            return Ok(z1);
        }
        if p > p0 && p < p1 {
            return Ok(z0 + (p - p0) * (z1 - z0) / (p1 - p0));
        }
    }

    Err(AnalysisError::computation(format!(
        "no z-table entry brackets probability {}",
        p
    )))
}

/// Upper-tail branch of Acklam's algorithm, valid for `p > 0.97575`.
fn acklam_upper_tail(p: f64) -> f64 {
    const C: [f64; 6] = [
        -7.784_894_002_430_293e-3,
        -3.223_964_580_411_365e-1,
        -2.400_758_277_161_838,
        -2.549_671_010_336_13,
        4.374_664_141_464_968,
        2.938_163_982_698_783,
    ];
    const D: [f64; 4] = [
        7.784_695_709_041_462e-3,
        3.224_671_290_700_398e-1,
        2.445_134_137_142_996,
        3.754_408_661_907_416,
    ];

    let q = (-2.0 * (1.0 - p).ln()).sqrt();
    let numerator = ((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5];
    let denominator = (((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0;
    -numerator / denominator
}

#[cfg(test)]
mod tests {
    use super::*;

    fn z(p: f64) -> f64 {
        inverse_normal_cdf(p).unwrap()
    }

    #[test]
    fn test_documented_values() {
        assert!((z(0.975) - 1.96).abs() < 1e-3);
        assert!((z(0.95) - 1.645).abs() < 1e-3);
        assert!((z(0.8) - 0.842).abs() < 1e-3);
        assert!((z(0.9) - 1.282).abs() < 1e-3);
        assert!((z(0.99) - 2.326).abs() < 1e-3);
        assert!((z(0.995) - 2.576).abs() < 1e-3);
        assert!((z(0.85) - 1.036).abs() < 1e-3);
    }

    #[test]
    fn test_two_tailed_alpha() {
        assert_eq!(z(1.0 - 0.05 / 2.0), 1.96);
    }

    #[test]
    fn test_reflection_below_half() {
        assert_eq!(z(0.5), 0.0);
        assert_eq!(z(0.2), -z(0.8));
        assert!((z(0.025) + 1.96).abs() < 1e-9);
    }

    #[test]
    fn test_interpolation_between_entries() {
        let mid = z(0.825);
        assert!(mid > z(0.8) && mid < z(0.85));
        assert!((mid - (0.8416 + 1.0364) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_upper_tail_is_continuous_with_table() {
        assert!((acklam_upper_tail(0.999) - 3.0902).abs() < 1e-3);
        assert!(z(0.9999) > z(0.999));
        assert!((z(0.9999) - 3.719).abs() < 1e-3);
    }

    #[test]
    fn test_out_of_domain() {
        assert!(inverse_normal_cdf(0.0).is_err());
        assert!(inverse_normal_cdf(1.0).is_err());
        assert!(inverse_normal_cdf(f64::NAN).is_err());
    }

    #[test]
    fn test_monotonic_across_table() {
        let mut previous = f64::NEG_INFINITY;
        for i in 1..1000 {
            let current = z(i as f64 / 1000.0);
            assert!(current >= previous);
            previous = current;
        }
    }
}
