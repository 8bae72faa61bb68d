//! Normal-distribution model for tail analysis and curve overlays.
//!
//! A [`NormalModel`] holds a reference mean and standard deviation, either
//! assumed (the process target) or estimated from a sample, and
//! answers range-probability questions such as `P(X < 90)`.
//!
//! The two-sided tail helpers convert a z-score threshold into the defect
//! rate a perfectly normal process would produce, so an observed anomaly
//! count can be compared against what chance alone explains.
//!
//! # Examples
//!
//! ```
//! use u_descriptive::normal::NormalModel;
//!
//! let weights = NormalModel::new(100.0, 5.0).unwrap();
//! let p = weights.prob_below(90.0);
//! assert!((p - 0.0228).abs() < 1e-3);
//! ```
//!
//! # References
//!
//! - Montgomery (2019), *Introduction to Statistical Quality Control*,
//!   8th ed., Chapter 3.

use std::f64::consts::PI;

use u_numflow::special::standard_normal_cdf;

use crate::descriptive;
use crate::error::{StatsError, StatsResult};

/// Normal distribution N(mean, sigma²).
///
/// # Invariants
///
/// - `mean` is finite
/// - `sigma` is finite and strictly positive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalModel {
    mean: f64,
    sigma: f64,
}

impl NormalModel {
    /// Creates a model from known parameters.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `mean` is not finite or `sigma` is not a
    /// positive finite number.
    pub fn new(mean: f64, sigma: f64) -> StatsResult<Self> {
        if !mean.is_finite() {
            return Err(StatsError::invalid("mean must be finite"));
        }
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(StatsError::invalid(format!(
                "sigma must be positive and finite, got {sigma}"
            )));
        }
        Ok(Self { mean, sigma })
    }

    /// Estimates the model from a sample (mean and sample standard deviation).
    ///
    /// # Errors
    ///
    /// `InsufficientData` for fewer than two observations, `ZeroVariance`
    /// when all observations are equal.
    pub fn from_sample(data: &[f64]) -> StatsResult<Self> {
        let mean = descriptive::mean(data)?;
        let sigma = descriptive::std_dev(data)?;
        if sigma < 1e-300 {
            return Err(StatsError::ZeroVariance);
        }
        Ok(Self { mean, sigma })
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Standardized value `(x − mean) / sigma`.
    pub fn z(&self, x: f64) -> f64 {
        (x - self.mean) / self.sigma
    }

    /// Probability density at `x`.
    pub fn pdf(&self, x: f64) -> f64 {
        let z = self.z(x);
        (-0.5 * z * z).exp() / (self.sigma * (2.0 * PI).sqrt())
    }

    /// Cumulative probability `P(X ≤ x)`.
    pub fn cdf(&self, x: f64) -> f64 {
        standard_normal_cdf(self.z(x))
    }

    /// `P(X < x)`.
    pub fn prob_below(&self, x: f64) -> f64 {
        self.cdf(x)
    }

    /// `P(X > x)`.
    pub fn prob_above(&self, x: f64) -> f64 {
        1.0 - self.cdf(x)
    }

    /// `P(lo < X < hi)`.
    ///
    /// ```
    /// use u_descriptive::normal::NormalModel;
    ///
    /// let m = NormalModel::new(100.0, 5.0).unwrap();
    /// let p = m.prob_between(95.0, 105.0).unwrap();
    /// assert!((p - 0.6827).abs() < 1e-3); // one-sigma band
    /// ```
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `lo > hi` or either bound is NaN.
    pub fn prob_between(&self, lo: f64, hi: f64) -> StatsResult<f64> {
        if lo.is_nan() || hi.is_nan() || lo > hi {
            return Err(StatsError::invalid(format!(
                "range bounds must satisfy lo <= hi, got ({lo}, {hi})"
            )));
        }
        Ok((self.cdf(hi) - self.cdf(lo)).max(0.0))
    }

    /// Evenly spaced `(x, pdf(x))` pairs over `[lo, hi]`, for drawing the
    /// theoretical curve over a histogram.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `points < 2` or the range is empty or not finite.
    pub fn curve(&self, lo: f64, hi: f64, points: usize) -> StatsResult<Vec<(f64, f64)>> {
        if points < 2 {
            return Err(StatsError::invalid("curve needs at least 2 points"));
        }
        if !lo.is_finite() || !hi.is_finite() || lo >= hi {
            return Err(StatsError::invalid(format!(
                "curve range must be finite with lo < hi, got ({lo}, {hi})"
            )));
        }
        let step = (hi - lo) / (points - 1) as f64;
        Ok((0..points)
            .map(|i| {
                let x = lo + i as f64 * step;
                (x, self.pdf(x))
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Two-sided tails
// ---------------------------------------------------------------------------

/// Expected parts-per-million beyond ±`k` standard deviations.
///
/// ```text
/// PPM = 1,000,000 · 2 · (1 − Φ(k))
/// ```
///
/// ```
/// use u_descriptive::normal::tail_ppm;
///
/// // ±3 sigma leaves ~2,700 PPM outside
/// assert!((tail_ppm(3.0) - 2_700.0).abs() < 10.0);
/// ```
pub fn tail_ppm(k: f64) -> f64 {
    2_000_000.0 * (1.0 - standard_normal_cdf(k.abs()))
}

/// Expected number of observations beyond ±`k` sigma in a sample of `n`.
pub fn expected_beyond(k: f64, n: usize) -> f64 {
    tail_ppm(k) / 1_000_000.0 * n as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weights() -> NormalModel {
        NormalModel::new(100.0, 5.0).expect("valid")
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(NormalModel::new(f64::NAN, 1.0).is_err());
        assert!(NormalModel::new(0.0, 0.0).is_err());
        assert!(NormalModel::new(0.0, -1.0).is_err());
        assert!(NormalModel::new(0.0, f64::INFINITY).is_err());
    }

    /// P(weight < 90) = Φ(−2)
    #[test]
    fn prob_below_two_sigma() {
        let p = weights().prob_below(90.0);
        assert!((p - 0.02275).abs() < 1e-4, "p = {p}");
        let phi = NormalModel::new(0.0, 1.0).expect("valid").cdf(-2.0);
        assert!((p - phi).abs() < 1e-12);
    }

    #[test]
    fn prob_between_one_sigma() {
        let p = weights().prob_between(95.0, 105.0).expect("valid range");
        assert!((p - 0.68269).abs() < 1e-4, "p = {p}");
    }

    #[test]
    fn prob_between_rejects_reversed() {
        assert!(weights().prob_between(105.0, 95.0).is_err());
        assert!(weights().prob_between(f64::NAN, 95.0).is_err());
    }

    #[test]
    fn above_and_below_complement() {
        let m = weights();
        let total = m.prob_below(103.0) + m.prob_above(103.0);
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pdf_peak() {
        let peak = weights().pdf(100.0);
        assert!((peak - 1.0 / (5.0 * (2.0 * PI).sqrt())).abs() < 1e-12);
    }

    #[test]
    fn curve_spans_range() {
        let c = weights().curve(85.0, 115.0, 100).expect("valid");
        assert_eq!(c.len(), 100);
        assert!((c[0].0 - 85.0).abs() < 1e-12);
        assert!((c[99].0 - 115.0).abs() < 1e-9);
        assert!(weights().curve(85.0, 115.0, 1).is_err());
        assert!(weights().curve(115.0, 85.0, 10).is_err());
    }

    #[test]
    fn from_sample_edge_cases() {
        assert_eq!(
            NormalModel::from_sample(&[1.0]),
            Err(StatsError::insufficient(2, 1))
        );
        assert_eq!(
            NormalModel::from_sample(&[2.0, 2.0, 2.0]),
            Err(StatsError::ZeroVariance)
        );
        let m = NormalModel::from_sample(&[1.0, 2.0, 3.0]).expect("valid");
        assert!((m.mean() - 2.0).abs() < 1e-12);
        assert!((m.sigma() - 1.0).abs() < 1e-12);
    }

    // -----------------------------------------------------------------------
    // Tails
    // -----------------------------------------------------------------------

    #[test]
    fn tail_ppm_known_values() {
        assert!((tail_ppm(2.0) - 45_500.0).abs() < 100.0, "{}", tail_ppm(2.0));
        assert!((tail_ppm(2.5) - 12_419.0).abs() < 50.0, "{}", tail_ppm(2.5));
        assert!((tail_ppm(-2.0) - tail_ppm(2.0)).abs() < 1e-9);
    }

    #[test]
    fn expected_beyond_scales_with_n() {
        let e = expected_beyond(2.5, 1500);
        assert!((e - 18.6).abs() < 0.2, "e = {e}");
    }

}
