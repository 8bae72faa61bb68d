//! Descriptive statistics over a numeric column.
//!
//! Thin, checked wrappers around `u-numflow` statistics. Every function
//! validates its input and reports degenerate cases as [`StatsError`]
//! rather than returning NaN.
//!
//! # Conventions
//!
//! - Standard deviation and variance are **sample** statistics (Bessel's
//!   correction, denominator `n − 1`).
//! - Skewness is the biased Fisher-Pearson coefficient
//!   g₁ = m₃ / m₂^(3/2), with population central moments.
//! - Percentiles use linear interpolation between order statistics
//!   (Hyndman & Fan type 7).
//!
//! # Examples
//!
//! ```
//! use u_descriptive::descriptive::{mean, median, std_dev};
//!
//! let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
//! assert!((mean(&data).unwrap() - 5.0).abs() < 1e-12);
//! assert!((median(&data).unwrap() - 4.5).abs() < 1e-12);
//! assert!(std_dev(&data).unwrap() > 2.0);
//! ```
//!
//! # References
//!
//! - Hyndman & Fan (1996), "Sample Quantiles in Statistical Packages",
//!   *The American Statistician* 50(4), pp. 361-365.
//! - Joanes & Gill (1998), "Comparing measures of sample skewness and
//!   kurtosis", *The Statistician* 47(1), pp. 183-189.

use u_numflow::stats;

use crate::error::{StatsError, StatsResult};

/// Rejects empty input (fewer than `needed` values) and non-finite values.
pub(crate) fn check(data: &[f64], needed: usize) -> StatsResult<()> {
    if data.len() < needed {
        return Err(StatsError::insufficient(needed, data.len()));
    }
    if data.iter().any(|v| !v.is_finite()) {
        return Err(StatsError::NonFinite);
    }
    Ok(())
}

/// Arithmetic mean.
///
/// # Errors
///
/// `InsufficientData` for an empty column, `NonFinite` if any value is NaN
/// or infinite.
pub fn mean(data: &[f64]) -> StatsResult<f64> {
    check(data, 1)?;
    stats::mean(data).ok_or(StatsError::NonFinite)
}

/// Median (average of the two middle values for even `n`).
pub fn median(data: &[f64]) -> StatsResult<f64> {
    check(data, 1)?;
    stats::median(data).ok_or(StatsError::NonFinite)
}

/// Sample variance (denominator `n − 1`).
///
/// # Errors
///
/// `InsufficientData` when `n < 2`.
pub fn variance(data: &[f64]) -> StatsResult<f64> {
    check(data, 2)?;
    stats::variance(data).ok_or(StatsError::NonFinite)
}

/// Sample standard deviation (denominator `n − 1`).
///
/// A single observation has no spread estimate; this is reported as
/// `InsufficientData` instead of NaN.
///
/// ```
/// use u_descriptive::descriptive::std_dev;
/// use u_descriptive::StatsError;
///
/// assert_eq!(
///     std_dev(&[42.0]),
///     Err(StatsError::InsufficientData { needed: 2, got: 1 })
/// );
/// ```
pub fn std_dev(data: &[f64]) -> StatsResult<f64> {
    check(data, 2)?;
    stats::std_dev(data).ok_or(StatsError::NonFinite)
}

/// Skewness as the third standardized moment (biased g₁).
///
/// ```text
/// g1 = m3 / m2^(3/2),  mk = (1/n) Σ (xᵢ − x̄)^k
/// ```
///
/// Symmetric data gives 0, a long right tail gives a positive value.
///
/// # Errors
///
/// `InsufficientData` when `n < 3`, `ZeroVariance` when all values are equal.
pub fn skewness(data: &[f64]) -> StatsResult<f64> {
    check(data, 3)?;
    let m = mean(data)?;
    let nf = data.len() as f64;

    let (m2, m3) = data.iter().fold((0.0, 0.0), |(s2, s3), &x| {
        let d = x - m;
        (s2 + d * d, s3 + d * d * d)
    });
    let m2 = m2 / nf;
    let m3 = m3 / nf;

    if m2 < 1e-300 {
        return Err(StatsError::ZeroVariance);
    }
    Ok(m3 / m2.powf(1.5))
}

/// Percentile `p` in `[0, 100]` with linear interpolation.
///
/// ```
/// use u_descriptive::descriptive::percentile;
///
/// let data = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert!((percentile(&data, 50.0).unwrap() - 3.0).abs() < 1e-12);
/// assert!((percentile(&data, 95.0).unwrap() - 4.8).abs() < 1e-12);
/// ```
pub fn percentile(data: &[f64], p: f64) -> StatsResult<f64> {
    if !p.is_finite() || !(0.0..=100.0).contains(&p) {
        return Err(StatsError::invalid(format!(
            "percentile must be within [0, 100], got {p}"
        )));
    }
    check(data, 1)?;
    stats::quantile(data, p / 100.0).ok_or(StatsError::NonFinite)
}

/// Smallest value.
pub fn min(data: &[f64]) -> StatsResult<f64> {
    check(data, 1)?;
    data.iter()
        .copied()
        .reduce(f64::min)
        .ok_or(StatsError::insufficient(1, 0))
}

/// Largest value.
pub fn max(data: &[f64]) -> StatsResult<f64> {
    check(data, 1)?;
    data.iter()
        .copied()
        .reduce(f64::max)
        .ok_or(StatsError::insufficient(1, 0))
}

/// One-line summary of a column.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Number of observations.
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

/// Computes a [`Summary`] for a column with at least two observations.
pub fn summarize(data: &[f64]) -> StatsResult<Summary> {
    check(data, 2)?;
    Ok(Summary {
        count: data.len(),
        mean: mean(data)?,
        median: median(data)?,
        std_dev: std_dev(data)?,
        min: min(data)?,
        max: max(data)?,
    })
}
