//! Equal-width histograms.
//!
//! A column is split into a fixed number of equal-width bins spanning
//! `[min, max]`. Bins are half-open `[lo, hi)` except the last, which also
//! holds the maximum.
//!
//! # Examples
//!
//! ```
//! use u_descriptive::histogram::histogram;
//!
//! let data = [1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0];
//! let h = histogram(&data, 4).unwrap();
//! assert_eq!(h.counts, vec![2, 2, 2, 3]);
//! assert_eq!(h.total(), data.len());
//! ```

use crate::descriptive;
use crate::error::{StatsError, StatsResult};

/// Upper bound on the number of bins a caller may request.
pub const MAX_BINS: usize = 10_000;

/// Binned counts.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub bin_width: f64,
    /// `n_bins + 1` edges, from `min` to `max`.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn n_bins(&self) -> usize {
        self.counts.len()
    }

    /// Number of binned observations.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Midpoint of each bin.
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
    }

    /// Counts scaled to unit area, `count / (n · width)`, for comparison
    /// with a probability density.
    pub fn density(&self) -> Vec<f64> {
        let area = self.total() as f64 * self.bin_width;
        self.counts
            .iter()
            .map(|&c| if area > 0.0 { c as f64 / area } else { 0.0 })
            .collect()
    }
}

/// Counts `data` into `bins` equal-width bins.
///
/// # Errors
///
/// - `InvalidParameter` unless `1 <= bins <= MAX_BINS`
/// - `InsufficientData` for fewer than 2 observations
/// - `NonFinite` for NaN or infinite values
/// - `ZeroVariance` when every value is the same
pub fn histogram(data: &[f64], bins: usize) -> StatsResult<Histogram> {
    if bins == 0 || bins > MAX_BINS {
        return Err(StatsError::invalid(format!(
            "bin count must be within 1..={MAX_BINS}, got {bins}"
        )));
    }
    descriptive::check(data, 2)?;

    let lo = descriptive::min(data)?;
    let hi = descriptive::max(data)?;
    if hi <= lo {
        return Err(StatsError::ZeroVariance);
    }

    let bin_width = (hi - lo) / bins as f64;
    let mut edges: Vec<f64> = (0..bins).map(|i| lo + i as f64 * bin_width).collect();
    edges.push(hi);

    let mut counts = vec![0_usize; bins];
    for &x in data {
        // float division can round the maximum one bin past the end
        let i = (((x - lo) / bin_width) as usize).min(bins - 1);
        counts[i] += 1;
    }

    Ok(Histogram {
        bin_width,
        edges,
        counts,
    })
}
