//! Z-score anomaly flagging.
//!
//! # Algorithm
//!
//! Given a reference mean μ and standard deviation σ, each observation is
//! standardized as
//!
//! ```text
//! z_i = (x_i - mu) / sigma
//! ```
//!
//! and flagged when `|z_i| > threshold`. The comparison is strict: a point
//! sitting exactly on the threshold is not an anomaly.
//!
//! The reference can be estimated from the data itself
//! ([`ZScoreDetector::from_sample`]) or mixed, e.g. the empirical mean with
//! a known process σ ([`ZScoreDetector::new`] with a hand-built
//! [`NormalModel`]).
//!
//! # Parameters
//!
//! - **threshold**: 2.0 flags about 4.6% of normal data, 2.5 about 1.2%.

use crate::error::{StatsError, StatsResult};
use crate::normal::NormalModel;

/// Z-score detector with a fixed reference distribution.
///
/// # Examples
///
/// ```
/// use u_descriptive::detection::ZScoreDetector;
/// use u_descriptive::normal::NormalModel;
///
/// let reference = NormalModel::new(100.0, 5.0).unwrap();
/// let detector = ZScoreDetector::new(reference, 2.5).unwrap();
/// let weights = [99.0, 101.5, 87.0, 100.2, 113.0];
/// let anomalies = detector.detect(&weights);
/// let idx: Vec<usize> = anomalies.iter().map(|a| a.index).collect();
/// assert_eq!(idx, vec![2, 4]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZScoreDetector {
    reference: NormalModel,
    threshold: f64,
}

/// A flagged observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Anomaly {
    /// Index of the observation in the input sequence.
    pub index: usize,
    /// The raw observation.
    pub value: f64,
    /// Its standardized value.
    pub z: f64,
}

fn check_threshold(threshold: f64) -> StatsResult<()> {
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(StatsError::invalid(format!(
            "z-score threshold must be positive and finite, got {threshold}"
        )));
    }
    Ok(())
}

impl ZScoreDetector {
    /// Creates a detector from a reference model and threshold.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `threshold` is not positive and finite.
    pub fn new(reference: NormalModel, threshold: f64) -> StatsResult<Self> {
        check_threshold(threshold)?;
        Ok(Self {
            reference,
            threshold,
        })
    }

    /// Uses the sample mean and sample standard deviation of `data` as the
    /// reference.
    pub fn from_sample(data: &[f64], threshold: f64) -> StatsResult<Self> {
        check_threshold(threshold)?;
        Self::new(NormalModel::from_sample(data)?, threshold)
    }

    pub fn reference(&self) -> &NormalModel {
        &self.reference
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Standardized value of one observation.
    pub fn score(&self, x: f64) -> f64 {
        self.reference.z(x)
    }

    /// Standardized values of a column, index-aligned with the input.
    pub fn scores(&self, data: &[f64]) -> Vec<f64> {
        data.iter().map(|&x| self.score(x)).collect()
    }

    /// Observations strictly beyond the threshold, in input order.
    /// Non-finite values are never anomalies.
    ///
    /// # Complexity
    ///
    /// Time: O(n), Space: O(k) where k is the number of anomalies
    pub fn detect(&self, data: &[f64]) -> Vec<Anomaly> {
        let z = self.scores(data);
        beyond(&z, self.threshold)
            .into_iter()
            .map(|index| Anomaly {
                index,
                value: data[index],
                z: z[index],
            })
            .collect()
    }
}

/// Indices of an already-standardized column whose magnitude exceeds
/// `threshold`.
///
/// Idempotent: filtering the selected scores again yields all of them.
pub fn filter_standardized(z: &[f64], threshold: f64) -> StatsResult<Vec<usize>> {
    check_threshold(threshold)?;
    Ok(beyond(z, threshold))
}

fn beyond(z: &[f64], threshold: f64) -> Vec<usize> {
    z.iter()
        .enumerate()
        .filter(|&(_, &v)| v.is_finite() && v.abs() > threshold)
        .map(|(i, _)| i)
        .collect()
}

/// Percentage of observations strictly above `cutoff`.
///
/// # Errors
///
/// `InsufficientData` for an empty column, `NonFinite` for NaN values or
/// a non-finite cutoff.
pub fn share_above(data: &[f64], cutoff: f64) -> StatsResult<f64> {
    crate::descriptive::check(data, 1)?;
    if !cutoff.is_finite() {
        return Err(StatsError::NonFinite);
    }
    let above = data.iter().filter(|&&x| x > cutoff).count();
    Ok(above as f64 / data.len() as f64 * 100.0)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn filtering_is_idempotent(
            z in proptest::collection::vec(-5.0_f64..5.0, 0..=100),
            threshold in 0.5_f64..3.0,
        ) {
            let first = filter_standardized(&z, threshold).expect("valid threshold");
            let selected: Vec<f64> = first.iter().map(|&i| z[i]).collect();
            let second = filter_standardized(&selected, threshold).expect("valid threshold");
            prop_assert_eq!(second.len(), selected.len());

            let again = filter_standardized(&z, threshold).expect("valid threshold");
            prop_assert_eq!(first, again);
        }

        #[test]
        fn detect_matches_filter_on_scores(
            data in proptest::collection::vec(50.0_f64..150.0, 0..=100),
            threshold in 0.5_f64..3.0,
        ) {
            let d = ZScoreDetector::new(NormalModel::new(100.0, 5.0).expect("valid"), threshold)
                .expect("valid threshold");
            let by_detect: Vec<usize> = d.detect(&data).into_iter().map(|a| a.index).collect();
            let by_filter = filter_standardized(&d.scores(&data), threshold).expect("valid");
            prop_assert_eq!(by_detect, by_filter);
        }

        #[test]
        fn share_above_is_a_percentage(
            data in proptest::collection::vec(-1e3_f64..1e3, 1..=60),
            cutoff in -1e3_f64..1e3,
        ) {
            let pct = share_above(&data, cutoff).expect("valid");
            prop_assert!((0.0..=100.0).contains(&pct), "pct = {pct}");
        }
    }
}
