//! Percentile thresholding of per-entity aggregates.
//!
//! Computes the `p`-th percentile of a set of entity scores (for example the
//! average mark of each student) and selects every entity whose score is at
//! or above it. With `p = 95` roughly 5% of entities are selected; ties at
//! the threshold can push the count slightly higher.

use std::cmp::Ordering;

use crate::descriptive;
use crate::error::{StatsError, StatsResult};

/// Selects entities at or above a percentile of their scores.
///
/// # Examples
///
/// ```
/// use u_descriptive::detection::PercentileSelector;
///
/// let students: Vec<(u32, f64)> = (1..=100).map(|id| (id, f64::from(id))).collect();
/// let top = PercentileSelector::new(95.0).unwrap().select(&students).unwrap();
/// assert!((top.threshold - 95.05).abs() < 1e-9);
/// assert_eq!(top.selected.len(), 5);
/// assert_eq!(top.selected[0].0, 100); // best first
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentileSelector {
    percentile: f64,
}

/// Result of a percentile selection.
#[derive(Debug, Clone, PartialEq)]
pub struct TopSelection<T> {
    /// The percentile value of the scores.
    pub threshold: f64,
    /// Selected `(entity, score)` pairs, highest score first. Equal scores
    /// keep their input order.
    pub selected: Vec<(T, f64)>,
}

impl PercentileSelector {
    /// # Errors
    ///
    /// `InvalidParameter` unless `percentile` is within `[0, 100]`.
    pub fn new(percentile: f64) -> StatsResult<Self> {
        if !percentile.is_finite() || !(0.0..=100.0).contains(&percentile) {
            return Err(StatsError::invalid(format!(
                "percentile must be within [0, 100], got {percentile}"
            )));
        }
        Ok(Self { percentile })
    }

    pub fn percentile(&self) -> f64 {
        self.percentile
    }

    /// Selects the entities whose score is `>=` the percentile threshold.
    ///
    /// # Errors
    ///
    /// `InsufficientData` for no entities, `NonFinite` for a NaN score.
    pub fn select<T: Clone>(&self, entities: &[(T, f64)]) -> StatsResult<TopSelection<T>> {
        let scores: Vec<f64> = entities.iter().map(|(_, s)| *s).collect();
        let threshold = descriptive::percentile(&scores, self.percentile)?;

        let mut selected: Vec<(T, f64)> = entities
            .iter()
            .filter(|(_, s)| *s >= threshold)
            .cloned()
            .collect();
        selected.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        Ok(TopSelection {
            threshold,
            selected,
        })
    }
}
