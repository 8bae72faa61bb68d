//! Grouped aggregates over a categorical key.
//!
//! Partition a numeric column by a key, then summarize each partition
//! (count, mean, sample standard deviation, skewness). Also provides the
//! `idxmax`-style selections used by the reports: the group with the
//! highest mean and the group with the largest spread.
//!
//! Groups are stored in a `BTreeMap`, so iteration order is the key's
//! `Ord` order and ties in the selections resolve to the smallest key.
//!
//! # Examples
//!
//! ```
//! use u_descriptive::grouping::{best_by_mean, group_values, summarize_groups};
//!
//! let rows = [("CSE", 80.0), ("ECE", 60.0), ("CSE", 90.0), ("ECE", 70.0)];
//! let groups = group_values(rows.iter().copied());
//! let summaries = summarize_groups(&groups).unwrap();
//! assert_eq!(best_by_mean(&summaries).unwrap().key, "CSE");
//! ```

use std::collections::BTreeMap;

use crate::descriptive;
use crate::error::{StatsError, StatsResult};

/// Summary of one partition.
///
/// `std_dev` and `skewness` are `None` when the group is too small (or,
/// for skewness, constant) for the statistic to be defined.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary<K> {
    pub key: K,
    pub count: usize,
    pub mean: f64,
    pub std_dev: Option<f64>,
    pub skewness: Option<f64>,
}

/// Partitions `(key, value)` pairs by key.
pub fn group_values<K, I>(pairs: I) -> BTreeMap<K, Vec<f64>>
where
    K: Ord,
    I: IntoIterator<Item = (K, f64)>,
{
    let mut groups: BTreeMap<K, Vec<f64>> = BTreeMap::new();
    for (key, value) in pairs {
        groups.entry(key).or_default().push(value);
    }
    groups
}

/// Summarizes every group.
///
/// # Errors
///
/// Propagates `NonFinite` from any group, and `InsufficientData` for an
/// empty group (which [`group_values`] never produces).
pub fn summarize_groups<K>(groups: &BTreeMap<K, Vec<f64>>) -> StatsResult<Vec<GroupSummary<K>>>
where
    K: Ord + Clone,
{
    groups
        .iter()
        .map(|(key, values)| -> StatsResult<GroupSummary<K>> {
            Ok(GroupSummary {
                key: key.clone(),
                count: values.len(),
                mean: descriptive::mean(values)?,
                std_dev: defined(descriptive::std_dev(values))?,
                skewness: defined(descriptive::skewness(values))?,
            })
        })
        .collect()
}

/// Maps "statistic undefined for this group" to `None`, keeping real errors.
fn defined(r: StatsResult<f64>) -> StatsResult<Option<f64>> {
    match r {
        Ok(v) => Ok(Some(v)),
        Err(StatsError::InsufficientData { .. }) | Err(StatsError::ZeroVariance) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Group with the highest mean; first in key order on ties.
pub fn best_by_mean<K>(summaries: &[GroupSummary<K>]) -> Option<&GroupSummary<K>> {
    summaries.iter().fold(None, |best: Option<&GroupSummary<K>>, g| match best {
        Some(b) if b.mean >= g.mean => Some(b),
        _ => Some(g),
    })
}

/// Group with the largest standard deviation, ignoring groups where it is
/// undefined.
pub fn max_variation<K>(summaries: &[GroupSummary<K>]) -> Option<&GroupSummary<K>> {
    summaries
        .iter()
        .filter_map(|g| g.std_dev.map(|sd| (g, sd)))
        .fold(None, |best: Option<(&GroupSummary<K>, f64)>, (g, sd)| match best {
            Some((b, bsd)) if bsd >= sd => Some((b, bsd)),
            _ => Some((g, sd)),
        })
        .map(|(g, _)| g)
}

/// Size-weighted mean of group means: Σ nᵢ·x̄ᵢ / Σ nᵢ.
///
/// Equals the overall mean of the pooled data for any partition.
pub fn weighted_mean<K>(summaries: &[GroupSummary<K>]) -> StatsResult<f64> {
    let total: usize = summaries.iter().map(|g| g.count).sum();
    if total == 0 {
        return Err(StatsError::insufficient(1, 0));
    }
    let weighted: f64 = summaries.iter().map(|g| g.count as f64 * g.mean).sum();
    Ok(weighted / total as f64)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn weighted_group_mean_equals_overall_mean(
            rows in proptest::collection::vec((0_u8..5, -1e3_f64..1e3), 1..=80)
        ) {
            let values: Vec<f64> = rows.iter().map(|&(_, v)| v).collect();
            let overall = descriptive::mean(&values).expect("non-empty");
            let summaries = summarize_groups(&group_values(rows)).expect("finite");
            let pooled = weighted_mean(&summaries).expect("non-empty");
            prop_assert!((pooled - overall).abs() < 1e-6, "{pooled} vs {overall}");
        }

        #[test]
        fn counts_sum_to_n(
            rows in proptest::collection::vec((0_u8..5, -1e3_f64..1e3), 1..=80)
        ) {
            let n = rows.len();
            let summaries = summarize_groups(&group_values(rows)).expect("finite");
            let total: usize = summaries.iter().map(|g| g.count).sum();
            prop_assert_eq!(total, n);
        }
    }
}
