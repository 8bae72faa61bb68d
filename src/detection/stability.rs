//! Process stability verdict from a defect count.
//!
//! A process is considered stable when the share of flagged parts stays
//! below a maximum ratio of the production run (1% by default in the
//! manufacturing analysis).

use std::fmt;

use crate::error::{StatsError, StatsResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stability {
    Stable,
    NeedsInvestigation,
}

impl fmt::Display for Stability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stability::Stable => write!(f, "Process is Stable"),
            Stability::NeedsInvestigation => write!(f, "Process Needs Investigation"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StabilityAssessment {
    pub defects: usize,
    pub total: usize,
    /// `defects / total`.
    pub defect_ratio: f64,
    pub max_ratio: f64,
    pub verdict: Stability,
}

/// Stable iff `defects < max_ratio · total`.
///
/// # Errors
///
/// `InsufficientData` for an empty run, `InvalidParameter` if `max_ratio`
/// is outside `(0, 1]` or `defects > total`.
///
/// # Examples
///
/// ```
/// use u_descriptive::detection::{assess_stability, Stability};
///
/// assert_eq!(assess_stability(14, 1500, 0.01).unwrap().verdict, Stability::Stable);
/// assert_eq!(
///     assess_stability(15, 1500, 0.01).unwrap().verdict,
///     Stability::NeedsInvestigation
/// );
/// ```
pub fn assess_stability(defects: usize, total: usize, max_ratio: f64) -> StatsResult<StabilityAssessment> {
    if total == 0 {
        return Err(StatsError::insufficient(1, 0));
    }
    if !(max_ratio > 0.0 && max_ratio <= 1.0) {
        return Err(StatsError::invalid(format!(
            "maximum defect ratio must be within (0, 1], got {max_ratio}"
        )));
    }
    if defects > total {
        return Err(StatsError::invalid(format!(
            "defect count {defects} exceeds run size {total}"
        )));
    }

    let verdict = if (defects as f64) < max_ratio * total as f64 {
        Stability::Stable
    } else {
        Stability::NeedsInvestigation
    };

    Ok(StabilityAssessment {
        defects,
        total,
        defect_ratio: defects as f64 / total as f64,
        max_ratio,
        verdict,
    })
}
