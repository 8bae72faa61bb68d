//! End-to-end analyses and their console rendering.
//!
//! Each report runs the whole pipeline for one dataset (synthesis →
//! descriptive statistics → anomaly detection) from a config and a seed,
//! keeps every intermediate result as plain data, and renders itself as
//! text through [`ManufacturingReport::display`] /
//! [`UniversityReport::display`].

pub mod chart;
mod manufacturing;
mod university;

pub use chart::TextHistogram;
pub use manufacturing::ManufacturingReport;
pub use university::UniversityReport;

use crate::error::{StatsError, StatsResult};
use crate::histogram::{histogram, Histogram};

/// A record flagged by the z-score detector.
#[derive(Debug, Clone, PartialEq)]
pub struct Flagged<T> {
    pub record: T,
    pub z: f64,
}

/// Number of leading records shown in a report.
pub const HEAD: usize = 5;

/// Histogram that tolerates degenerate input: a constant column has no
/// meaningful bins, so it is reported as absent instead of failing the run.
fn optional_histogram(data: &[f64], bins: usize) -> StatsResult<Option<Histogram>> {
    match histogram(data, bins) {
        Ok(h) => Ok(Some(h)),
        Err(StatsError::ZeroVariance) | Err(StatsError::InsufficientData { .. }) => {
            tracing::warn!("histogram skipped: not enough spread to bin");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
