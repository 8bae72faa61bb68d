//! Anomaly detection and selection.
//!
//! Flag and select observations that stand out from a reference.
//!
//! # Detectors
//!
//! - [`ZScoreDetector`]: standardize against a reference N(μ, σ²) and flag |z| > threshold
//! - [`PercentileSelector`]: entities at or above the p-th percentile of their scores
//! - [`assess_stability`]: stable/unstable verdict from a defect count
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.
//! - Hyndman & Fan (1996). "Sample Quantiles in Statistical Packages",
//!   *The American Statistician* 50(4), pp. 361-365.

mod percentile;
mod stability;
mod zscore;

pub use percentile::{PercentileSelector, TopSelection};
pub use stability::{assess_stability, Stability, StabilityAssessment};
pub use zscore::{filter_standardized, share_above, Anomaly, ZScoreDetector};
