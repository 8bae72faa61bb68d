//! # u-descriptive
//!
//! Descriptive statistics, normal-model probabilities, sampling
//! distributions and simple anomaly detection, demonstrated end to end on
//! two synthetic datasets: manufactured part weights and university marks.
//!
//! The numeric modules operate on raw `f64` slices and know nothing about
//! either dataset; [`dataset`] and [`report`] wire them into the two
//! analyses.
//!
//! ## Modules
//!
//! - [`descriptive`]: mean, median, sample standard deviation, skewness, percentiles
//! - [`grouping`]: per-group summaries and group comparisons
//! - [`normal`]: normal model (pdf, cdf, interval probabilities, tail PPM)
//! - [`histogram`]: binning with fixed or rule-based bin counts
//! - [`sampling`]: resampled means and the sampling distribution of the mean
//! - [`detection`]: z-score filtering, percentile top-K selection, stability verdicts
//! - [`dataset`]: seeded synthesis of the manufacturing and university data
//! - [`report`]: the two analyses and their text rendering
//! - [`config`]: TOML configuration with defaults for every constant
//!
//! ## Errors
//!
//! Numeric functions return [`StatsResult`]: an empty or too-short input, a
//! non-finite value or a zero spread is reported as a [`StatsError`] rather
//! than propagated as `NaN`.

pub mod config;
pub mod dataset;
pub mod descriptive;
pub mod detection;
pub mod error;
pub mod grouping;
pub mod histogram;
pub mod normal;
pub mod report;
pub mod sampling;

pub use error::{ConfigError, StatsError, StatsResult};
