//! Analysis configuration.
//!
//! Every tunable constant of the two analyses lives here with its
//! conventional default, so a run can be reproduced or varied from a TOML
//! file without touching code:
//!
//! ```toml
//! seed = 7
//!
//! [manufacturing]
//! parts = 3000
//! anomaly_threshold = 3.0
//!
//! [university]
//! layout = "flat"
//! top_percentile = 90.0
//! ```
//!
//! Missing keys and sections fall back to [`Default`]. Unknown keys are
//! rejected so typos surface as errors.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dataset::university::Layout;
use crate::error::ConfigError;
use crate::histogram::MAX_BINS;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Seed shared by data synthesis and resampling.
    pub seed: u64,
    pub manufacturing: ManufacturingConfig,
    pub university: UniversityConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            manufacturing: ManufacturingConfig::default(),
            university: UniversityConfig::default(),
        }
    }
}

/// Manufacturing analysis parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManufacturingConfig {
    /// Number of parts to synthesize.
    pub parts: usize,
    /// Process mean weight (grams).
    pub mean_weight: f64,
    /// Process standard deviation (grams). Also the z-score reference σ.
    pub sigma: f64,
    /// Batch ids are drawn from `1..=batches`.
    pub batches: u32,
    /// Machine ids are drawn from `1..=machines`.
    pub machines: u32,
    /// Parts with |z| above this are defective.
    pub anomaly_threshold: f64,
    /// Observations per resample.
    pub clt_sample_size: usize,
    /// Number of resamples.
    pub clt_repetitions: usize,
    /// Stable while defects < `stability_ratio` · parts.
    pub stability_ratio: f64,
    /// Upper bound for the `P(X < below)` probe.
    pub below: f64,
    /// Range for the `P(lo < X < hi)` probe.
    pub between: (f64, f64),
    pub histogram_bins: usize,
    pub clt_bins: usize,
    /// Points on the overlaid normal curve.
    pub curve_points: usize,
}

impl Default for ManufacturingConfig {
    fn default() -> Self {
        Self {
            parts: 1500,
            mean_weight: 100.0,
            sigma: 5.0,
            batches: 20,
            machines: 5,
            anomaly_threshold: 2.5,
            clt_sample_size: 40,
            clt_repetitions: 100,
            stability_ratio: 0.01,
            below: 90.0,
            between: (95.0, 105.0),
            histogram_bins: 30,
            clt_bins: 20,
            curve_points: 100,
        }
    }
}

/// University analysis parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UniversityConfig {
    pub students: u32,
    /// Lowest possible mark (inclusive).
    pub marks_low: u32,
    /// Upper bound on marks (exclusive).
    pub marks_high: u32,
    pub layout: Layout,
    /// Marks with |z| above this are abnormal.
    pub anomaly_threshold: f64,
    /// Students with an average at or above this percentile are top performers.
    pub top_percentile: f64,
    /// Reports the share of marks above mean + `band_sigmas` · σ.
    pub band_sigmas: f64,
    pub histogram_bins: usize,
}

impl Default for UniversityConfig {
    fn default() -> Self {
        Self {
            students: 100,
            marks_low: 40,
            marks_high: 100,
            layout: Layout::Normalized,
            anomaly_threshold: 2.0,
            top_percentile: 95.0,
            band_sigmas: 1.0,
            histogram_bins: 20,
        }
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}

fn bin_count(name: &str, bins: usize) -> Result<(), ConfigError> {
    if (1..=MAX_BINS).contains(&bins) {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be within 1..={MAX_BINS}, got {bins}")))
    }
}

fn positive(name: &str, v: f64) -> Result<(), ConfigError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be positive and finite, got {v}")))
    }
}

impl AnalysisConfig {
    /// Loads and validates a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AnalysisConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.manufacturing.validate()?;
        self.university.validate()
    }
}

impl ManufacturingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.parts < 2 || self.parts > u32::MAX as usize {
            return Err(invalid(format!(
                "manufacturing.parts must be within 2..={}, got {}",
                u32::MAX,
                self.parts
            )));
        }
        if !self.mean_weight.is_finite() {
            return Err(invalid("manufacturing.mean_weight must be finite"));
        }
        positive("manufacturing.sigma", self.sigma)?;
        positive("manufacturing.anomaly_threshold", self.anomaly_threshold)?;
        if self.batches == 0 || self.machines == 0 {
            return Err(invalid("manufacturing.batches and machines must be positive"));
        }
        if self.clt_sample_size == 0 || self.clt_sample_size > self.parts {
            return Err(invalid(format!(
                "manufacturing.clt_sample_size must be within 1..={}, got {}",
                self.parts, self.clt_sample_size
            )));
        }
        if self.clt_repetitions == 0 {
            return Err(invalid("manufacturing.clt_repetitions must be positive"));
        }
        if !(self.stability_ratio > 0.0 && self.stability_ratio <= 1.0) {
            return Err(invalid(format!(
                "manufacturing.stability_ratio must be within (0, 1], got {}",
                self.stability_ratio
            )));
        }
        let (lo, hi) = self.between;
        if !self.below.is_finite() || !lo.is_finite() || !hi.is_finite() || lo > hi {
            return Err(invalid("manufacturing probe bounds must be finite with lo <= hi"));
        }
        bin_count("manufacturing.histogram_bins", self.histogram_bins)?;
        bin_count("manufacturing.clt_bins", self.clt_bins)?;
        if self.curve_points < 2 {
            return Err(invalid("manufacturing.curve_points must be at least 2"));
        }
        Ok(())
    }
}

impl UniversityConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.students == 0 {
            return Err(invalid("university.students must be positive"));
        }
        // a single possible mark leaves no spread to standardize against
        if self.marks_high.saturating_sub(self.marks_low) < 2 {
            return Err(invalid(format!(
                "university marks range [{}, {}) must allow at least two values",
                self.marks_low, self.marks_high
            )));
        }
        positive("university.anomaly_threshold", self.anomaly_threshold)?;
        if !(0.0..=100.0).contains(&self.top_percentile) {
            return Err(invalid(format!(
                "university.top_percentile must be within [0, 100], got {}",
                self.top_percentile
            )));
        }
        if !self.band_sigmas.is_finite() {
            return Err(invalid("university.band_sigmas must be finite"));
        }
        bin_count("university.histogram_bins", self.histogram_bins)?;
        Ok(())
    }
}
