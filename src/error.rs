//! Error types.
//!
//! Statistics never return NaN for degenerate input. Instead they report
//! *why* a value could not be computed, so callers can print "insufficient
//! data" rather than propagate a silent NaN through a report.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the statistics pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("insufficient data: need at least {needed} observations, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("input contains NaN or infinite values")]
    NonFinite,

    #[error("zero variance: all observations are identical")]
    ZeroVariance,

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl StatsError {
    pub(crate) fn insufficient(needed: usize, got: usize) -> Self {
        Self::InsufficientData { needed, got }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }
}

pub type StatsResult<T> = Result<T, StatsError>;

/// Errors raised while loading or validating an [`AnalysisConfig`](crate::config::AnalysisConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
