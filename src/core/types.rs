//! Core data types for the Pure Rust XGBoost implementation.

use crate::core::error::XGBoostError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of samples or a sample index.
pub type DataSize = usize;

/// Feature values as read from the feature matrix.
pub type FeatureValue = f64;

/// Targets, predictions, gradients and hessians.
pub type Score = f64;

/// Feature index type for identifying columns of the feature matrix.
pub type FeatureIndex = usize;

/// Tree node identifier type (index into a tree's node arena).
pub type NodeIndex = usize;

/// Boosting round number.
pub type IterationIndex = usize;

/// Verbosity levels for training output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Only errors are reported
    Silent,
    /// Warnings and errors
    Warning,
    /// Per-fit summaries
    Info,
    /// Per-round details
    Debug,
}

impl Default for VerbosityLevel {
    fn default() -> Self {
        VerbosityLevel::Info
    }
}

impl VerbosityLevel {
    /// The `log` level that corresponds to this verbosity.
    pub fn as_level_filter(&self) -> log::LevelFilter {
        match self {
            VerbosityLevel::Silent => log::LevelFilter::Error,
            VerbosityLevel::Warning => log::LevelFilter::Warn,
            VerbosityLevel::Info => log::LevelFilter::Info,
            VerbosityLevel::Debug => log::LevelFilter::Debug,
        }
    }
}

impl fmt::Display for VerbosityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerbosityLevel::Silent => write!(f, "silent"),
            VerbosityLevel::Warning => write!(f, "warning"),
            VerbosityLevel::Info => write!(f, "info"),
            VerbosityLevel::Debug => write!(f, "debug"),
        }
    }
}

impl FromStr for VerbosityLevel {
    type Err = XGBoostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "silent" => Ok(VerbosityLevel::Silent),
            "warning" => Ok(VerbosityLevel::Warning),
            "info" => Ok(VerbosityLevel::Info),
            "debug" => Ok(VerbosityLevel::Debug),
            other => Err(XGBoostError::config(format!(
                "Unknown verbosity {:?}, expected silent, warning, info or debug",
                other
            ))),
        }
    }
}
