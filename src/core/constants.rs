//! System constants and default hyperparameters for Pure Rust XGBoost.

use crate::core::types::*;

/// Default number of boosting rounds (trees in the ensemble).
pub const DEFAULT_N_ESTIMATORS: usize = 200;

/// Default learning rate.
/// Only scales round updates when `apply_learning_rate` is enabled.
pub const DEFAULT_LEARNING_RATE: f64 = 0.01;

/// Default minimum number of samples a node needs to be considered for a split.
pub const DEFAULT_MIN_SAMPLES_SPLIT: DataSize = 2;

/// Default minimum number of samples on each side of a split.
pub const DEFAULT_MIN_SAMPLES_LEAF: DataSize = 1;

/// Default minimum split gain; a split must strictly exceed it.
pub const DEFAULT_MIN_IMPURITY: f64 = 1e-7;

/// Default maximum tree depth (the root sits at depth 0).
pub const DEFAULT_MAX_DEPTH: usize = 2;

/// Default number of threads for split search.
/// 0 means use all available cores.
pub const DEFAULT_NUM_THREADS: usize = 0;

/// Default verbosity level for logging.
pub const DEFAULT_VERBOSITY: VerbosityLevel = VerbosityLevel::Info;

/// Hessian sums with an absolute value at or below this are treated as zero.
pub const HESSIAN_EPSILON: f64 = 1e-15;

/// Version information.
pub const XGBOOST_RUST_VERSION: &str = env!("CARGO_PKG_VERSION");
