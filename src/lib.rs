//! # Pure Rust XGBoost
//!
//! A pure Rust implementation of second-order gradient-boosted regression
//! trees in the style of XGBoost.
//!
//! ## Features
//!
//! - **Second-Order Splits**: Split gains and leaf values come from a Taylor
//!   expansion of the loss (`0.5 * G^2 / H` and `G / H`).
//! - **Multi-Output Regression**: One tree predicts every target column; the
//!   gain sums gradients and hessians over all columns.
//! - **Pluggable Criteria**: Losses implement [`LossFunction`] and the tree
//!   builder consumes any [`TreeBuildStrategy`].
//! - **Parallel Split Search**: Candidate features are scanned with Rayon
//!   while results stay bit-for-bit reproducible.
//! - **Observable Training**: Per-round callbacks, a training history and
//!   cooperative cancellation.
//!
//! ## Quick Start
//!
//! ```rust
//! use xgboost_rust::{ConfigBuilder, XGBoost};
//! use ndarray::{Array1, Array2};
//!
//! # fn main() -> xgboost_rust::Result<()> {
//! let features = Array2::from_shape_fn((50, 1), |(i, _)| (i + 1) as f64);
//! let labels: Array1<f64> = features.column(0).mapv(|x| 2.0 * x);
//!
//! let config = ConfigBuilder::new()
//!     .n_estimators(50)
//!     .max_depth(2)
//!     .min_samples_split(2)
//!     .build()?;
//!
//! let mut model = XGBoost::new(config);
//! model.fit(&features, &labels)?;
//!
//! let predictions = model.predict_vector(&features)?;
//! assert_eq!(predictions.len(), 50);
//! # Ok(())
//! # }
//! ```
//!
//! ## Learning Rate
//!
//! By default round updates are accumulated unscaled and `learning_rate` is
//! carried in the configuration only. Setting `apply_learning_rate` scales
//! every update (in training and in prediction) by `learning_rate`.
//!
//! ## Logging
//!
//! Diagnostics go through the `log` facade. Call [`init`] to install
//! `env_logger`, or register any other logger before fitting.

#![doc(html_root_url = "https://docs.rs/xgboost-rust/")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    non_snake_case,
    non_upper_case_globals
)]

// Core infrastructure module - always available
pub mod core;

// Configuration management module
pub mod config;

// Regression tree construction
pub mod tree;

// Boosting loop, losses and strategies
pub mod boosting;

// Evaluation metrics
pub mod metrics;

// Re-export core functionality for convenience
pub use self::core::{
    constants::*,
    error::{Result, XGBoostError},
    types::*,
};

// Re-export configuration functionality
pub use self::config::{BoosterConfig, ConfigBuilder};

// Re-export tree functionality
pub use self::tree::{DecisionTree, Tree, TreeConfig, TreeNode};

// Re-export boosting functionality
pub use self::boosting::{
    concat_augmented, split_augmented, AugmentedLabels, CancellationToken, GradientSums, LabelBlock,
    LeastSquaresLoss, LoggingCallback, LossFunction, RoundEvent, TaylorStrategy,
    TrainingCallback, TrainingHistory, TrainingState, TreeBuildStrategy, XGBoost,
    XGBoostRegressionTree,
};

// Re-export metrics functionality
pub use self::metrics::{evaluate_regression, RegressionMetrics};

// Version information
pub use self::core::constants::XGBOOST_RUST_VERSION as VERSION;

/// Initialize the library.
///
/// Installs `env_logger` as the logging backend (honouring `RUST_LOG`) unless
/// the host application already registered a logger. Safe to call repeatedly.
///
/// # Examples
///
/// ```rust
/// fn main() -> xgboost_rust::Result<()> {
///     xgboost_rust::init()?;
///     assert!(xgboost_rust::is_initialized());
///     Ok(())
/// }
/// ```
pub fn init() -> Result<()> {
    self::core::initialize_core()
}

/// Check if the library has been initialized.
pub fn is_initialized() -> bool {
    self::core::is_core_initialized()
}
