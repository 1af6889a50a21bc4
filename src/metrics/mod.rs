//! Evaluation metrics for Pure Rust XGBoost.

pub mod regression;

pub use regression::{evaluate_regression, mean_absolute_error, RegressionMetrics};
