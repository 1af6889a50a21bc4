//! Configuration management for Pure Rust XGBoost.
//!
//! [`BoosterConfig`] carries every hyperparameter of the ensemble and the
//! trees it grows. It can be built fluently through [`ConfigBuilder`], loaded
//! from `.json`/`.toml` files, or overridden from `XGBOOST_*` environment
//! variables.

pub mod core;

pub use self::core::{BoosterConfig, ConfigBuilder};
