//! Core infrastructure module for Pure Rust XGBoost.
//!
//! This module provides the foundational components shared by the rest of the
//! crate:
//!
//! - [`types`]: Scalar aliases and small enumerations
//! - [`constants`]: Default hyperparameters and numeric tolerances
//! - [`error`]: The crate-wide error type and `Result` alias
//!
//! # Usage
//!
//! ```rust
//! use xgboost_rust::core::{
//!     constants::DEFAULT_N_ESTIMATORS,
//!     error::{Result, XGBoostError},
//!     types::Score,
//! };
//!
//! fn positive(value: Score) -> Result<Score> {
//!     if value > 0.0 {
//!         Ok(value)
//!     } else {
//!         Err(XGBoostError::data("value must be positive"))
//!     }
//! }
//!
//! assert_eq!(DEFAULT_N_ESTIMATORS, 200);
//! assert!(positive(1.0).is_ok());
//! ```

pub mod constants;
pub mod error;
pub mod types;

pub use constants::*;
pub use error::{Result, XGBoostError};
pub use types::*;

use std::sync::atomic::{AtomicBool, Ordering};

static CORE_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initialize the core module.
///
/// Installs `env_logger` as the `log` backend unless another logger is
/// already registered. Calling it more than once is harmless.
pub fn initialize_core() -> Result<()> {
    if CORE_INITIALIZED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    // Another logger may already be installed by the host application.
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(DEFAULT_VERBOSITY.as_level_filter().as_str()),
    )
    .try_init();

    log::debug!("xgboost-rust {} core initialized", XGBOOST_RUST_VERSION);
    Ok(())
}

/// Check if the core module has been initialized.
pub fn is_core_initialized() -> bool {
    CORE_INITIALIZED.load(Ordering::SeqCst)
}
