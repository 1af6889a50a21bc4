//! Split finding for the Pure Rust XGBoost framework.
//!
//! Exact search over every distinct threshold of every feature, with features
//! scanned in parallel and winners reduced in feature order.

pub mod finder;

pub use finder::{SplitFinder, SplitInfo};
