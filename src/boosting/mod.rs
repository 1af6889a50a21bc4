//! Gradient boosting for Pure Rust XGBoost.
//!
//! This module contains the boosting loop ([`XGBoost`]), the loss functions it
//! differentiates, the augmented label blocks handed to every round's tree,
//! the Taylor split/leaf strategy, and the per-round observation hooks.

pub mod callback;
pub mod gbdt;
pub mod labels;
pub mod objective;
pub mod regression_tree;
pub mod strategy;

pub use callback::{CancellationToken, LoggingCallback, RoundEvent, TrainingCallback, TrainingHistory};
pub use gbdt::{TrainingState, XGBoost};
pub use labels::{concat_augmented, split_augmented, AugmentedLabels, LabelBlock};
pub use objective::{LeastSquaresLoss, LossFunction};
pub use regression_tree::XGBoostRegressionTree;
pub use strategy::{newton_step, node_gain_from_sums, GradientSums, TaylorStrategy, TreeBuildStrategy};
