//! Regression tree subsystem for the Pure Rust XGBoost framework.
//!
//! Trees are grown greedily by exact threshold search. Split quality and leaf
//! outputs are delegated to a
//! [`TreeBuildStrategy`](crate::boosting::strategy::TreeBuildStrategy), so the
//! same builder serves any loss.

pub mod builder;
pub mod node;
pub mod split;
pub mod tree;

pub use builder::DecisionTree;
pub use node::TreeNode;
pub use split::{SplitFinder, SplitInfo};
pub use tree::Tree;

use crate::core::constants::*;
use crate::core::error::{Result, XGBoostError};
use crate::core::types::DataSize;
use serde::{Deserialize, Serialize};

/// Growth limits of a single tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Minimum samples a node needs before a split is attempted
    pub min_samples_split: DataSize,
    /// Minimum samples on each side of a split
    pub min_samples_leaf: DataSize,
    /// A split is accepted only when its gain is strictly greater than this
    pub min_impurity: f64,
    /// Maximum depth; the root is at depth 0
    pub max_depth: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig {
            min_samples_split: DEFAULT_MIN_SAMPLES_SPLIT,
            min_samples_leaf: DEFAULT_MIN_SAMPLES_LEAF,
            min_impurity: DEFAULT_MIN_IMPURITY,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl TreeConfig {
    /// Validate the growth limits
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(XGBoostError::invalid_parameter(
                "max_depth",
                self.max_depth.to_string(),
                "must be at least 1",
            ));
        }

        if self.min_samples_split < 2 {
            return Err(XGBoostError::invalid_parameter(
                "min_samples_split",
                self.min_samples_split.to_string(),
                "must be at least 2",
            ));
        }

        if self.min_samples_leaf == 0 {
            return Err(XGBoostError::invalid_parameter(
                "min_samples_leaf",
                self.min_samples_leaf.to_string(),
                "must be at least 1",
            ));
        }

        // NaN fails this comparison as well
        if !(self.min_impurity >= 0.0 && self.min_impurity.is_finite()) {
            return Err(XGBoostError::invalid_parameter(
                "min_impurity",
                self.min_impurity.to_string(),
                "must be a finite non-negative number",
            ));
        }

        Ok(())
    }

    /// Whether a node of `num_samples` at `depth` may be split at all.
    pub fn can_split(&self, num_samples: DataSize, depth: usize) -> bool {
        depth < self.max_depth
            && num_samples >= self.min_samples_split
            && num_samples >= 2 * self.min_samples_leaf
    }
}
