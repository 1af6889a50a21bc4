//! Breadth-first tree builder for the Pure Rust XGBoost framework.

use crate::boosting::labels::AugmentedLabels;
use crate::boosting::strategy::TreeBuildStrategy;
use crate::core::error::{Result, XGBoostError};
use crate::core::types::{FeatureValue, NodeIndex, Score};
use crate::tree::split::SplitFinder;
use crate::tree::tree::Tree;
use crate::tree::TreeConfig;
use ndarray::{Array2, ArrayView2};
use std::collections::VecDeque;

/// Node waiting in the growth queue.
#[derive(Debug)]
struct NodeInfo {
    node_index: NodeIndex,
    data_indices: Vec<usize>,
    depth: usize,
}

impl NodeInfo {
    fn new(node_index: NodeIndex, data_indices: Vec<usize>, depth: usize) -> Self {
        NodeInfo {
            node_index,
            data_indices,
            depth,
        }
    }
}

/// A regression tree grown against augmented labels with a pluggable strategy.
#[derive(Debug, Clone)]
pub struct DecisionTree<S> {
    config: TreeConfig,
    strategy: S,
    tree: Option<Tree>,
}

impl<S: TreeBuildStrategy> DecisionTree<S> {
    /// Creates an unfitted tree.
    pub fn new(config: TreeConfig, strategy: S) -> Self {
        DecisionTree {
            config,
            strategy,
            tree: None,
        }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// The fitted structure, if any.
    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    pub fn is_fitted(&self) -> bool {
        self.tree.is_some()
    }

    /// Drops any fitted structure.
    pub fn reset(&mut self) {
        self.tree = None;
    }

    /// Grows the tree on `features` (`n x m`) against `labels` (`n` rows).
    ///
    /// On error the tree is left unfitted.
    pub fn fit(&mut self, features: &ArrayView2<'_, FeatureValue>, labels: &AugmentedLabels) -> Result<()> {
        self.tree = None;
        self.config.validate()?;

        if features.nrows() != labels.num_samples() {
            return Err(XGBoostError::shape_mismatch(
                format!("{} label rows", features.nrows()),
                format!("{} label rows", labels.num_samples()),
            ));
        }
        if features.nrows() == 0 {
            return Err(XGBoostError::data("Cannot grow a tree on zero samples"));
        }
        if features.ncols() == 0 {
            return Err(XGBoostError::data("Cannot grow a tree on zero features"));
        }
        if labels.num_outputs() == 0 {
            return Err(XGBoostError::data("Cannot grow a tree on zero label columns"));
        }

        let tree = self.grow(features, labels)?;
        tree.validate()?;

        log::trace!("Grew {}", tree);
        self.tree = Some(tree);
        Ok(())
    }

    /// Predicts an `n x k` matrix.
    pub fn predict(&self, features: &ArrayView2<'_, FeatureValue>) -> Result<Array2<Score>> {
        self.tree
            .as_ref()
            .ok_or_else(|| XGBoostError::not_fitted("DecisionTree"))?
            .predict(features)
    }

    fn grow(&self, features: &ArrayView2<'_, FeatureValue>, labels: &AugmentedLabels) -> Result<Tree> {
        let num_samples = features.nrows();
        let mut tree = Tree::new(features.ncols(), labels.num_outputs(), num_samples);
        let finder = SplitFinder::new(&self.config, &self.strategy);

        let mut node_queue = VecDeque::new();
        node_queue.push_back(NodeInfo::new(0, (0..num_samples).collect(), 0));

        while let Some(node_info) = node_queue.pop_front() {
            let split = if self.config.can_split(node_info.data_indices.len(), node_info.depth) {
                finder
                    .find_best_split(features, labels, &node_info.data_indices)?
                    .filter(|split| split.gain > self.config.min_impurity)
            } else {
                None
            };

            match split {
                Some(split) => {
                    let (left, right): (Vec<usize>, Vec<usize>) = node_info
                        .data_indices
                        .iter()
                        .copied()
                        .partition(|&i| features[[i, split.feature]] <= split.threshold);

                    let (left_index, right_index) = tree.split_node(
                        node_info.node_index,
                        split.feature,
                        split.threshold,
                        split.gain,
                        left.len(),
                        right.len(),
                    )?;

                    log::trace!(
                        "Node {} split on feature {} at {} (gain {:.6}, {} / {})",
                        node_info.node_index,
                        split.feature,
                        split.threshold,
                        split.gain,
                        left.len(),
                        right.len()
                    );

                    node_queue.push_back(NodeInfo::new(left_index, left, node_info.depth + 1));
                    node_queue.push_back(NodeInfo::new(right_index, right, node_info.depth + 1));
                }
                None => {
                    let leaf_labels = labels.select_rows(&node_info.data_indices);
                    let value = self.strategy.leaf_value(&leaf_labels.view())?;
                    tree.set_leaf_value(node_info.node_index, value)?;
                }
            }
        }

        Ok(tree)
    }
}
