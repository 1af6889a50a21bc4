//! Decision tree structure for the Pure Rust XGBoost framework.
//!
//! Nodes are stored in a contiguous arena (index 0 is the root). Every leaf
//! carries a vector of `num_outputs` values, so one tree predicts all label
//! columns at once.

use crate::core::error::{Result, XGBoostError};
use crate::core::types::{DataSize, FeatureIndex, FeatureValue, NodeIndex, Score};
use crate::tree::node::TreeNode;
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use rayon::prelude::*;
use std::fmt;

/// A fitted (or in-construction) regression tree with vector-valued leaves.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    /// Vector of tree nodes (index 0 is always the root)
    nodes: Vec<TreeNode>,
    /// Number of feature columns the tree was grown on
    num_features: usize,
    /// Length of every leaf output vector
    num_outputs: usize,
    /// Current number of leaf nodes
    num_leaves: usize,
    /// Deepest node depth
    max_depth: usize,
}

impl Tree {
    /// Creates a new tree whose root is a pending leaf holding `num_samples`.
    pub fn new(num_features: usize, num_outputs: usize, num_samples: DataSize) -> Self {
        Tree {
            nodes: vec![TreeNode::new_leaf(num_samples, 0, None)],
            num_features,
            num_outputs,
            num_leaves: 1,
            max_depth: 0,
        }
    }

    /// Returns the number of nodes in the tree.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of leaf nodes in the tree.
    pub fn num_leaves(&self) -> usize {
        self.num_leaves
    }

    /// Returns the tree depth (maximum depth of any node).
    pub fn depth(&self) -> usize {
        self.max_depth
    }

    /// Returns the number of features expected at prediction time.
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Returns the length of each leaf output vector.
    pub fn num_outputs(&self) -> usize {
        self.num_outputs
    }

    /// Returns a reference to the node at the given index.
    pub fn node(&self, index: NodeIndex) -> Option<&TreeNode> {
        self.nodes.get(index)
    }

    /// Returns the root node of the tree.
    pub fn root(&self) -> &TreeNode {
        &self.nodes[0]
    }

    /// Sets the output vector of a leaf.
    pub fn set_leaf_value(&mut self, node_index: NodeIndex, value: ndarray::Array1<Score>) -> Result<()> {
        if value.len() != self.num_outputs {
            return Err(XGBoostError::shape_mismatch(
                format!("leaf value of length {}", self.num_outputs),
                format!("length {}", value.len()),
            ));
        }

        let node = self.nodes.get_mut(node_index).ok_or_else(|| {
            XGBoostError::tree_construction(format!("Node index {} out of bounds", node_index))
        })?;

        if !node.is_leaf() {
            return Err(XGBoostError::tree_construction(format!(
                "Cannot set output for non-leaf node {}",
                node_index
            )));
        }

        node.set_leaf_value(value);
        Ok(())
    }

    /// Splits a leaf node into an internal node with two pending children.
    pub fn split_node(
        &mut self,
        node_index: NodeIndex,
        split_feature: FeatureIndex,
        split_threshold: FeatureValue,
        split_gain: f64,
        left_count: DataSize,
        right_count: DataSize,
    ) -> Result<(NodeIndex, NodeIndex)> {
        let child_depth = match self.nodes.get(node_index) {
            Some(node) if node.is_leaf() => node.depth() + 1,
            Some(_) => {
                return Err(XGBoostError::tree_construction(format!(
                    "Cannot split non-leaf node {}",
                    node_index
                )))
            }
            None => {
                return Err(XGBoostError::tree_construction(format!(
                    "Node index {} out of bounds",
                    node_index
                )))
            }
        };

        if split_feature >= self.num_features {
            return Err(XGBoostError::tree_construction(format!(
                "Split feature {} out of range for {} features",
                split_feature, self.num_features
            )));
        }

        self.max_depth = self.max_depth.max(child_depth);

        let left_child_index = self.nodes.len();
        let right_child_index = left_child_index + 1;

        self.nodes
            .push(TreeNode::new_leaf(left_count, child_depth, Some(node_index)));
        self.nodes
            .push(TreeNode::new_leaf(right_count, child_depth, Some(node_index)));

        self.nodes[node_index].set_split(
            left_child_index,
            right_child_index,
            split_feature,
            split_threshold,
            split_gain,
        );

        // Added 2 leaves, removed 1
        self.num_leaves += 1;

        Ok((left_child_index, right_child_index))
    }

    /// Index of the leaf a single row lands in.
    pub fn leaf_index(&self, features: &ArrayView1<'_, FeatureValue>) -> Result<NodeIndex> {
        if features.len() != self.num_features {
            return Err(XGBoostError::shape_mismatch(
                format!("{} features", self.num_features),
                format!("{} features", features.len()),
            ));
        }

        let mut node_index = 0;
        loop {
            let node = self.nodes.get(node_index).ok_or_else(|| {
                XGBoostError::prediction(format!("Dangling node index {}", node_index))
            })?;

            if node.is_leaf() {
                return Ok(node_index);
            }

            let feature_idx = node.split_feature().ok_or_else(|| {
                XGBoostError::prediction(format!("Internal node {} has no split feature", node_index))
            })?;

            node_index = node.next_child(features[feature_idx]).ok_or_else(|| {
                XGBoostError::prediction(format!("Internal node {} missing children", node_index))
            })?;
        }
    }

    /// Predicts the output vector for a single row.
    pub fn predict_row(&self, features: &ArrayView1<'_, FeatureValue>) -> Result<ArrayView1<'_, Score>> {
        let leaf = self.leaf_index(features)?;
        self.nodes[leaf]
            .leaf_value()
            .map(|value| value.view())
            .ok_or_else(|| XGBoostError::prediction(format!("Leaf {} has no output value", leaf)))
    }

    /// Predicts an `n x num_outputs` matrix, one row per input row.
    pub fn predict(&self, features: &ArrayView2<'_, FeatureValue>) -> Result<Array2<Score>> {
        if features.ncols() != self.num_features {
            return Err(XGBoostError::shape_mismatch(
                format!("{} feature columns", self.num_features),
                format!("{} feature columns", features.ncols()),
            ));
        }

        let mut predictions = Array2::zeros((features.nrows(), self.num_outputs));

        predictions
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .zip(features.axis_iter(Axis(0)).into_par_iter())
            .try_for_each(|(mut out, row)| -> Result<()> {
                out.assign(&self.predict_row(&row)?);
                Ok(())
            })?;

        Ok(predictions)
    }

    /// Returns all leaf node indices.
    pub fn leaf_indices(&self) -> Vec<NodeIndex> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, node)| if node.is_leaf() { Some(i) } else { None })
            .collect()
    }

    /// Returns a textual representation of the tree structure.
    pub fn to_string_representation(&self) -> String {
        let mut result = String::new();
        self.tree_to_string_recursive(0, "", true, &mut result);
        result
    }

    fn tree_to_string_recursive(
        &self,
        node_index: NodeIndex,
        prefix: &str,
        is_last: bool,
        result: &mut String,
    ) {
        let Some(node) = self.nodes.get(node_index) else {
            return;
        };

        let current_prefix = if is_last { "└── " } else { "├── " };
        result.push_str(&format!("{}{}{}\n", prefix, current_prefix, node));

        if !node.is_leaf() {
            let new_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });

            if let Some(left_child) = node.left_child() {
                self.tree_to_string_recursive(left_child, &new_prefix, false, result);
            }

            if let Some(right_child) = node.right_child() {
                self.tree_to_string_recursive(right_child, &new_prefix, true, result);
            }
        }
    }

    /// Validates the tree structure consistency.
    ///
    /// A fitted tree must have every leaf finalized with an output vector of
    /// length `num_outputs`.
    pub fn validate(&self) -> Result<()> {
        if self.nodes[0].parent().is_some() {
            return Err(XGBoostError::tree_construction("Root node should not have a parent"));
        }

        let mut leaf_count = 0;
        for (i, node) in self.nodes.iter().enumerate() {
            if node.is_leaf() {
                leaf_count += 1;
                if node.left_child().is_some() || node.right_child().is_some() {
                    return Err(XGBoostError::tree_construction(format!("Leaf node {} has children", i)));
                }
                match node.leaf_value() {
                    Some(value) if value.len() == self.num_outputs => {}
                    Some(value) => {
                        return Err(XGBoostError::tree_construction(format!(
                            "Leaf node {} has {} outputs, expected {}",
                            i,
                            value.len(),
                            self.num_outputs
                        )))
                    }
                    None => {
                        return Err(XGBoostError::tree_construction(format!(
                            "Leaf node {} has no output value",
                            i
                        )))
                    }
                }
            } else {
                let (left_idx, right_idx) = match (node.left_child(), node.right_child()) {
                    (Some(left), Some(right)) => (left, right),
                    _ => {
                        return Err(XGBoostError::tree_construction(format!(
                            "Internal node {} missing children",
                            i
                        )))
                    }
                };

                if left_idx >= self.nodes.len() || right_idx >= self.nodes.len() {
                    return Err(XGBoostError::tree_construction(format!(
                        "Node {} has invalid child indices",
                        i
                    )));
                }

                if self.nodes[left_idx].parent() != Some(i) {
                    return Err(XGBoostError::tree_construction(format!(
                        "Left child {} parent mismatch",
                        left_idx
                    )));
                }

                if self.nodes[right_idx].parent() != Some(i) {
                    return Err(XGBoostError::tree_construction(format!(
                        "Right child {} parent mismatch",
                        right_idx
                    )));
                }
            }
        }

        if leaf_count != self.num_leaves {
            return Err(XGBoostError::tree_construction(format!(
                "Leaf count mismatch: expected {}, found {}",
                self.num_leaves, leaf_count
            )));
        }

        Ok(())
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tree(nodes={}, leaves={}, depth={}, outputs={})",
            self.num_nodes(),
            self.num_leaves(),
            self.depth(),
            self.num_outputs()
        )
    }
}
