//! Tree node implementation for the Pure Rust XGBoost framework.
//!
//! A node is either internal (feature/threshold split plus two children) or a
//! leaf carrying one output value per label column.

use crate::core::types::{DataSize, FeatureIndex, FeatureValue, NodeIndex, Score};
use ndarray::Array1;
use std::fmt;

/// Tree node representation supporting both internal and leaf nodes.
///
/// Nodes live in the owning tree's arena and refer to each other by index.
/// A freshly created leaf has no value until the builder finalizes it.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    /// Left child node index (for internal nodes only)
    left_child: Option<NodeIndex>,
    /// Right child node index (for internal nodes only)
    right_child: Option<NodeIndex>,
    /// Parent node index (None for root node)
    parent: Option<NodeIndex>,
    /// Split feature index (for internal nodes only)
    split_feature: Option<FeatureIndex>,
    /// Samples with `value <= split_threshold` go left
    split_threshold: Option<FeatureValue>,
    /// Output vector (for leaf nodes only)
    leaf_value: Option<Array1<Score>>,
    /// Gain of the chosen split (0 for leaves)
    split_gain: f64,
    /// Number of training samples that reached this node
    num_samples: DataSize,
    /// Node depth in the tree (root is 0)
    depth: usize,
}

impl TreeNode {
    /// Creates a new leaf node without an output value.
    pub fn new_leaf(num_samples: DataSize, depth: usize, parent: Option<NodeIndex>) -> Self {
        TreeNode {
            left_child: None,
            right_child: None,
            parent,
            split_feature: None,
            split_threshold: None,
            leaf_value: None,
            split_gain: 0.0,
            num_samples,
            depth,
        }
    }

    /// Returns true if this node is a leaf node.
    pub fn is_leaf(&self) -> bool {
        self.split_feature.is_none()
    }

    /// Returns the left child node index (for internal nodes).
    pub fn left_child(&self) -> Option<NodeIndex> {
        self.left_child
    }

    /// Returns the right child node index (for internal nodes).
    pub fn right_child(&self) -> Option<NodeIndex> {
        self.right_child
    }

    /// Returns the parent node index.
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    /// Returns the split feature index (for internal nodes).
    pub fn split_feature(&self) -> Option<FeatureIndex> {
        self.split_feature
    }

    /// Returns the split threshold value (for internal nodes).
    pub fn split_threshold(&self) -> Option<FeatureValue> {
        self.split_threshold
    }

    /// Returns the leaf output vector (for finalized leaves).
    pub fn leaf_value(&self) -> Option<&Array1<Score>> {
        self.leaf_value.as_ref()
    }

    /// Sets the leaf output vector.
    pub fn set_leaf_value(&mut self, value: Array1<Score>) {
        self.leaf_value = Some(value);
    }

    /// Returns the split gain value.
    pub fn split_gain(&self) -> f64 {
        self.split_gain
    }

    /// Returns the number of training samples in this node.
    pub fn num_samples(&self) -> DataSize {
        self.num_samples
    }

    /// Returns the node depth in the tree.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Converts this node from leaf to internal node with the given split.
    pub fn set_split(
        &mut self,
        left_child: NodeIndex,
        right_child: NodeIndex,
        split_feature: FeatureIndex,
        split_threshold: FeatureValue,
        split_gain: f64,
    ) {
        self.left_child = Some(left_child);
        self.right_child = Some(right_child);
        self.split_feature = Some(split_feature);
        self.split_threshold = Some(split_threshold);
        self.split_gain = split_gain;
        self.leaf_value = None;
    }

    /// Child index to follow for the given feature value.
    pub(crate) fn next_child(&self, feature_value: FeatureValue) -> Option<NodeIndex> {
        let threshold = self.split_threshold?;
        if feature_value <= threshold {
            self.left_child
        } else {
            self.right_child
        }
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.split_feature, self.split_threshold) {
            (Some(feature), Some(threshold)) => write!(
                f,
                "Split(feature={}, threshold={}, gain={:.6}, samples={})",
                feature, threshold, self.split_gain, self.num_samples
            ),
            _ => match &self.leaf_value {
                Some(value) => write!(f, "Leaf(value={}, samples={})", value, self.num_samples),
                None => write!(f, "Leaf(pending, samples={})", self.num_samples),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_new_leaf() {
        let node = TreeNode::new_leaf(10, 0, None);
        assert!(node.is_leaf());
        assert_eq!(node.num_samples(), 10);
        assert!(node.leaf_value().is_none());
        assert!(node.parent().is_none());
    }

    #[test]
    fn test_set_split_clears_leaf_value() {
        let mut node = TreeNode::new_leaf(10, 1, Some(0));
        node.set_leaf_value(array![1.5]);
        node.set_split(3, 4, 2, 0.5, 7.25);

        assert!(!node.is_leaf());
        assert!(node.leaf_value().is_none());
        assert_eq!(node.split_feature(), Some(2));
        assert_eq!(node.split_gain(), 7.25);
        assert_eq!(node.next_child(0.5), Some(3));
        assert_eq!(node.next_child(0.51), Some(4));
    }

    #[test]
    fn test_display() {
        let mut leaf = TreeNode::new_leaf(4, 1, Some(0));
        assert!(leaf.to_string().contains("pending"));
        leaf.set_leaf_value(array![2.0]);
        assert!(leaf.to_string().starts_with("Leaf("));
    }
}
