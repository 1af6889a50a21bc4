//! Boosting-round tree: a [`DecisionTree`] wired to the Taylor strategy.

use crate::boosting::labels::AugmentedLabels;
use crate::boosting::objective::{LeastSquaresLoss, LossFunction};
use crate::boosting::strategy::TaylorStrategy;
use crate::core::error::Result;
use crate::core::types::{FeatureValue, Score};
use crate::tree::{DecisionTree, Tree, TreeConfig};
use ndarray::{Array2, ArrayView2};

/// One tree of the ensemble.
///
/// Learns the correction that moves the running prediction towards the
/// truth, with split gains and leaf values taken from the second-order
/// expansion of the loss.
#[derive(Debug, Clone)]
pub struct XGBoostRegressionTree<L = LeastSquaresLoss> {
    inner: DecisionTree<TaylorStrategy<L>>,
}

impl<L: LossFunction> XGBoostRegressionTree<L> {
    pub fn new(config: TreeConfig, loss: L) -> Self {
        XGBoostRegressionTree {
            inner: DecisionTree::new(config, TaylorStrategy::new(loss)),
        }
    }

    /// Fits against truth and running prediction.
    pub fn fit(&mut self, features: &ArrayView2<'_, FeatureValue>, labels: &AugmentedLabels) -> Result<()> {
        self.inner.fit(features, labels)
    }

    /// Fits against a packed `n x 2k` block, truth in the left half.
    pub fn fit_concatenated(
        &mut self,
        features: &ArrayView2<'_, FeatureValue>,
        augmented: &ArrayView2<'_, Score>,
    ) -> Result<()> {
        self.inner.reset();
        let labels = AugmentedLabels::from_concatenated(augmented.view())?;
        self.inner.fit(features, &labels)
    }

    /// Additive update for each row, `n x k`.
    pub fn predict(&self, features: &ArrayView2<'_, FeatureValue>) -> Result<Array2<Score>> {
        self.inner.predict(features)
    }

    pub fn is_fitted(&self) -> bool {
        self.inner.is_fitted()
    }

    /// The fitted structure, if any.
    pub fn tree(&self) -> Option<&Tree> {
        self.inner.tree()
    }

    pub fn loss(&self) -> &L {
        self.inner.strategy().loss()
    }

    pub(crate) fn reset(&mut self) {
        self.inner.reset();
    }
}
