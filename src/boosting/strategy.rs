//! Split-gain and leaf-value strategies plugged into the tree builder.
//!
//! The builder knows nothing about losses. It asks a [`TreeBuildStrategy`]
//! how good a candidate split is and what a finished leaf should output.
//! [`TaylorStrategy`] answers both from a second-order expansion of a
//! [`LossFunction`].

use crate::boosting::labels::LabelBlock;
use crate::boosting::objective::{LeastSquaresLoss, LossFunction};
use crate::core::constants::HESSIAN_EPSILON;
use crate::core::error::{Result, XGBoostError};
use crate::core::types::Score;
use ndarray::{Array1, Axis};
use std::fmt::Debug;
use std::ops::{Add, AddAssign};

/// Gradient and hessian totals over a set of samples.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GradientSums {
    pub gradient: f64,
    pub hessian: f64,
}

impl GradientSums {
    pub fn new(gradient: f64, hessian: f64) -> Self {
        GradientSums { gradient, hessian }
    }
}

impl Add for GradientSums {
    type Output = GradientSums;

    fn add(self, other: GradientSums) -> GradientSums {
        GradientSums::new(self.gradient + other.gradient, self.hessian + other.hessian)
    }
}

impl AddAssign for GradientSums {
    fn add_assign(&mut self, other: GradientSums) {
        self.gradient += other.gradient;
        self.hessian += other.hessian;
    }
}

/// Criteria used by the tree builder.
///
/// Split search works on totals: the builder asks once per node for the
/// per-row statistics, then scores every cut from running sums through
/// [`TreeBuildStrategy::split_gain_from_sums`].
pub trait TreeBuildStrategy: Send + Sync + Debug {
    /// Per-row gradient and hessian of `block`, each summed over the label
    /// columns.
    fn row_statistics(&self, block: &LabelBlock<'_>) -> Result<(Array1<Score>, Array1<Score>)>;

    /// Improvement of splitting `parent` into `left` and `right`, from totals.
    ///
    /// Returns [`XGBoostError::DegenerateHessian`] when a side has no usable
    /// curvature; the builder then skips the candidate.
    fn split_gain_from_sums(
        &self,
        parent: GradientSums,
        left: GradientSums,
        right: GradientSums,
    ) -> Result<f64>;

    /// Output vector (one entry per label column) of a leaf holding `block`.
    fn leaf_value(&self, block: &LabelBlock<'_>) -> Result<Array1<Score>>;

    /// Totals of a whole block.
    fn block_sums(&self, block: &LabelBlock<'_>) -> Result<GradientSums> {
        let (gradient, hessian) = self.row_statistics(block)?;
        Ok(GradientSums::new(gradient.sum(), hessian.sum()))
    }

    /// Improvement of splitting `parent` into `left` and `right`.
    fn split_gain(
        &self,
        parent: &LabelBlock<'_>,
        left: &LabelBlock<'_>,
        right: &LabelBlock<'_>,
    ) -> Result<f64> {
        self.split_gain_from_sums(
            self.block_sums(parent)?,
            self.block_sums(left)?,
            self.block_sums(right)?,
        )
    }
}

/// `0.5 * G^2 / H` for gradient sum `G` and hessian sum `H`.
pub fn node_gain_from_sums(gradient_sum: f64, hessian_sum: f64) -> Result<f64> {
    check_hessian(hessian_sum, "node gain")?;
    Ok(0.5 * gradient_sum * gradient_sum / hessian_sum)
}

/// Newton step `G / H`.
pub fn newton_step(gradient_sum: f64, hessian_sum: f64) -> Result<f64> {
    check_hessian(hessian_sum, "leaf value")?;
    Ok(gradient_sum / hessian_sum)
}

fn check_hessian(hessian_sum: f64, context: &str) -> Result<()> {
    if !hessian_sum.is_finite() || hessian_sum.abs() <= HESSIAN_EPSILON {
        return Err(XGBoostError::degenerate_hessian(format!(
            "{} (hessian sum = {})",
            context, hessian_sum
        )));
    }
    Ok(())
}

/// Second-order Taylor criterion over a loss.
#[derive(Debug, Clone, Default)]
pub struct TaylorStrategy<L = LeastSquaresLoss> {
    loss: L,
}

impl<L: LossFunction> TaylorStrategy<L> {
    pub fn new(loss: L) -> Self {
        TaylorStrategy { loss }
    }

    pub fn loss(&self) -> &L {
        &self.loss
    }

    /// Gain contribution of a single block.
    pub fn node_gain(&self, block: &LabelBlock<'_>) -> Result<f64> {
        let sums = self.block_sums(block)?;
        node_gain_from_sums(sums.gradient, sums.hessian)
    }
}

impl<L: LossFunction> TreeBuildStrategy for TaylorStrategy<L> {
    fn row_statistics(&self, block: &LabelBlock<'_>) -> Result<(Array1<Score>, Array1<Score>)> {
        let truth = block.truth();
        let prediction = block.prediction();
        let gradient = self.loss.gradient(&truth, &prediction)?;
        let hessian = self.loss.hessian(&truth, &prediction)?;
        Ok((gradient.sum_axis(Axis(1)), hessian.sum_axis(Axis(1))))
    }

    fn split_gain_from_sums(
        &self,
        parent: GradientSums,
        left: GradientSums,
        right: GradientSums,
    ) -> Result<f64> {
        Ok(node_gain_from_sums(left.gradient, left.hessian)?
            + node_gain_from_sums(right.gradient, right.hessian)?
            - node_gain_from_sums(parent.gradient, parent.hessian)?)
    }

    fn leaf_value(&self, block: &LabelBlock<'_>) -> Result<Array1<Score>> {
        let truth = block.truth();
        let prediction = block.prediction();
        let gradient_sums = self.loss.gradient(&truth, &prediction)?.sum_axis(Axis(0));
        let hessian_sums = self.loss.hessian(&truth, &prediction)?.sum_axis(Axis(0));

        let value = gradient_sums
            .iter()
            .zip(hessian_sums.iter())
            .map(|(&g, &h)| newton_step(g, h))
            .collect::<Result<Vec<_>>>()?;

        Ok(Array1::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boosting::labels::AugmentedLabels;
    use ndarray::{array, Array, Array2, ArrayView, Dimension, Zip};

    /// Loss with no curvature anywhere.
    #[derive(Debug)]
    struct FlatLoss;

    impl LossFunction for FlatLoss {
        fn name(&self) -> &'static str {
            "flat"
        }

        fn gradient<D: Dimension>(
            &self,
            actual: &ArrayView<'_, Score, D>,
            predicted: &ArrayView<'_, Score, D>,
        ) -> Result<Array<Score, D>> {
            Ok(Zip::from(actual).and(predicted).map_collect(|&a, &p| a - p))
        }

        fn hessian<D: Dimension>(
            &self,
            actual: &ArrayView<'_, Score, D>,
            _predicted: &ArrayView<'_, Score, D>,
        ) -> Result<Array<Score, D>> {
            Ok(Array::zeros(actual.raw_dim()))
        }

        fn loss<D: Dimension>(
            &self,
            _actual: &ArrayView<'_, Score, D>,
            _predicted: &ArrayView<'_, Score, D>,
        ) -> Result<Score> {
            Ok(0.0)
        }
    }

    fn labels(truth: Array2<f64>, prediction: Array2<f64>) -> AugmentedLabels {
        AugmentedLabels::new(truth, prediction).unwrap()
    }

    #[test]
    fn test_node_gain_scalar_sums() {
        let strategy = TaylorStrategy::new(LeastSquaresLoss);
        // gradients [2, 2], hessians [1, 1]
        let block = labels(array![[3.0], [4.0]], array![[1.0], [2.0]]);
        assert_eq!(strategy.node_gain(&block.view()).unwrap(), 4.0);
    }

    #[test]
    fn test_node_gain_sums_across_columns() {
        let strategy = TaylorStrategy::new(LeastSquaresLoss);
        // gradient sum 1 + 3 = 4, hessian sum 2
        let block = labels(array![[1.0, 3.0]], array![[0.0, 0.0]]);
        assert_eq!(strategy.node_gain(&block.view()).unwrap(), 4.0);
    }

    #[test]
    fn test_split_gain() {
        let strategy = TaylorStrategy::<LeastSquaresLoss>::default();
        let parent = labels(array![[1.0], [1.0], [5.0], [5.0]], Array2::zeros((4, 1)));
        let view = parent.view();
        let left = view.slice_rows(0..2);
        let right = view.slice_rows(2..4);

        // 0.5*4/2 + 0.5*100/2 - 0.5*144/4 = 1 + 25 - 18
        let gain = strategy.split_gain(&view, &left, &right).unwrap();
        assert!((gain - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_leaf_value_per_column() {
        let strategy = TaylorStrategy::new(LeastSquaresLoss);
        // column 0: gradient sum 6 over 3 samples; column 1: -3 over 3
        let block = labels(
            array![[3.0, 0.0], [2.0, -1.0], [1.0, -2.0]],
            Array2::zeros((3, 2)),
        );
        let value = strategy.leaf_value(&block.view()).unwrap();
        assert_eq!(value, array![2.0, -1.0]);
    }

    #[test]
    fn test_degenerate_hessian() {
        let strategy = TaylorStrategy::new(FlatLoss);
        let block = labels(array![[1.0], [2.0]], Array2::zeros((2, 1)));
        let view = block.view();

        let gain = strategy.split_gain(&view, &view.slice_rows(0..1), &view.slice_rows(1..2));
        assert!(matches!(gain, Err(XGBoostError::DegenerateHessian { .. })));

        let leaf = strategy.leaf_value(&view);
        assert!(matches!(leaf, Err(XGBoostError::DegenerateHessian { .. })));
    }

    #[test]
    fn test_empty_block_is_degenerate() {
        let strategy = TaylorStrategy::new(LeastSquaresLoss);
        let block = labels(array![[1.0]], array![[0.0]]);
        let empty = block.view().slice_rows(0..0);
        assert!(empty.is_empty());
        assert!(strategy.node_gain(&empty).unwrap_err().is_recoverable());
    }

    #[test]
    fn test_row_statistics_sum_columns() {
        let strategy = TaylorStrategy::new(LeastSquaresLoss);
        let block = labels(array![[1.0, 3.0], [2.0, -2.0]], Array2::zeros((2, 2)));
        let (gradient, hessian) = strategy.row_statistics(&block.view()).unwrap();
        assert_eq!(gradient, array![4.0, 0.0]);
        assert_eq!(hessian, array![2.0, 2.0]);
    }

    #[test]
    fn test_gain_from_sums_matches_block_gain() {
        let strategy = TaylorStrategy::new(LeastSquaresLoss);
        let parent = labels(array![[1.0], [1.0], [5.0], [5.0]], Array2::zeros((4, 1)));
        let view = parent.view();

        let from_sums = strategy
            .split_gain_from_sums(
                GradientSums::new(12.0, 4.0),
                GradientSums::new(2.0, 2.0),
                GradientSums::new(10.0, 2.0),
            )
            .unwrap();
        let from_blocks = strategy
            .split_gain(&view, &view.slice_rows(0..2), &view.slice_rows(2..4))
            .unwrap();
        assert_eq!(from_sums, from_blocks);
        assert!(strategy
            .split_gain_from_sums(GradientSums::new(1.0, 1.0), GradientSums::default(), GradientSums::new(1.0, 1.0))
            .unwrap_err()
            .is_recoverable());
    }

    #[test]
    fn test_gradient_sums_accumulate() {
        let mut total = GradientSums::default();
        total += GradientSums::new(1.5, 1.0);
        total += GradientSums::new(-0.5, 2.0);
        assert_eq!(total, GradientSums::new(1.0, 3.0));
        assert_eq!(total + GradientSums::new(1.0, 1.0), GradientSums::new(2.0, 4.0));
    }

    #[test]
    fn test_newton_step_helpers() {
        assert_eq!(newton_step(6.0, 3.0).unwrap(), 2.0);
        assert_eq!(node_gain_from_sums(4.0, 2.0).unwrap(), 4.0);
        assert!(newton_step(1.0, 0.0).is_err());
        assert!(node_gain_from_sums(1.0, f64::NAN).is_err());
    }
}
