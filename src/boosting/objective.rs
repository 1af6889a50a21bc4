//! Loss functions driving the second-order boosting updates.
//!
//! A loss supplies elementwise first and second derivatives with respect to
//! the current prediction. Implementations must be pure and return arrays
//! shaped exactly like their inputs.

use crate::core::error::{Result, XGBoostError};
use crate::core::types::Score;
use ndarray::{Array, ArrayView, Dimension, Zip};
use std::fmt::Debug;

/// Differentiable loss used by the Taylor strategy.
pub trait LossFunction: Send + Sync + Debug {
    /// Get the loss function name
    fn name(&self) -> &'static str;

    /// Elementwise gradient of the loss.
    fn gradient<D: Dimension>(
        &self,
        actual: &ArrayView<'_, Score, D>,
        predicted: &ArrayView<'_, Score, D>,
    ) -> Result<Array<Score, D>>;

    /// Elementwise hessian of the loss.
    fn hessian<D: Dimension>(
        &self,
        actual: &ArrayView<'_, Score, D>,
        predicted: &ArrayView<'_, Score, D>,
    ) -> Result<Array<Score, D>>;

    /// Scalar loss over the whole block.
    fn loss<D: Dimension>(
        &self,
        actual: &ArrayView<'_, Score, D>,
        predicted: &ArrayView<'_, Score, D>,
    ) -> Result<Score>;
}

/// Squared-error loss.
///
/// The gradient is taken as `actual - predicted` so that the Newton step
/// `Σg / Σh` is directly the additive correction to the prediction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LeastSquaresLoss;

impl LeastSquaresLoss {
    /// Create a new least-squares loss
    pub fn new() -> Self {
        LeastSquaresLoss
    }
}

fn check_same_shape<D: Dimension>(
    actual: &ArrayView<'_, Score, D>,
    predicted: &ArrayView<'_, Score, D>,
) -> Result<()> {
    if actual.shape() != predicted.shape() {
        return Err(XGBoostError::shape_mismatch(
            format!("prediction with shape {:?}", actual.shape()),
            format!("predicted shape {:?}", predicted.shape()),
        ));
    }
    Ok(())
}

impl LossFunction for LeastSquaresLoss {
    fn name(&self) -> &'static str {
        "least_squares"
    }

    fn gradient<D: Dimension>(
        &self,
        actual: &ArrayView<'_, Score, D>,
        predicted: &ArrayView<'_, Score, D>,
    ) -> Result<Array<Score, D>> {
        check_same_shape(actual, predicted)?;
        Ok(Zip::from(actual)
            .and(predicted)
            .map_collect(|&truth, &prediction| truth - prediction))
    }

    fn hessian<D: Dimension>(
        &self,
        actual: &ArrayView<'_, Score, D>,
        predicted: &ArrayView<'_, Score, D>,
    ) -> Result<Array<Score, D>> {
        check_same_shape(actual, predicted)?;
        Ok(Array::ones(actual.raw_dim()))
    }

    fn loss<D: Dimension>(
        &self,
        actual: &ArrayView<'_, Score, D>,
        predicted: &ArrayView<'_, Score, D>,
    ) -> Result<Score> {
        check_same_shape(actual, predicted)?;
        let sum_sq = Zip::from(actual)
            .and(predicted)
            .fold(0.0, |acc, &truth, &prediction| {
                let residual = truth - prediction;
                acc + residual * residual
            });
        Ok(0.5 * sum_sq)
    }
}
