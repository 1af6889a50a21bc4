//! Regression metrics over `n x k` prediction matrices.

use crate::core::error::{Result, XGBoostError};
use crate::core::types::Score;
use ndarray::{ArrayView2, Zip};
use serde::{Deserialize, Serialize};

/// Regression evaluation metrics
///
/// Every metric is averaged over all `n * k` cells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Square Error
    pub rmse: f64,
    /// Mean Absolute Error
    pub mae: f64,
    /// R-squared (coefficient of determination); 0 when the truth is constant
    pub r2: f64,
}

/// Evaluate regression metrics
pub fn evaluate_regression(
    true_values: &ArrayView2<'_, Score>,
    predictions: &ArrayView2<'_, Score>,
) -> Result<RegressionMetrics> {
    if true_values.dim() != predictions.dim() {
        return Err(XGBoostError::shape_mismatch(
            format!("predictions of shape {:?}", true_values.dim()),
            format!("{:?}", predictions.dim()),
        ));
    }
    if true_values.is_empty() {
        return Err(XGBoostError::data("Cannot evaluate metrics on empty arrays"));
    }

    let n = true_values.len() as f64;

    let (sum_squared_error, sum_absolute_error) = Zip::from(true_values).and(predictions).fold(
        (0.0, 0.0),
        |(squared, absolute), &truth, &prediction| {
            let error = prediction - truth;
            (squared + error * error, absolute + error.abs())
        },
    );

    let mse = sum_squared_error / n;
    let mae = sum_absolute_error / n;

    let true_mean = true_values.sum() / n;
    let total_sum_squares: f64 = true_values.iter().map(|&v| (v - true_mean).powi(2)).sum();

    let r2 = if total_sum_squares > 0.0 {
        1.0 - sum_squared_error / total_sum_squares
    } else {
        0.0
    };

    Ok(RegressionMetrics {
        mse,
        rmse: mse.sqrt(),
        mae,
        r2,
    })
}

/// Mean absolute error alone.
pub fn mean_absolute_error(true_values: &ArrayView2<'_, Score>, predictions: &ArrayView2<'_, Score>) -> Result<f64> {
    evaluate_regression(true_values, predictions).map(|metrics| metrics.mae)
}
