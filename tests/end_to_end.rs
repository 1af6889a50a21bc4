//! End-to-end training and prediction tests for Pure Rust XGBoost.

mod common;

use approx::assert_abs_diff_eq;
use common::*;
use ndarray::{Array, Array2, ArrayView, Dimension, Zip};
use std::sync::{Arc, Mutex};
use xgboost_rust::*;

#[test]
fn test_linear_target_converges() -> anyhow::Result<()> {
    let (features, labels) = linear_dataset(50);

    let mut model = XGBoost::new(create_test_config(50));
    model.fit(&features, &labels)?;

    let mae_5 = mean_absolute_error(
        &model.predict_with_rounds(&features, 5)?.column(0).to_owned(),
        &labels,
    );
    let mae_50 = mean_absolute_error(&model.predict_vector(&features)?, &labels);

    assert!(mae_50 < 1.0, "MAE after 50 rounds: {}", mae_50);
    assert!(mae_50 <= mae_5, "MAE(50) = {} > MAE(5) = {}", mae_50, mae_5);
    Ok(())
}

#[test]
fn test_short_fit_matches_prefix_of_long_fit() -> anyhow::Result<()> {
    let (features, labels) = linear_dataset(50);

    let mut short = XGBoost::new(create_test_config(5));
    short.fit(&features, &labels)?;

    let mut long = XGBoost::new(create_test_config(50));
    long.fit(&features, &labels)?;

    assert_eq!(short.predict(&features)?, long.predict_with_rounds(&features, 5)?);
    Ok(())
}

#[test]
fn test_training_is_deterministic() -> anyhow::Result<()> {
    let features = create_test_features_regression(120, 4);
    let labels = create_test_labels_regression(&features);

    let mut first = XGBoost::new(create_test_config(20));
    first.fit(&features, &labels)?;

    let mut second = XGBoost::new(create_test_config(20));
    second.fit(&features, &labels)?;

    assert_eq!(first.predict(&features)?, second.predict(&features)?);
    Ok(())
}

#[test]
fn test_thread_count_does_not_change_result() -> anyhow::Result<()> {
    let features = create_test_features_regression(100, 6);
    let labels = create_test_labels_regression(&features);

    let mut predictions = Vec::new();
    for threads in [1, 3, 8] {
        let config = BoosterConfig {
            num_threads: threads,
            ..create_test_config(10)
        };
        let mut model = XGBoost::new(config);
        model.fit(&features, &labels)?;
        predictions.push(model.predict(&features)?);
    }

    assert_eq!(predictions[0], predictions[1]);
    assert_eq!(predictions[0], predictions[2]);
    Ok(())
}

#[test]
fn test_every_round_sees_doubled_label_width() -> anyhow::Result<()> {
    let features = create_test_features_regression(60, 3);
    let labels = create_test_labels_multi_output(&features);

    let widths = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&widths);

    let mut model = XGBoost::new(create_test_config(8)).with_callback(move |event: &RoundEvent| {
        sink.lock().unwrap().push(event.label_width);
    });
    model.fit(&features, &labels)?;

    let widths = widths.lock().unwrap();
    assert_eq!(widths.len(), 8);
    assert!(widths.iter().all(|&w| w == 4));
    Ok(())
}

#[test]
fn test_multi_output_regression() -> anyhow::Result<()> {
    let features = create_test_features_regression(200, 2);
    let labels = create_test_labels_multi_output(&features);

    let mut model = XGBoost::new(create_test_config(30));
    model.fit(&features, &labels)?;

    let predictions = model.predict(&features)?;
    assert_eq!(predictions.dim(), (200, 2));

    let baseline = evaluate_regression(&labels.view(), &Array2::zeros((200, 2)).view())?;
    let fitted = evaluate_regression(&labels.view(), &predictions.view())?;
    assert!(fitted.mae < baseline.mae * 0.5, "{} vs {}", fitted.mae, baseline.mae);
    assert!(fitted.r2 > 0.5);
    Ok(())
}

#[test]
fn test_training_loss_decreases() -> anyhow::Result<()> {
    let features = create_test_features_regression(150, 5);
    let labels = create_test_labels_regression(&features);

    let mut model = XGBoost::new(create_test_config(25));
    model.fit(&features, &labels)?;

    let curve = model.training_history().loss_curve();
    assert_eq!(curve.len(), 25);
    assert!(curve.last().unwrap() < curve.first().unwrap());
    Ok(())
}

#[test]
fn test_applied_learning_rate_scales_updates() -> anyhow::Result<()> {
    let (features, labels) = linear_dataset(50);

    let unscaled_config = create_test_config(1);
    let scaled_config = BoosterConfig {
        learning_rate: 0.1,
        apply_learning_rate: true,
        ..create_test_config(1)
    };

    let mut unscaled = XGBoost::new(unscaled_config);
    unscaled.fit(&features, &labels)?;
    let mut scaled = XGBoost::new(scaled_config);
    scaled.fit(&features, &labels)?;

    let expected = unscaled.predict(&features)? * 0.1;
    let actual = scaled.predict(&features)?;
    for (a, e) in actual.iter().zip(expected.iter()) {
        assert_abs_diff_eq!(*a, *e, epsilon = 1e-12);
    }
    Ok(())
}

#[test]
fn test_applied_learning_rate_still_converges() -> anyhow::Result<()> {
    let (features, labels) = linear_dataset(50);
    let config = BoosterConfig {
        learning_rate: 0.1,
        apply_learning_rate: true,
        ..create_test_config(200)
    };

    let mut model = XGBoost::new(config);
    model.fit(&features, &labels)?;

    let mae = mean_absolute_error(&model.predict_vector(&features)?, &labels);
    assert!(mae < 0.5, "MAE: {}", mae);
    Ok(())
}

#[test]
fn test_logging_callback_runs() -> anyhow::Result<()> {
    let _ = xgboost_rust::init();
    let (features, labels) = linear_dataset(20);

    let mut model = XGBoost::new(create_test_config(4)).with_callback(LoggingCallback::new(2));
    model.fit(&features, &labels)?;
    assert!(model.is_fitted());
    Ok(())
}

/// Loss without curvature: every hessian is zero.
#[derive(Debug, Clone)]
struct FlatLoss;

impl LossFunction for FlatLoss {
    fn name(&self) -> &'static str {
        "flat"
    }

    fn gradient<D: Dimension>(
        &self,
        actual: &ArrayView<'_, f64, D>,
        predicted: &ArrayView<'_, f64, D>,
    ) -> Result<Array<f64, D>> {
        Ok(Zip::from(actual).and(predicted).map_collect(|&a, &p| a - p))
    }

    fn hessian<D: Dimension>(
        &self,
        actual: &ArrayView<'_, f64, D>,
        _predicted: &ArrayView<'_, f64, D>,
    ) -> Result<Array<f64, D>> {
        Ok(Array::zeros(actual.raw_dim()))
    }

    fn loss<D: Dimension>(
        &self,
        _actual: &ArrayView<'_, f64, D>,
        _predicted: &ArrayView<'_, f64, D>,
    ) -> Result<f64> {
        Ok(0.0)
    }
}

/// Loss whose gradient is undefined everywhere.
#[derive(Debug, Clone)]
struct UndefinedGradientLoss;

impl LossFunction for UndefinedGradientLoss {
    fn name(&self) -> &'static str {
        "undefined"
    }

    fn gradient<D: Dimension>(
        &self,
        actual: &ArrayView<'_, f64, D>,
        _predicted: &ArrayView<'_, f64, D>,
    ) -> Result<Array<f64, D>> {
        Ok(Array::from_elem(actual.raw_dim(), f64::NAN))
    }

    fn hessian<D: Dimension>(
        &self,
        actual: &ArrayView<'_, f64, D>,
        _predicted: &ArrayView<'_, f64, D>,
    ) -> Result<Array<f64, D>> {
        Ok(Array::ones(actual.raw_dim()))
    }

    fn loss<D: Dimension>(
        &self,
        _actual: &ArrayView<'_, f64, D>,
        _predicted: &ArrayView<'_, f64, D>,
    ) -> Result<f64> {
        Ok(f64::NAN)
    }
}

#[test]
fn test_degenerate_hessian_aborts_fit() {
    let (features, labels) = linear_dataset(10);
    let mut model = XGBoost::with_loss(create_test_config(3), FlatLoss);

    let result = model.fit(&features, &labels);
    assert!(matches!(result, Err(XGBoostError::DegenerateHessian { .. })));
    assert!(!model.is_fitted());
    assert!(matches!(
        model.predict(&features),
        Err(XGBoostError::NotFitted { .. })
    ));
}

#[test]
fn test_nan_gain_is_a_numerical_error() {
    let (features, labels) = linear_dataset(10);
    let mut model = XGBoost::with_loss(create_test_config(3), UndefinedGradientLoss);

    let result = model.fit(&features, &labels);
    assert!(matches!(result, Err(XGBoostError::Numerical { .. })));
    assert!(!model.is_fitted());
}
