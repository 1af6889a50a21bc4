//! Common test utilities for Pure Rust XGBoost integration tests.

#![allow(dead_code)]

use ndarray::{Array1, Array2};
use rand::prelude::*;
use xgboost_rust::*;

/// Features `1..=n` in a single column, targets `2x`.
pub fn linear_dataset(num_samples: usize) -> (Array2<f64>, Array1<f64>) {
    let features = Array2::from_shape_fn((num_samples, 1), |(i, _)| (i + 1) as f64);
    let labels = features.column(0).mapv(|x| 2.0 * x);
    (features, labels)
}

/// Create test features for regression tasks
pub fn create_test_features_regression(num_samples: usize, num_features: usize) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(42);
    Array2::from_shape_fn((num_samples, num_features), |_| rng.gen_range(-5.0..5.0))
}

/// Create test labels for regression based on features
pub fn create_test_labels_regression(features: &Array2<f64>) -> Array1<f64> {
    features
        .rows()
        .into_iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(j, &x)| x * ((j + 1) as f64 * 0.1))
                .sum::<f64>()
        })
        .collect()
}

/// Two target columns: a step in feature 0 and a ramp in feature 1.
pub fn create_test_labels_multi_output(features: &Array2<f64>) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(7);
    let mut labels = Array2::zeros((features.nrows(), 2));

    for (i, row) in features.rows().into_iter().enumerate() {
        let noise: f64 = rng.gen_range(-0.05..0.05);
        let step = if row[0] > 0.0 { 3.0 } else { -3.0 };
        labels[[i, 0]] = step + noise;
        labels[[i, 1]] = row[1] * 0.5;
    }

    labels
}

/// Configuration used by most integration tests.
pub fn create_test_config(n_estimators: usize) -> BoosterConfig {
    ConfigBuilder::new()
        .n_estimators(n_estimators)
        .max_depth(2)
        .min_samples_split(2)
        .num_threads(2)
        .verbosity(VerbosityLevel::Warning)
        .build()
        .unwrap()
}

/// Mean absolute error between two vectors.
pub fn mean_absolute_error(predictions: &Array1<f64>, labels: &Array1<f64>) -> f64 {
    assert_eq!(predictions.len(), labels.len());
    (predictions - labels).mapv(f64::abs).mean().unwrap_or(0.0)
}
