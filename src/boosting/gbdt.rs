//! Gradient-boosted ensemble of regression trees.
//!
//! Rounds run strictly in order. Round `i` fits tree `i` to the truth and the
//! running prediction accumulated by rounds `0..i`, then adds that tree's
//! output to the running prediction. Prediction sums the trees' outputs.

use crate::boosting::callback::{CancellationToken, RoundEvent, TrainingCallback, TrainingHistory};
use crate::boosting::labels::AugmentedLabels;
use crate::boosting::objective::{LeastSquaresLoss, LossFunction};
use crate::boosting::regression_tree::XGBoostRegressionTree;
use crate::config::BoosterConfig;
use crate::core::error::{Result, XGBoostError};
use crate::core::types::{FeatureValue, Score, VerbosityLevel};
use crate::metrics::evaluate_regression;
use ndarray::{Array1, Array2, ArrayBase, ArrayView2, Data, Dimension, Ix2};
use std::fmt;
use std::time::Instant;

/// Lifecycle of an ensemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingState {
    /// Nothing fitted yet, or the last fit failed or was cancelled
    Unfitted,
    /// A fit is running the given round
    Fitting { round: usize },
    /// Every round completed
    Fitted {
        num_features: usize,
        num_outputs: usize,
    },
}

/// Gradient-boosted regression ensemble.
///
/// # Examples
///
/// ```rust
/// use xgboost_rust::{BoosterConfig, XGBoost};
/// use ndarray::Array2;
///
/// # fn main() -> xgboost_rust::Result<()> {
/// let x = Array2::from_shape_fn((20, 1), |(i, _)| i as f64);
/// let y = x.mapv(|v| 3.0 * v);
///
/// let config = BoosterConfig {
///     n_estimators: 10,
///     ..BoosterConfig::default()
/// };
/// let mut model = XGBoost::new(config);
/// model.fit(&x, &y)?;
///
/// let predictions = model.predict(&x)?;
/// assert_eq!(predictions.dim(), (20, 1));
/// # Ok(())
/// # }
/// ```
pub struct XGBoost<L = LeastSquaresLoss> {
    config: BoosterConfig,
    loss: L,
    trees: Vec<XGBoostRegressionTree<L>>,
    state: TrainingState,
    callbacks: Vec<Box<dyn TrainingCallback>>,
    cancellation: Option<CancellationToken>,
    history: TrainingHistory,
}

impl XGBoost<LeastSquaresLoss> {
    /// Creates an unfitted least-squares ensemble.
    ///
    /// Configuration problems surface from [`XGBoost::fit`].
    pub fn new(config: BoosterConfig) -> Self {
        XGBoost::with_loss(config, LeastSquaresLoss)
    }
}

impl<L: LossFunction + Clone> XGBoost<L> {
    /// Creates an unfitted ensemble driven by `loss`.
    pub fn with_loss(config: BoosterConfig, loss: L) -> Self {
        let tree_config = config.tree_config();
        let trees = (0..config.n_estimators)
            .map(|_| XGBoostRegressionTree::new(tree_config, loss.clone()))
            .collect();

        XGBoost {
            config,
            loss,
            trees,
            state: TrainingState::Unfitted,
            callbacks: Vec::new(),
            cancellation: None,
            history: TrainingHistory::new(),
        }
    }

    /// Registers a per-round observer.
    pub fn add_callback<C: TrainingCallback + 'static>(&mut self, callback: C) {
        self.callbacks.push(Box::new(callback));
    }

    /// Builder-style [`XGBoost::add_callback`].
    pub fn with_callback<C: TrainingCallback + 'static>(mut self, callback: C) -> Self {
        self.add_callback(callback);
        self
    }

    /// Attaches a token checked between rounds.
    pub fn set_cancellation_token(&mut self, token: CancellationToken) {
        self.cancellation = Some(token);
    }

    /// Builder-style [`XGBoost::set_cancellation_token`].
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.set_cancellation_token(token);
        self
    }

    /// Fits the ensemble.
    ///
    /// `features` is `n x m`. `targets` has `n` rows and any number of
    /// further axes; it is flattened row-major into `n x k`. On error,
    /// including cancellation, the ensemble is left unfitted.
    pub fn fit<S1, S2, D>(&mut self, features: &ArrayBase<S1, Ix2>, targets: &ArrayBase<S2, D>) -> Result<()>
    where
        S1: Data<Elem = FeatureValue>,
        S2: Data<Elem = Score>,
        D: Dimension,
    {
        self.reset();
        self.history.clear();

        self.config.validate()?;
        let features = features.view();
        validate_features(&features)?;
        let targets = label_matrix(targets, features.nrows())?;

        let (num_samples, num_outputs) = targets.dim();
        let num_features = features.ncols();

        let num_threads = self.config.effective_num_threads();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .map_err(|e| XGBoostError::threading(format!("Failed to create thread pool: {}", e)))?;

        if self.config.verbosity >= VerbosityLevel::Info {
            log::info!(
                "Fitting {} rounds on {} samples x {} features ({} outputs, {} threads, learning_rate={} applied={})",
                self.trees.len(),
                num_samples,
                num_features,
                num_outputs,
                num_threads,
                self.config.learning_rate,
                self.config.apply_learning_rate
            );
        }

        log::debug!("Parameters: {:?}", self.config.as_parameter_map());

        let start = Instant::now();
        let result = pool.install(|| self.run_rounds(&features, targets));

        match result {
            Ok(()) => {
                self.state = TrainingState::Fitted {
                    num_features,
                    num_outputs,
                };
                for callback in self.callbacks.iter_mut() {
                    callback.on_training_end(&self.history);
                }
                if self.config.verbosity >= VerbosityLevel::Info {
                    log::info!(
                        "Fitted {} trees in {:.3}s",
                        self.trees.len(),
                        start.elapsed().as_secs_f64()
                    );
                }
                Ok(())
            }
            Err(e) => {
                if self.config.verbosity >= VerbosityLevel::Warning {
                    log::warn!("Fit aborted: {}", e);
                }
                self.reset();
                Err(e)
            }
        }
    }

    fn run_rounds(&mut self, features: &ArrayView2<'_, FeatureValue>, targets: Array2<Score>) -> Result<()> {
        let n_estimators = self.trees.len();
        let scale = self.config.update_scale();

        let mut running = Array2::zeros(targets.raw_dim());
        let mut truth = targets;

        for round in 0..n_estimators {
            if self.cancellation.as_ref().map_or(false, |token| token.is_cancelled()) {
                return Err(XGBoostError::Cancelled {
                    completed_rounds: round,
                });
            }

            self.state = TrainingState::Fitting { round };
            let round_start = Instant::now();

            let labels = AugmentedLabels::new(truth, running)?;
            let label_width = labels.width();

            let tree = &mut self.trees[round];
            tree.fit(features, &labels)?;
            let update = tree.predict(features)?;

            let (round_truth, mut round_running) = labels.into_parts();
            check_tree_update(round, &update, &round_running)?;
            round_running.scaled_add(scale, &update);
            truth = round_truth;
            running = round_running;

            let metrics = evaluate_regression(&truth.view(), &running.view())?;
            let training_loss = self.loss.loss(&truth.view(), &running.view())?;
            let (num_leaves, tree_depth) = tree
                .tree()
                .map_or((0, 0), |fitted| (fitted.num_leaves(), fitted.depth()));

            let event = RoundEvent {
                round,
                n_estimators,
                label_width,
                training_loss,
                training_mae: metrics.mae,
                training_rmse: metrics.rmse,
                num_leaves,
                tree_depth,
                elapsed_secs: round_start.elapsed().as_secs_f64(),
            };

            log::debug!(
                "Round {}/{}: {}={:.6} mae={:.6} leaves={}",
                round + 1,
                n_estimators,
                self.loss.name(),
                training_loss,
                metrics.mae,
                num_leaves
            );

            for callback in self.callbacks.iter_mut() {
                callback.on_round_end(&event);
            }
            self.history.push(event);
        }

        Ok(())
    }

    /// Predicts an `n x k` matrix.
    pub fn predict<S>(&self, features: &ArrayBase<S, Ix2>) -> Result<Array2<Score>>
    where
        S: Data<Elem = FeatureValue>,
    {
        self.predict_with_rounds(features, self.trees.len())
    }

    /// Predicts using only the first `num_rounds` trees.
    pub fn predict_with_rounds<S>(&self, features: &ArrayBase<S, Ix2>, num_rounds: usize) -> Result<Array2<Score>>
    where
        S: Data<Elem = FeatureValue>,
    {
        let (num_features, num_outputs) = self.fitted_layout()?;

        if num_rounds > self.trees.len() {
            return Err(XGBoostError::invalid_parameter(
                "num_rounds",
                num_rounds.to_string(),
                format!("ensemble has only {} trees", self.trees.len()),
            ));
        }

        let features = features.view();
        if features.ncols() != num_features {
            return Err(XGBoostError::shape_mismatch(
                format!("{} feature columns", num_features),
                format!("{} feature columns", features.ncols()),
            ));
        }
        if features.iter().any(|v| !v.is_finite()) {
            return Err(XGBoostError::data("Feature matrix contains non-finite values"));
        }

        let scale = self.config.update_scale();
        let mut predictions = Array2::zeros((features.nrows(), num_outputs));
        for tree in &self.trees[..num_rounds] {
            predictions.scaled_add(scale, &tree.predict(&features)?);
        }

        Ok(predictions)
    }

    /// Predicts a vector when the ensemble was fitted on a single target.
    pub fn predict_vector<S>(&self, features: &ArrayBase<S, Ix2>) -> Result<Array1<Score>>
    where
        S: Data<Elem = FeatureValue>,
    {
        let (_, num_outputs) = self.fitted_layout()?;
        if num_outputs != 1 {
            return Err(XGBoostError::shape_mismatch(
                "a single-output ensemble",
                format!("{} outputs", num_outputs),
            ));
        }

        let predictions = self.predict(features)?;
        Ok(predictions.column(0).to_owned())
    }

    fn fitted_layout(&self) -> Result<(usize, usize)> {
        match self.state {
            TrainingState::Fitted {
                num_features,
                num_outputs,
            } => Ok((num_features, num_outputs)),
            _ => Err(XGBoostError::not_fitted("XGBoost ensemble")),
        }
    }

    fn reset(&mut self) {
        for tree in self.trees.iter_mut() {
            tree.reset();
        }
        self.state = TrainingState::Unfitted;
    }

    pub fn config(&self) -> &BoosterConfig {
        &self.config
    }

    pub fn loss(&self) -> &L {
        &self.loss
    }

    pub fn state(&self) -> TrainingState {
        self.state
    }

    pub fn is_fitted(&self) -> bool {
        matches!(self.state, TrainingState::Fitted { .. })
    }

    /// Number of trees (equal to `n_estimators`).
    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    /// Number of outputs `k`, once fitted.
    pub fn num_outputs(&self) -> Option<usize> {
        self.fitted_layout().ok().map(|(_, k)| k)
    }

    /// Number of feature columns, once fitted.
    pub fn num_features(&self) -> Option<usize> {
        self.fitted_layout().ok().map(|(m, _)| m)
    }

    pub fn trees(&self) -> &[XGBoostRegressionTree<L>] {
        &self.trees
    }

    /// Per-round records of the most recent fit.
    ///
    /// After a failed or cancelled fit this holds the rounds that completed.
    pub fn training_history(&self) -> &TrainingHistory {
        &self.history
    }
}

impl<L: fmt::Debug> fmt::Debug for XGBoost<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XGBoost")
            .field("config", &self.config)
            .field("loss", &self.loss)
            .field("num_trees", &self.trees.len())
            .field("state", &self.state)
            .field("callbacks", &self.callbacks.len())
            .field("cancellable", &self.cancellation.is_some())
            .finish()
    }
}

fn validate_features(features: &ArrayView2<'_, FeatureValue>) -> Result<()> {
    if features.nrows() == 0 {
        return Err(XGBoostError::data("Feature matrix has no rows"));
    }
    if features.ncols() == 0 {
        return Err(XGBoostError::data("Feature matrix has no columns"));
    }
    if features.iter().any(|v| !v.is_finite()) {
        return Err(XGBoostError::data("Feature matrix contains non-finite values"));
    }
    Ok(())
}

/// Row-major reshape of the targets into `n x k`.
fn label_matrix<S, D>(targets: &ArrayBase<S, D>, num_samples: usize) -> Result<Array2<Score>>
where
    S: Data<Elem = Score>,
    D: Dimension,
{
    let target_rows = targets.shape().first().copied();
    if target_rows != Some(num_samples) {
        return Err(XGBoostError::shape_mismatch(
            format!("{} target rows", num_samples),
            match target_rows {
                Some(rows) => format!("{} target rows", rows),
                None => "a scalar target".to_string(),
            },
        ));
    }

    let num_outputs = targets.len() / num_samples;
    if num_outputs == 0 {
        return Err(XGBoostError::data("Targets have no columns"));
    }
    if targets.iter().any(|v| !v.is_finite()) {
        return Err(XGBoostError::data("Targets contain non-finite values"));
    }

    // `iter` walks in logical row-major order regardless of memory layout
    let values: Vec<Score> = targets.iter().copied().collect();
    Array2::from_shape_vec((num_samples, num_outputs), values)
        .map_err(|e| XGBoostError::internal(format!("Failed to reshape targets: {}", e)))
}

/// A tree's update must line up with the running predictions and stay finite.
fn check_tree_update(round: usize, update: &Array2<Score>, running: &Array2<Score>) -> Result<()> {
    crate::ensure!(
        update.dim() == running.dim(),
        crate::training_error!(
            "Round {} tree produced a {:?} update for {:?} predictions",
            round,
            update.dim(),
            running.dim()
        )
    );
    crate::ensure!(
        update.iter().all(|v| v.is_finite()),
        crate::training_error!("Round {} tree produced non-finite leaf values", round)
    );
    Ok(())
}
