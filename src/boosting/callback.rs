//! Training observation hooks for the boosting loop.
//!
//! Callbacks see one [`RoundEvent`] per completed round. They observe only;
//! stopping a fit early goes through a [`CancellationToken`].

use crate::core::types::IterationIndex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Summary of one completed boosting round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundEvent {
    /// Zero-based round index
    pub round: IterationIndex,
    /// Total rounds scheduled
    pub n_estimators: usize,
    /// Column count of the packed label block (always `2k`)
    pub label_width: usize,
    /// Loss of the running prediction after this round
    pub training_loss: f64,
    /// Mean absolute error of the running prediction after this round
    pub training_mae: f64,
    /// Root mean squared error of the running prediction after this round
    pub training_rmse: f64,
    /// Leaves of the tree grown this round
    pub num_leaves: usize,
    /// Depth of the tree grown this round
    pub tree_depth: usize,
    /// Wall time spent in this round, in seconds
    pub elapsed_secs: f64,
}

/// Observer invoked after every completed round.
pub trait TrainingCallback: Send {
    fn on_round_end(&mut self, event: &RoundEvent);

    /// Called once after the last round of a successful fit.
    fn on_training_end(&mut self, _history: &TrainingHistory) {}
}

impl<F> TrainingCallback for F
where
    F: FnMut(&RoundEvent) + Send,
{
    fn on_round_end(&mut self, event: &RoundEvent) {
        self(event)
    }
}

/// Logs progress through `log::info!` every `period` rounds.
#[derive(Debug, Clone)]
pub struct LoggingCallback {
    period: usize,
}

impl LoggingCallback {
    /// A period of 0 is treated as 1.
    pub fn new(period: usize) -> Self {
        LoggingCallback {
            period: period.max(1),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    fn should_log(&self, event: &RoundEvent) -> bool {
        (event.round + 1) % self.period == 0 || event.round + 1 == event.n_estimators
    }
}

impl Default for LoggingCallback {
    fn default() -> Self {
        LoggingCallback::new(10)
    }
}

impl TrainingCallback for LoggingCallback {
    fn on_round_end(&mut self, event: &RoundEvent) {
        if self.should_log(event) {
            log::info!(
                "[{}/{}] loss={:.6} mae={:.6} rmse={:.6} leaves={} depth={}",
                event.round + 1,
                event.n_estimators,
                event.training_loss,
                event.training_mae,
                event.training_rmse,
                event.num_leaves,
                event.tree_depth
            );
        }
    }

    fn on_training_end(&mut self, history: &TrainingHistory) {
        if let Some(last) = history.last() {
            log::info!(
                "Training finished after {} rounds, final mae={:.6}",
                history.len(),
                last.training_mae
            );
        }
    }
}

/// Per-round record of a fit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    events: Vec<RoundEvent>,
}

impl TrainingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: RoundEvent) {
        self.events.push(event);
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[RoundEvent] {
        &self.events
    }

    pub fn last(&self) -> Option<&RoundEvent> {
        self.events.last()
    }

    /// Training MAE after each round, in round order.
    pub fn mae_curve(&self) -> Vec<f64> {
        self.events.iter().map(|e| e.training_mae).collect()
    }

    /// Training loss after each round, in round order.
    pub fn loss_curve(&self) -> Vec<f64> {
        self.events.iter().map(|e| e.training_loss).collect()
    }
}

/// Cooperative cancellation flag shared between a fit and its controller.
///
/// Checked between rounds only; a round in progress always completes.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Clears a previous request so the token can be reused.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }
}
