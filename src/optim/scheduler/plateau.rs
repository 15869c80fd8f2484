//! Reduce-on-plateau scheduler with early stopping

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::Scheduler;
use crate::optim::optimizer::Optimizer;

/// How `threshold` is compared against the best metric seen (min mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdMode {
    /// Improvement means `metric < best * (1 - threshold)`.
    #[default]
    Rel,
    /// Improvement means `metric < best - threshold`.
    Abs,
}

/// Lowers the learning rate when a minimised metric stops improving, and
/// asks for training to stop once it has stalled for too long.
///
/// Two counters are kept:
/// - `num_bad_epochs` drives rate reductions; it is zeroed after each
///   reduction and during cooldown.
/// - `unconstrained_bad_epochs` drives early stopping; only an improvement
///   resets it.
#[derive(Debug, Clone)]
pub struct ReduceLrOnPlateau {
    factor: f64,
    patience: usize,
    threshold: f64,
    threshold_mode: ThresholdMode,
    cooldown: usize,
    min_lr: f64,
    eps: f64,
    max_patience_to_stop: usize,

    best: f64,
    num_bad_epochs: usize,
    unconstrained_bad_epochs: usize,
    cooldown_counter: usize,
    last_epoch: Option<usize>,
}

impl ReduceLrOnPlateau {
    /// # Arguments
    /// * `factor` - multiplier applied to the rate on a plateau, in (0, 1)
    /// * `patience` - bad epochs tolerated before reducing the rate
    /// * `max_patience_to_stop` - bad epochs tolerated before `should_stop`
    pub fn new(factor: f64, patience: usize, max_patience_to_stop: usize) -> Self {
        Self {
            factor,
            patience,
            threshold: 1e-4,
            threshold_mode: ThresholdMode::Rel,
            cooldown: 0,
            min_lr: 0.0,
            eps: 1e-8,
            max_patience_to_stop,
            best: f64::INFINITY,
            num_bad_epochs: 0,
            unconstrained_bad_epochs: 0,
            cooldown_counter: 0,
            last_epoch: None,
        }
    }

    pub fn with_threshold(mut self, threshold: f64, mode: ThresholdMode) -> Self {
        self.threshold = threshold;
        self.threshold_mode = mode;
        self
    }

    pub fn with_cooldown(mut self, cooldown: usize) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_min_lr(mut self, min_lr: f64) -> Self {
        self.min_lr = min_lr;
        self
    }

    pub fn best(&self) -> f64 {
        self.best
    }

    pub fn num_bad_epochs(&self) -> usize {
        self.num_bad_epochs
    }

    pub fn unconstrained_bad_epochs(&self) -> usize {
        self.unconstrained_bad_epochs
    }

    pub fn max_patience_to_stop(&self) -> usize {
        self.max_patience_to_stop
    }

    pub fn last_epoch(&self) -> Option<usize> {
        self.last_epoch
    }

    fn is_better(&self, metric: f64) -> bool {
        match self.threshold_mode {
            ThresholdMode::Rel => metric < self.best * (1.0 - self.threshold),
            ThresholdMode::Abs => metric < self.best - self.threshold,
        }
    }

    fn reduce_lr(&self, optimizer: &mut dyn Optimizer, epoch: usize) {
        let old_lr = optimizer.learning_rate();
        let new_lr = (old_lr * self.factor).max(self.min_lr);
        if old_lr - new_lr > self.eps {
            optimizer.set_learning_rate(new_lr);
            info!("Epoch {epoch}: reducing learning rate to {new_lr:.4e}");
        }
    }
}

impl Scheduler for ReduceLrOnPlateau {
    fn monitors_metric(&self) -> bool {
        true
    }

    fn advance(&mut self, optimizer: &mut dyn Optimizer, metric: Option<f64>, epoch: usize) {
        let Some(current) = metric else {
            warn!("plateau scheduler advanced without a metric; ignoring epoch {epoch}");
            return;
        };
        self.last_epoch = Some(epoch);

        if self.is_better(current) {
            self.best = current;
            self.num_bad_epochs = 0;
            self.unconstrained_bad_epochs = 0;
        } else {
            self.num_bad_epochs += 1;
            self.unconstrained_bad_epochs += 1;
        }

        if self.cooldown_counter > 0 {
            self.cooldown_counter -= 1;
            self.num_bad_epochs = 0;
        }

        if self.num_bad_epochs > self.patience {
            self.reduce_lr(optimizer, epoch);
            self.cooldown_counter = self.cooldown;
            self.num_bad_epochs = 0;
        }
    }

    fn should_stop(&self) -> bool {
        self.unconstrained_bad_epochs > self.max_patience_to_stop
    }

    fn stop_reason(&self) -> Option<String> {
        self.should_stop().then(|| {
            format!(
                "unconstrained bad epochs {} > max patience to stop {}",
                self.unconstrained_bad_epochs,
                self.max_patience_to_stop()
            )
        })
    }
}
