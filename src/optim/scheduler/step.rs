//! Step decay learning rate scheduler

use log::info;

use super::Scheduler;
use crate::optim::optimizer::Optimizer;

/// Multiplies the learning rate by `gamma` every `step_size` epochs.
///
/// Formula: lr_t = lr_t-1 * gamma   when t % step_size == 0
#[derive(Debug, Clone)]
pub struct StepLr {
    step_size: usize,
    gamma: f64,
    epochs_seen: usize,
}

impl StepLr {
    pub fn new(step_size: usize, gamma: f64) -> Self {
        Self { step_size, gamma, epochs_seen: 0 }
    }
}

impl Scheduler for StepLr {
    fn advance(&mut self, optimizer: &mut dyn Optimizer, _metric: Option<f64>, epoch: usize) {
        self.epochs_seen += 1;
        if self.step_size == 0 || self.epochs_seen % self.step_size != 0 {
            return;
        }
        let new_lr = optimizer.learning_rate() * self.gamma;
        optimizer.set_learning_rate(new_lr);
        info!("Epoch {epoch}: step decay, learning rate now {new_lr:.4e}");
    }
}
