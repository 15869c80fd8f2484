//! Learning rate schedulers
//!
//! - `ReduceLrOnPlateau` - Decay on a stalled metric, with patience-based early stopping
//! - `StepLr` - Step decay by a factor every N epochs
//! - `ConstantLr` - Leaves the rate untouched

mod constant;
mod plateau;
mod step;

pub use constant::ConstantLr;
pub use plateau::{ReduceLrOnPlateau, ThresholdMode};
pub use step::StepLr;

use crate::optim::optimizer::Optimizer;

/// Epoch-level learning-rate policy, advanced once per epoch by the trainer.
pub trait Scheduler {
    /// Whether `advance` needs the monitored validation error.
    fn monitors_metric(&self) -> bool {
        false
    }

    /// Moves the schedule forward by one epoch, updating the optimizer's rate.
    ///
    /// `metric` is `Some` exactly when `monitors_metric()` is true.
    fn advance(&mut self, optimizer: &mut dyn Optimizer, metric: Option<f64>, epoch: usize);

    /// Whether training should end now. Only patience-based schedulers ever say yes.
    fn should_stop(&self) -> bool {
        false
    }

    /// Why `should_stop` said yes, for the log line that ends the run.
    fn stop_reason(&self) -> Option<String> {
        None
    }
}
