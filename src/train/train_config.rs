use std::path::PathBuf;
use std::sync::mpsc;

use crate::checkpoint::CheckpointState;
use crate::train::epoch_stats::EpochStats;

/// Configuration for a `train_model` run.
///
/// # Fields
/// - `num_epochs`   : the loop runs epochs `start_epoch..num_epochs`
/// - `start_epoch`  : first epoch index; non-zero when resuming
/// - `best_accuracy`: validation accuracy a new epoch must beat to count as best
/// - `save_dir`     : where checkpoints and `all_scalars.json` are written
/// - `progress_tx`  : optional channel sender; one `EpochStats` is sent per
///                  completed epoch. A dropped receiver is ignored.
pub struct TrainConfig {
    pub num_epochs: usize,
    pub start_epoch: usize,
    pub best_accuracy: f64,
    pub save_dir: PathBuf,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
}

impl TrainConfig {
    /// A fresh run from epoch 0 with no prior best.
    pub fn new(num_epochs: usize, save_dir: impl Into<PathBuf>) -> Self {
        TrainConfig {
            num_epochs,
            start_epoch: 0,
            best_accuracy: 0.0,
            save_dir: save_dir.into(),
            progress_tx: None,
        }
    }

    /// Continues after the epoch recorded in `state`, keeping its best accuracy.
    pub fn resume_from(mut self, state: &CheckpointState) -> Self {
        self.start_epoch = state.epoch + 1;
        self.best_accuracy = state.best_acc;
        self
    }
}
