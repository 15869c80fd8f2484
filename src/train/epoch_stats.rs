use serde::{Serialize, Deserialize};

/// Per-epoch training statistics emitted by `train_model`.
///
/// One value is produced at the end of every completed epoch. It is kept in
/// the returned `TrainReport` and, when `progress_tx` is configured in
/// `TrainConfig`, also sent down that channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 0-based epoch index.
    pub epoch: usize,
    /// Epoch index the run stops at if it is never stopped early.
    pub total_epochs: usize,
    pub train_loss: f64,
    /// Percentage of the training dataset predicted correctly.
    pub train_accuracy: f64,
    pub val_loss: f64,
    /// Percentage of the validation dataset predicted correctly.
    pub val_accuracy: f64,
    /// Whether this epoch produced a new best validation accuracy.
    pub is_best: bool,
    /// Learning rate used during this epoch, before the scheduler advanced.
    pub learning_rate: f64,
    pub train_ms: u64,
    pub val_ms: u64,
}
