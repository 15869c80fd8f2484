pub mod confusion;
pub mod running_stats;

pub use confusion::{ConfusionMatrix, LABELS, NUM_CLASSES};
pub use running_stats::RunningStats;
