pub mod manager;

pub use manager::{CheckpointManager, CheckpointState, Checkpointer, BEST_FILE, CHECKPOINT_FILE};
