pub mod trainer;
pub mod epoch_stats;
pub mod train_config;
pub mod loop_fn;
pub mod test_runner;

pub use trainer::{run_pass, train_epoch, validate, PassOutcome, DIAGNOSTIC_EVERY};
pub use epoch_stats::EpochStats;
pub use train_config::TrainConfig;
pub use loop_fn::{train_model, Loaders, TrainReport, SCALARS_FILE};
pub use test_runner::{test_model, TestOutcome};
