pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod model;
pub mod network;
pub mod loss;
pub mod optim;
pub mod data;
pub mod metrics;
pub mod checkpoint;
pub mod summary;
pub mod config;
pub mod train;

// Convenience re-exports
pub use error::{HarnessError, Result};
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use model::{Classifier, Mode, Parameter, StateDict};
pub use network::{Network, NetworkSpec, LayerSpec};
pub use loss::{Criterion, CrossEntropyLoss};
pub use optim::{Optimizer, Scheduler, Sgd, ReduceLrOnPlateau, StepLr, ConstantLr};
pub use data::{Batch, Dataset, DataLoader, DataSource};
pub use metrics::{ConfusionMatrix, RunningStats};
pub use checkpoint::{CheckpointManager, CheckpointState, Checkpointer};
pub use summary::ScalarWriter;
pub use config::{RunConfig, SchedulerConfig};
pub use train::{train_model, test_model, run_pass, Loaders, TrainConfig, TrainReport, EpochStats};
