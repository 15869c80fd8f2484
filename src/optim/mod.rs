pub mod clip;
pub mod optimizer;
pub mod scheduler;
pub mod sgd;

pub use clip::{clip_grad_value, GRAD_CLIP_VALUE};
pub use optimizer::Optimizer;
pub use scheduler::{ConstantLr, ReduceLrOnPlateau, Scheduler, StepLr, ThresholdMode};
pub use sgd::Sgd;
