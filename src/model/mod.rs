pub mod parameter;
pub mod classifier;

pub use parameter::Parameter;
pub use classifier::{argmax, Classifier, Mode, StateDict};
