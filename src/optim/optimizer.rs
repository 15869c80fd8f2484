use crate::model::Parameter;

/// Stateful parameter-update rule.
///
/// Parameters are passed in the same order on every call (the order of
/// `Classifier::parameters_mut`), so per-parameter state can be kept by index.
pub trait Optimizer {
    fn zero_grad(&mut self, params: &mut [&mut Parameter]);

    fn step(&mut self, params: &mut [&mut Parameter]);

    fn learning_rate(&self) -> f64;

    fn set_learning_rate(&mut self, lr: f64);
}
