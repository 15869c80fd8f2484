use super::Scheduler;
use crate::optim::optimizer::Optimizer;

/// Keeps whatever rate the optimizer was built with.
#[derive(Debug, Clone, Default)]
pub struct ConstantLr;

impl Scheduler for ConstantLr {
    fn advance(&mut self, _optimizer: &mut dyn Optimizer, _metric: Option<f64>, _epoch: usize) {}
}
