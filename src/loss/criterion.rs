use crate::error::Result;

/// Scalar loss for one batch plus its gradient with respect to the scores.
#[derive(Debug, Clone)]
pub struct LossOutput {
    pub value: f64,
    /// Same shape as the scores: one row per example.
    pub grad: Vec<Vec<f64>>,
}

/// Maps a batch of scores and integer targets to a loss.
pub trait Criterion {
    fn compute(&self, scores: &[Vec<f64>], targets: &[usize]) -> Result<LossOutput>;
}
