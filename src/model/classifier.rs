use std::collections::BTreeMap;

use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::model::parameter::Parameter;

/// Named parameter matrices; the serialisable form of a model's weights.
///
/// Obtaining one always copies, so later updates to the live model never
/// reach a snapshot taken earlier.
pub type StateDict = BTreeMap<String, Matrix>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Gradients are tracked and training-only behaviour (dropout) is active.
    Train,
    Eval,
}

/// A model mapping a batch of inputs to one score vector per example.
///
/// The harness drives a classifier only through this trait: it never looks
/// at the architecture, just at scores, gradients and state dicts.
pub trait Classifier {
    type Input;

    fn set_mode(&mut self, mode: Mode);

    /// Scores for each input, one `Vec` of per-class scores per example.
    fn forward(&mut self, inputs: &[Self::Input]) -> Vec<Vec<f64>>;

    /// Back-propagates `score_grads` (∂loss/∂scores for the batch passed to
    /// the most recent `forward`) and accumulates parameter gradients.
    fn backward(&mut self, score_grads: &[Vec<f64>]);

    fn parameters_mut(&mut self) -> Vec<&mut Parameter>;

    fn state_dict(&self) -> StateDict;

    fn load_state_dict(&mut self, state: &StateDict) -> Result<()>;
}

/// Index of the maximum score; the first one wins on ties.
pub fn argmax(v: &[f64]) -> usize {
    let mut best = 0;
    for (i, x) in v.iter().enumerate() {
        if *x > v[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_prefers_first_maximum() {
        assert_eq!(argmax(&[0.2, 0.7, 0.7]), 1);
        assert_eq!(argmax(&[3.0, -1.0, 2.0]), 0);
        assert_eq!(argmax(&[]), 0);
    }
}
