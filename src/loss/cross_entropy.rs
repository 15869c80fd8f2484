use crate::error::{HarnessError, Result};
use crate::loss::criterion::{Criterion, LossOutput};

/// Categorical cross-entropy over raw class scores (logits).
///
/// The softmax is folded into the loss, so the classifier's output layer
/// should be `Identity`.
pub struct CrossEntropyLoss;

impl CrossEntropyLoss {
    /// Numerically stable log-softmax of one score vector.
    fn log_softmax(scores: &[f64]) -> Vec<f64> {
        let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let log_sum = scores.iter().map(|s| (s - max).exp()).sum::<f64>().ln() + max;
        scores.iter().map(|s| s - log_sum).collect()
    }
}

impl Criterion for CrossEntropyLoss {
    /// L = -mean_i log softmax(scores_i)[target_i]
    ///
    /// The gradient w.r.t. the scores simplifies to
    ///   ∂L/∂z_ij = (softmax(z_i)_j - onehot(target_i)_j) / batch_len
    fn compute(&self, scores: &[Vec<f64>], targets: &[usize]) -> Result<LossOutput> {
        if scores.len() != targets.len() {
            return Err(HarnessError::BatchShape { inputs: scores.len(), targets: targets.len() });
        }
        let n = scores.len().max(1) as f64;

        let mut value = 0.0;
        let mut grad = Vec::with_capacity(scores.len());
        for (row, &target) in scores.iter().zip(targets.iter()) {
            if target >= row.len() {
                return Err(HarnessError::LabelOutOfRange { label: target, classes: row.len() });
            }
            let log_probs = CrossEntropyLoss::log_softmax(row);
            value -= log_probs[target];
            grad.push(
                log_probs.iter().enumerate()
                    .map(|(j, lp)| {
                        let onehot = if j == target { 1.0 } else { 0.0 };
                        (lp.exp() - onehot) / n
                    })
                    .collect(),
            );
        }

        Ok(LossOutput { value: value / n, grad })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_scores_cost_ln_classes() {
        let out = CrossEntropyLoss.compute(&[vec![0.0, 0.0, 0.0], vec![5.0, 5.0, 5.0]], &[0, 2]).unwrap();
        assert!((out.value - 3f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn gradient_rows_sum_to_zero_and_push_target_up() {
        let out = CrossEntropyLoss.compute(&[vec![1.0, 2.0, -1.0]], &[0]).unwrap();
        let row = &out.grad[0];
        assert!(row.iter().sum::<f64>().abs() < 1e-12);
        assert!(row[0] < 0.0);
        assert!(row[1] > 0.0 && row[2] > 0.0);
    }

    #[test]
    fn large_scores_stay_finite() {
        let out = CrossEntropyLoss.compute(&[vec![1000.0, -1000.0, 0.0]], &[1]).unwrap();
        assert!(out.value.is_finite());
        assert!((out.value - 2000.0).abs() < 1e-6);
    }

    #[test]
    fn target_outside_scores_is_an_error() {
        let err = CrossEntropyLoss.compute(&[vec![0.0, 1.0, 2.0]], &[3]).unwrap_err();
        assert!(matches!(err, HarnessError::LabelOutOfRange { label: 3, classes: 3 }));
    }
}
