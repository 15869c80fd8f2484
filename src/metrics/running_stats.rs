use crate::error::{HarnessError, Result};
use crate::metrics::confusion::ConfusionMatrix;

/// Running statistics for one pass over a dataset.
///
/// Accuracy is always reported against the full dataset size given at
/// construction, even when the pass stopped before seeing every example.
#[derive(Debug, Clone)]
pub struct RunningStats {
    dataset_len: usize,
    loss_sum: f64,
    correct: usize,
    count: usize,
    targets: Vec<usize>,
    preds: Vec<usize>,
}

impl RunningStats {
    pub fn new(dataset_len: usize) -> RunningStats {
        RunningStats {
            dataset_len,
            loss_sum: 0.0,
            correct: 0,
            count: 0,
            targets: Vec::with_capacity(dataset_len),
            preds: Vec::with_capacity(dataset_len),
        }
    }

    /// Folds in one batch: its scalar loss and its predicted/true labels.
    pub fn update(&mut self, batch_loss: f64, preds: &[usize], targets: &[usize]) {
        debug_assert_eq!(preds.len(), targets.len());
        self.loss_sum += batch_loss;
        self.correct += preds.iter().zip(targets.iter()).filter(|(p, t)| p == t).count();
        self.targets.extend_from_slice(targets);
        self.preds.extend_from_slice(preds);
        self.count += targets.len();
    }

    pub fn dataset_len(&self) -> usize {
        self.dataset_len
    }

    pub fn loss_sum(&self) -> f64 {
        self.loss_sum
    }

    pub fn correct(&self) -> usize {
        self.correct
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Sum of batch losses divided by the number of examples seen.
    pub fn mean_loss(&self) -> Result<f64> {
        if self.count == 0 {
            return Err(HarnessError::EmptyPass);
        }
        Ok(self.loss_sum / self.count as f64)
    }

    /// Percentage of the *whole dataset* predicted correctly.
    pub fn accuracy(&self) -> Result<f64> {
        if self.dataset_len == 0 {
            return Err(HarnessError::EmptyDataset);
        }
        Ok(self.correct as f64 / self.dataset_len as f64 * 100.0)
    }

    /// Percentage of the examples seen so far predicted correctly; used for
    /// mid-pass diagnostics only.
    pub fn running_accuracy(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.correct as f64 / self.count as f64 * 100.0
    }

    pub fn confusion_matrix(&self) -> ConfusionMatrix {
        ConfusionMatrix::from_pairs(&self.targets, &self.preds)
    }

    pub fn macro_f1(&self) -> f64 {
        self.confusion_matrix().macro_f1()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_loss_divides_by_examples_seen() {
        let mut stats = RunningStats::new(10);
        stats.update(1.2, &[0, 1, 2, 0], &[0, 1, 1, 0]);
        stats.update(0.8, &[2, 2, 2, 2], &[2, 2, 0, 1]);
        assert!((stats.mean_loss().unwrap() - 2.0 / 8.0).abs() < 1e-12);
        assert_eq!(stats.count(), 8);
        assert_eq!(stats.correct(), 5);
    }

    #[test]
    fn accuracy_uses_dataset_size_not_count() {
        let mut stats = RunningStats::new(10);
        stats.update(0.5, &[0, 1, 2, 0], &[0, 1, 2, 0]);
        stats.update(0.5, &[1, 1, 1, 1], &[1, 1, 1, 1]);
        assert_eq!(stats.accuracy().unwrap(), 80.0);
        assert_eq!(stats.running_accuracy(), 100.0);
    }

    #[test]
    fn accuracy_can_exceed_what_the_count_would_allow() {
        // A source that yields more examples than it claims to hold.
        let mut stats = RunningStats::new(2);
        stats.update(0.1, &[0, 1, 2], &[0, 1, 2]);
        assert_eq!(stats.accuracy().unwrap(), 150.0);
    }

    #[test]
    fn empty_pass_has_no_mean_loss() {
        let stats = RunningStats::new(5);
        assert!(matches!(stats.mean_loss(), Err(HarnessError::EmptyPass)));
        assert!(matches!(RunningStats::new(0).accuracy(), Err(HarnessError::EmptyDataset)));
    }

    #[test]
    fn confusion_covers_only_the_recorded_prefix() {
        let mut stats = RunningStats::new(100);
        stats.update(0.0, &[1, 1], &[1, 2]);
        let m = stats.confusion_matrix();
        assert_eq!(m.total(), 2);
        assert_eq!(m.counts[2][1], 1);
    }
}
