use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::data::dataset::{Batch, Dataset};
use crate::error::{HarnessError, Result};

/// Anything that can be iterated as batches, once per pass.
pub trait DataSource {
    type Input;

    /// Total number of examples in the underlying dataset.
    fn dataset_len(&self) -> usize;

    /// Configured batch size; the final batch of a pass may be smaller.
    fn batch_size(&self) -> usize;

    /// Batches for one pass, in the order this source chooses.
    fn batches(&mut self) -> Box<dyn Iterator<Item = Batch<Self::Input>> + '_>;
}

/// Fixed-size batches over an in-memory dataset, optionally reshuffled
/// every pass from a seeded RNG.
pub struct DataLoader<T> {
    dataset: Dataset<T>,
    batch_size: usize,
    shuffle: bool,
    rng: StdRng,
}

impl<T: Clone> DataLoader<T> {
    pub fn new(dataset: Dataset<T>, batch_size: usize) -> Result<DataLoader<T>> {
        if batch_size == 0 {
            return Err(HarnessError::Config("batch_size must be at least 1".into()));
        }
        Ok(DataLoader {
            dataset,
            batch_size,
            shuffle: false,
            rng: StdRng::seed_from_u64(0),
        })
    }

    pub fn shuffled(mut self, seed: u64) -> DataLoader<T> {
        self.shuffle = true;
        self.rng = StdRng::seed_from_u64(seed);
        self
    }
}

impl<T: Clone> DataSource for DataLoader<T> {
    type Input = T;

    fn dataset_len(&self) -> usize {
        self.dataset.len()
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn batches(&mut self) -> Box<dyn Iterator<Item = Batch<T>> + '_> {
        let mut order: Vec<usize> = (0..self.dataset.len()).collect();
        if self.shuffle {
            order.shuffle(&mut self.rng);
        }
        let batch_size = self.batch_size;
        let dataset = &self.dataset;
        let n = order.len();

        Box::new((0..n).step_by(batch_size).map(move |start| {
            let end = (start + batch_size).min(n);
            dataset.gather(&order[start..end])
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loader(n: usize, batch_size: usize) -> DataLoader<usize> {
        let ds = Dataset::new((0..n).collect(), (0..n).map(|i| i % 3).collect()).unwrap();
        DataLoader::new(ds, batch_size).unwrap()
    }

    #[test]
    fn final_batch_is_partial() {
        let mut dl = loader(10, 4);
        let sizes: Vec<usize> = dl.batches().map(|b| b.len()).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
    }

    #[test]
    fn unshuffled_order_is_dataset_order() {
        let mut dl = loader(5, 2);
        let seen: Vec<usize> = dl.batches().flat_map(|b| b.inputs).collect();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn shuffling_keeps_every_example_once() {
        let mut dl = loader(20, 3).shuffled(42);
        let mut seen: Vec<usize> = dl.batches().flat_map(|b| b.inputs).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let ds = Dataset::new(vec![1.0], vec![0]).unwrap();
        assert!(DataLoader::new(ds, 0).is_err());
    }
}
