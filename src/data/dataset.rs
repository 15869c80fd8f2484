use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};

/// One group of examples processed together in a single step.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch<T> {
    pub inputs: Vec<T>,
    pub targets: Vec<usize>,
}

impl<T> Batch<T> {
    /// Builds a batch, rejecting mismatched input/target counts.
    pub fn new(inputs: Vec<T>, targets: Vec<usize>) -> Result<Batch<T>> {
        if inputs.len() != targets.len() {
            return Err(HarnessError::BatchShape { inputs: inputs.len(), targets: targets.len() });
        }
        Ok(Batch { inputs, targets })
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// In-memory labelled examples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset<T> {
    inputs: Vec<T>,
    targets: Vec<usize>,
}

impl<T> Dataset<T> {
    pub fn new(inputs: Vec<T>, targets: Vec<usize>) -> Result<Dataset<T>> {
        if inputs.len() != targets.len() {
            return Err(HarnessError::BatchShape { inputs: inputs.len(), targets: targets.len() });
        }
        Ok(Dataset { inputs, targets })
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn targets(&self) -> &[usize] {
        &self.targets
    }
}

impl<T: Clone> Dataset<T> {
    /// Copies the examples at `indices` into a batch, in that order.
    pub fn gather(&self, indices: &[usize]) -> Batch<T> {
        Batch {
            inputs: indices.iter().map(|&i| self.inputs[i].clone()).collect(),
            targets: indices.iter().map(|&i| self.targets[i]).collect(),
        }
    }
}

impl Dataset<Vec<f64>> {
    /// Reads `{"inputs": [[f64]], "targets": [usize]}` from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Dataset<Vec<f64>>> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| HarnessError::io(path, e))?;
        let raw: Dataset<Vec<f64>> = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| HarnessError::json(path, e))?;
        let dataset = Dataset::new(raw.inputs, raw.targets)?;
        if let Some(width) = dataset.feature_width() {
            dataset.check_width(width)?;
        }
        Ok(dataset)
    }

    /// Length of the first input row, or `None` for an empty dataset.
    pub fn feature_width(&self) -> Option<usize> {
        self.inputs.first().map(Vec::len)
    }

    /// Fails unless every input row has exactly `expected` features.
    pub fn check_width(&self, expected: usize) -> Result<()> {
        match self.inputs.iter().position(|row| row.len() != expected) {
            None => Ok(()),
            Some(i) => Err(HarnessError::Config(format!(
                "input row {i} has {} features, expected {expected}",
                self.inputs[i].len()
            ))),
        }
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| HarnessError::io(path, e))?;
        serde_json::to_writer(BufWriter::new(file), self).map_err(|e| HarnessError::json(path, e))
    }
}
