use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use log::info;

use crate::data::DataSource;
use crate::error::{HarnessError, Result};
use crate::model::{argmax, Classifier, Mode};
use crate::train::loop_fn::format_elapsed;

/// Result of a held-out evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestOutcome {
    /// Percentage of the whole dataset predicted correctly.
    pub accuracy: f64,
    pub correct: usize,
    pub example_count: usize,
}

/// Runs one inference-only pass over every batch of `data` and reports accuracy.
///
/// `output_file` receives a JSON array of per-example outputs. Those were
/// never recorded, so the array is always empty.
pub fn test_model<M, D>(
    model: &mut M,
    data: &mut D,
    output_file: impl AsRef<Path>,
) -> Result<TestOutcome>
where
    M: Classifier + ?Sized,
    D: DataSource<Input = M::Input> + ?Sized,
{
    model.set_mode(Mode::Eval);
    let dataset_len = data.dataset_len();
    let test_begin = Instant::now();
    let outputs: Vec<serde_json::Value> = Vec::new();

    let mut correct = 0usize;
    let mut example_count = 0usize;
    for batch in data.batches() {
        if batch.inputs.len() != batch.targets.len() {
            return Err(HarnessError::BatchShape {
                inputs: batch.inputs.len(),
                targets: batch.targets.len(),
            });
        }

        let scores = model.forward(&batch.inputs);

        if example_count % 100 == 0 {
            info!("(Example Count: {example_count})");
        }
        correct += scores.iter()
            .zip(batch.targets.iter())
            .filter(|&(s, &t)| argmax(s) == t)
            .count();
        example_count += batch.len();
    }

    let path = output_file.as_ref();
    let file = File::create(path).map_err(|e| HarnessError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &outputs).map_err(|e| HarnessError::json(path, e))?;
    writer.flush().map_err(|e| HarnessError::io(path, e))?;

    info!("(Example Count: {example_count})");
    if dataset_len == 0 {
        return Err(HarnessError::EmptyDataset);
    }
    let accuracy = correct as f64 / dataset_len as f64 * 100.0;
    info!("Acc: {:2.3} ({}/{})", accuracy, correct, example_count);
    info!("Test Time: {}", format_elapsed(test_begin.elapsed()));

    Ok(TestOutcome { accuracy, correct, example_count })
}
