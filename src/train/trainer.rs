use log::info;

use crate::data::DataSource;
use crate::error::{HarnessError, Result};
use crate::loss::Criterion;
use crate::metrics::RunningStats;
use crate::model::{argmax, Classifier, Mode};
use crate::optim::{clip_grad_value, Optimizer, GRAD_CLIP_VALUE};

/// Training steps between two running-statistics printouts.
pub const DIAGNOSTIC_EVERY: usize = 100;

/// Summary of one pass over a data source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassOutcome {
    /// Sum of per-batch losses divided by the examples processed.
    pub loss: f64,
    /// Percentage of the whole dataset predicted correctly.
    pub accuracy: f64,
    pub correct: usize,
    pub example_count: usize,
}

/// Runs one pass of `model` over `data`.
///
/// In `Mode::Train` every batch goes through zero-grad, forward, loss,
/// backward, element-wise gradient clipping to ±`GRAD_CLIP_VALUE` and an
/// optimizer step. The pass then stops as soon as one more full batch would
/// exceed the dataset size, so up to one batch of trailing examples is
/// skipped. In `Mode::Eval` only forward and loss run, over the entire source.
///
/// # Errors
/// - `Config` for a training pass without an optimizer
/// - `BatchShape` for a batch whose inputs and targets disagree
/// - `EmptyPass` / `EmptyDataset` when nothing could be averaged
/// - whatever the criterion reports
pub fn run_pass<M, D, C>(
    model: &mut M,
    data: &mut D,
    criterion: &C,
    optimizer: Option<&mut dyn Optimizer>,
    mode: Mode,
) -> Result<PassOutcome>
where
    M: Classifier + ?Sized,
    D: DataSource<Input = M::Input> + ?Sized,
    C: Criterion + ?Sized,
{
    let mut optimizer = match (mode, optimizer) {
        (Mode::Train, None) => {
            return Err(HarnessError::Config("a training pass needs an optimizer".into()))
        }
        (Mode::Train, opt) => opt,
        (Mode::Eval, _) => None,
    };

    model.set_mode(mode);
    let dataset_len = data.dataset_len();
    let batch_size = data.batch_size();
    let mut stats = RunningStats::new(dataset_len);
    let mut step = 0usize;

    for batch in data.batches() {
        if batch.inputs.len() != batch.targets.len() {
            return Err(HarnessError::BatchShape {
                inputs: batch.inputs.len(),
                targets: batch.targets.len(),
            });
        }

        if let Some(opt) = optimizer.as_mut() {
            opt.zero_grad(&mut model.parameters_mut());
        }

        let scores = model.forward(&batch.inputs);
        let preds: Vec<usize> = scores.iter().map(|s| argmax(s)).collect();
        let loss = criterion.compute(&scores, &batch.targets)?;

        if let Some(opt) = optimizer.as_mut() {
            model.backward(&loss.grad);
            let mut params = model.parameters_mut();
            clip_grad_value(&mut params, GRAD_CLIP_VALUE);
            opt.step(&mut params);
        }

        stats.update(loss.value, &preds, &batch.targets);
        step += 1;

        if mode == Mode::Train {
            if step % DIAGNOSTIC_EVERY == 0 {
                log_running(&stats);
            }
            if stats.count() + batch_size > dataset_len {
                break;
            }
        }
    }

    let outcome = PassOutcome {
        loss: stats.mean_loss()?,
        accuracy: stats.accuracy()?,
        correct: stats.correct(),
        example_count: stats.count(),
    };
    let label = match mode {
        Mode::Train => "Train",
        Mode::Eval => "Validation",
    };
    info!(
        "{} Loss: {:.4} Acc: {:2.3} ({}/{})",
        label, outcome.loss, outcome.accuracy, outcome.correct, outcome.example_count
    );
    Ok(outcome)
}

/// One training pass; see `run_pass`.
pub fn train_epoch<M, D, C>(
    model: &mut M,
    data: &mut D,
    criterion: &C,
    optimizer: &mut dyn Optimizer,
) -> Result<PassOutcome>
where
    M: Classifier + ?Sized,
    D: DataSource<Input = M::Input> + ?Sized,
    C: Criterion + ?Sized,
{
    run_pass(model, data, criterion, Some(optimizer), Mode::Train)
}

/// One evaluation pass over the whole source; see `run_pass`.
pub fn validate<M, D, C>(model: &mut M, data: &mut D, criterion: &C) -> Result<PassOutcome>
where
    M: Classifier + ?Sized,
    D: DataSource<Input = M::Input> + ?Sized,
    C: Criterion + ?Sized,
{
    run_pass(model, data, criterion, None, Mode::Eval)
}

fn log_running(stats: &RunningStats) {
    let mean = stats.loss_sum() / stats.count() as f64;
    info!(
        "running loss: {}, running_corrects: {}, example_count: {}, acc: {}",
        mean,
        stats.correct(),
        stats.count(),
        stats.running_accuracy()
    );
    info!("confusion matrix:\n{}", stats.confusion_matrix());
    info!("macro-F1={:4.4}", stats.macro_f1());
}
