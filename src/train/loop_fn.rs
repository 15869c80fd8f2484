use std::time::{Duration, Instant};

use log::{debug, info};

use crate::checkpoint::{CheckpointState, Checkpointer};
use crate::data::DataSource;
use crate::error::Result;
use crate::loss::Criterion;
use crate::model::Classifier;
use crate::optim::{Optimizer, Scheduler};
use crate::summary::ScalarWriter;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;
use crate::train::trainer::{train_epoch, validate};

pub const SCALARS_FILE: &str = "all_scalars.json";

/// Training and validation sources for one run.
pub struct Loaders<D> {
    pub train: D,
    pub val: D,
}

/// What a finished run reports back.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainReport {
    /// Best validation accuracy seen, including the configured starting value.
    pub best_acc: f64,
    pub epochs_run: usize,
    /// True when the scheduler asked to stop before `num_epochs`.
    pub stopped_early: bool,
    pub history: Vec<EpochStats>,
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `model` over epochs `config.start_epoch..config.num_epochs`.
///
/// Each epoch runs a training pass and a validation pass, records the four
/// scalars, and writes a checkpoint (marked best when validation accuracy is
/// strictly above every earlier one). The scheduler is then advanced: with
/// the validation error `1 - acc/100` if it monitors a metric, without it
/// otherwise. Only the scheduler decides on early stopping.
///
/// On return the model holds the weights of the best epoch, not the last.
/// If no epoch beat `config.best_accuracy`, those are the weights the model
/// had when the call started.
///
/// # Errors
/// Any pass, checkpoint or scalar-export failure aborts the run immediately.
pub fn train_model<M, D, C>(
    model: &mut M,
    loaders: &mut Loaders<D>,
    criterion: &C,
    optimizer: &mut dyn Optimizer,
    scheduler: &mut dyn Scheduler,
    checkpointer: &mut dyn Checkpointer,
    config: &TrainConfig,
) -> Result<TrainReport>
where
    M: Classifier + ?Sized,
    D: DataSource<Input = M::Input>,
    C: Criterion + ?Sized,
{
    info!(
        "Training model for epochs {}..{} (best so far {:.3})",
        config.start_epoch, config.num_epochs, config.best_accuracy
    );
    let since = Instant::now();
    let scalars_path = config.save_dir.join(SCALARS_FILE);
    let mut writer = ScalarWriter::new();

    let mut best_model_wts = model.state_dict();
    let mut best_acc = config.best_accuracy;
    let mut history = Vec::new();
    let mut stopped_early = false;

    for epoch in config.start_epoch..config.num_epochs {
        info!("Epoch {}/{}", epoch, config.num_epochs - 1);
        let learning_rate = optimizer.learning_rate();

        // ── Train ──────────────────────────────────────────────────────────
        let train_begin = Instant::now();
        let train = train_epoch(model, &mut loaders.train, criterion, optimizer)?;
        let train_time = train_begin.elapsed();
        info!("Epoch Train Time: {}", format_elapsed(train_time));
        writer.add_scalar("Train Loss", train.loss, epoch);
        writer.add_scalar("Train Accuracy", train.accuracy, epoch);

        // ── Validate ───────────────────────────────────────────────────────
        let val_begin = Instant::now();
        let val = validate(model, &mut loaders.val, criterion)?;
        let val_time = val_begin.elapsed();
        info!("Epoch Validation Time: {}", format_elapsed(val_time));
        writer.add_scalar("Validation Loss", val.loss, epoch);
        writer.add_scalar("Validation Accuracy", val.accuracy, epoch);

        // ── Best snapshot + checkpoint ─────────────────────────────────────
        let is_best = val.accuracy > best_acc;
        if is_best {
            best_acc = val.accuracy;
            best_model_wts = model.state_dict();
        }

        checkpointer.save(
            &CheckpointState { epoch, best_acc, state_dict: model.state_dict() },
            is_best,
        )?;
        writer.export_json(&scalars_path)?;

        let stats = EpochStats {
            epoch,
            total_epochs: config.num_epochs,
            train_loss: train.loss,
            train_accuracy: train.accuracy,
            val_loss: val.loss,
            val_accuracy: val.accuracy,
            is_best,
            learning_rate,
            train_ms: train_time.as_millis() as u64,
            val_ms: val_time.as_millis() as u64,
        };
        if let Some(ref tx) = config.progress_tx {
            if tx.send(stats.clone()).is_err() {
                debug!("progress receiver dropped; epoch {epoch} not reported");
            }
        }
        history.push(stats);

        // ── Schedule ───────────────────────────────────────────────────────
        let valid_error = 1.0 - val.accuracy / 100.0;
        if scheduler.monitors_metric() {
            scheduler.advance(optimizer, Some(valid_error), epoch);
            if scheduler.should_stop() {
                info!(
                    "Stop training as no improvement in accuracy at epoch {} (validation error {:.4}): {}",
                    epoch,
                    valid_error,
                    scheduler.stop_reason().unwrap_or_else(|| "scheduler requested stop".into())
                );
                stopped_early = true;
                break;
            }
        } else {
            scheduler.advance(optimizer, None, epoch);
        }
    }

    info!("Training complete in {}", format_elapsed(since.elapsed()));
    info!("Best val Acc: {:.4}", best_acc);

    model.load_state_dict(&best_model_wts)?;
    writer.export_json(&scalars_path)?;

    Ok(TrainReport {
        best_acc,
        epochs_run: history.len(),
        stopped_early,
        history,
    })
}

/// Formats a duration as `"{minutes}m {seconds}s"`.
pub(crate) fn format_elapsed(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}m {}s", secs / 60, secs % 60)
}
