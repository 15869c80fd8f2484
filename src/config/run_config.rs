use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};
use crate::network::spec::NetworkSpec;
use crate::optim::scheduler::{ConstantLr, ReduceLrOnPlateau, Scheduler, StepLr, ThresholdMode};

/// Which learning-rate schedule a run uses.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchedulerConfig {
    /// Reduce on plateau of the validation error, with early stopping.
    Plateau {
        #[serde(default = "default_factor")]
        factor: f64,
        #[serde(default = "default_patience")]
        patience: usize,
        #[serde(default = "default_threshold")]
        threshold: f64,
        #[serde(default)]
        threshold_mode: ThresholdMode,
        #[serde(default)]
        cooldown: usize,
        #[serde(default)]
        min_lr: f64,
        max_patience_to_stop: usize,
    },
    Step { step_size: usize, gamma: f64 },
    #[default]
    Constant,
}

fn default_factor() -> f64 { 0.1 }
fn default_patience() -> usize { 10 }
fn default_threshold() -> f64 { 1e-4 }
fn default_batch_size() -> usize { 32 }
fn default_true() -> bool { true }

impl SchedulerConfig {
    pub fn build(&self) -> Box<dyn Scheduler> {
        match *self {
            SchedulerConfig::Plateau {
                factor, patience, threshold, threshold_mode, cooldown, min_lr, max_patience_to_stop,
            } => Box::new(
                ReduceLrOnPlateau::new(factor, patience, max_patience_to_stop)
                    .with_threshold(threshold, threshold_mode)
                    .with_cooldown(cooldown)
                    .with_min_lr(min_lr),
            ),
            SchedulerConfig::Step { step_size, gamma } => Box::new(StepLr::new(step_size, gamma)),
            SchedulerConfig::Constant => Box::new(ConstantLr),
        }
    }
}

/// Everything the CLI needs for a train or test run, read from one JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub network: NetworkSpec,
    pub train_data: PathBuf,
    pub val_data: PathBuf,
    #[serde(default)]
    pub test_data: Option<PathBuf>,
    pub save_dir: PathBuf,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    pub num_epochs: usize,
    pub learning_rate: f64,
    #[serde(default)]
    pub momentum: f64,
    #[serde(default = "default_true")]
    pub shuffle: bool,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

impl RunConfig {
    /// Deserializes and validates a `RunConfig` from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<RunConfig> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| HarnessError::io(path, e))?;
        let config: RunConfig = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| HarnessError::json(path, e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.network.validate()?;
        if self.batch_size == 0 {
            return Err(HarnessError::Config("batch_size must be at least 1".into()));
        }
        if self.num_epochs == 0 {
            return Err(HarnessError::Config("num_epochs must be at least 1".into()));
        }
        if !(self.learning_rate > 0.0) {
            return Err(HarnessError::Config(format!(
                "learning_rate must be positive, got {}", self.learning_rate
            )));
        }
        if let SchedulerConfig::Plateau { factor, .. } = self.scheduler {
            if !(factor > 0.0 && factor < 1.0) {
                return Err(HarnessError::Config(format!(
                    "plateau factor must be in (0, 1), got {factor}"
                )));
            }
        }
        Ok(())
    }
}
