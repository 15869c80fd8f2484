use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};
use crate::model::StateDict;

pub const CHECKPOINT_FILE: &str = "checkpoint.pth.tar";
pub const BEST_FILE: &str = "model_best.pth.tar";

/// Everything needed to resume a run: where it was, the best validation
/// accuracy reached so far, and the weights at the end of `epoch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointState {
    pub epoch: usize,
    pub best_acc: f64,
    pub state_dict: StateDict,
}

/// Destination for per-epoch checkpoints.
pub trait Checkpointer {
    /// Persists `state` as the latest checkpoint, and as the best one too
    /// when `is_best` is set.
    fn save(&mut self, state: &CheckpointState, is_best: bool) -> Result<()>;
}

/// Keeps `checkpoint.pth.tar` (latest) and `model_best.pth.tar` (best) in one
/// directory. Each save overwrites; nothing older is kept.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Creates the directory (and its parents) if missing.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| HarnessError::io(&dir, e))?;
        Ok(Self { dir })
    }

    pub fn latest_path(&self) -> PathBuf {
        self.dir.join(CHECKPOINT_FILE)
    }

    pub fn best_path(&self) -> PathBuf {
        self.dir.join(BEST_FILE)
    }

    /// Reads a checkpoint written by `save`.
    pub fn load(path: impl AsRef<Path>) -> Result<CheckpointState> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| HarnessError::io(path, e))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| HarnessError::json(path, e))
    }
}

impl Checkpointer for CheckpointManager {
    fn save(&mut self, state: &CheckpointState, is_best: bool) -> Result<()> {
        let path = self.latest_path();
        let file = File::create(&path).map_err(|e| HarnessError::io(&path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, state).map_err(|e| HarnessError::json(&path, e))?;
        writer.flush().map_err(|e| HarnessError::io(&path, e))?;
        debug!("Saved checkpoint for epoch {} to '{}'", state.epoch, path.display());

        if is_best {
            let best = self.best_path();
            fs::copy(&path, &best).map_err(|e| HarnessError::io(&best, e))?;
            debug!("Copied epoch {} checkpoint to '{}'", state.epoch, best.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::matrix::Matrix;

    fn state(epoch: usize, best_acc: f64) -> CheckpointState {
        let mut state_dict = StateDict::new();
        state_dict.insert("layers.0.weight".into(), Matrix::filled(2, 2, epoch as f64));
        CheckpointState { epoch, best_acc, state_dict }
    }

    #[test]
    fn best_copy_only_written_when_flagged() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = CheckpointManager::new(dir.path().join("run")).unwrap();

        manager.save(&state(0, 40.0), false).unwrap();
        assert!(manager.latest_path().exists());
        assert!(!manager.best_path().exists());

        manager.save(&state(1, 55.0), true).unwrap();
        manager.save(&state(2, 55.0), false).unwrap();

        let latest = CheckpointManager::load(manager.latest_path()).unwrap();
        let best = CheckpointManager::load(manager.best_path()).unwrap();
        assert_eq!(latest.epoch, 2);
        assert_eq!(best, state(1, 55.0));
    }

    #[test]
    fn unwritable_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        assert!(matches!(CheckpointManager::new(blocker.join("sub")), Err(HarnessError::Io { .. })));
    }
}
