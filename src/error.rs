use std::path::PathBuf;

use thiserror::Error;

/// Every failure the harness can report.
///
/// Nothing is retried: an error aborts the pass (or the whole run) and is
/// handed back to the caller through `?`.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A pass finished without processing a single example, so no mean loss exists.
    #[error("pass processed no examples")]
    EmptyPass,

    /// Accuracy is taken over the dataset size, which must be non-zero.
    #[error("dataset is empty")]
    EmptyDataset,

    #[error("batch has {inputs} inputs but {targets} targets")]
    BatchShape { inputs: usize, targets: usize },

    #[error("target label {label} is outside the {classes} scored classes")]
    LabelOutOfRange { label: usize, classes: usize },

    #[error("state dict mismatch: {0}")]
    StateDict(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl HarnessError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HarnessError::Io { path: path.into(), source }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        HarnessError::Json { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;
