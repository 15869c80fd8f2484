use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::error::{HarnessError, Result};

/// One recorded value, serialised as `[wall_time, step, value]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScalarPoint(pub f64, pub usize, pub f64);

/// Named scalar time series (e.g. "Train Loss" per epoch), exportable to JSON.
#[derive(Debug, Default)]
pub struct ScalarWriter {
    series: BTreeMap<String, Vec<ScalarPoint>>,
}

impl ScalarWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_scalar(&mut self, tag: &str, value: f64, step: usize) {
        let wall_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        self.series.entry(tag.to_string()).or_default().push(ScalarPoint(wall_time, step, value));
    }

    pub fn series(&self, tag: &str) -> &[ScalarPoint] {
        self.series.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Overwrites `path` with every series as `{tag: [[wall_time, step, value], ...]}`.
    pub fn export_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| HarnessError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.series)
            .map_err(|e| HarnessError::json(path, e))?;
        writer.flush().map_err(|e| HarnessError::io(path, e))
    }
}
