use std::fmt;

use serde::Serialize;

/// The fixed label set every pass is scored against.
pub const LABELS: [usize; 3] = [0, 1, 2];
pub const NUM_CLASSES: usize = LABELS.len();

/// Counts of (true label, predicted label) pairs. Rows are true labels,
/// columns predicted labels; always 3×3 whatever labels a pass saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ConfusionMatrix {
    pub counts: [[usize; NUM_CLASSES]; NUM_CLASSES],
}

impl ConfusionMatrix {
    /// Pairs where either label falls outside `LABELS` are not counted.
    pub fn from_pairs(targets: &[usize], preds: &[usize]) -> ConfusionMatrix {
        let mut counts = [[0usize; NUM_CLASSES]; NUM_CLASSES];
        for (&t, &p) in targets.iter().zip(preds.iter()) {
            if t < NUM_CLASSES && p < NUM_CLASSES {
                counts[t][p] += 1;
            }
        }
        ConfusionMatrix { counts }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// F1 of one label: 2·tp / (2·tp + fp + fn), or 0 when the label never
    /// appears as either a target or a prediction.
    pub fn f1(&self, label: usize) -> f64 {
        let tp = self.counts[label][label];
        let fp: usize = (0..NUM_CLASSES).map(|r| self.counts[r][label]).sum::<usize>() - tp;
        let fn_: usize = self.counts[label].iter().sum::<usize>() - tp;
        let denom = 2 * tp + fp + fn_;
        if denom == 0 {
            0.0
        } else {
            (2 * tp) as f64 / denom as f64
        }
    }

    /// Unweighted mean of the per-label F1 scores.
    pub fn macro_f1(&self) -> f64 {
        LABELS.iter().map(|&l| self.f1(l)).sum::<f64>() / NUM_CLASSES as f64
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.counts.iter().enumerate() {
            let cells: Vec<String> = row.iter().map(|c| format!("{c:>6}")).collect();
            write!(f, "[{}]", cells.join(""))?;
            if i + 1 < NUM_CLASSES {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
