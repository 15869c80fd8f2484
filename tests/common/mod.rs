#![allow(dead_code)]

use ferrite_harness::{
    CheckpointState, Checkpointer, Classifier, DataLoader, Dataset, Matrix, Mode, Optimizer,
    Parameter, Result, StateDict,
};

// ---------------------------------------------------------------------------
// Scripted classifier
// ---------------------------------------------------------------------------

/// A classifier whose input *is* the target label, so its accuracy can be
/// dictated exactly.
///
/// - training passes always predict the target
/// - eval pass `k` (0-based) predicts the target for the first `script[k]`
///   examples and a wrong label afterwards
/// - parameter `w` holds the number of training passes started, so a
///   restored state dict tells which epoch it came from
/// - `backward` writes gradients of ±5 so clipping is observable
pub struct ScriptedModel {
    pub script: Vec<usize>,
    pub mode: Mode,
    pub train_passes: usize,
    pub eval_passes: usize,
    pub backward_calls: usize,
    seen_this_pass: usize,
    w: Parameter,
    b: Parameter,
}

impl ScriptedModel {
    pub fn new(script: Vec<usize>) -> Self {
        ScriptedModel {
            script,
            mode: Mode::Train,
            train_passes: 0,
            eval_passes: 0,
            backward_calls: 0,
            seen_this_pass: 0,
            w: Parameter::new(Matrix::zeros(1, 1)),
            b: Parameter::new(Matrix::zeros(1, 1)),
        }
    }

    pub fn w(&self) -> f64 {
        self.w.value.data[0][0]
    }

    fn predict(&self, target: usize, position: usize) -> usize {
        match self.mode {
            Mode::Train => target,
            Mode::Eval => {
                let budget = self.script
                    .get(self.eval_passes.saturating_sub(1))
                    .copied()
                    .unwrap_or(0);
                if position < budget { target } else { (target + 1) % 3 }
            }
        }
    }
}

impl Classifier for ScriptedModel {
    type Input = usize;

    fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.seen_this_pass = 0;
        match mode {
            Mode::Train => {
                self.train_passes += 1;
                self.w.value = Matrix::filled(1, 1, self.train_passes as f64);
            }
            Mode::Eval => self.eval_passes += 1,
        }
    }

    fn forward(&mut self, inputs: &[usize]) -> Vec<Vec<f64>> {
        let scores: Vec<Vec<f64>> = inputs.iter()
            .enumerate()
            .map(|(i, &target)| {
                let mut s = vec![0.0; 3];
                s[self.predict(target, self.seen_this_pass + i)] = 2.0;
                s
            })
            .collect();
        self.seen_this_pass += inputs.len();
        scores
    }

    fn backward(&mut self, _score_grads: &[Vec<f64>]) {
        self.backward_calls += 1;
        self.w.accumulate_grad(Matrix::filled(1, 1, 5.0));
        self.b.accumulate_grad(Matrix::filled(1, 1, -5.0));
    }

    fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
        vec![&mut self.w, &mut self.b]
    }

    fn state_dict(&self) -> StateDict {
        let mut state = StateDict::new();
        state.insert("w".into(), self.w.value.clone());
        state.insert("b".into(), self.b.value.clone());
        state
    }

    fn load_state_dict(&mut self, state: &StateDict) -> Result<()> {
        if let Some(w) = state.get("w") {
            self.w.value = w.clone();
        }
        if let Some(b) = state.get("b") {
            self.b.value = b.clone();
        }
        Ok(())
    }
}

/// `n` examples with labels cycling 0, 1, 2.
pub fn label_loader(n: usize, batch_size: usize) -> DataLoader<usize> {
    let targets: Vec<usize> = (0..n).map(|i| i % 3).collect();
    let dataset = Dataset::new(targets.clone(), targets).unwrap();
    DataLoader::new(dataset, batch_size).unwrap()
}

// ---------------------------------------------------------------------------
// Recording collaborators
// ---------------------------------------------------------------------------

/// Optimizer that only records what it was asked to do.
#[derive(Default)]
pub struct RecordingOptimizer {
    pub lr: f64,
    pub zero_grads: usize,
    pub steps: usize,
    /// Every gradient value seen by `step`, after clipping.
    pub seen_grads: Vec<f64>,
}

impl Optimizer for RecordingOptimizer {
    fn zero_grad(&mut self, params: &mut [&mut Parameter]) {
        self.zero_grads += 1;
        for p in params.iter_mut() {
            p.zero_grad();
        }
    }

    fn step(&mut self, params: &mut [&mut Parameter]) {
        self.steps += 1;
        for p in params.iter() {
            if let Some(g) = &p.grad {
                self.seen_grads.extend(g.data.iter().flatten().copied());
            }
        }
    }

    fn learning_rate(&self) -> f64 {
        self.lr
    }

    fn set_learning_rate(&mut self, lr: f64) {
        self.lr = lr;
    }
}

/// Checkpointer that keeps every saved state in memory.
#[derive(Default)]
pub struct RecordingCheckpointer {
    pub saves: Vec<(CheckpointState, bool)>,
}

impl RecordingCheckpointer {
    pub fn best_flags(&self) -> Vec<bool> {
        self.saves.iter().map(|(_, best)| *best).collect()
    }
}

impl Checkpointer for RecordingCheckpointer {
    fn save(&mut self, state: &CheckpointState, is_best: bool) -> Result<()> {
        self.saves.push((state.clone(), is_best));
        Ok(())
    }
}
