use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::error::{HarnessError, Result};
use crate::layers::dense::Layer;
use crate::math::matrix::Matrix;
use crate::model::{Classifier, Mode, Parameter, StateDict};
use crate::network::spec::NetworkSpec;

/// Multi-layer perceptron classifier over dense feature vectors.
pub struct Network {
    pub layers: Vec<Layer>,
    dropout: f64,
    mode: Mode,
    rng: StdRng,
    // Dropout masks of the last training-mode forward, one slot per layer.
    masks: Vec<Option<Matrix>>,
}

impl Network {
    /// Builds a network from a validated spec; `seed` drives weight init and dropout.
    pub fn from_spec(spec: &NetworkSpec, seed: u64) -> Result<Network> {
        spec.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let layers = spec.layers.iter()
            .map(|l| Layer::new(l.size, l.input_size, l.activation.clone(), &mut rng))
            .collect();
        Ok(Network {
            layers,
            dropout: spec.dropout,
            mode: Mode::Train,
            rng,
            masks: Vec::new(),
        })
    }

    fn dropout_mask(&mut self, rows: usize, cols: usize) -> Matrix {
        let keep = 1.0 - self.dropout;
        let mut mask = Matrix::zeros(rows, cols);
        for row in &mut mask.data {
            for x in row.iter_mut() {
                if self.rng.gen::<f64>() < keep {
                    *x = 1.0 / keep;
                }
            }
        }
        mask
    }
}

fn weight_key(i: usize) -> String {
    format!("layers.{i}.weight")
}

fn bias_key(i: usize) -> String {
    format!("layers.{i}.bias")
}

impl Classifier for Network {
    type Input = Vec<f64>;

    fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    fn forward(&mut self, inputs: &[Vec<f64>]) -> Vec<Vec<f64>> {
        let mut current = Matrix::from_data(inputs.to_vec());
        let last = self.layers.len().saturating_sub(1);
        let use_dropout = self.mode == Mode::Train && self.dropout > 0.0;

        self.masks.clear();
        for i in 0..self.layers.len() {
            current = self.layers[i].feed_from(current);
            if use_dropout && i < last {
                let mask = self.dropout_mask(current.rows, current.cols);
                current = current.hadamard(&mask);
                self.masks.push(Some(mask));
            } else {
                self.masks.push(None);
            }
        }
        current.data
    }

    fn backward(&mut self, score_grads: &[Vec<f64>]) {
        let mut grad = Matrix::from_data(score_grads.to_vec());
        for i in (0..self.layers.len()).rev() {
            if let Some(Some(mask)) = self.masks.get(i) {
                grad = grad.hadamard(mask);
            }
            grad = self.layers[i].backward(&grad);
        }
    }

    fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
        let mut params = Vec::with_capacity(self.layers.len() * 2);
        for layer in &mut self.layers {
            params.push(&mut layer.weights);
            params.push(&mut layer.biases);
        }
        params
    }

    fn state_dict(&self) -> StateDict {
        let mut state = StateDict::new();
        for (i, layer) in self.layers.iter().enumerate() {
            state.insert(weight_key(i), layer.weights.value.clone());
            state.insert(bias_key(i), layer.biases.value.clone());
        }
        state
    }

    /// Replaces every parameter value. Nothing is modified unless the whole
    /// dict matches the architecture.
    fn load_state_dict(&mut self, state: &StateDict) -> Result<()> {
        let expected = self.layers.len() * 2;
        if state.len() != expected {
            return Err(HarnessError::StateDict(format!(
                "expected {expected} tensors, found {}", state.len()
            )));
        }
        for (i, layer) in self.layers.iter().enumerate() {
            for (key, param) in [(weight_key(i), &layer.weights), (bias_key(i), &layer.biases)] {
                match state.get(&key) {
                    None => return Err(HarnessError::StateDict(format!("missing '{key}'"))),
                    Some(m) if !m.same_shape(&param.value) => {
                        return Err(HarnessError::StateDict(format!(
                            "'{key}' is {}x{}, model expects {}x{}",
                            m.rows, m.cols, param.value.rows, param.value.cols
                        )))
                    }
                    Some(_) => {}
                }
            }
        }
        for (i, layer) in self.layers.iter_mut().enumerate() {
            layer.weights.value = state[&weight_key(i)].clone();
            layer.biases.value = state[&bias_key(i)].clone();
        }
        Ok(())
    }
}
