use rand::Rng;

use crate::{math::matrix::Matrix, activation::activation::ActivationFunction, model::Parameter};

#[derive(Debug, Clone)]
pub struct Layer {
    pub size: usize,
    /// Shape `(input_size, size)`.
    pub weights: Parameter,
    /// Shape `(1, size)`.
    pub biases: Parameter,
    pub activator: ActivationFunction,
    input: Matrix,        // batch fed to the last forward, needed for ∂L/∂W
    pre_neurons: Matrix,  // pre-activation values (z = XW + b) needed for correct derivative
}

impl Layer {
    pub fn new<R: Rng + ?Sized>(
        size: usize,
        input_size: usize,
        activation: ActivationFunction,
        rng: &mut R,
    ) -> Layer {
        let weights = if activation.prefers_he_init() {
            Matrix::he(input_size, size, rng)
        } else {
            Matrix::xavier(input_size, size, rng)
        };

        Layer {
            size,
            weights: Parameter::new(weights),
            biases: Parameter::new(Matrix::zeros(1, size)),
            activator: activation,
            input: Matrix::default(),
            pre_neurons: Matrix::default(),
        }
    }

    /// Forward pass over a `batch × input_size` matrix; caches what backprop needs.
    pub fn feed_from(&mut self, input: Matrix) -> Matrix {
        let z = (input.clone() * self.weights.value.clone()).add_row(&self.biases.value);
        let a = z.map(|x| self.activator.function(x));
        self.input = input;
        self.pre_neurons = z;
        a
    }

    /// Accumulates ∂L/∂W and ∂L/∂b for the cached batch and returns ∂L/∂input.
    ///
    /// `output_grad` is ∂L/∂a for this layer (error in activation space).
    pub fn backward(&mut self, output_grad: &Matrix) -> Matrix {
        // Use pre-activation z so that derivative(z) = σ'(z) is computed correctly
        let act_derivative = self.pre_neurons.map(|x| self.activator.derivative(x));
        // δ = error ⊙ σ'(z)
        let delta = output_grad.hadamard(&act_derivative);

        let input_grad = delta.clone() * self.weights.value.transpose();

        self.weights.accumulate_grad(self.input.transpose() * delta.clone());
        self.biases.accumulate_grad(delta.sum_rows());

        input_grad
    }
}
