use crate::{math::matrix::Matrix, model::Parameter, optim::optimizer::Optimizer};

/// Stochastic gradient descent with optional classical momentum.
pub struct Sgd {
    pub learning_rate: f64,
    pub momentum: f64,
    velocity: Vec<Option<Matrix>>,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate, momentum: 0.0, velocity: Vec::new() }
    }

    pub fn with_momentum(learning_rate: f64, momentum: f64) -> Sgd {
        Sgd { learning_rate, momentum, velocity: Vec::new() }
    }
}

impl Optimizer for Sgd {
    fn zero_grad(&mut self, params: &mut [&mut Parameter]) {
        for p in params.iter_mut() {
            p.zero_grad();
        }
    }

    /// Applies one update: v = μ·v + g, w -= lr·v (v = g when μ = 0).
    /// Parameters without a gradient are left alone.
    fn step(&mut self, params: &mut [&mut Parameter]) {
        if self.velocity.len() != params.len() {
            self.velocity = vec![None; params.len()];
        }
        let lr = self.learning_rate;
        let momentum = self.momentum;

        for (p, v) in params.iter_mut().zip(self.velocity.iter_mut()) {
            let Some(grad) = p.grad.clone() else { continue };
            let update = if momentum > 0.0 {
                let next = match v.take() {
                    Some(prev) => prev.map(|x| x * momentum) + grad,
                    None => grad,
                };
                *v = Some(next.clone());
                next
            } else {
                grad
            };
            p.value = p.value.clone() - update.map(|x| x * lr);
        }
    }

    fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    fn set_learning_rate(&mut self, lr: f64) {
        self.learning_rate = lr;
    }
}
