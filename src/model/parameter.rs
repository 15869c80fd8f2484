use crate::math::matrix::Matrix;

/// A trainable tensor and the gradient accumulated for it since the last
/// `zero_grad`. `grad` is `None` until a backward pass touches the parameter.
#[derive(Debug, Clone)]
pub struct Parameter {
    pub value: Matrix,
    pub grad: Option<Matrix>,
}

impl Parameter {
    pub fn new(value: Matrix) -> Parameter {
        Parameter { value, grad: None }
    }

    pub fn accumulate_grad(&mut self, grad: Matrix) {
        self.grad = Some(match self.grad.take() {
            Some(acc) => acc + grad,
            None => grad,
        });
    }

    pub fn zero_grad(&mut self) {
        self.grad = None;
    }
}
