//! Gradient clipping

use crate::model::Parameter;

/// Fixed element-wise clipping bound used by the training pass.
pub const GRAD_CLIP_VALUE: f64 = 0.25;

/// Clamps every gradient element into `[-clip_value, clip_value]`.
///
/// Parameters without a gradient are skipped.
pub fn clip_grad_value(params: &mut [&mut Parameter], clip_value: f64) {
    for param in params.iter_mut() {
        if let Some(grad) = param.grad.as_mut() {
            grad.clamp_in_place(-clip_value, clip_value);
        }
    }
}
