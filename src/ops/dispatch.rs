//! Operation Dispatch Layer
//!
//! This module selects the backend for each differentiable operation from the
//! [`Backend`] value the caller passes in.
//!
//! # Example
//! ```rust
//! use linreg_gd::backend::Backend;
//! use linreg_gd::ops::dispatch;
//! use linreg_gd::tensor;
//!
//! let w = tensor!([2.0, 3.0]);
//! let x = tensor!([[1.0, 1.0], [1.0, 2.0]]);
//! let (pred, back) = dispatch::linear(&w, &x, Backend::Cpu);
//! let grad_w = back(&tensor!([1.0, 1.0]));
//! assert_eq!(pred.data, vec![5.0, 8.0]);
//! assert_eq!(grad_w.data, vec![2.0, 3.0]);
//! ```

use crate::backend::Backend;
use crate::tensors::{Ten64, WithGrad};

pub type FnF64Ten64<'a> = dyn Fn(f64) -> Ten64 + 'a;
pub type FnTen64To<'a> = dyn Fn(&Ten64) -> Ten64 + 'a;

/// Dispatches the linear forward pass to the selected backend.
///
/// # Returns
/// - `Tensor`: predictions (`[n]`)
/// - `Fn`: closure computing `∂L/∂w` from `∂L/∂pred`
pub fn linear<'a>(
    weights: &Ten64,
    inputs: &'a Ten64,
    backend: Backend,
) -> (Ten64, Box<FnTen64To<'a>>) {
    match backend {
        Backend::Cpu => super::cpu::linear(weights, inputs),
        Backend::Rayon => super::par::linear(weights, inputs),
    }
}

/// Dispatches MSE loss calculation to the selected backend.
///
/// # Returns
/// - Scalar loss value
/// - Closure that maps `dL/dloss` into gradient tensor shape
pub fn mse_loss<'a>(
    prediction: &'a Ten64,
    target: &'a Ten64,
    backend: Backend,
) -> (f64, Box<FnF64Ten64<'a>>) {
    match backend {
        Backend::Cpu => super::cpu::mse_loss(prediction, target),
        Backend::Rayon => super::par::mse_loss(prediction, target),
    }
}

/// Dispatches the gradient descent update to the selected backend.
pub fn sgd(w: &mut WithGrad<Ten64>, lr: f64, backend: Backend) {
    match backend {
        Backend::Cpu => super::cpu::sgd(w, lr),
        Backend::Rayon => super::par::sgd(w, lr),
    }
}
