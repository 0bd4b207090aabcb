//! Differentiable operations for linear regression.
//!
//! # Backpropagation and Optimization Primitives
//!
//! Provides the three operations a gradient-descent step on a linear model needs.
//!
//! **Key Features:**
//! - **Linear forward pass:** predictions `X · w`, with a closure for
//!   `∂L/∂w = Xᵀ · ∂L/∂pred`.
//! - **Loss Computation (MSE):** Mean Squared Error with gradient generator.
//! - **Optimizer (SGD):** In-place parameter update with gradient reset.
//!
//! ## Autograd Pattern
//!
//! Each operation follows a simple pattern:
//! 1. **Inputs** are borrowed tensors.
//! 2. **Forward Pass** computes an output.
//! 3. **Backward Pass** returns a closure borrowing the inputs to compute gradients.
//! 4. **Gradient Application** stores the result in a `WithGrad` and calls [`sgd`].
//!
//! Chaining `linear → mse_loss` and calling the closures in reverse order gives,
//! for every coefficient `j`, `-mean_i(residual_i * x_ij)`. For the constant-1
//! intercept column that is the negative mean residual.
//!
//! ## Usage Guidelines
//!
//! - Operations **panic** on shape mismatches; validate caller data first (the
//!   [`data`](crate::data) and [`trainer`](crate::trainer) modules do).
//! - The backward closures implement `Fn`, allowing multiple invocations if needed.

use crate::backend::Backend;
use crate::ops::dispatch::{self, FnF64Ten64, FnTen64To};
use crate::tensors::{Ten64, WithGrad};

/// Computes predictions `X · w` for `inputs: [n, k]` and `weights: [k]`.
///
/// # Returns
/// - `out`: predictions, shape `[n]`.
/// - `back`: closure that given `dL/d(out)` returns `dL/d(weights)`.
///
/// # Example
/// ```rust
/// use linreg_gd::backend::Backend;
/// use linreg_gd::backprop::linear;
/// use linreg_gd::tensor;
///
/// let w = tensor!([2.0, 3.0]);
/// let x = tensor!([[1.0, 1.0], [1.0, 2.0], [1.0, -1.0]]);
/// let (pred, back) = linear(&w, &x, Backend::Cpu);
/// assert_eq!(pred.data, vec![5.0, 8.0, -1.0]);
/// assert_eq!(back(&tensor!([1.0, 1.0, 1.0])).data, vec![3.0, 2.0]);
/// ```
///
/// # Panics
/// Panics if `inputs` is not 2-D or `weights` does not have one entry per column.
pub fn linear<'a>(
    weights: &Ten64,
    inputs: &'a Ten64,
    backend: Backend,
) -> (Ten64, Box<FnTen64To<'a>>) {
    dispatch::linear(weights, inputs, backend)
}

/// Computes Mean Squared Error (MSE) loss: `mean((target - prediction)^2)`.
///
/// # Returns
/// - Scalar loss value
/// - Closure that maps `dL/dloss` into a gradient of shape `prediction`. The
///   closure differentiates half the MSE, so it returns `-residual / n`.
///
/// # Panics
/// Panics if shapes of `prediction` and `target` differ.
pub fn mse_loss<'a>(
    prediction: &'a Ten64,
    target: &'a Ten64,
    backend: Backend,
) -> (f64, Box<FnF64Ten64<'a>>) {
    dispatch::mse_loss(prediction, target, backend)
}

/// Performs an in-place gradient descent update.
///
/// Applies: `param = param - learning_rate * gradient` and then zeros gradient.
///
/// # Example
/// ```rust
/// use linreg_gd::backend::Backend;
/// use linreg_gd::backprop::sgd;
/// use linreg_gd::tensors::WithGrad;
/// use linreg_gd::tensor;
///
/// let mut w = WithGrad { value: tensor!([1.0, 2.0]), grad: tensor!([0.5, -1.0]) };
/// sgd(&mut w, 0.5, Backend::Cpu);
/// assert_eq!(w.value.data, vec![0.75, 2.5]);
/// assert_eq!(w.grad.data, vec![0.0, 0.0]);
/// ```
pub fn sgd(w: &mut WithGrad<Ten64>, lr: f64, backend: Backend) {
    dispatch::sgd(w, lr, backend)
}
