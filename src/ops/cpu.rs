//! Sequential CPU backend
//!
//! # CPU Backend
//!
//! Plain-iterator implementations of the regression kernels. These are the
//! default when calling `backprop::xyz` with [`Backend::Cpu`](crate::backend::Backend).
//!
//! ## Implemented Ops
//!
//! - `linear`: Predictions `X · w` with the `Xᵀ · g` backward pass
//! - `mse_loss`: Mean squared error with its gradient closure
//! - `sgd`: In-place gradient descent step
//!
//! ## Design Goals
//!
//! - Deterministic results, bit-identical to the [`par`](super::par) backend
//! - No allocation beyond the output tensors

use super::dispatch::{FnF64Ten64, FnTen64To};
use super::{check, column_dot, dot};
use crate::tensors::{Ten64, Tensor, WithGrad};

/// Computes predictions `X · w` for a design matrix `X: [n, k]` and weights `w: [k]`,
/// returning the `[n]` prediction tensor and a closure for backpropagation.
///
/// # Returns
/// - Output tensor of shape `[n]`
/// - Backward function mapping `dL/d(pred)` (`[n]`) to `dL/d(w)` (`[k]`)
///
/// # Panics
/// - If `inputs` is not 2-D, has no columns, or `weights` is not `[k]`.
/// - (backward) If the upstream gradient is not `[n]`.
pub fn linear<'a>(weights: &Ten64, inputs: &'a Ten64) -> (Ten64, Box<FnTen64To<'a>>) {
    let (n, k) = check::linear(weights, inputs);

    let out: Vec<f64> = inputs
        .data
        .chunks(k)
        .map(|row| dot(row, &weights.data))
        .collect();

    let back = move |grad: &Ten64| {
        assert_eq!(grad.shape, [n], "upstream gradient shape mismatch");
        let dw: Vec<f64> = (0..k).map(|j| column_dot(inputs, &grad.data, j)).collect();
        Tensor::new(vec![k], dw)
    };

    (Tensor::new(vec![n], out), Box::new(back))
}

/// Computes the mean squared error between predictions and targets,
/// returning both the scalar loss and a gradient function.
///
/// # Formula
/// $$ L = \\frac{1}{n} \\sum_i (t_i - y_i)^2 $$
///
/// The backward closure differentiates `L / 2`, so for an upstream gradient `g`
/// it yields `-(t_i - y_i) * g / n`: the negative mean residual once pushed
/// through the design matrix.
///
/// # Panics
/// Panics if shapes of `prediction` and `target` differ.
pub fn mse_loss<'a>(prediction: &'a Ten64, target: &'a Ten64) -> (f64, Box<FnF64Ten64<'a>>) {
    check::same_shape(prediction, target);
    let n = prediction.data.len() as f64;

    let loss = prediction
        .data
        .iter()
        .zip(&target.data)
        .map(|(&y, &t)| (t - y).powi(2))
        .sum::<f64>()
        / n;

    let back = move |grad_output: f64| {
        let grad: Vec<f64> = prediction
            .data
            .iter()
            .zip(&target.data)
            .map(|(&y, &t)| -(t - y) * grad_output / n)
            .collect();
        Tensor::new(prediction.shape.clone(), grad)
    };

    (loss, Box::new(back))
}

/// Performs one step of gradient descent on the given parameter tensor.
///
/// # Formula
/// $$ w := w - \\text{lr} \\cdot \\frac{\\partial L}{\\partial w} $$
///
/// # Behavior
/// - Updates `w.value` in-place
/// - Zeros out `w.grad` after update (gradient reset step)
pub fn sgd(w: &mut WithGrad<Ten64>, lr: f64) {
    assert_eq!(w.value.shape, w.grad.shape, "value/gradient shape mismatch");
    for (param, grad) in w.value.data.iter_mut().zip(&w.grad.data) {
        *param -= lr * *grad;
    }
    for grad in &mut w.grad.data {
        *grad = 0.0;
    }
}
