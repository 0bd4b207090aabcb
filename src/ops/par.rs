//! Parallel CPU backend tensor operations
//!
//! # Rayon Backend
//!
//! Same kernels as [`cpu`](super::cpu), spread over the rayon thread pool:
//!
//! - `linear` computes one prediction per row in parallel, and one weight
//!   gradient per column in parallel on the way back
//! - `mse_loss` squares and differentiates elementwise in parallel
//! - `sgd` updates parameters elementwise in parallel
//!
//! ## Determinism
//!
//! Parallelism is only ever *across* independent outputs. Each individual sum
//! is still folded sequentially in observation order, so results are
//! bit-identical to the sequential backend regardless of scheduling.

use rayon::prelude::*;

use super::dispatch::{FnF64Ten64, FnTen64To};
use super::{check, column_dot, dot};
use crate::tensors::{Ten64, Tensor, WithGrad};

/// Parallel `X · w`; see [`cpu::linear`](super::cpu::linear).
///
/// # Panics
/// - If `inputs` is not 2-D, has no columns, or `weights` is not `[k]`.
/// - (backward) If the upstream gradient is not `[n]`.
pub fn linear<'a>(weights: &Ten64, inputs: &'a Ten64) -> (Ten64, Box<FnTen64To<'a>>) {
    let (n, k) = check::linear(weights, inputs);

    let out: Vec<f64> = inputs
        .data
        .par_chunks(k)
        .map(|row| dot(row, &weights.data))
        .collect();

    let back = move |grad: &Ten64| {
        assert_eq!(grad.shape, [n], "upstream gradient shape mismatch");
        let dw: Vec<f64> = (0..k)
            .into_par_iter()
            .map(|j| column_dot(inputs, &grad.data, j))
            .collect();
        Tensor::new(vec![k], dw)
    };

    (Tensor::new(vec![n], out), Box::new(back))
}

/// Parallel mean squared error; see [`cpu::mse_loss`](super::cpu::mse_loss).
///
/// # Panics
/// Panics if shapes of `prediction` and `target` differ.
pub fn mse_loss<'a>(prediction: &'a Ten64, target: &'a Ten64) -> (f64, Box<FnF64Ten64<'a>>) {
    check::same_shape(prediction, target);
    let n = prediction.data.len() as f64;

    let squares: Vec<f64> = prediction
        .data
        .par_iter()
        .zip(&target.data)
        .map(|(&y, &t)| (t - y).powi(2))
        .collect();
    // sequential fold keeps the sum identical to the cpu backend
    let loss = squares.iter().sum::<f64>() / n;

    let back = move |grad_output: f64| {
        let grad: Vec<f64> = prediction
            .data
            .par_iter()
            .zip(&target.data)
            .map(|(&y, &t)| -(t - y) * grad_output / n)
            .collect();
        Tensor::new(prediction.shape.clone(), grad)
    };

    (loss, Box::new(back))
}

/// Parallel in-place gradient descent step; see [`cpu::sgd`](super::cpu::sgd).
pub fn sgd(w: &mut WithGrad<Ten64>, lr: f64) {
    assert_eq!(w.value.shape, w.grad.shape, "value/gradient shape mismatch");
    w.value
        .data
        .par_iter_mut()
        .zip(w.grad.data.par_iter_mut())
        .for_each(|(param, grad)| {
            *param -= lr * *grad;
            *grad = 0.0;
        });
}
