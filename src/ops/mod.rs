//! # Operation Dispatch Layer
//!
//! This module defines the numeric kernels behind [`backprop`](crate::backprop) and
//! dispatches them across compute backends.
//!
//! ## Submodules
//!
//! - [`cpu`] — Sequential CPU kernels (default backend)
//! - [`par`] — Data-parallel CPU kernels built on `rayon`
//! - [`dispatch`] — Backend switching and unified operation interfaces
//!
//! ## Backend Selection
//!
//! The caller passes a [`Backend`](crate::backend::Backend) value explicitly; the
//! dispatch functions match on it and call into the right submodule.
//!
//! ```rust
//! use linreg_gd::backend::Backend;
//! use linreg_gd::backprop::linear;
//! use linreg_gd::tensor;
//!
//! let w = tensor!([1.0, 2.0]);
//! let x = tensor!([[1.0, 0.5], [1.0, 1.5]]);
//! let (pred, _back) = linear(&w, &x, Backend::Rayon);
//! assert_eq!(pred.data, vec![2.0, 4.0]);
//! ```
//!
//! ## Extending the Backend
//!
//! To add a new operation:
//!
//! 1. Implement it in every backend (`cpu::my_op`, `par::my_op`)
//! 2. Add it to the `dispatch` module for unified access
//! 3. Keep shape checks in the shared `check` helpers so all backends panic identically
//!
//! ## Notes
//!
//! - Operations return both forward values and backward closures
//! - Every reduction runs sequentially in observation order, on every backend

pub mod cpu;
pub mod dispatch;
pub mod par;

use crate::tensors::Ten64;

pub(crate) mod check {
    use crate::tensors::Ten64;

    /// Validates `weights: [k]` against `inputs: [n, k]` and returns `(n, k)`.
    pub(crate) fn linear(weights: &Ten64, inputs: &Ten64) -> (usize, usize) {
        assert_eq!(inputs.ndim(), 2, "inputs must be a 2-D design matrix");
        let (n, k) = (inputs.shape[0], inputs.shape[1]);
        assert!(k > 0, "design matrix has no columns");
        assert_eq!(weights.shape, [k], "weights/design matrix shape mismatch");
        (n, k)
    }

    pub(crate) fn same_shape(a: &Ten64, b: &Ten64) {
        assert_eq!(a.shape, b.shape, "prediction/target shape mismatch");
    }
}

/// Dot product of one design-matrix row with the weights.
#[inline]
pub(crate) fn dot(row: &[f64], weights: &[f64]) -> f64 {
    row.iter().zip(weights).map(|(&x, &w)| x * w).sum()
}

/// `Σ_i grad[i] * inputs[i, j]`, summed in row order.
#[inline]
pub(crate) fn column_dot(inputs: &Ten64, grad: &[f64], j: usize) -> f64 {
    let k = inputs.shape[1];
    grad.iter()
        .enumerate()
        .map(|(i, &g)| g * inputs.data[i * k + j])
        .sum()
}
