//! linreg_gd: linear regression by hand-derived gradient descent.
//!
//! Fits simple (`y = b0 + b1·x`) and multiple (`y = b0 + Σ bj·xj`) linear models by
//! batch gradient descent on the mean squared error, using explicit forward and
//! backward passes rather than automatic differentiation. A seeded generator
//! produces noiseless synthetic data from chosen true coefficients, so training
//! can be checked against the ground truth.
//!
//! # Features
//!
//! - Row-major tensors with gradient wrappers.
//! - Linear forward pass, MSE loss and gradient descent update with backward closures.
//! - Sequential and rayon-parallel kernels with bit-identical results.
//! - A pluggable [`optim::Minimizer`] interface behind the trainer.
//! - Explicit random sources everywhere: no hidden global state.
//!
//! # Modules
//!
//! - [`tensors`] — Core tensor data structures.
//! - [`backprop`] — Differentiable operations.
//! - [`ops`] — Backend kernels and dispatch.
//! - [`backend`] — Compute backend selection.
//! - [`optim`] — Optimizers and the minimization interface.
//! - [`data`] — Observation sets and the synthetic data generator.
//! - [`trainer`] — The gradient-descent trainer.
//! - [`logger`] — Console progress reporting for training runs.
//! - [`report`] — Printing learned against true coefficients.
//! - [`approx`] — Graded approximate equality for coefficient vectors.
//! - [`error`] — The crate's error type.
//!
//! # Example
//!
//! ```rust
//! use linreg_gd::data::{generate, GeneratorConfig};
//! use linreg_gd::report::Comparison;
//! use linreg_gd::trainer::{train, TrainConfig};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let actual = [6.0, 2.0];
//! let mut rng = StdRng::seed_from_u64(42);
//! let obs = generate(&actual, 5, &GeneratorConfig::default(), &mut rng).unwrap();
//! let report = train(&obs, &TrainConfig::simple(), &mut rng).unwrap();
//! println!("{}", Comparison::new(&actual, &report.initial, &report.coefficients));
//! ```

pub mod approx;
pub mod backend;
pub mod backprop;
pub mod data;
pub mod error;
pub mod logger;
pub mod ops;
pub mod optim;
pub mod report;
pub mod tensors;
pub mod trainer;

pub use error::{ErrorKind, RegressionError, Result};
