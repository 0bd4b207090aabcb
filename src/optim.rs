//! Optimizers and the pluggable minimization interface.
//!
//! [`Optimizer`] applies one update to a parameter tensor whose gradient has been
//! filled in. [`Minimizer`] owns a whole run: it repeatedly asks an objective for
//! `(loss, gradient)` at the current parameters and updates them. The trainer only
//! talks to a `Minimizer`, so any other optimization backend can be slotted in by
//! implementing that trait.

use crate::backend::Backend;
use crate::backprop;
use crate::error::{RegressionError, Result};
use crate::logger::TrainingLogger;
use crate::tensors::{Ten64, WithGrad};

/// A single-step parameter update rule.
pub trait Optimizer {
    /// Updates `params.value` from `params.grad` and resets the gradient.
    fn step(&mut self, params: &mut WithGrad<Ten64>);
}

/// Plain gradient descent: `w -= lr * grad`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
    lr: f64,
    backend: Backend,
}

impl Sgd {
    /// # Errors
    /// Returns [`RegressionError::InvalidArgument`] unless `lr` is finite and positive.
    pub fn with_lr(lr: f64) -> Result<Self> {
        if !(lr.is_finite() && lr > 0.0) {
            return Err(RegressionError::invalid(format!(
                "learning rate must be finite and positive, got {lr}"
            )));
        }
        Ok(Self {
            lr,
            backend: Backend::default(),
        })
    }

    #[must_use]
    pub const fn on_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }
}

impl Optimizer for Sgd {
    fn step(&mut self, params: &mut WithGrad<Ten64>) {
        backprop::sgd(params, self.lr, self.backend);
    }
}

/// Minimizes an objective over a parameter tensor.
pub trait Minimizer {
    /// Runs the minimization starting from `parameters` and returns the result.
    ///
    /// `objective` maps the current parameter values to `(loss, gradient)`; the
    /// gradient must have the parameters' shape.
    ///
    /// # Errors
    /// Returns [`RegressionError::InvalidArgument`] if the objective returns a
    /// gradient of the wrong shape. No update is applied for that step.
    fn minimize<F>(
        &mut self,
        objective: F,
        parameters: WithGrad<Ten64>,
    ) -> Result<WithGrad<Ten64>>
    where
        F: FnMut(&Ten64) -> (f64, Ten64);
}

/// Fixed-length gradient descent.
///
/// Runs exactly `num_iterations` steps. There is no early stopping and no
/// divergence check: an unstable learning rate produces infinite or NaN
/// parameters, which are returned as they are.
#[derive(Debug, Clone)]
pub struct GradientDescent<O: Optimizer = Sgd> {
    optimizer: O,
    num_iterations: usize,
    record_history: bool,
    history: Vec<f64>,
    logger: TrainingLogger,
}

impl GradientDescent<Sgd> {
    /// Gradient descent with [`Sgd`] on the default backend.
    ///
    /// # Errors
    /// Returns [`RegressionError::InvalidArgument`] for a non-positive learning
    /// rate or zero iterations.
    pub fn new(learning_rate: f64, num_iterations: usize) -> Result<Self> {
        Self::with_optimizer(Sgd::with_lr(learning_rate)?, num_iterations)
    }
}

impl<O: Optimizer> GradientDescent<O> {
    /// # Errors
    /// Returns [`RegressionError::InvalidArgument`] if `num_iterations` is zero.
    pub fn with_optimizer(optimizer: O, num_iterations: usize) -> Result<Self> {
        if num_iterations == 0 {
            return Err(RegressionError::invalid("number of iterations must be at least 1"));
        }
        Ok(Self {
            optimizer,
            num_iterations,
            record_history: false,
            history: Vec::new(),
            logger: TrainingLogger::default(),
        })
    }

    /// Keep the loss reached after every iteration.
    #[must_use]
    pub fn record_history(mut self, record: bool) -> Self {
        self.record_history = record;
        self
    }

    #[must_use]
    pub fn with_logger(mut self, logger: TrainingLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Loss after each iteration of the last run; empty unless recording.
    #[must_use]
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    pub fn take_history(&mut self) -> Vec<f64> {
        std::mem::take(&mut self.history)
    }
}

impl<O: Optimizer> Minimizer for GradientDescent<O> {
    fn minimize<F>(
        &mut self,
        mut objective: F,
        mut parameters: WithGrad<Ten64>,
    ) -> Result<WithGrad<Ten64>>
    where
        F: FnMut(&Ten64) -> (f64, Ten64),
    {
        self.history.clear();
        if self.record_history {
            self.history.reserve(self.num_iterations);
        }
        self.logger.start(self.num_iterations, &parameters.value.data);

        for iteration in 0..self.num_iterations {
            let (loss, grad) = objective(&parameters.value);
            if grad.shape != parameters.value.shape {
                return Err(RegressionError::invalid(format!(
                    "objective returned a gradient of shape {:?} for parameters of shape {:?}",
                    grad.shape, parameters.value.shape
                )));
            }
            // the loss at this step's start is the loss the previous step reached
            if iteration > 0 && self.record_history {
                self.history.push(loss);
            }
            self.logger.iteration(iteration, loss);

            parameters.grad = grad;
            self.optimizer.step(&mut parameters);
        }

        if self.record_history || self.logger.enabled(crate::logger::Verbosity::Info) {
            let (loss, _) = objective(&parameters.value);
            if self.record_history {
                self.history.push(loss);
            }
            self.logger.finish(self.num_iterations, loss);
        }

        Ok(parameters)
    }
}
