//! Batch gradient-descent trainer for linear models.
//!
//! Each iteration runs over the full observation set:
//!
//! 1. predictions `ŷ = X · w` (forward pass)
//! 2. residuals `r = y − ŷ`
//! 3. gradients `g_j = −mean_i(r_i · x_ij)`; the intercept column is all ones,
//!    so its gradient is the negative mean residual (backward pass)
//! 4. `w_j −= learning_rate · g_j` for every `j` at once, all from the same
//!    pre-update `w`
//!
//! The loop runs exactly `num_iterations` times. There is no early stopping and no
//! divergence detection: too large a learning rate yields infinite or NaN
//! coefficients, which are returned without error.
//!
//! # Example
//!
//! ```rust
//! use linreg_gd::data::{generate, GeneratorConfig};
//! use linreg_gd::trainer::{train, TrainConfig};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut rng = StdRng::seed_from_u64(1);
//! let obs = generate(&[6.0, 2.0], 5, &GeneratorConfig::default(), &mut rng).unwrap();
//! let report = train(&obs, &TrainConfig::simple(), &mut rng).unwrap();
//! assert!((report.coefficients[0] - 6.0).abs() < 1e-2);
//! assert!((report.coefficients[1] - 2.0).abs() < 1e-2);
//! ```

use rand::Rng;
use rand_distr::Distribution;

use crate::backend::Backend;
use crate::backprop;
use crate::data::{Observations, uniform};
use crate::error::{RegressionError, Result};
use crate::logger::{TrainingLogger, Verbosity};
use crate::optim::{GradientDescent, Minimizer, Sgd};
use crate::tensors::{Ten64, WithGrad};

// ============================================================================
// TrainConfig
// ============================================================================

/// Parameters for a training run.
///
/// Use struct construction with `..TrainConfig::simple()` (or `::multiple()`) for
/// convenient configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainConfig {
    /// Step size applied to the negative gradient.
    pub learning_rate: f64,

    /// Exact number of iterations to run.
    pub num_iterations: usize,

    /// Half-open range `[low, high)` the initial coefficients are drawn from.
    pub init_range: (f64, f64),

    /// Kernel backend; both produce identical results.
    pub backend: Backend,

    /// Record the MSE reached after every iteration in [`TrainReport::loss_history`].
    pub record_history: bool,

    // --- Logging ---
    pub verbosity: Verbosity,

    /// Iterations between loss lines at [`Verbosity::Debug`].
    pub log_every: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self::simple()
    }
}

impl TrainConfig {
    /// Defaults for one feature plus intercept: rate `0.1`, 5 000 iterations.
    #[must_use]
    pub const fn simple() -> Self {
        Self {
            learning_rate: 0.1,
            num_iterations: 5_000,
            init_range: (-1.0, 1.0),
            backend: Backend::Cpu,
            record_history: false,
            verbosity: Verbosity::Silent,
            log_every: 1_000,
        }
    }

    /// Defaults for several features plus intercept: rate `0.1`, 50 000 iterations.
    #[must_use]
    pub const fn multiple() -> Self {
        Self {
            num_iterations: 50_000,
            log_every: 10_000,
            ..Self::simple()
        }
    }

    /// # Errors
    /// Returns [`RegressionError::InvalidArgument`] for a non-positive or non-finite
    /// learning rate, zero iterations, or an empty or non-finite init range.
    pub fn validate(&self) -> Result<()> {
        Sgd::with_lr(self.learning_rate)?;
        if self.num_iterations == 0 {
            return Err(RegressionError::invalid("number of iterations must be at least 1"));
        }
        uniform(self.init_range, "init").map(|_| ())
    }

    fn logger(&self) -> TrainingLogger {
        TrainingLogger::new(self.verbosity, self.log_every)
    }
}

// ============================================================================
// TrainReport
// ============================================================================

/// The outcome of [`train`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrainReport {
    /// The randomly drawn starting coefficients.
    pub initial: Vec<f64>,
    /// The coefficients after the last iteration. May be non-finite if training diverged.
    pub coefficients: Vec<f64>,
    /// MSE after each iteration; empty unless `record_history` was set.
    pub loss_history: Vec<f64>,
    /// Number of iterations run.
    pub iterations: usize,
}

impl TrainReport {
    /// MSE after the last iteration, if recorded.
    #[must_use]
    pub fn final_loss(&self) -> Option<f64> {
        self.loss_history.last().copied()
    }
}

// ============================================================================
// Training
// ============================================================================

/// Draws one starting value per coefficient from `Uniform(range)`.
///
/// # Errors
/// Returns [`RegressionError::InvalidArgument`] for an empty or non-finite range.
pub fn init_coefficients<R: Rng + ?Sized>(
    num_coefficients: usize,
    range: (f64, f64),
    rng: &mut R,
) -> Result<Vec<f64>> {
    let dist = uniform(range, "init")?;
    Ok((0..num_coefficients).map(|_| dist.sample(rng)).collect())
}

/// Mean squared error of `coefficients` on `observations`.
///
/// # Panics
/// Panics if `coefficients` does not have one entry per design-matrix column.
#[must_use]
pub fn mean_squared_error(
    observations: &Observations,
    coefficients: &[f64],
    backend: Backend,
) -> f64 {
    let weights = Ten64::vector(coefficients.to_vec());
    let (pred, _) = backprop::linear(&weights, observations.inputs(), backend);
    let (loss, _) = backprop::mse_loss(&pred, observations.outputs(), backend);
    loss
}

/// Fits a linear model to `observations` by gradient descent.
///
/// The starting coefficients are drawn from `rng`; with a seeded generator two
/// runs with the same inputs produce bit-identical results.
///
/// # Errors
/// Returns [`RegressionError::InvalidArgument`] if `config` fails
/// [`TrainConfig::validate`]. Nothing is iterated in that case.
pub fn train<R: Rng + ?Sized>(
    observations: &Observations,
    config: &TrainConfig,
    rng: &mut R,
) -> Result<TrainReport> {
    config.validate()?;

    let initial = init_coefficients(observations.num_coefficients(), config.init_range, rng)?;

    let optimizer = Sgd::with_lr(config.learning_rate)?.on_backend(config.backend);
    let mut minimizer = GradientDescent::with_optimizer(optimizer, config.num_iterations)?
        .record_history(config.record_history)
        .with_logger(config.logger());

    let inputs = observations.inputs();
    let targets = observations.outputs();
    let backend = config.backend;
    let objective = |weights: &Ten64| {
        let (pred, linear_back) = backprop::linear(weights, inputs, backend);
        let (loss, loss_back) = backprop::mse_loss(&pred, targets, backend);
        let grad_pred = loss_back(1.0);
        (loss, linear_back(&grad_pred))
    };

    let fitted = minimizer.minimize(objective, WithGrad::new(Ten64::vector(initial.clone())))?;

    Ok(TrainReport {
        initial,
        coefficients: fitted.value.data,
        loss_history: minimizer.take_history(),
        iterations: config.num_iterations,
    })
}

/// [`train`] on raw tensors: `inputs: [n, k]`, `outputs: [n]`.
///
/// # Errors
/// Returns [`RegressionError::InvalidArgument`] for mismatched lengths, zero
/// observations, or an invalid `config`.
pub fn train_raw<R: Rng + ?Sized>(
    inputs: &Ten64,
    outputs: &Ten64,
    config: &TrainConfig,
    rng: &mut R,
) -> Result<TrainReport> {
    let observations = Observations::new(inputs.clone(), outputs.clone())?;
    train(&observations, config, rng)
}
