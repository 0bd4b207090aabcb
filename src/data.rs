//! Observation sets and the synthetic data generator.
//!
//! An [`Observations`] value is an `n × k` design matrix plus `n` targets. The
//! generator fills one with rows drawn from a uniform distribution and targets
//! that are the *exact* dot product of each row with the true coefficients; no
//! noise is added, so a converged trainer recovers the coefficients.
//!
//! ```rust
//! use linreg_gd::data::{generate, GeneratorConfig};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let obs = generate(&[2.0, 8.0, 4.0, 4.0], 6, &GeneratorConfig::default(), &mut rng).unwrap();
//! assert_eq!(obs.num_observations(), 6);
//! assert_eq!(obs.num_coefficients(), 4);
//! assert_eq!(obs.row(0)[0], 1.0); // intercept column
//! ```

use rand::Rng;
use rand_distr::{Distribution, Uniform};

use crate::error::{RegressionError, Result};
use crate::ops::dot;
use crate::tensors::{Ten64, Tensor};

/// A design matrix and its aligned targets.
///
/// Row `i` of `inputs` belongs to `outputs[i]`. Once built an observation set is
/// never mutated; the trainer only borrows it.
#[derive(Debug, Clone, PartialEq)]
pub struct Observations {
    inputs: Ten64,
    outputs: Ten64,
}

impl Observations {
    /// Builds an observation set from caller data.
    ///
    /// `inputs` must be `[n, k]` and `outputs` `[n]`, with `n ≥ 1` and `k ≥ 1`.
    /// Include a column of ones in `inputs` to model an intercept.
    ///
    /// # Errors
    /// Returns [`RegressionError::InvalidArgument`] if the shapes do not line up
    /// or there are no observations or no columns.
    pub fn new(inputs: Ten64, outputs: Ten64) -> Result<Self> {
        if inputs.ndim() != 2 {
            return Err(RegressionError::invalid(format!(
                "inputs must be a 2-D design matrix, got shape {:?}",
                inputs.shape
            )));
        }
        if outputs.ndim() != 1 {
            return Err(RegressionError::invalid(format!(
                "outputs must be 1-D, got shape {:?}",
                outputs.shape
            )));
        }
        let (n, k) = (inputs.shape[0], inputs.shape[1]);
        if n == 0 {
            return Err(RegressionError::invalid("at least one observation is required"));
        }
        if k == 0 {
            return Err(RegressionError::invalid("design matrix has no columns"));
        }
        if outputs.shape[0] != n {
            return Err(RegressionError::invalid(format!(
                "{n} input rows but {} outputs",
                outputs.shape[0]
            )));
        }
        if inputs.data.len() != n * k || outputs.data.len() != n {
            return Err(RegressionError::invalid("tensor data does not match its shape"));
        }
        Ok(Self { inputs, outputs })
    }

    /// Builds an observation set from one feature vector per observation.
    ///
    /// # Errors
    /// Returns [`RegressionError::InvalidArgument`] for ragged rows or mismatched lengths.
    pub fn from_rows(rows: &[Vec<f64>], outputs: Vec<f64>) -> Result<Self> {
        let k = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != k) {
            return Err(RegressionError::invalid("rows have mismatched lengths"));
        }
        let data: Vec<f64> = rows.iter().flatten().copied().collect();
        Self::new(Tensor::try_new(vec![rows.len(), k], data)?, Ten64::vector(outputs))
    }

    #[must_use]
    pub fn num_observations(&self) -> usize {
        self.inputs.shape[0]
    }

    /// Number of design-matrix columns, which is the number of coefficients to learn.
    #[must_use]
    pub fn num_coefficients(&self) -> usize {
        self.inputs.shape[1]
    }

    /// The `[n, k]` design matrix.
    #[must_use]
    pub const fn inputs(&self) -> &Ten64 {
        &self.inputs
    }

    /// The `[n]` targets.
    #[must_use]
    pub const fn outputs(&self) -> &Ten64 {
        &self.outputs
    }

    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        self.inputs.row(i)
    }

    /// Observation `i` as `(features, target)`.
    ///
    /// # Panics
    /// Panics if `i` is out of bounds.
    #[must_use]
    pub fn get(&self, i: usize) -> (&[f64], f64) {
        (self.row(i), self.outputs.data[i])
    }

    /// Iterates over `(features, target)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&[f64], f64)> + '_ {
        (0..self.num_observations()).map(move |i| self.get(i))
    }
}

/// Settings for [`generate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorConfig {
    /// Half-open range `[low, high)` features are drawn from.
    pub feature_range: (f64, f64),
    /// Treat the first coefficient as an intercept and prepend a constant `1.0`
    /// to every row.
    pub intercept: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            feature_range: (-1.0, 1.0),
            intercept: true,
        }
    }
}

impl GeneratorConfig {
    /// # Errors
    /// Returns [`RegressionError::InvalidArgument`] for an empty or non-finite range.
    pub fn validate(&self) -> Result<()> {
        uniform(self.feature_range, "feature").map(|_| ())
    }
}

pub(crate) fn uniform((low, high): (f64, f64), what: &str) -> Result<Uniform<f64>> {
    Uniform::new(low, high)
        .map_err(|e| RegressionError::invalid(format!("{what} range [{low}, {high}): {e}")))
}

/// Generates `num_observations` noiseless observations of
/// `y = x · true_coefficients`.
///
/// With `config.intercept` set, each row is `[1, x_1, …, x_{k-1}]`; otherwise all
/// `k` features are drawn. Rows and targets keep draw order.
///
/// Callers should ask for at least `true_coefficients.len()` observations so the
/// problem is well posed. That is not checked: an under-determined set is still
/// generated.
///
/// # Errors
/// Returns [`RegressionError::InvalidArgument`] if `num_observations` is zero,
/// `true_coefficients` is empty, or the feature range is empty or non-finite.
pub fn generate<R: Rng + ?Sized>(
    true_coefficients: &[f64],
    num_observations: usize,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<Observations> {
    if num_observations == 0 {
        return Err(RegressionError::invalid("number of observations must be at least 1"));
    }
    if true_coefficients.is_empty() {
        return Err(RegressionError::invalid("at least one coefficient is required"));
    }
    let features = uniform(config.feature_range, "feature")?;

    let k = true_coefficients.len();
    let mut inputs = Vec::with_capacity(num_observations * k);
    let mut outputs = Vec::with_capacity(num_observations);

    for _ in 0..num_observations {
        let start = inputs.len();
        if config.intercept {
            inputs.push(1.0);
        }
        while inputs.len() - start < k {
            inputs.push(features.sample(rng));
        }
        outputs.push(dot(&inputs[start..], true_coefficients));
    }

    Observations::new(
        Tensor::new(vec![num_observations, k], inputs),
        Ten64::vector(outputs),
    )
}

/// Generates observations of `y = intercept + slope · x`.
///
/// Shorthand for [`generate`] with `[intercept, slope]` and the intercept column
/// switched on.
///
/// # Errors
/// As for [`generate`].
pub fn generate_simple<R: Rng + ?Sized>(
    intercept: f64,
    slope: f64,
    num_observations: usize,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<Observations> {
    let config = GeneratorConfig {
        intercept: true,
        ..*config
    };
    generate(&[intercept, slope], num_observations, &config, rng)
}
