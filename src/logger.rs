//! Console progress reporting for training runs.
//!
//! Library calls are silent by default. Raising the [`Verbosity`] prints the
//! initial coefficients and the final loss (`Info`), and additionally a loss line
//! every `log_every` iterations (`Debug`).

use core::fmt;

/// How much a training run prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Verbosity {
    /// Print nothing.
    #[default]
    Silent,
    /// Print the start and end of training.
    Info,
    /// Also print the loss periodically.
    Debug,
}

/// Writes training progress to stdout according to a [`Verbosity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingLogger {
    verbosity: Verbosity,
    log_every: usize,
}

impl Default for TrainingLogger {
    fn default() -> Self {
        Self::new(Verbosity::Silent, 1000)
    }
}

impl TrainingLogger {
    /// `log_every == 0` disables the periodic loss lines.
    #[must_use]
    pub const fn new(verbosity: Verbosity, log_every: usize) -> Self {
        Self {
            verbosity,
            log_every,
        }
    }

    #[must_use]
    pub fn enabled(&self, level: Verbosity) -> bool {
        level != Verbosity::Silent && self.verbosity >= level
    }

    pub fn info(&self, message: impl fmt::Display) {
        if self.enabled(Verbosity::Info) {
            println!("{message}");
        }
    }

    pub(crate) fn start(&self, num_iterations: usize, initial: &[f64]) {
        self.info(format_args!(
            "training {} coefficients for {num_iterations} iterations, initial {initial:?}",
            initial.len()
        ));
    }

    pub(crate) fn iteration(&self, iteration: usize, loss: f64) {
        if self.enabled(Verbosity::Debug) && self.log_every > 0 && iteration % self.log_every == 0 {
            println!("iter {iteration:>6} loss {loss:.6}");
        }
    }

    pub(crate) fn finish(&self, num_iterations: usize, loss: f64) {
        self.info(format_args!("finished {num_iterations} iterations, loss {loss:.6e}"));
    }
}
