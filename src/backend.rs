//! Backend selection.
//!
//! This module defines the compute backends the numeric kernels can run on.
//!
//! # Supported Backends
//!
//! - `Cpu` — Plain sequential iterators (default).
//! - `Rayon` — Rows of the forward pass and coefficients of the backward pass
//!   are spread over the rayon thread pool.
//!
//! Both backends reduce every sum sequentially in observation order, so they
//! return bit-identical results. The backend is chosen per call through
//! [`TrainConfig`](crate::trainer::TrainConfig); there is no process-wide setting.

use core::fmt;
use core::str::FromStr;

use crate::error::RegressionError;

/// Enumeration of supported computation backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Backend {
    /// Sequential CPU backend (default).
    #[default]
    Cpu,
    /// Data-parallel CPU backend using `rayon`.
    Rayon,
}

impl Backend {
    /// Short lowercase name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Rayon => "rayon",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = RegressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cpu" => Ok(Self::Cpu),
            "rayon" | "parallel" => Ok(Self::Rayon),
            other => Err(RegressionError::invalid(format!("unknown backend `{other}`"))),
        }
    }
}
