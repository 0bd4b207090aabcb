//! Error types shared by the generator, the kernels' checked constructors and the trainer.
//!
//! Only one failure mode is meaningful here: a caller handed in arguments that break a
//! precondition. Numerical divergence is *not* an error; it flows into the returned
//! coefficients untouched.

/// The category of a [`RegressionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A precondition on the arguments of a call was violated.
    InvalidArgument,
}

/// Errors raised by this crate.
///
/// Every error is raised synchronously, before any training iteration runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegressionError {
    /// A precondition on the arguments of a call was violated.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl RegressionError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument(reason.into())
    }

    /// Returns the category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, RegressionError>;
