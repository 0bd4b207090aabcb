//! Human-readable comparison of true, initial and learned coefficients.
//!
//! The layout is for eyeballing convergence; it is not a stable format.

use core::fmt;

use crate::approx::{ApproxEquality, RelativeEq};

/// True coefficients next to a run's initial and learned estimates.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison<'a> {
    pub actual: &'a [f64],
    pub initial: &'a [f64],
    pub learned: &'a [f64],
}

impl<'a> Comparison<'a> {
    #[must_use]
    pub const fn new(actual: &'a [f64], initial: &'a [f64], learned: &'a [f64]) -> Self {
        Self {
            actual,
            initial,
            learned,
        }
    }

    /// Largest `|actual_j - learned_j|`; NaN if any learned value is NaN.
    #[must_use]
    pub fn max_abs_error(&self) -> f64 {
        self.actual
            .iter()
            .zip(self.learned)
            .map(|(a, l)| (a - l).abs())
            .fold(0.0_f64, |acc, d| if d.is_nan() || acc.is_nan() { f64::NAN } else { acc.max(d) })
    }

    #[must_use]
    pub fn agreement(&self) -> ApproxEquality {
        self.learned.approx_eq(self.actual)
    }
}

struct Row<'a>(&'a [f64]);

impl fmt::Display for Row<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{v:>10.4}")?;
        }
        f.write_str("]")
    }
}

impl fmt::Display for Comparison<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "actual:  {}", Row(self.actual))?;
        writeln!(f, "initial: {}", Row(self.initial))?;
        writeln!(f, "learned: {}", Row(self.learned))?;
        write!(
            f,
            "agreement: {:?} (max abs error {:.3e})",
            self.agreement(),
            self.max_abs_error()
        )
    }
}
