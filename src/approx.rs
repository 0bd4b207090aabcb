//! Utilities to grade how closely learned coefficients match the true ones.

/// Differences below this are graded [`ApproxEquality::Relative`].
pub const F64_MAX_ERROR: f64 = 1e-3;

/// Differences below this are graded [`ApproxEquality::Partial`].
pub const F64_AVG_ERROR: f64 = 1e-6;

/// Differences below this are graded [`ApproxEquality::Precise`].
pub const F64_MIN_ERROR: f64 = 1e-13;

/// Grades the absolute distance between two values.
pub trait RelativeEq<Rhs: ?Sized> {
    /// Enumerates the equality of `self`
    fn approx_eq(&self, rhs: &Rhs) -> ApproxEquality;
}

impl RelativeEq<Self> for f64 {
    fn approx_eq(&self, rhs: &Self) -> ApproxEquality {
        let dif = (self - rhs).abs();

        if dif < F64_MIN_ERROR {
            ApproxEquality::Precise
        } else if dif < F64_AVG_ERROR {
            ApproxEquality::Partial
        } else if dif < F64_MAX_ERROR {
            ApproxEquality::Relative
        } else {
            // also reached for NaN
            ApproxEquality::Scarce
        }
    }
}

/// A slice is graded by its worst element; slices of different lengths are `Scarce`.
impl<T: RelativeEq<U>, U> RelativeEq<[U]> for [T] {
    fn approx_eq(&self, rhs: &[U]) -> ApproxEquality {
        if self.len() != rhs.len() {
            return ApproxEquality::Scarce;
        }
        self.iter()
            .zip(rhs)
            .map(|(t, u)| t.approx_eq(u))
            .max()
            .unwrap_or(ApproxEquality::Precise)
    }
}

/// The approximated equality enumerated, from best to worst.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ApproxEquality {
    /// Very strong epsilon.
    Precise = 0,

    /// Good epsilon.
    Partial = 1,

    /// Acceptable epsilon
    Relative = 2,

    /// No relative equality.
    Scarce = 3,
}

impl ApproxEquality {
    /// Anything better than [`ApproxEquality::Scarce`].
    #[must_use]
    pub const fn is_close(self) -> bool {
        !matches!(self, Self::Scarce)
    }
}

/// Approximates equality based off the absolute difference, accepting anything
/// within [`F64_MAX_ERROR`].
pub fn approx_eq<A: RelativeEq<B> + ?Sized, B: ?Sized>(a: &A, b: &B) -> bool {
    a.approx_eq(b).is_close()
}
