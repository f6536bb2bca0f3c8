//! Floating-point scalar abstraction.
//!
//! Every numeric block in the model is generic over [`Scalar`], so the same
//! implementation serves single and double precision with no behavioral
//! difference other than precision itself.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub};

/// A floating-point scalar usable as block storage.
///
/// Implemented for `f32` and `f64`. The trait carries only what the data
/// model actually needs: basic arithmetic for objective evaluation and an
/// epsilon for the default approximate-comparison tolerance.
pub trait Scalar:
    Copy
    + Default
    + fmt::Debug
    + fmt::Display
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + AddAssign
    + 'static
{
    /// Additive identity.
    const ZERO: Self;
    /// Multiplicative identity.
    const ONE: Self;
    /// One half, used by the quadratic objective.
    const HALF: Self;
    /// Machine epsilon — the default tolerance for approximate comparison.
    const EPSILON: Self;

    /// Absolute value.
    fn abs(self) -> Self;
}

impl Scalar for f32 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const HALF: Self = 0.5;
    const EPSILON: Self = f32::EPSILON;

    fn abs(self) -> Self {
        f32::abs(self)
    }
}

impl Scalar for f64 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const HALF: Self = 0.5;
    const EPSILON: Self = f64::EPSILON;

    fn abs(self) -> Self {
        f64::abs(self)
    }
}

/// Absolute elementwise closeness: `|a - b| <= tol`.
///
/// This is the comparison primitive underlying every `is_approx` in the
/// model. Exact equality (including `tol == 0`) compares representations
/// through subtraction, so `-0.0` and `0.0` are close at any tolerance.
pub fn approx_eq<S: Scalar>(a: S, b: S, tol: S) -> bool {
    (a - b).abs() <= tol
}
