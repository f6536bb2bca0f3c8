//! Stage dimension tuples.

use std::fmt;

/// Dimensions of one stage of a constrained LQ problem.
///
/// - `nx`: state dimension.
/// - `nu`: control dimension.
/// - `nc`: stage equality-constraint dimension.
/// - `nx2`: next-state dimension (usually equal to `nx`).
/// - `nth`: parameter dimension; `0` for an unparameterized stage.
///
/// All block shapes of a knot are derived from these five values, and two
/// knots are "same-shaped" exactly when their `KnotDims` compare equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KnotDims {
    /// State dimension.
    pub nx: u32,
    /// Control dimension.
    pub nu: u32,
    /// Stage constraint dimension.
    pub nc: u32,
    /// Next-state dimension.
    pub nx2: u32,
    /// Parameter dimension.
    pub nth: u32,
}

impl KnotDims {
    /// Dimensions with `nx2 = nx` and `nth = 0`.
    pub fn new(nx: u32, nu: u32, nc: u32) -> Self {
        Self::with_next(nx, nu, nc, nx)
    }

    /// Dimensions with an explicit next-state dimension and `nth = 0`.
    pub fn with_next(nx: u32, nu: u32, nc: u32, nx2: u32) -> Self {
        Self::with_param(nx, nu, nc, nx2, 0)
    }

    /// Fully explicit dimensions.
    pub fn with_param(nx: u32, nu: u32, nc: u32, nx2: u32, nth: u32) -> Self {
        Self {
            nx,
            nu,
            nc,
            nx2,
            nth,
        }
    }

    /// This dimension tuple with the parameter dimension replaced.
    #[must_use]
    pub fn with_nth(self, nth: u32) -> Self {
        Self { nth, ..self }
    }

    /// Whether the stage carries parameterization blocks.
    pub fn is_parameterized(&self) -> bool {
        self.nth > 0
    }
}

impl fmt::Display for KnotDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(nx={}, nu={}, nc={}, nx2={}, nth={})",
            self.nx, self.nu, self.nc, self.nx2, self.nth
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_defaults_nx2_and_nth() {
        let d = KnotDims::new(4, 2, 1);
        assert_eq!(d.nx2, 4);
        assert_eq!(d.nth, 0);
        assert!(!d.is_parameterized());
    }

    #[test]
    fn with_next_defaults_nth() {
        let d = KnotDims::with_next(4, 2, 1, 3);
        assert_eq!(d.nx2, 3);
        assert_eq!(d.nth, 0);
    }

    #[test]
    fn with_nth_replaces_only_nth() {
        let d = KnotDims::with_param(4, 2, 1, 3, 0).with_nth(5);
        assert_eq!(d, KnotDims::with_param(4, 2, 1, 3, 5));
        assert!(d.is_parameterized());
    }

    #[test]
    fn equality_is_full_tuple() {
        assert_ne!(KnotDims::new(2, 1, 0), KnotDims::new(2, 1, 0).with_nth(1));
        assert_eq!(KnotDims::new(2, 1, 0), KnotDims::with_next(2, 1, 0, 2));
    }
}
