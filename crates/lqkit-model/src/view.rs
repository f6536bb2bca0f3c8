//! Per-knot view aggregates.
//!
//! A solver running a Riccati-style recursion reads and writes every block
//! of a stage in place. Rather than resolving seventeen handles one by one,
//! [`crate::LqKnot::view`] and [`crate::LqKnot::view_mut`] produce these
//! aggregates in O(1) with no copies. Their validity is bounded by the
//! borrow of the owning knot: any reallocating mutation (`assign` with a
//! shape change, `add_parameterization`) requires the borrow to end first,
//! so dangling views are unrepresentable.

use lqkit_arena::{MatMut, MatRef, VecMut, VecRef};
use lqkit_core::KnotDims;
use lqkit_core::Scalar;

/// Shared views over every block of one knot.
///
/// Field names follow the block names of the model: `q_mat`/`q_vec` are the
/// quadratic and linear state-cost terms `Q` and `q`, and likewise for
/// `r_mat`/`r_vec` and `d_mat`/`d_vec`. Dynamics blocks encode
/// `E·x' + A·x + B·u + f = 0`, constraints `C·x + D·u + d = 0`.
#[derive(Clone, Copy)]
pub struct KnotView<'a, S: Scalar> {
    /// Stage dimensions the block shapes derive from.
    pub dims: KnotDims,

    /// Quadratic state cost `Q` (nx × nx).
    pub q_mat: MatRef<'a, S>,
    /// Cross cost `S` (nx × nu).
    pub s_mat: MatRef<'a, S>,
    /// Quadratic control cost `R` (nu × nu).
    pub r_mat: MatRef<'a, S>,
    /// Linear state cost `q` (nx).
    pub q_vec: VecRef<'a, S>,
    /// Linear control cost `r` (nu).
    pub r_vec: VecRef<'a, S>,

    /// State transition `A` (nx2 × nx).
    pub a: MatRef<'a, S>,
    /// Control transition `B` (nx2 × nu).
    pub b: MatRef<'a, S>,
    /// Next-state coefficient `E` (nx2 × nx2).
    pub e: MatRef<'a, S>,
    /// Dynamics offset `f` (nx2).
    pub f: VecRef<'a, S>,

    /// Constraint state coefficient `C` (nc × nx).
    pub c: MatRef<'a, S>,
    /// Constraint control coefficient `D` (nc × nu).
    pub d_mat: MatRef<'a, S>,
    /// Constraint offset `d` (nc).
    pub d_vec: VecRef<'a, S>,

    /// Parameter quadratic `Gth` (nth × nth).
    pub gth: MatRef<'a, S>,
    /// Parameter–state coupling `Gx` (nth × nx).
    pub gx: MatRef<'a, S>,
    /// Parameter–control coupling `Gu` (nth × nu).
    pub gu: MatRef<'a, S>,
    /// Constraint–parameter coupling `Gv` (nc × nth).
    pub gv: MatRef<'a, S>,
    /// Parameter linear term `gamma` (nth).
    pub gamma: VecRef<'a, S>,
}

/// Mutable views over every block of one knot.
///
/// All seventeen blocks are simultaneously writable: the owning store's
/// region is carved into disjoint sub-slices in layout order.
pub struct KnotViewMut<'a, S: Scalar> {
    /// Stage dimensions the block shapes derive from.
    pub dims: KnotDims,

    /// Quadratic state cost `Q` (nx × nx).
    pub q_mat: MatMut<'a, S>,
    /// Cross cost `S` (nx × nu).
    pub s_mat: MatMut<'a, S>,
    /// Quadratic control cost `R` (nu × nu).
    pub r_mat: MatMut<'a, S>,
    /// Linear state cost `q` (nx).
    pub q_vec: VecMut<'a, S>,
    /// Linear control cost `r` (nu).
    pub r_vec: VecMut<'a, S>,

    /// State transition `A` (nx2 × nx).
    pub a: MatMut<'a, S>,
    /// Control transition `B` (nx2 × nu).
    pub b: MatMut<'a, S>,
    /// Next-state coefficient `E` (nx2 × nx2).
    pub e: MatMut<'a, S>,
    /// Dynamics offset `f` (nx2).
    pub f: VecMut<'a, S>,

    /// Constraint state coefficient `C` (nc × nx).
    pub c: MatMut<'a, S>,
    /// Constraint control coefficient `D` (nc × nu).
    pub d_mat: MatMut<'a, S>,
    /// Constraint offset `d` (nc).
    pub d_vec: VecMut<'a, S>,

    /// Parameter quadratic `Gth` (nth × nth).
    pub gth: MatMut<'a, S>,
    /// Parameter–state coupling `Gx` (nth × nx).
    pub gx: MatMut<'a, S>,
    /// Parameter–control coupling `Gu` (nth × nu).
    pub gu: MatMut<'a, S>,
    /// Constraint–parameter coupling `Gv` (nc × nth).
    pub gv: MatMut<'a, S>,
    /// Parameter linear term `gamma` (nth).
    pub gamma: VecMut<'a, S>,
}
