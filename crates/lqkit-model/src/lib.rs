//! Knot and problem types for finite-horizon constrained LQ optimal control.
//!
//! The data model is a sequence of stages ("knots"), each bundling one
//! stage's cost, dynamics, and constraint blocks in a single contiguous
//! aligned store, plus a problem aggregate that adds the initial-condition
//! constraint and whole-horizon operations:
//!
//! ```text
//!   LqProblem
//!   ├── G0·x0 + g0 = 0            initial condition (own store)
//!   └── stages[0..=N]: LqKnot
//!       ├── ½[x u]ᵀ[Q S; Sᵀ R][x u] + qᵀx + rᵀu     cost
//!       ├── E·x' + A·x + B·u + f = 0                dynamics
//!       ├── C·x + D·u + d = 0                       constraints
//!       └── Gth/Gx/Gu/Gv/gamma                      parameterization
//! ```
//!
//! Solvers consume stages through [`KnotView`] / [`KnotViewMut`], O(1)
//! aggregates of per-block views whose lifetimes are bounded by the borrow
//! of the owning knot.
//!
//! # Example
//!
//! ```
//! use lqkit_arena::{Allocator, AllocatorConfig};
//! use lqkit_core::KnotDims;
//! use lqkit_model::{LqKnot, LqProblem};
//!
//! # fn main() -> Result<(), lqkit_arena::ArenaError> {
//! let allocator = Allocator::new(AllocatorConfig::default());
//! let dims = KnotDims::new(2, 1, 0);
//! let stages = (0..3)
//!     .map(|_| LqKnot::<f64>::new(dims, &allocator))
//!     .collect::<Result<Vec<_>, _>>()?;
//! let problem = LqProblem::from_stages(stages, 2)?;
//! assert_eq!(problem.horizon(), 2);
//! assert_eq!(problem.nc0(), 2);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod knot;
mod problem;
mod view;

pub use knot::LqKnot;
pub use problem::LqProblem;
pub use view::{KnotView, KnotViewMut};
