//! Lqkit: an arena-backed data model for finite-horizon constrained LQ
//! optimal control.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Lqkit sub-crates. For most users, adding `lqkit` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use lqkit::prelude::*;
//!
//! # fn main() -> Result<(), ArenaError> {
//! // One allocator owns every byte of the problem's storage.
//! let allocator = Allocator::new(AllocatorConfig::default());
//!
//! // Three stages of a double-integrator-sized problem: nx=2, nu=1,
//! // no stage constraints. All blocks start zeroed.
//! let dims = KnotDims::new(2, 1, 0);
//! let mut stages = Vec::new();
//! for _ in 0..3 {
//!     stages.push(LqKnot::<f64>::new(dims, &allocator)?);
//! }
//!
//! // Fill stage 0's state cost in place through a mutable view.
//! {
//!     let mut v = stages[0].view_mut();
//!     v.q_mat[(0, 0)] = 1.0;
//!     v.q_mat[(1, 1)] = 1.0;
//! }
//!
//! // Pin the initial state with nc0 = 2 constraint rows.
//! let problem = LqProblem::from_stages(stages, 2)?;
//! assert_eq!(problem.horizon(), 2);
//!
//! let xs = vec![vec![3.0, 0.0], vec![0.0, 0.0], vec![0.0, 0.0]];
//! let us = vec![vec![0.0]; 2];
//! assert_eq!(problem.evaluate(&xs, &us, None), 4.5);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the
//! prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `lqkit-core` | The [`types::Scalar`] trait and [`types::KnotDims`] |
//! | [`arena`] | `lqkit-arena` | Allocators, block stores, handles, views |
//! | [`model`] | `lqkit-model` | [`model::LqKnot`], [`model::LqProblem`], view aggregates |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Scalar trait and dimension tuples (`lqkit-core`).
pub use lqkit_core as types;

/// Allocator-charged block storage and zero-copy views (`lqkit-arena`).
///
/// Most users only need [`arena::Allocator`] and [`arena::AllocatorConfig`]
/// from this module — the view and handle types surface through
/// [`model`]'s accessors.
pub use lqkit_arena as arena;

/// Knot and problem types (`lqkit-model`).
///
/// [`model::LqKnot`] is one stage of the problem, [`model::LqProblem`] the
/// whole-horizon aggregate.
pub use lqkit_model as model;

/// Common imports for typical Lqkit usage.
///
/// ```rust
/// use lqkit::prelude::*;
/// ```
pub mod prelude {
    // Scalars and dimensions
    pub use lqkit_core::{KnotDims, Scalar};

    // Storage
    pub use lqkit_arena::{Allocator, AllocatorConfig, ArenaError};

    // Model
    pub use lqkit_model::{KnotView, KnotViewMut, LqKnot, LqProblem};
}
