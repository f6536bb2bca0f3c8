//! Allocator-aware contiguous storage for the lqkit problem model.
//!
//! Every knot of an LQ problem keeps its full block set (cost, dynamics,
//! constraints, parameterization) in a single contiguous, alignment-
//! respecting region — a [`BlockStore`] — charged against a shared
//! [`Allocator`] identity. Downstream solvers read and write blocks through
//! zero-copy [`MatRef`]/[`MatMut`] views resolved from generation-stamped
//! handles; no resolve path allocates.
//!
//! # Architecture
//!
//! ```text
//! Allocator (Arc identity + atomic byte accounting)
//! └── BlockStore × N (one per knot / per problem init block)
//!     ├── aligned Vec<S> region, bump-allocated sub-blocks
//!     └── MatHandle / VecHandle (generation, offset, shape)
//!         └── MatRef / MatMut / VecRef / VecMut (borrowed views)
//! ```
//!
//! Reallocation (parameterization growth, reshaping assignment) always
//! rebuilds a store as a whole unit under a bumped generation, so handles
//! from the superseded store are structurally detectable as stale.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod allocator;
pub mod config;
pub mod error;
pub mod handle;
pub mod store;
pub mod view;

pub use allocator::Allocator;
pub use config::AllocatorConfig;
pub use error::ArenaError;
pub use handle::{MatHandle, VecHandle};
pub use store::{aligned_total, BlockStore};
pub use view::{MatMut, MatRef, VecMut, VecRef};
