//! Core types for the lqkit constrained LQ problem model.
//!
//! This is the leaf crate with zero dependencies. It defines the scalar
//! abstraction that parameterizes all numeric storage and the dimension
//! tuple describing one stage ("knot") of a finite-horizon problem.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod dims;
pub mod scalar;

pub use dims::KnotDims;
pub use scalar::Scalar;
