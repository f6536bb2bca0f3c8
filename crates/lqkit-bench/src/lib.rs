//! Benchmark profiles for the Lqkit LQ problem data model.
//!
//! Provides pre-built problems sized after common trajectory-optimization
//! workloads:
//!
//! - [`reference_problem`]: nx=12, nu=6, nc=3, horizon 100 (a legged-robot
//!   centroidal model scale)
//! - [`stress_problem`]: nx=36, nu=12, nc=6, horizon 500

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use lqkit_arena::{Allocator, AllocatorConfig, ArenaError};
use lqkit_core::KnotDims;
use lqkit_model::{LqKnot, LqProblem};

/// Reference dimensions: nx=12, nu=6, nc=3.
pub fn reference_dims() -> KnotDims {
    KnotDims::new(12, 6, 3)
}

/// Stress dimensions: nx=36, nu=12, nc=6.
pub fn stress_dims() -> KnotDims {
    KnotDims::new(36, 12, 6)
}

/// Build a horizon-100 problem at [`reference_dims`] with deterministic
/// non-zero block data.
pub fn reference_problem(allocator: &Allocator) -> Result<LqProblem<f64>, ArenaError> {
    build_problem(reference_dims(), 100, allocator)
}

/// Build a horizon-500 problem at [`stress_dims`].
pub fn stress_problem(allocator: &Allocator) -> Result<LqProblem<f64>, ArenaError> {
    build_problem(stress_dims(), 500, allocator)
}

/// Build a problem with `horizon + 1` stages of dimension `dims`, filling
/// each block with a stage-dependent value so copies are not trivially
/// compressible.
pub fn build_problem(
    dims: KnotDims,
    horizon: usize,
    allocator: &Allocator,
) -> Result<LqProblem<f64>, ArenaError> {
    let mut stages = Vec::with_capacity(horizon + 1);
    for t in 0..=horizon {
        let mut knot = LqKnot::new(dims, allocator)?;
        let seed = (t % 7) as f64 + 1.0;
        let mut v = knot.view_mut();
        v.q_mat.fill(seed);
        v.r_mat.fill(seed * 0.5);
        v.a.fill(1.0);
        v.b.fill(0.1);
        v.e.fill(-1.0);
        v.c.fill(seed * 0.25);
        stages.push(knot);
    }
    LqProblem::from_stages(stages, dims.nx)
}

/// A constant trajectory matching `problem`'s stage dimensions.
pub fn constant_trajectory(problem: &LqProblem<f64>) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
    let horizon = problem.horizon().max(0) as usize;
    let xs = problem
        .stages()
        .iter()
        .map(|k| vec![0.5; k.nx() as usize])
        .collect();
    let us = (0..horizon)
        .map(|t| vec![-0.5; problem.stages()[t].nu() as usize])
        .collect();
    (xs, us)
}

/// Default allocator for benchmark runs (no byte budget).
pub fn bench_allocator() -> Allocator {
    Allocator::new(AllocatorConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_problem_builds() {
        let p = reference_problem(&bench_allocator()).unwrap();
        assert_eq!(p.horizon(), 100);
        assert_eq!(p.nc0(), 12);
    }

    #[test]
    fn constant_trajectory_matches_dimensions() {
        let p = reference_problem(&bench_allocator()).unwrap();
        let (xs, us) = constant_trajectory(&p);
        assert_eq!(xs.len(), 101);
        assert_eq!(us.len(), 100);
        assert_eq!(xs[0].len(), 12);
        assert_eq!(us[0].len(), 6);
    }

    #[test]
    fn build_is_deterministic() {
        let a = bench_allocator();
        let p = reference_problem(&a).unwrap();
        let q = reference_problem(&a).unwrap();
        assert!(p.is_approx(&q, 0.0));
    }
}
