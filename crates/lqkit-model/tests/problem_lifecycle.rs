//! End-to-end lifecycle of a problem: build, copy, reshape, evaluate.

use lqkit_arena::{Allocator, AllocatorConfig, ArenaError};
use lqkit_core::KnotDims;
use lqkit_model::{LqKnot, LqProblem};

fn allocator() -> Allocator {
    Allocator::new(AllocatorConfig::default())
}

fn zero_problem(allocator: &Allocator) -> LqProblem<f64> {
    let dims = KnotDims::new(2, 1, 0);
    let stages: Vec<_> = (0..3)
        .map(|_| LqKnot::new(dims, allocator).unwrap())
        .collect();
    LqProblem::from_stages(stages, 0).unwrap()
}

#[test]
fn zero_problem_round_trip() {
    let a = allocator();
    let p = zero_problem(&a);
    assert_eq!(p.horizon(), 2);
    assert_eq!(p.nc0(), 0);
    assert!(p.is_initialized());
    assert!(!p.is_parameterized());

    let copy = p.duplicate(&a).unwrap();
    assert!(copy.is_approx(&p, 0.0));
    assert_eq!(copy, p);

    let xs = vec![vec![1.0, -1.0]; 3];
    let us = vec![vec![0.25]; 2];
    assert_eq!(p.evaluate(&xs, &us, None), 0.0);
}

#[test]
fn parameterization_grows_every_stage_and_preserves_data() {
    let a = allocator();
    let mut p = zero_problem(&a);
    p.stages_mut()[1].q_mat_mut().fill(7.0);
    p.stages_mut()[1].f_mut().fill(-1.0);
    let before = p.duplicate(&a).unwrap();

    p.add_parameterization(2).unwrap();
    assert_eq!(p.ntheta(), 2);
    for (stage, original) in p.stages().iter().zip(before.stages()) {
        assert_eq!(stage.nth(), 2);
        assert_eq!((stage.gth().rows(), stage.gth().cols()), (2, 2));
        assert_eq!(stage.gamma().len(), 2);
        assert!(stage.gth().as_slice().iter().all(|&x| x == 0.0));
        assert!(stage.gamma().as_slice().iter().all(|&x| x == 0.0));
        // Non-parameter blocks survive the reshape bit-for-bit.
        assert!(stage.q_mat().is_approx(&original.q_mat(), 0.0));
        assert!(stage.f().is_approx(&original.f(), 0.0));
    }

    // Shapes differ now, so the problems compare unequal without panicking.
    assert!(!p.is_approx(&before, 1.0));
}

#[test]
fn evaluate_accounts_for_theta_coupling() {
    let a = allocator();
    let mut p = zero_problem(&a);
    p.add_parameterization(1).unwrap();
    for t in 0..2 {
        let stage = &mut p.stages_mut()[t];
        stage.gx_mut()[(0, 0)] = 1.0;
        stage.gu_mut()[(0, 0)] = 2.0;
    }
    p.stages_mut()[2].gamma_mut()[0] = 3.0;

    let xs = vec![vec![1.0, 0.0]; 3];
    let us = vec![vec![0.5]; 2];
    let theta = [2.0];
    // Per non-terminal stage: θ·Gx·x = 2 and θ·Gu·u = 2; terminal: γᵀθ = 6.
    assert_eq!(p.evaluate(&xs, &us, Some(&theta)), 14.0);
}

#[test]
fn duplicate_respects_byte_budget() {
    let a = allocator();
    let p = zero_problem(&a);

    let tiny = Allocator::new(AllocatorConfig::default().with_capacity(64));
    match p.duplicate(&tiny) {
        Err(ArenaError::CapacityExceeded { capacity, .. }) => assert_eq!(capacity, 64),
        other => panic!("expected capacity error, got {other:?}"),
    }
    // The failed copy released everything it had charged.
    assert_eq!(tiny.bytes_in_use(), 0);
}

#[test]
fn dropping_a_problem_releases_its_bytes() {
    let a = allocator();
    let baseline = a.bytes_in_use();
    let p = zero_problem(&a);
    assert!(p.memory_bytes() > 0);
    assert_eq!(a.bytes_in_use(), baseline + p.memory_bytes());
    drop(p);
    assert_eq!(a.bytes_in_use(), baseline);
}

#[test]
fn push_stage_matches_from_stages() {
    let a = allocator();
    let dims = KnotDims::new(2, 1, 1);
    let mut pushed = LqProblem::<f64>::new(&a).unwrap();
    for _ in 0..3 {
        pushed.push_stage(LqKnot::new(dims, &a).unwrap()).unwrap();
    }
    let built = LqProblem::from_stages(
        (0..3).map(|_| LqKnot::new(dims, &a).unwrap()).collect(),
        0,
    )
    .unwrap();
    assert_eq!(pushed.horizon(), built.horizon());
    assert!(pushed.is_approx(&built, 0.0));
}
