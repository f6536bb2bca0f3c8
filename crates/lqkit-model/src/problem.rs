//! Whole-horizon problem aggregate.

use std::fmt;

use lqkit_arena::{aligned_total, Allocator, ArenaError, BlockStore, MatHandle, VecHandle};
use lqkit_arena::{MatMut, MatRef, VecMut, VecRef};
use lqkit_core::Scalar;

use crate::knot::LqKnot;

/// A finite-horizon constrained LQ problem.
///
/// Holds the per-stage knots `stages[0..=N]` (the last one is the terminal
/// stage) plus the initial-condition constraint
///
/// ```text
/// G0·x0 + g0 = 0
/// ```
///
/// whose blocks live in their own aligned store under the problem's
/// allocator. By convention the horizon `N` is `stages.len() - 1`; a
/// problem with no stages is uninitialized and has horizon `-1`.
pub struct LqProblem<S: Scalar> {
    init: BlockStore<S>,
    g0_mat: MatHandle,
    g0_vec: VecHandle,
    stages: Vec<LqKnot<S>>,
    allocator: Allocator,
}

/// Build the initial-condition store for `nc0` rows against an `nx0`-state.
fn build_init<S: Scalar>(
    nc0: u32,
    nx0: u32,
    allocator: &Allocator,
    generation: u32,
) -> Result<(BlockStore<S>, MatHandle, VecHandle), ArenaError> {
    let align = allocator.config().align_bytes;
    let capacity = aligned_total::<S>([nc0 * nx0, nc0], align);
    let mut store = BlockStore::new(allocator, capacity, generation)?;
    let g0_mat = store.alloc_matrix(nc0, nx0);
    let g0_vec = store.alloc_vector(nc0);
    Ok((store, g0_mat, g0_vec))
}

impl<S: Scalar> LqProblem<S> {
    /// Create an empty (uninitialized) problem under `allocator`.
    ///
    /// The initial-condition blocks start zero-sized; the first
    /// [`LqProblem::push_stage`] reshapes them against that stage's state
    /// dimension.
    pub fn new(allocator: &Allocator) -> Result<Self, ArenaError> {
        let (init, g0_mat, g0_vec) = build_init(0, 0, allocator, 0)?;
        Ok(Self {
            init,
            g0_mat,
            g0_vec,
            stages: Vec::new(),
            allocator: allocator.clone(),
        })
    }

    /// Assemble a problem from its stages, taking ownership.
    ///
    /// The problem adopts the first stage's allocator (the global allocator
    /// when `stages` is empty). `nc0` rows of initial-condition blocks are
    /// zero-initialised against the first stage's state dimension.
    pub fn from_stages(stages: Vec<LqKnot<S>>, nc0: u32) -> Result<Self, ArenaError> {
        let allocator = match stages.first() {
            Some(first) => first.allocator().clone(),
            None => Allocator::global(),
        };
        let nx0 = stages.first().map_or(0, LqKnot::nx);
        let (init, g0_mat, g0_vec) = build_init(nc0, nx0, &allocator, 0)?;
        let problem = Self {
            init,
            g0_mat,
            g0_vec,
            stages,
            allocator,
        };
        problem.check_allocators();
        Ok(problem)
    }

    /// Assemble a problem by deep-copying `stages` under `allocator`.
    pub fn with_stages(
        stages: &[LqKnot<S>],
        nc0: u32,
        allocator: &Allocator,
    ) -> Result<Self, ArenaError> {
        let copies = stages
            .iter()
            .map(|k| k.duplicate(allocator))
            .collect::<Result<Vec<_>, _>>()?;
        let nx0 = copies.first().map_or(0, LqKnot::nx);
        let (init, g0_mat, g0_vec) = build_init(nc0, nx0, allocator, 0)?;
        Ok(Self {
            init,
            g0_mat,
            g0_vec,
            stages: copies,
            allocator: allocator.clone(),
        })
    }

    /// Deep-copy the whole problem, stages and initial-condition blocks,
    /// under `allocator`.
    pub fn duplicate(&self, allocator: &Allocator) -> Result<Self, ArenaError> {
        let mut copy = Self::with_stages(&self.stages, self.nc0(), allocator)?;
        copy.g0_mat_mut().copy_from(&self.g0_mat());
        copy.g0_vec_mut().copy_from(&self.g0_vec());
        Ok(copy)
    }

    /// Append a stage, taking ownership.
    ///
    /// The stage must already live under this problem's allocator; moving it
    /// in is O(1). Appending the first stage reshapes the zero-sized
    /// initial-condition blocks against its state dimension.
    pub fn push_stage(&mut self, knot: LqKnot<S>) -> Result<(), ArenaError> {
        debug_assert_eq!(
            knot.allocator(),
            &self.allocator,
            "stage pushed from a foreign allocator"
        );
        if self.stages.is_empty() && knot.nx() != self.g0_mat.cols() {
            let generation = self.init.generation() + 1;
            let (init, g0_mat, g0_vec) =
                build_init(self.nc0(), knot.nx(), &self.allocator, generation)?;
            self.init = init;
            self.g0_mat = g0_mat;
            self.g0_vec = g0_vec;
        }
        self.stages.push(knot);
        Ok(())
    }

    /// Horizon `N = stages.len() - 1`, or `-1` when uninitialized.
    pub fn horizon(&self) -> i64 {
        self.stages.len() as i64 - 1
    }

    /// Number of initial-condition constraint rows.
    pub fn nc0(&self) -> u32 {
        self.g0_vec.len()
    }

    /// Parameter dimension, taken from the first stage (`0` when empty).
    pub fn ntheta(&self) -> u32 {
        self.stages.first().map_or(0, LqKnot::nth)
    }

    /// Whether the problem holds at least one stage.
    pub fn is_initialized(&self) -> bool {
        !self.stages.is_empty()
    }

    /// Whether the stages carry parameterization blocks.
    pub fn is_parameterized(&self) -> bool {
        self.ntheta() > 0
    }

    /// All stages, first to terminal.
    pub fn stages(&self) -> &[LqKnot<S>] {
        &self.stages
    }

    /// Mutable access to all stages.
    pub fn stages_mut(&mut self) -> &mut [LqKnot<S>] {
        &mut self.stages
    }

    /// Stage `t`, or `None` past the terminal stage.
    pub fn stage(&self, t: usize) -> Option<&LqKnot<S>> {
        self.stages.get(t)
    }

    /// The allocator every store of this problem is charged against.
    pub fn allocator(&self) -> &Allocator {
        &self.allocator
    }

    /// Initial-condition coefficient `G0` (nc0 × nx of the first stage).
    pub fn g0_mat(&self) -> MatRef<'_, S> {
        self.init.matrix(self.g0_mat)
    }

    /// Mutable `G0`.
    pub fn g0_mat_mut(&mut self) -> MatMut<'_, S> {
        self.init.matrix_mut(self.g0_mat)
    }

    /// Initial-condition offset `g0` (nc0).
    pub fn g0_vec(&self) -> VecRef<'_, S> {
        self.init.vector(self.g0_vec)
    }

    /// Mutable `g0`.
    pub fn g0_vec_mut(&mut self) -> VecMut<'_, S> {
        self.init.vector_mut(self.g0_vec)
    }

    /// Total bytes charged to the allocator for this problem's stores.
    pub fn memory_bytes(&self) -> usize {
        self.init.memory_bytes() + self.stages.iter().map(LqKnot::memory_bytes).sum::<usize>()
    }

    /// Reshape every stage's parameterization blocks to dimension `nth`.
    ///
    /// Existing parameter data overlaps are preserved per stage, exactly as
    /// in [`LqKnot::add_parameterization`]. Views and handles into any stage
    /// are invalid afterwards.
    pub fn add_parameterization(&mut self, nth: u32) -> Result<(), ArenaError> {
        for stage in &mut self.stages {
            stage.add_parameterization(nth)?;
        }
        Ok(())
    }

    /// True iff both problems have the same stage count, elementwise-close
    /// initial-condition blocks, and pairwise approximately equal stages.
    ///
    /// Shape mismatches compare unequal rather than panicking, so this is
    /// safe to call across arbitrary problems.
    pub fn is_approx(&self, other: &LqProblem<S>, tol: S) -> bool {
        if self.stages.len() != other.stages.len() {
            return false;
        }
        if self.g0_mat.rows() != other.g0_mat.rows()
            || self.g0_mat.cols() != other.g0_mat.cols()
        {
            return false;
        }
        if !self.g0_mat().is_approx(&other.g0_mat(), tol)
            || !self.g0_vec().is_approx(&other.g0_vec(), tol)
        {
            return false;
        }
        self.stages
            .iter()
            .zip(&other.stages)
            .all(|(a, b)| a.is_approx(b, tol))
    }

    /// Objective value of the trajectory `(xs, us)` under optional
    /// parameter `theta`.
    ///
    /// `xs` holds one state per stage (terminal included), `us` one control
    /// per non-terminal stage (extra trailing entries are ignored). The
    /// initial-condition and dynamics residuals do not enter the value;
    /// this is the cost functional only:
    ///
    /// ```text
    /// Σ_t  ½xᵀQx + qᵀx  +  [t < N]·(xᵀSu + ½uᵀRu + rᵀu)
    ///    + [θ]·(½θᵀGthθ + θᵀGx·x + γᵀθ + [t < N]·θᵀGu·u)
    /// ```
    ///
    /// Returns zero for an uninitialized problem.
    ///
    /// # Panics
    ///
    /// Panics if trajectory lengths or per-stage dimensions disagree with
    /// the problem, or if `theta` is supplied with the wrong length.
    pub fn evaluate(&self, xs: &[Vec<S>], us: &[Vec<S>], theta: Option<&[S]>) -> S {
        if self.stages.is_empty() {
            return S::ZERO;
        }
        let horizon = self.stages.len() - 1;
        assert_eq!(xs.len(), self.stages.len(), "one state per stage required");
        assert!(
            us.len() >= horizon,
            "one control per non-terminal stage required: got {}, need {}",
            us.len(),
            horizon
        );
        if let Some(th) = theta {
            assert_eq!(th.len(), self.ntheta() as usize, "parameter length");
        }

        let mut value = S::ZERO;
        for (t, stage) in self.stages.iter().enumerate() {
            let v = stage.view();
            let x = xs[t].as_slice();
            assert_eq!(x.len(), v.dims.nx as usize, "state length at stage {t}");

            value += S::HALF * quad_form(&v.q_mat, x) + dot(v.q_vec.as_slice(), x);

            if t < horizon {
                let u = us[t].as_slice();
                assert_eq!(u.len(), v.dims.nu as usize, "control length at stage {t}");
                value += bilinear(&v.s_mat, x, u)
                    + S::HALF * quad_form(&v.r_mat, u)
                    + dot(v.r_vec.as_slice(), u);
            }

            if let Some(th) = theta {
                value += S::HALF * quad_form(&v.gth, th)
                    + bilinear(&v.gx, th, x)
                    + dot(v.gamma.as_slice(), th);
                if t < horizon {
                    value += bilinear(&v.gu, th, us[t].as_slice());
                }
            }
        }
        value
    }

    /// Debug invariant: every stage lives under the problem's allocator.
    fn check_allocators(&self) {
        debug_assert!(
            self.stages.iter().all(|k| k.allocator() == &self.allocator),
            "stage stored under a foreign allocator"
        );
    }
}

/// Inner product of two equal-length slices.
fn dot<S: Scalar>(a: &[S], b: &[S]) -> S {
    debug_assert_eq!(a.len(), b.len());
    let mut acc = S::ZERO;
    for (&x, &y) in a.iter().zip(b) {
        acc += x * y;
    }
    acc
}

/// `aᵀ · M · b` for an `a.len() × b.len()` matrix.
fn bilinear<S: Scalar>(m: &MatRef<'_, S>, a: &[S], b: &[S]) -> S {
    debug_assert_eq!(m.rows() as usize, a.len());
    debug_assert_eq!(m.cols() as usize, b.len());
    let mut acc = S::ZERO;
    for (j, &bj) in b.iter().enumerate() {
        acc += bj * dot(a, m.col(j as u32));
    }
    acc
}

/// `xᵀ · M · x` for a square matrix.
fn quad_form<S: Scalar>(m: &MatRef<'_, S>, x: &[S]) -> S {
    bilinear(m, x, x)
}

impl<S: Scalar> PartialEq for LqProblem<S> {
    fn eq(&self, other: &Self) -> bool {
        self.is_approx(other, S::EPSILON)
    }
}

impl<S: Scalar> fmt::Debug for LqProblem<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LqProblem")
            .field("horizon", &self.horizon())
            .field("nc0", &self.nc0())
            .field("ntheta", &self.ntheta())
            .finish_non_exhaustive()
    }
}
