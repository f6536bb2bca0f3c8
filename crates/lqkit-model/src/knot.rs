//! One stage ("knot") of a constrained LQ problem.

use std::fmt;

use smallvec::SmallVec;

use lqkit_arena::{aligned_total, Allocator, ArenaError, BlockStore, MatHandle, VecHandle};
use lqkit_arena::{MatMut, MatRef, VecMut, VecRef};
use lqkit_core::{KnotDims, Scalar};

use crate::view::{KnotView, KnotViewMut};

/// Number of blocks in a knot's store.
const NUM_BLOCKS: usize = 17;

/// Handle table for the blocks of one knot, in layout order.
///
/// The parameterization blocks come last, so two stores built for the same
/// `(nx, nu, nc, nx2)` but different `nth` have layout-identical prefixes
/// up to and including `d_vec` — parameterization growth copies that prefix
/// as one slice and rebuilds only the tail.
#[derive(Clone, Copy)]
struct KnotHandles {
    q_mat: MatHandle,
    s_mat: MatHandle,
    r_mat: MatHandle,
    q_vec: VecHandle,
    r_vec: VecHandle,
    a: MatHandle,
    b: MatHandle,
    e: MatHandle,
    f: VecHandle,
    c: MatHandle,
    d_mat: MatHandle,
    d_vec: VecHandle,
    gth: MatHandle,
    gx: MatHandle,
    gu: MatHandle,
    gv: MatHandle,
    gamma: VecHandle,
}

impl KnotHandles {
    /// `(offset, len)` of every block in layout order.
    fn layout(&self) -> [(u32, u32); NUM_BLOCKS] {
        [
            (self.q_mat.offset(), self.q_mat.len()),
            (self.s_mat.offset(), self.s_mat.len()),
            (self.r_mat.offset(), self.r_mat.len()),
            (self.q_vec.offset(), self.q_vec.len()),
            (self.r_vec.offset(), self.r_vec.len()),
            (self.a.offset(), self.a.len()),
            (self.b.offset(), self.b.len()),
            (self.e.offset(), self.e.len()),
            (self.f.offset(), self.f.len()),
            (self.c.offset(), self.c.len()),
            (self.d_mat.offset(), self.d_mat.len()),
            (self.d_vec.offset(), self.d_vec.len()),
            (self.gth.offset(), self.gth.len()),
            (self.gx.offset(), self.gx.len()),
            (self.gu.offset(), self.gu.len()),
            (self.gv.offset(), self.gv.len()),
            (self.gamma.offset(), self.gamma.len()),
        ]
    }

    /// Element count of the non-parameterization prefix of the store.
    fn common_prefix_len(&self) -> u32 {
        self.d_vec.offset() + self.d_vec.len()
    }
}

/// Block lengths in layout order for the given dimensions.
fn block_lens(dims: &KnotDims) -> SmallVec<[u32; NUM_BLOCKS]> {
    let KnotDims {
        nx,
        nu,
        nc,
        nx2,
        nth,
    } = *dims;
    SmallVec::from_slice(&[
        nx * nx,   // Q
        nx * nu,   // S
        nu * nu,   // R
        nx,        // q
        nu,        // r
        nx2 * nx,  // A
        nx2 * nu,  // B
        nx2 * nx2, // E
        nx2,       // f
        nc * nx,   // C
        nc * nu,   // D
        nc,        // d
        nth * nth, // Gth
        nth * nx,  // Gx
        nth * nu,  // Gu
        nc * nth,  // Gv
        nth,       // gamma
    ])
}

/// Build a zeroed store and its handle table for the given dimensions.
fn build_store<S: Scalar>(
    dims: &KnotDims,
    allocator: &Allocator,
    generation: u32,
) -> Result<(BlockStore<S>, KnotHandles), ArenaError> {
    let align = allocator.config().align_bytes;
    let capacity = aligned_total::<S>(block_lens(dims).iter().copied(), align);
    let mut store = BlockStore::new(allocator, capacity, generation)?;
    // Field initialization order below is the layout order.
    let handles = KnotHandles {
        q_mat: store.alloc_matrix(dims.nx, dims.nx),
        s_mat: store.alloc_matrix(dims.nx, dims.nu),
        r_mat: store.alloc_matrix(dims.nu, dims.nu),
        q_vec: store.alloc_vector(dims.nx),
        r_vec: store.alloc_vector(dims.nu),
        a: store.alloc_matrix(dims.nx2, dims.nx),
        b: store.alloc_matrix(dims.nx2, dims.nu),
        e: store.alloc_matrix(dims.nx2, dims.nx2),
        f: store.alloc_vector(dims.nx2),
        c: store.alloc_matrix(dims.nc, dims.nx),
        d_mat: store.alloc_matrix(dims.nc, dims.nu),
        d_vec: store.alloc_vector(dims.nc),
        gth: store.alloc_matrix(dims.nth, dims.nth),
        gx: store.alloc_matrix(dims.nth, dims.nx),
        gu: store.alloc_matrix(dims.nth, dims.nu),
        gv: store.alloc_matrix(dims.nc, dims.nth),
        gamma: store.alloc_vector(dims.nth),
    };
    Ok((store, handles))
}

/// Copy the overlapping top-left corner from `src` into `dst`.
///
/// Entries of `dst` outside the overlap are left untouched (zero for a
/// freshly built store).
fn copy_overlap<S: Scalar>(src: MatRef<'_, S>, mut dst: MatMut<'_, S>) {
    let rows = src.rows().min(dst.rows()) as usize;
    let cols = src.cols().min(dst.cols());
    for j in 0..cols {
        dst.col_mut(j)[..rows].copy_from_slice(&src.col(j)[..rows]);
    }
}

/// One time stage of a finite-horizon constrained LQ problem.
///
/// A knot bundles the stage's quadratic cost, linear dynamics, equality
/// constraints, and optional parameter-sensitivity blocks:
///
/// ```text
/// cost        ½ [x u]ᵀ [Q S; Sᵀ R] [x u] + qᵀx + rᵀu
/// dynamics    E·x' + A·x + B·u + f = 0
/// constraint  C·x + D·u + d = 0
/// ```
///
/// All blocks live in one contiguous, aligned [`BlockStore`] charged to one
/// allocator. Solvers access blocks through the zero-copy [`KnotView`] /
/// [`KnotViewMut`] aggregates or the per-block accessors; none of those
/// paths allocate.
///
/// Moving a knot transfers the store and allocator handle in constant time;
/// the moved-from binding is statically unusable afterwards. Deep copies go
/// through [`LqKnot::duplicate`], which takes the target allocator
/// explicitly.
pub struct LqKnot<S: Scalar> {
    dims: KnotDims,
    store: BlockStore<S>,
    handles: KnotHandles,
}

impl<S: Scalar> LqKnot<S> {
    /// Create a knot with all blocks zero-initialised under `allocator`.
    pub fn new(dims: KnotDims, allocator: &Allocator) -> Result<Self, ArenaError> {
        let (store, handles) = build_store(&dims, allocator, 0)?;
        Ok(Self {
            dims,
            store,
            handles,
        })
    }

    /// Deep-copy every block's values into fresh storage under `allocator`.
    pub fn duplicate(&self, allocator: &Allocator) -> Result<Self, ArenaError> {
        let (mut store, handles) = build_store(&self.dims, allocator, 0)?;
        copy_blocks(&self.store, &self.handles, &mut store, &handles);
        Ok(Self {
            dims: self.dims,
            store,
            handles,
        })
    }

    /// Copy dimensions and all block values from `other`, reshaping storage
    /// as needed. The current allocator is reused; the source's allocator
    /// is never adopted.
    ///
    /// Reshaping rebuilds the store under a bumped generation, invalidating
    /// any handle obtained before the call.
    pub fn assign(&mut self, other: &LqKnot<S>) -> Result<(), ArenaError> {
        if self.dims != other.dims {
            let generation = self.store.generation() + 1;
            let (store, handles) = build_store(&other.dims, self.store.allocator(), generation)?;
            self.store = store;
            self.handles = handles;
            self.dims = other.dims;
        }
        copy_blocks(&other.store, &other.handles, &mut self.store, &self.handles);
        Ok(())
    }

    /// Reshape the parameterization blocks to dimension `nth`.
    ///
    /// Cost, dynamics, and constraint data are preserved bit-for-bit. The
    /// overlapping corner of existing parameter data is kept; new entries
    /// are zero. A smaller `nth` truncates. Calling with the current `nth`
    /// is a value-level no-op that does not reallocate.
    ///
    /// Because all blocks share one contiguous store, any actual reshape
    /// rebuilds the store as a single unit (cost proportional to the total
    /// block size). Every previously obtained view or handle of this knot
    /// is invalid afterwards — this is a hard contract, enforced by the
    /// borrow on `self` and by generation checks on the handle path.
    ///
    /// Returns `&mut Self` for chaining.
    pub fn add_parameterization(&mut self, nth: u32) -> Result<&mut Self, ArenaError> {
        if nth == self.dims.nth {
            return Ok(self);
        }
        let new_dims = self.dims.with_nth(nth);
        let generation = self.store.generation() + 1;
        let (mut store, handles) = build_store(&new_dims, self.store.allocator(), generation)?;

        // The non-parameterization prefix is layout-identical: copy it as
        // one slice. Same allocator, hence same alignment granule.
        let common = self.handles.common_prefix_len() as usize;
        store.as_mut_slice()[..common].copy_from_slice(&self.store.as_slice()[..common]);

        copy_overlap(self.store.matrix(self.handles.gth), store.matrix_mut(handles.gth));
        copy_overlap(self.store.matrix(self.handles.gx), store.matrix_mut(handles.gx));
        copy_overlap(self.store.matrix(self.handles.gu), store.matrix_mut(handles.gu));
        copy_overlap(self.store.matrix(self.handles.gv), store.matrix_mut(handles.gv));
        {
            let n = self.dims.nth.min(nth) as usize;
            let src = self.store.vector(self.handles.gamma);
            let mut dst = store.vector_mut(handles.gamma);
            dst.as_mut_slice()[..n].copy_from_slice(&src.as_slice()[..n]);
        }

        self.store = store;
        self.handles = handles;
        self.dims = new_dims;
        Ok(self)
    }

    /// True iff all five dimensions match and every corresponding block
    /// pair is elementwise close within `tol`.
    pub fn is_approx(&self, other: &LqKnot<S>, tol: S) -> bool {
        if self.dims != other.dims {
            return false;
        }
        let a = self.view();
        let b = other.view();
        a.q_mat.is_approx(&b.q_mat, tol)
            && a.s_mat.is_approx(&b.s_mat, tol)
            && a.r_mat.is_approx(&b.r_mat, tol)
            && a.q_vec.is_approx(&b.q_vec, tol)
            && a.r_vec.is_approx(&b.r_vec, tol)
            && a.a.is_approx(&b.a, tol)
            && a.b.is_approx(&b.b, tol)
            && a.e.is_approx(&b.e, tol)
            && a.f.is_approx(&b.f, tol)
            && a.c.is_approx(&b.c, tol)
            && a.d_mat.is_approx(&b.d_mat, tol)
            && a.d_vec.is_approx(&b.d_vec, tol)
            && a.gth.is_approx(&b.gth, tol)
            && a.gx.is_approx(&b.gx, tol)
            && a.gu.is_approx(&b.gu, tol)
            && a.gv.is_approx(&b.gv, tol)
            && a.gamma.is_approx(&b.gamma, tol)
    }

    /// Aggregate of shared views over every block. O(1), no copies.
    pub fn view(&self) -> KnotView<'_, S> {
        KnotView {
            dims: self.dims,
            q_mat: self.store.matrix(self.handles.q_mat),
            s_mat: self.store.matrix(self.handles.s_mat),
            r_mat: self.store.matrix(self.handles.r_mat),
            q_vec: self.store.vector(self.handles.q_vec),
            r_vec: self.store.vector(self.handles.r_vec),
            a: self.store.matrix(self.handles.a),
            b: self.store.matrix(self.handles.b),
            e: self.store.matrix(self.handles.e),
            f: self.store.vector(self.handles.f),
            c: self.store.matrix(self.handles.c),
            d_mat: self.store.matrix(self.handles.d_mat),
            d_vec: self.store.vector(self.handles.d_vec),
            gth: self.store.matrix(self.handles.gth),
            gx: self.store.matrix(self.handles.gx),
            gu: self.store.matrix(self.handles.gu),
            gv: self.store.matrix(self.handles.gv),
            gamma: self.store.vector(self.handles.gamma),
        }
    }

    /// Aggregate of mutable views over every block, all simultaneously
    /// writable. O(1), no copies.
    pub fn view_mut(&mut self) -> KnotViewMut<'_, S> {
        let dims = self.dims;
        let h = self.handles;
        let layout = h.layout();

        // Carve the used region into disjoint per-block sub-slices in
        // layout order, skipping alignment padding between blocks.
        let mut blocks: SmallVec<[&mut [S]; NUM_BLOCKS]> = SmallVec::new();
        let mut rest = self.store.as_mut_slice();
        let mut pos = 0u32;
        for &(offset, len) in &layout {
            let taken = rest;
            let (_pad, tail) = taken.split_at_mut((offset - pos) as usize);
            let (block, tail) = tail.split_at_mut(len as usize);
            blocks.push(block);
            rest = tail;
            pos = offset + len;
        }

        // Pop in reverse layout order.
        let gamma = VecMut::new(blocks.pop().expect("gamma block"));
        let gv = MatMut::new(blocks.pop().expect("Gv block"), h.gv.rows(), h.gv.cols());
        let gu = MatMut::new(blocks.pop().expect("Gu block"), h.gu.rows(), h.gu.cols());
        let gx = MatMut::new(blocks.pop().expect("Gx block"), h.gx.rows(), h.gx.cols());
        let gth = MatMut::new(blocks.pop().expect("Gth block"), h.gth.rows(), h.gth.cols());
        let d_vec = VecMut::new(blocks.pop().expect("d block"));
        let d_mat = MatMut::new(
            blocks.pop().expect("D block"),
            h.d_mat.rows(),
            h.d_mat.cols(),
        );
        let c = MatMut::new(blocks.pop().expect("C block"), h.c.rows(), h.c.cols());
        let f = VecMut::new(blocks.pop().expect("f block"));
        let e = MatMut::new(blocks.pop().expect("E block"), h.e.rows(), h.e.cols());
        let b = MatMut::new(blocks.pop().expect("B block"), h.b.rows(), h.b.cols());
        let a = MatMut::new(blocks.pop().expect("A block"), h.a.rows(), h.a.cols());
        let r_vec = VecMut::new(blocks.pop().expect("r block"));
        let q_vec = VecMut::new(blocks.pop().expect("q block"));
        let r_mat = MatMut::new(
            blocks.pop().expect("R block"),
            h.r_mat.rows(),
            h.r_mat.cols(),
        );
        let s_mat = MatMut::new(
            blocks.pop().expect("S block"),
            h.s_mat.rows(),
            h.s_mat.cols(),
        );
        let q_mat = MatMut::new(
            blocks.pop().expect("Q block"),
            h.q_mat.rows(),
            h.q_mat.cols(),
        );

        KnotViewMut {
            dims,
            q_mat,
            s_mat,
            r_mat,
            q_vec,
            r_vec,
            a,
            b,
            e,
            f,
            c,
            d_mat,
            d_vec,
            gth,
            gx,
            gu,
            gv,
            gamma,
        }
    }

    /// Stage dimensions.
    pub fn dims(&self) -> KnotDims {
        self.dims
    }

    /// State dimension.
    pub fn nx(&self) -> u32 {
        self.dims.nx
    }

    /// Control dimension.
    pub fn nu(&self) -> u32 {
        self.dims.nu
    }

    /// Stage constraint dimension.
    pub fn nc(&self) -> u32 {
        self.dims.nc
    }

    /// Next-state dimension.
    pub fn nx2(&self) -> u32 {
        self.dims.nx2
    }

    /// Parameter dimension.
    pub fn nth(&self) -> u32 {
        self.dims.nth
    }

    /// The allocator all of this knot's storage is charged against.
    pub fn allocator(&self) -> &Allocator {
        self.store.allocator()
    }

    /// Current store generation; bumped by every reallocating mutation.
    pub fn generation(&self) -> u32 {
        self.store.generation()
    }

    /// Bytes of storage charged to the allocator for this knot.
    pub fn memory_bytes(&self) -> usize {
        self.store.memory_bytes()
    }

    // Per-block accessors. Cost blocks:

    /// Quadratic state cost `Q` (nx × nx).
    pub fn q_mat(&self) -> MatRef<'_, S> {
        self.store.matrix(self.handles.q_mat)
    }

    /// Mutable `Q`.
    pub fn q_mat_mut(&mut self) -> MatMut<'_, S> {
        self.store.matrix_mut(self.handles.q_mat)
    }

    /// Cross cost `S` (nx × nu).
    pub fn s_mat(&self) -> MatRef<'_, S> {
        self.store.matrix(self.handles.s_mat)
    }

    /// Mutable `S`.
    pub fn s_mat_mut(&mut self) -> MatMut<'_, S> {
        self.store.matrix_mut(self.handles.s_mat)
    }

    /// Quadratic control cost `R` (nu × nu).
    pub fn r_mat(&self) -> MatRef<'_, S> {
        self.store.matrix(self.handles.r_mat)
    }

    /// Mutable `R`.
    pub fn r_mat_mut(&mut self) -> MatMut<'_, S> {
        self.store.matrix_mut(self.handles.r_mat)
    }

    /// Linear state cost `q` (nx).
    pub fn q_vec(&self) -> VecRef<'_, S> {
        self.store.vector(self.handles.q_vec)
    }

    /// Mutable `q`.
    pub fn q_vec_mut(&mut self) -> VecMut<'_, S> {
        self.store.vector_mut(self.handles.q_vec)
    }

    /// Linear control cost `r` (nu).
    pub fn r_vec(&self) -> VecRef<'_, S> {
        self.store.vector(self.handles.r_vec)
    }

    /// Mutable `r`.
    pub fn r_vec_mut(&mut self) -> VecMut<'_, S> {
        self.store.vector_mut(self.handles.r_vec)
    }

    // Dynamics blocks:

    /// State transition `A` (nx2 × nx).
    pub fn a(&self) -> MatRef<'_, S> {
        self.store.matrix(self.handles.a)
    }

    /// Mutable `A`.
    pub fn a_mut(&mut self) -> MatMut<'_, S> {
        self.store.matrix_mut(self.handles.a)
    }

    /// Control transition `B` (nx2 × nu).
    pub fn b(&self) -> MatRef<'_, S> {
        self.store.matrix(self.handles.b)
    }

    /// Mutable `B`.
    pub fn b_mut(&mut self) -> MatMut<'_, S> {
        self.store.matrix_mut(self.handles.b)
    }

    /// Next-state coefficient `E` (nx2 × nx2).
    pub fn e(&self) -> MatRef<'_, S> {
        self.store.matrix(self.handles.e)
    }

    /// Mutable `E`.
    pub fn e_mut(&mut self) -> MatMut<'_, S> {
        self.store.matrix_mut(self.handles.e)
    }

    /// Dynamics offset `f` (nx2).
    pub fn f(&self) -> VecRef<'_, S> {
        self.store.vector(self.handles.f)
    }

    /// Mutable `f`.
    pub fn f_mut(&mut self) -> VecMut<'_, S> {
        self.store.vector_mut(self.handles.f)
    }

    // Constraint blocks:

    /// Constraint state coefficient `C` (nc × nx).
    pub fn c(&self) -> MatRef<'_, S> {
        self.store.matrix(self.handles.c)
    }

    /// Mutable `C`.
    pub fn c_mut(&mut self) -> MatMut<'_, S> {
        self.store.matrix_mut(self.handles.c)
    }

    /// Constraint control coefficient `D` (nc × nu).
    pub fn d_mat(&self) -> MatRef<'_, S> {
        self.store.matrix(self.handles.d_mat)
    }

    /// Mutable `D`.
    pub fn d_mat_mut(&mut self) -> MatMut<'_, S> {
        self.store.matrix_mut(self.handles.d_mat)
    }

    /// Constraint offset `d` (nc).
    pub fn d_vec(&self) -> VecRef<'_, S> {
        self.store.vector(self.handles.d_vec)
    }

    /// Mutable `d`.
    pub fn d_vec_mut(&mut self) -> VecMut<'_, S> {
        self.store.vector_mut(self.handles.d_vec)
    }

    // Parameterization blocks (empty when nth == 0):

    /// Parameter quadratic `Gth` (nth × nth).
    pub fn gth(&self) -> MatRef<'_, S> {
        self.store.matrix(self.handles.gth)
    }

    /// Mutable `Gth`.
    pub fn gth_mut(&mut self) -> MatMut<'_, S> {
        self.store.matrix_mut(self.handles.gth)
    }

    /// Parameter–state coupling `Gx` (nth × nx).
    pub fn gx(&self) -> MatRef<'_, S> {
        self.store.matrix(self.handles.gx)
    }

    /// Mutable `Gx`.
    pub fn gx_mut(&mut self) -> MatMut<'_, S> {
        self.store.matrix_mut(self.handles.gx)
    }

    /// Parameter–control coupling `Gu` (nth × nu).
    pub fn gu(&self) -> MatRef<'_, S> {
        self.store.matrix(self.handles.gu)
    }

    /// Mutable `Gu`.
    pub fn gu_mut(&mut self) -> MatMut<'_, S> {
        self.store.matrix_mut(self.handles.gu)
    }

    /// Constraint–parameter coupling `Gv` (nc × nth).
    pub fn gv(&self) -> MatRef<'_, S> {
        self.store.matrix(self.handles.gv)
    }

    /// Mutable `Gv`.
    pub fn gv_mut(&mut self) -> MatMut<'_, S> {
        self.store.matrix_mut(self.handles.gv)
    }

    /// Parameter linear term `gamma` (nth).
    pub fn gamma(&self) -> VecRef<'_, S> {
        self.store.vector(self.handles.gamma)
    }

    /// Mutable `gamma`.
    pub fn gamma_mut(&mut self) -> VecMut<'_, S> {
        self.store.vector_mut(self.handles.gamma)
    }
}

/// Copy every block's values between same-shaped stores (possibly under
/// different allocators, hence per-block rather than whole-region).
fn copy_blocks<S: Scalar>(
    src_store: &BlockStore<S>,
    src: &KnotHandles,
    dst_store: &mut BlockStore<S>,
    dst: &KnotHandles,
) {
    dst_store.matrix_mut(dst.q_mat).copy_from(&src_store.matrix(src.q_mat));
    dst_store.matrix_mut(dst.s_mat).copy_from(&src_store.matrix(src.s_mat));
    dst_store.matrix_mut(dst.r_mat).copy_from(&src_store.matrix(src.r_mat));
    dst_store.vector_mut(dst.q_vec).copy_from(&src_store.vector(src.q_vec));
    dst_store.vector_mut(dst.r_vec).copy_from(&src_store.vector(src.r_vec));
    dst_store.matrix_mut(dst.a).copy_from(&src_store.matrix(src.a));
    dst_store.matrix_mut(dst.b).copy_from(&src_store.matrix(src.b));
    dst_store.matrix_mut(dst.e).copy_from(&src_store.matrix(src.e));
    dst_store.vector_mut(dst.f).copy_from(&src_store.vector(src.f));
    dst_store.matrix_mut(dst.c).copy_from(&src_store.matrix(src.c));
    dst_store.matrix_mut(dst.d_mat).copy_from(&src_store.matrix(src.d_mat));
    dst_store.vector_mut(dst.d_vec).copy_from(&src_store.vector(src.d_vec));
    dst_store.matrix_mut(dst.gth).copy_from(&src_store.matrix(src.gth));
    dst_store.matrix_mut(dst.gx).copy_from(&src_store.matrix(src.gx));
    dst_store.matrix_mut(dst.gu).copy_from(&src_store.matrix(src.gu));
    dst_store.matrix_mut(dst.gv).copy_from(&src_store.matrix(src.gv));
    dst_store.vector_mut(dst.gamma).copy_from(&src_store.vector(src.gamma));
}

impl<S: Scalar> PartialEq for LqKnot<S> {
    fn eq(&self, other: &Self) -> bool {
        self.is_approx(other, S::EPSILON)
    }
}

impl<S: Scalar> fmt::Display for LqKnot<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LqKnot {{")?;
        write!(f, "\n  nx:  {}", self.dims.nx)?;
        write!(f, "\n  nu:  {}", self.dims.nu)?;
        write!(f, "\n  nc:  {}", self.dims.nc)?;
        if self.dims.nth > 0 {
            write!(f, "\n  nth: {}", self.dims.nth)?;
        }
        #[cfg(debug_assertions)]
        {
            let v = self.view();
            write!(f, "\n  Q: {}", v.q_mat)?;
            write!(f, "\n  S: {}", v.s_mat)?;
            write!(f, "\n  R: {}", v.r_mat)?;
            write!(f, "\n  q: {}", v.q_vec)?;
            write!(f, "\n  r: {}", v.r_vec)?;
            write!(f, "\n  A: {}", v.a)?;
            write!(f, "\n  B: {}", v.b)?;
            write!(f, "\n  E: {}", v.e)?;
            write!(f, "\n  f: {}", v.f)?;
            write!(f, "\n  C: {}", v.c)?;
            write!(f, "\n  D: {}", v.d_mat)?;
            write!(f, "\n  d: {}", v.d_vec)?;
            if self.dims.nth > 0 {
                write!(f, "\n  Gth: {}", v.gth)?;
                write!(f, "\n  Gx: {}", v.gx)?;
                write!(f, "\n  Gu: {}", v.gu)?;
                write!(f, "\n  gamma: {}", v.gamma)?;
            }
        }
        write!(f, "\n}}")
    }
}

impl<S: Scalar> fmt::Debug for LqKnot<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LqKnot")
            .field("dims", &self.dims)
            .field("generation", &self.store.generation())
            .finish_non_exhaustive()
    }
}
