//! Contiguous, aligned block stores with bump allocation.
//!
//! A [`BlockStore`] is one allocator-charged region holding every block of
//! an owner (a knot, or a problem's initial-condition pair). Blocks are
//! bump-allocated in a fixed order at construction; the store is never
//! grown in place. Reshaping an owner means building a successor store
//! under a bumped generation and copying values across, which keeps all
//! blocks contiguous and makes handles from the old store detectably stale.

use std::fmt;

use lqkit_core::Scalar;

use crate::allocator::Allocator;
use crate::error::ArenaError;
use crate::handle::{MatHandle, VecHandle};
use crate::view::{MatMut, MatRef, VecMut, VecRef};

/// Round `len` up to the next multiple of `align`.
fn round_up(len: u32, align: u32) -> u32 {
    len.div_ceil(align) * align
}

/// Alignment granule in elements for scalar type `S` under `align_bytes`.
fn align_elems<S: Scalar>(align_bytes: usize) -> u32 {
    (align_bytes / std::mem::size_of::<S>()).max(1) as u32
}

/// Capacity in elements needed to bump-allocate blocks of the given
/// lengths under the allocator's alignment.
///
/// Each block's offset is rounded up to the alignment granule, so the
/// required capacity is the sum of the aligned lengths.
pub fn aligned_total<S: Scalar>(lens: impl IntoIterator<Item = u32>, align_bytes: usize) -> u32 {
    let granule = align_elems::<S>(align_bytes);
    lens.into_iter().map(|len| round_up(len, granule)).sum()
}

/// One contiguous, zero-initialised, alignment-respecting storage region.
///
/// The region begins at an `align_bytes` boundary and every block's first
/// element is aligned to the same boundary. Resolving a handle to a view
/// is O(1), zero-copy, and never allocates.
pub struct BlockStore<S: Scalar> {
    /// Backing storage, allocated with slack to find an aligned base.
    data: Vec<S>,
    /// Element offset of the aligned base within `data`.
    base: usize,
    /// Bump pointer: next free element position relative to `base`.
    cursor: u32,
    /// Usable capacity in elements from `base`.
    capacity: u32,
    /// Alignment granule in elements.
    granule: u32,
    /// Generation stamped into every handle this store produces.
    generation: u32,
    /// Bytes charged to the allocator, released on drop.
    charged_bytes: usize,
    allocator: Allocator,
}

impl<S: Scalar> BlockStore<S> {
    /// Create a store with the given element capacity under `allocator`.
    ///
    /// The region is zero-initialised, so freshly allocated blocks read as
    /// zero. `generation` is stamped into every handle the store produces;
    /// owners bump it when they rebuild a store.
    pub fn new(allocator: &Allocator, capacity: u32, generation: u32) -> Result<Self, ArenaError> {
        let align_bytes = allocator.config().align_bytes;
        let granule = align_elems::<S>(align_bytes);
        // Slack so the base can be advanced to an aligned boundary.
        let total = capacity as usize + granule as usize;
        let charged_bytes = total * std::mem::size_of::<S>();
        allocator.charge(charged_bytes)?;

        let data = vec![S::ZERO; total];
        let addr = data.as_ptr() as usize;
        let misalign = addr % align_bytes;
        debug_assert_eq!(misalign % std::mem::size_of::<S>(), 0);
        let base = if misalign == 0 {
            0
        } else {
            (align_bytes - misalign) / std::mem::size_of::<S>()
        };

        Ok(Self {
            data,
            base,
            cursor: 0,
            capacity,
            granule,
            generation,
            charged_bytes,
            allocator: allocator.clone(),
        })
    }

    /// Bump-allocate a `rows × cols` column-major matrix block.
    ///
    /// # Panics
    ///
    /// Panics if the store's capacity is exhausted. Callers size stores
    /// with [`aligned_total`] before allocating, so this is an internal
    /// invariant rather than a runtime condition.
    pub fn alloc_matrix(&mut self, rows: u32, cols: u32) -> MatHandle {
        let offset = self.bump(rows * cols);
        MatHandle::new(self.generation, offset, rows, cols)
    }

    /// Bump-allocate a vector block of `len` elements.
    ///
    /// # Panics
    ///
    /// Panics if the store's capacity is exhausted.
    pub fn alloc_vector(&mut self, len: u32) -> VecHandle {
        let offset = self.bump(len);
        VecHandle::new(self.generation, offset, len)
    }

    fn bump(&mut self, len: u32) -> u32 {
        let offset = round_up(self.cursor, self.granule);
        let end = offset + len;
        assert!(
            end <= self.capacity,
            "block store capacity exhausted: need {end}, have {}",
            self.capacity
        );
        self.cursor = end;
        offset
    }

    /// Resolve a matrix handle to a shared view.
    pub fn matrix(&self, h: MatHandle) -> MatRef<'_, S> {
        debug_assert_eq!(
            h.generation, self.generation,
            "stale matrix handle resolved against store"
        );
        let start = self.base + h.offset as usize;
        MatRef::new(&self.data[start..start + h.len() as usize], h.rows, h.cols)
    }

    /// Resolve a matrix handle to a mutable view.
    pub fn matrix_mut(&mut self, h: MatHandle) -> MatMut<'_, S> {
        debug_assert_eq!(
            h.generation, self.generation,
            "stale matrix handle resolved against store"
        );
        let start = self.base + h.offset as usize;
        MatMut::new(
            &mut self.data[start..start + h.len() as usize],
            h.rows,
            h.cols,
        )
    }

    /// Resolve a vector handle to a shared view.
    pub fn vector(&self, h: VecHandle) -> VecRef<'_, S> {
        debug_assert_eq!(
            h.generation, self.generation,
            "stale vector handle resolved against store"
        );
        let start = self.base + h.offset as usize;
        VecRef::new(&self.data[start..start + h.len as usize])
    }

    /// Resolve a vector handle to a mutable view.
    pub fn vector_mut(&mut self, h: VecHandle) -> VecMut<'_, S> {
        debug_assert_eq!(
            h.generation, self.generation,
            "stale vector handle resolved against store"
        );
        let start = self.base + h.offset as usize;
        VecMut::new(&mut self.data[start..start + h.len as usize])
    }

    /// Checked matrix resolution; fails on a stale generation.
    pub fn try_matrix(&self, h: MatHandle) -> Result<MatRef<'_, S>, ArenaError> {
        if h.generation != self.generation {
            return Err(ArenaError::StaleHandle {
                handle_generation: h.generation,
                store_generation: self.generation,
            });
        }
        Ok(self.matrix(h))
    }

    /// Checked vector resolution; fails on a stale generation.
    pub fn try_vector(&self, h: VecHandle) -> Result<VecRef<'_, S>, ArenaError> {
        if h.generation != self.generation {
            return Err(ArenaError::StaleHandle {
                handle_generation: h.generation,
                store_generation: self.generation,
            });
        }
        Ok(self.vector(h))
    }

    /// The used region of the store, from the aligned base to the bump
    /// pointer. Block offsets index into this slice.
    pub fn as_slice(&self) -> &[S] {
        &self.data[self.base..self.base + self.cursor as usize]
    }

    /// Mutable access to the used region.
    ///
    /// Used for whole-region copies when duplicating a store and for
    /// carving disjoint per-block sub-slices in layout order.
    pub fn as_mut_slice(&mut self) -> &mut [S] {
        &mut self.data[self.base..self.base + self.cursor as usize]
    }

    /// Elements used (bump pointer position).
    pub fn used(&self) -> u32 {
        self.cursor
    }

    /// Usable element capacity.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Bytes charged to the allocator, including alignment slack.
    pub fn memory_bytes(&self) -> usize {
        self.charged_bytes
    }

    /// Generation stamped into this store's handles.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// The allocator this store is charged against.
    pub fn allocator(&self) -> &Allocator {
        &self.allocator
    }
}

impl<S: Scalar> fmt::Debug for BlockStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockStore")
            .field("used", &self.cursor)
            .field("capacity", &self.capacity)
            .field("generation", &self.generation)
            .field("allocator", &self.allocator)
            .finish_non_exhaustive()
    }
}

impl<S: Scalar> Drop for BlockStore<S> {
    fn drop(&mut self) {
        self.allocator.release(self.charged_bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AllocatorConfig;

    fn alloc() -> Allocator {
        Allocator::new(AllocatorConfig::default())
    }

    #[test]
    fn blocks_are_zero_initialised_and_aligned() {
        let a = alloc();
        let cap = aligned_total::<f64>([6, 3], 64);
        let mut store = BlockStore::<f64>::new(&a, cap, 0).unwrap();
        let m = store.alloc_matrix(2, 3);
        let v = store.alloc_vector(3);

        assert!(store.matrix(m).as_slice().iter().all(|&x| x == 0.0));
        assert!(store.vector(v).as_slice().iter().all(|&x| x == 0.0));
        assert_eq!(store.matrix(m).as_slice().as_ptr() as usize % 64, 0);
        assert_eq!(store.vector(v).as_slice().as_ptr() as usize % 64, 0);
    }

    #[test]
    fn sequential_alloc_respects_granule() {
        let a = alloc();
        let cap = aligned_total::<f64>([5, 1], 64);
        let mut store = BlockStore::<f64>::new(&a, cap, 0).unwrap();
        let m = store.alloc_matrix(5, 1);
        let v = store.alloc_vector(1);
        // 64B / 8B per f64 = 8-element granule.
        assert_eq!(m.offset, 0);
        assert_eq!(v.offset, 8);
        assert_eq!(store.used(), 9);
    }

    #[test]
    #[should_panic(expected = "capacity exhausted")]
    fn over_allocation_panics() {
        let a = alloc();
        let mut store = BlockStore::<f64>::new(&a, 4, 0).unwrap();
        store.alloc_vector(5);
    }

    #[test]
    fn write_through_view_reads_back() {
        let a = alloc();
        let cap = aligned_total::<f32>([4], 64);
        let mut store = BlockStore::<f32>::new(&a, cap, 0).unwrap();
        let m = store.alloc_matrix(2, 2);
        store.matrix_mut(m)[(1, 0)] = 7.0;
        assert_eq!(store.matrix(m)[(1, 0)], 7.0);
        assert_eq!(store.matrix(m)[(0, 1)], 0.0);
    }

    #[test]
    fn drop_releases_charged_bytes() {
        let a = alloc();
        let before = a.bytes_in_use();
        {
            let store = BlockStore::<f64>::new(&a, 100, 0).unwrap();
            assert_eq!(a.bytes_in_use(), before + store.memory_bytes());
        }
        assert_eq!(a.bytes_in_use(), before);
    }

    #[test]
    fn budgeted_allocator_propagates_capacity_error() {
        let a = Allocator::new(AllocatorConfig::default().with_capacity(64));
        let err = BlockStore::<f64>::new(&a, 1024, 0).unwrap_err();
        assert!(matches!(err, ArenaError::CapacityExceeded { .. }));
        assert_eq!(a.bytes_in_use(), 0);
    }

    #[test]
    fn try_resolution_rejects_stale_generation() {
        let a = alloc();
        let cap = aligned_total::<f64>([4], 64);
        let mut old = BlockStore::<f64>::new(&a, cap, 0).unwrap();
        let h = old.alloc_vector(4);
        let successor = BlockStore::<f64>::new(&a, cap, old.generation() + 1).unwrap();

        assert!(old.try_vector(h).is_ok());
        assert_eq!(
            successor.try_vector(h).unwrap_err(),
            ArenaError::StaleHandle {
                handle_generation: 0,
                store_generation: 1,
            }
        );
    }

    #[test]
    fn debug_formatting_summarizes_store_and_views() {
        let a = alloc();
        let cap = aligned_total::<f64>([4], 64);
        let mut store = BlockStore::<f64>::new(&a, cap, 3).unwrap();
        let v = store.alloc_vector(4);
        let m = store.alloc_matrix(0, 0);

        let text = format!("{store:?}");
        assert!(text.contains("BlockStore"));
        assert!(text.contains("generation: 3"));
        assert!(format!("{:?}", store.vector(v)).contains("VecRef"));
        assert!(format!("{:?}", store.matrix(m)).contains("MatRef"));
    }

    #[test]
    fn zero_length_blocks_are_resolvable() {
        let a = alloc();
        let mut store = BlockStore::<f64>::new(&a, 0, 0).unwrap();
        let m = store.alloc_matrix(0, 3);
        let v = store.alloc_vector(0);
        assert_eq!(store.matrix(m).rows(), 0);
        assert!(store.vector(v).as_slice().is_empty());
    }
}
