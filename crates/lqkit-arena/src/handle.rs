//! Generation-stamped block handles.
//!
//! A handle encodes the physical location of one block inside a
//! [`crate::BlockStore`]: the element offset, the shape, and the store
//! generation that produced it. Handles never carry addresses — they are
//! resolved through a borrow of the owning store, which bounds view
//! lifetimes, while the generation stamp makes any reallocation of the
//! store structurally detectable instead of silently dangling.

use std::fmt;

/// Location and shape of a matrix block within a store.
///
/// Matrices are stored column-major; `len() = rows * cols` elements
/// starting at `offset`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct MatHandle {
    pub(crate) generation: u32,
    pub(crate) offset: u32,
    pub(crate) rows: u32,
    pub(crate) cols: u32,
}

impl MatHandle {
    pub(crate) fn new(generation: u32, offset: u32, rows: u32, cols: u32) -> Self {
        Self {
            generation,
            offset,
            rows,
            cols,
        }
    }

    /// The store generation this handle belongs to.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Element offset of the block within the store's used region.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Number of rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Total number of elements.
    pub fn len(&self) -> u32 {
        self.rows * self.cols
    }

    /// Whether the block holds no elements (either dimension zero).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for MatHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MatHandle(gen={}, off={}, {}x{})",
            self.generation, self.offset, self.rows, self.cols
        )
    }
}

/// Location and length of a vector block within a store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct VecHandle {
    pub(crate) generation: u32,
    pub(crate) offset: u32,
    pub(crate) len: u32,
}

impl VecHandle {
    pub(crate) fn new(generation: u32, offset: u32, len: u32) -> Self {
        Self {
            generation,
            offset,
            len,
        }
    }

    /// The store generation this handle belongs to.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Element offset of the block within the store's used region.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Number of elements.
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Whether the block holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Display for VecHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VecHandle(gen={}, off={}, len={})",
            self.generation, self.offset, self.len
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mat_handle_round_trip() {
        let h = MatHandle::new(3, 128, 4, 2);
        assert_eq!(h.generation(), 3);
        assert_eq!(h.rows(), 4);
        assert_eq!(h.cols(), 2);
        assert_eq!(h.len(), 8);
        assert!(!h.is_empty());
    }

    #[test]
    fn zero_dimension_matrix_is_empty() {
        assert!(MatHandle::new(0, 0, 0, 5).is_empty());
        assert!(MatHandle::new(0, 0, 5, 0).is_empty());
    }

    #[test]
    fn vec_handle_round_trip() {
        let h = VecHandle::new(1, 64, 6);
        assert_eq!(h.generation(), 1);
        assert_eq!(h.len(), 6);
        assert!(!h.is_empty());
        assert!(VecHandle::new(1, 64, 0).is_empty());
    }
}
