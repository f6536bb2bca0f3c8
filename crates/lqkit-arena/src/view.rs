//! Zero-copy matrix and vector views.
//!
//! Views are non-owning slices plus a shape, resolved from handles through
//! a borrow of the owning [`crate::BlockStore`]. Matrices are column-major.
//! Shape agreement between views is a hard contract: `copy_from` and
//! `is_approx` assert matching shapes rather than failing soft, because a
//! mismatch signals a programming error in the caller.

use std::fmt;
use std::ops::{Index, IndexMut};

use lqkit_core::scalar::approx_eq;
use lqkit_core::Scalar;

/// Shared view of a column-major matrix block.
#[derive(Clone, Copy, Debug)]
pub struct MatRef<'a, S> {
    data: &'a [S],
    rows: u32,
    cols: u32,
}

impl<'a, S: Scalar> MatRef<'a, S> {
    /// View a column-major slice as a `rows × cols` matrix.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != rows * cols`.
    pub fn new(data: &'a [S], rows: u32, cols: u32) -> Self {
        assert_eq!(data.len(), (rows * cols) as usize);
        Self { data, rows, cols }
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

    /// Whether the block holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The backing column-major slice.
    pub fn as_slice(&self) -> &'a [S] {
        self.data
    }

    /// Column `j` as a contiguous slice.
    pub fn col(&self, j: u32) -> &'a [S] {
        let start = (j * self.rows) as usize;
        &self.data[start..start + self.rows as usize]
    }

    /// Element at `(row, col)`.
    pub fn get(&self, row: u32, col: u32) -> S {
        self[(row as usize, col as usize)]
    }

    /// Elementwise closeness within `tol`.
    ///
    /// # Panics
    ///
    /// Panics if the shapes differ — shape agreement is the caller's
    /// contract, not part of the comparison.
    pub fn is_approx(&self, other: &MatRef<'_, S>, tol: S) -> bool {
        assert!(
            self.rows == other.rows && self.cols == other.cols,
            "is_approx on mismatched shapes: {}x{} vs {}x{}",
            self.rows,
            self.cols,
            other.rows,
            other.cols
        );
        self.data
            .iter()
            .zip(other.data)
            .all(|(&a, &b)| approx_eq(a, b, tol))
    }
}

impl<S: Scalar> Index<(usize, usize)> for MatRef<'_, S> {
    type Output = S;

    fn index(&self, (row, col): (usize, usize)) -> &S {
        debug_assert!(row < self.rows as usize && col < self.cols as usize);
        &self.data[col * self.rows as usize + row]
    }
}

impl<S: Scalar> fmt::Display for MatRef<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for row in 0..self.rows as usize {
            if row > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[")?;
            for col in 0..self.cols as usize {
                if col > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", self[(row, col)])?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}

/// Mutable view of a column-major matrix block.
#[derive(Debug)]
pub struct MatMut<'a, S> {
    data: &'a mut [S],
    rows: u32,
    cols: u32,
}

impl<'a, S: Scalar> MatMut<'a, S> {
    /// View a column-major mutable slice as a `rows × cols` matrix.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != rows * cols`.
    pub fn new(data: &'a mut [S], rows: u32, cols: u32) -> Self {
        assert_eq!(data.len(), (rows * cols) as usize);
        Self { data, rows, cols }
    }

    /// Number of rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Reborrow as a shared view.
    pub fn as_ref(&self) -> MatRef<'_, S> {
        MatRef::new(self.data, self.rows, self.cols)
    }

    /// The backing column-major slice.
    pub fn as_mut_slice(&mut self) -> &mut [S] {
        self.data
    }

    /// Column `j` as a contiguous mutable slice.
    pub fn col_mut(&mut self, j: u32) -> &mut [S] {
        let start = (j * self.rows) as usize;
        &mut self.data[start..start + self.rows as usize]
    }

    /// Set every element to `value`.
    pub fn fill(&mut self, value: S) {
        self.data.fill(value);
    }

    /// Copy all values from a same-shaped source.
    ///
    /// # Panics
    ///
    /// Panics if the shapes differ.
    pub fn copy_from(&mut self, src: &MatRef<'_, S>) {
        assert!(
            self.rows == src.rows() && self.cols == src.cols(),
            "copy_from on mismatched shapes: {}x{} vs {}x{}",
            self.rows,
            self.cols,
            src.rows(),
            src.cols()
        );
        self.data.copy_from_slice(src.as_slice());
    }
}

impl<S: Scalar> Index<(usize, usize)> for MatMut<'_, S> {
    type Output = S;

    fn index(&self, (row, col): (usize, usize)) -> &S {
        debug_assert!(row < self.rows as usize && col < self.cols as usize);
        &self.data[col * self.rows as usize + row]
    }
}

impl<S: Scalar> IndexMut<(usize, usize)> for MatMut<'_, S> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut S {
        debug_assert!(row < self.rows as usize && col < self.cols as usize);
        &mut self.data[col * self.rows as usize + row]
    }
}

/// Shared view of a vector block.
#[derive(Clone, Copy, Debug)]
pub struct VecRef<'a, S> {
    data: &'a [S],
}

impl<'a, S: Scalar> VecRef<'a, S> {
    /// View a slice as a vector block.
    pub fn new(data: &'a [S]) -> Self {
        Self { data }
    }

    /// Number of elements.
    pub fn len(&self) -> u32 {
        self.data.len() as u32
    }

    /// Whether the block holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The backing slice.
    pub fn as_slice(&self) -> &'a [S] {
        self.data
    }

    /// Element at `i`.
    pub fn get(&self, i: u32) -> S {
        self.data[i as usize]
    }

    /// Elementwise closeness within `tol`.
    ///
    /// # Panics
    ///
    /// Panics if the lengths differ.
    pub fn is_approx(&self, other: &VecRef<'_, S>, tol: S) -> bool {
        assert!(
            self.data.len() == other.data.len(),
            "is_approx on mismatched lengths: {} vs {}",
            self.data.len(),
            other.data.len()
        );
        self.data
            .iter()
            .zip(other.data)
            .all(|(&a, &b)| approx_eq(a, b, tol))
    }
}

impl<S: Scalar> Index<usize> for VecRef<'_, S> {
    type Output = S;

    fn index(&self, i: usize) -> &S {
        &self.data[i]
    }
}

impl<S: Scalar> fmt::Display for VecRef<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, "]")
    }
}

/// Mutable view of a vector block.
#[derive(Debug)]
pub struct VecMut<'a, S> {
    data: &'a mut [S],
}

impl<'a, S: Scalar> VecMut<'a, S> {
    /// View a mutable slice as a vector block.
    pub fn new(data: &'a mut [S]) -> Self {
        Self { data }
    }

    /// Number of elements.
    pub fn len(&self) -> u32 {
        self.data.len() as u32
    }

    /// Whether the block holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Reborrow as a shared view.
    pub fn as_ref(&self) -> VecRef<'_, S> {
        VecRef::new(self.data)
    }

    /// The backing slice.
    pub fn as_mut_slice(&mut self) -> &mut [S] {
        self.data
    }

    /// Set every element to `value`.
    pub fn fill(&mut self, value: S) {
        self.data.fill(value);
    }

    /// Copy all values from a same-length source.
    ///
    /// # Panics
    ///
    /// Panics if the lengths differ.
    pub fn copy_from(&mut self, src: &VecRef<'_, S>) {
        assert!(
            self.data.len() == src.as_slice().len(),
            "copy_from on mismatched lengths: {} vs {}",
            self.data.len(),
            src.as_slice().len()
        );
        self.data.copy_from_slice(src.as_slice());
    }
}

impl<S: Scalar> Index<usize> for VecMut<'_, S> {
    type Output = S;

    fn index(&self, i: usize) -> &S {
        &self.data[i]
    }
}

impl<S: Scalar> IndexMut<usize> for VecMut<'_, S> {
    fn index_mut(&mut self, i: usize) -> &mut S {
        &mut self.data[i]
    }
}

#[cfg(test)]
mod tests {
    use crate::allocator::Allocator;
    use crate::config::AllocatorConfig;
    use crate::store::{aligned_total, BlockStore};

    fn store_with_matrix(rows: u32, cols: u32) -> (BlockStore<f64>, crate::MatHandle) {
        let a = Allocator::new(AllocatorConfig::default());
        let cap = aligned_total::<f64>([rows * cols], 64);
        let mut store = BlockStore::new(&a, cap, 0).unwrap();
        let h = store.alloc_matrix(rows, cols);
        (store, h)
    }

    #[test]
    fn column_major_indexing() {
        let (mut store, h) = store_with_matrix(2, 3);
        {
            let mut m = store.matrix_mut(h);
            m[(0, 0)] = 1.0;
            m[(1, 0)] = 2.0;
            m[(0, 2)] = 5.0;
        }
        let m = store.matrix(h);
        assert_eq!(m.col(0), &[1.0, 2.0]);
        assert_eq!(m.col(2), &[5.0, 0.0]);
        assert_eq!(m.get(0, 2), 5.0);
        // Column-major: col 0 first, then col 1, ...
        assert_eq!(m.as_slice(), &[1.0, 2.0, 0.0, 0.0, 5.0, 0.0]);
    }

    #[test]
    fn copy_from_and_is_approx() {
        let (mut src_store, hs) = store_with_matrix(2, 2);
        let (mut dst_store, hd) = store_with_matrix(2, 2);
        src_store.matrix_mut(hs)[(0, 1)] = 3.5;

        dst_store.matrix_mut(hd).copy_from(&src_store.matrix(hs));
        assert!(dst_store
            .matrix(hd)
            .is_approx(&src_store.matrix(hs), f64::EPSILON));

        dst_store.matrix_mut(hd)[(1, 1)] = 0.1;
        assert!(!dst_store
            .matrix(hd)
            .is_approx(&src_store.matrix(hs), 1e-3));
        assert!(dst_store.matrix(hd).is_approx(&src_store.matrix(hs), 0.2));
    }

    #[test]
    #[should_panic(expected = "mismatched shapes")]
    fn is_approx_rejects_shape_mismatch() {
        let (a, ha) = store_with_matrix(2, 2);
        let (b, hb) = store_with_matrix(2, 3);
        a.matrix(ha).is_approx(&b.matrix(hb), 0.0);
    }

    #[test]
    #[should_panic(expected = "mismatched shapes")]
    fn copy_from_rejects_shape_mismatch() {
        let (mut a, ha) = store_with_matrix(3, 2);
        let (b, hb) = store_with_matrix(2, 3);
        a.matrix_mut(ha).copy_from(&b.matrix(hb));
    }

    #[test]
    fn vector_fill_and_display() {
        let alloc = Allocator::new(AllocatorConfig::default());
        let cap = aligned_total::<f64>([3], 64);
        let mut store = BlockStore::<f64>::new(&alloc, cap, 0).unwrap();
        let h = store.alloc_vector(3);
        store.vector_mut(h).fill(2.0);
        assert_eq!(store.vector(h).to_string(), "[2, 2, 2]");
        assert_eq!(store.vector(h).get(1), 2.0);
    }

    #[test]
    fn matrix_display_is_row_by_row() {
        let (mut store, h) = store_with_matrix(2, 2);
        {
            let mut m = store.matrix_mut(h);
            m[(0, 0)] = 1.0;
            m[(0, 1)] = 2.0;
            m[(1, 0)] = 3.0;
            m[(1, 1)] = 4.0;
        }
        assert_eq!(store.matrix(h).to_string(), "[[1, 2], [3, 4]]");
    }
}
