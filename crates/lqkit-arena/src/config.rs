//! Allocator configuration parameters.

/// Configuration for an [`crate::Allocator`].
///
/// Validated at construction; all values are immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocatorConfig {
    /// Alignment of every block's first element, in bytes.
    ///
    /// Default: 64, sufficient for vectorized elementwise operations on
    /// current SIMD widths. Must be a power of two and at least the size
    /// of the scalar type stored.
    pub align_bytes: usize,

    /// Optional byte budget across all live stores charged to the allocator.
    ///
    /// `None` (the default) means unlimited: allocation never fails. A
    /// budgeted allocator rejects allocations that would exceed the budget
    /// with [`crate::ArenaError::CapacityExceeded`].
    pub capacity_bytes: Option<usize>,
}

impl AllocatorConfig {
    /// Default block alignment in bytes.
    pub const DEFAULT_ALIGN_BYTES: usize = 64;

    /// Create a config with the given alignment and no byte budget.
    ///
    /// # Panics
    ///
    /// Panics if `align_bytes` is zero or not a power of two.
    pub fn new(align_bytes: usize) -> Self {
        assert!(
            align_bytes.is_power_of_two(),
            "align_bytes must be a power of two, got {align_bytes}"
        );
        Self {
            align_bytes,
            capacity_bytes: None,
        }
    }

    /// This config with a byte budget applied.
    #[must_use]
    pub fn with_capacity(mut self, capacity_bytes: usize) -> Self {
        self.capacity_bytes = Some(capacity_bytes);
        self
    }
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ALIGN_BYTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_64_byte_aligned_unbounded() {
        let config = AllocatorConfig::default();
        assert_eq!(config.align_bytes, 64);
        assert_eq!(config.capacity_bytes, None);
    }

    #[test]
    fn with_capacity_sets_budget() {
        let config = AllocatorConfig::new(32).with_capacity(1 << 20);
        assert_eq!(config.capacity_bytes, Some(1 << 20));
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn rejects_non_power_of_two_alignment() {
        AllocatorConfig::new(48);
    }
}
