//! Value-semantic allocator handles.
//!
//! An [`Allocator`] is a cheaply-cloneable handle to a memory-arena
//! identity. Every [`crate::BlockStore`] is charged against exactly one
//! allocator, and the model layer verifies that all sibling stores of one
//! owner share one allocator identity — so the handle must be
//! equality-comparable. Byte accounting is atomic, allowing one allocator
//! to be shared across many knots and problems, including across threads.

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use crate::config::AllocatorConfig;
use crate::error::ArenaError;

/// Counter for unique allocator identity allocation.
static ALLOCATOR_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Shared process-wide default allocator.
static GLOBAL_ALLOCATOR: OnceLock<Allocator> = OnceLock::new();

/// A value-semantic handle to a memory arena.
///
/// Cloning is cheap (an `Arc` bump) and preserves identity: clones compare
/// equal and share byte accounting. Two independently constructed
/// allocators never compare equal, even with identical configuration.
#[derive(Clone)]
pub struct Allocator {
    inner: Arc<AllocatorInner>,
}

struct AllocatorInner {
    id: u64,
    config: AllocatorConfig,
    bytes_in_use: AtomicUsize,
}

impl Allocator {
    /// Create a fresh allocator with the given configuration.
    pub fn new(config: AllocatorConfig) -> Self {
        Self {
            inner: Arc::new(AllocatorInner {
                id: ALLOCATOR_ID_COUNTER.fetch_add(1, Ordering::Relaxed),
                config,
                bytes_in_use: AtomicUsize::new(0),
            }),
        }
    }

    /// The shared process-wide default allocator (unbounded, 64B-aligned).
    ///
    /// All owners constructed without an explicit allocator use this one,
    /// so they compare allocator-equal to each other.
    pub fn global() -> Self {
        GLOBAL_ALLOCATOR
            .get_or_init(|| Self::new(AllocatorConfig::default()))
            .clone()
    }

    /// Unique identity of the underlying arena.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// The configuration this allocator was created with.
    pub fn config(&self) -> &AllocatorConfig {
        &self.inner.config
    }

    /// Bytes currently charged to this allocator across all live stores.
    pub fn bytes_in_use(&self) -> usize {
        self.inner.bytes_in_use.load(Ordering::Relaxed)
    }

    /// Charge `bytes` against the budget.
    ///
    /// Fails with [`ArenaError::CapacityExceeded`] if the configured budget
    /// would be exceeded. Unbounded allocators never fail.
    pub(crate) fn charge(&self, bytes: usize) -> Result<(), ArenaError> {
        match self.inner.config.capacity_bytes {
            None => {
                self.inner.bytes_in_use.fetch_add(bytes, Ordering::Relaxed);
                Ok(())
            }
            Some(cap) => loop {
                let used = self.inner.bytes_in_use.load(Ordering::Relaxed);
                let available = cap.saturating_sub(used);
                let new = used.checked_add(bytes).filter(|&n| n <= cap);
                let Some(new) = new else {
                    return Err(ArenaError::CapacityExceeded {
                        requested: bytes,
                        capacity: available,
                    });
                };
                if self
                    .inner
                    .bytes_in_use
                    .compare_exchange(used, new, Ordering::Relaxed, Ordering::Relaxed)
                    .is_ok()
                {
                    return Ok(());
                }
            },
        }
    }

    /// Release previously charged bytes.
    pub(crate) fn release(&self, bytes: usize) {
        self.inner.bytes_in_use.fetch_sub(bytes, Ordering::Relaxed);
    }
}

impl Default for Allocator {
    fn default() -> Self {
        Self::global()
    }
}

impl PartialEq for Allocator {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Allocator {}

impl fmt::Debug for Allocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Allocator")
            .field("id", &self.inner.id)
            .field("bytes_in_use", &self.bytes_in_use())
            .field("config", &self.inner.config)
            .finish()
    }
}

impl fmt::Display for Allocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Allocator({})", self.inner.id)
    }
}
