//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during arena operations.
///
/// Shape and contract violations are deliberately *not* represented here —
/// they are programmer errors and fail fast via assertions. `ArenaError`
/// covers only conditions a correct caller can hit at runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// An allocator with a byte budget cannot satisfy an allocation.
    CapacityExceeded {
        /// Number of bytes requested.
        requested: usize,
        /// Bytes still available under the budget.
        capacity: usize,
    },
    /// A handle from a store generation that has been superseded.
    StaleHandle {
        /// The generation encoded in the handle.
        handle_generation: u32,
        /// The store's current generation.
        store_generation: u32,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded {
                requested,
                capacity,
            } => {
                write!(
                    f,
                    "allocator capacity exceeded: requested {requested} bytes, {capacity} bytes available"
                )
            }
            Self::StaleHandle {
                handle_generation,
                store_generation,
            } => {
                write!(
                    f,
                    "stale handle: generation {handle_generation}, store is at {store_generation}"
                )
            }
        }
    }
}

impl Error for ArenaError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_capacity_exceeded() {
        let e = ArenaError::CapacityExceeded {
            requested: 4096,
            capacity: 1024,
        };
        let msg = e.to_string();
        assert!(msg.contains("4096"));
        assert!(msg.contains("1024"));
    }

    #[test]
    fn display_stale_handle() {
        let e = ArenaError::StaleHandle {
            handle_generation: 1,
            store_generation: 2,
        };
        assert!(e.to_string().contains("stale handle"));
    }
}
