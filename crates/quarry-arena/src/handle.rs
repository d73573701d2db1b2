//! Block handles.
//!
//! A [`BlockHandle`] is the only externally visible representation of a
//! block: the byte offset of the block's payload start (one sentinel word
//! past the block's header). Handles are offsets, never pointers, so all
//! resolution goes through the arena's bounds checks.

use std::fmt;

/// Opaque reference to an allocated block's payload.
///
/// Returned by [`BlockArena::allocate`](crate::BlockArena::allocate) and
/// consumed by the payload, typed-placement, and deallocation operations.
/// A handle confers access to the payload region only — never to the
/// sentinel words around it — and only until the block is deallocated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct BlockHandle {
    /// Byte offset of the payload start within the arena.
    pub(crate) offset: usize,
}

impl BlockHandle {
    /// Create a new handle.
    pub(crate) fn new(offset: usize) -> Self {
        Self { offset }
    }

    /// Byte offset of the payload start within the arena.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl fmt::Display for BlockHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHandle(offset={})", self.offset)
    }
}
