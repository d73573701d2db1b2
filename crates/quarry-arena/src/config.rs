//! Arena configuration parameters.

/// Configuration for a [`BlockArena`](crate::BlockArena).
///
/// Validated at construction; all values are immutable after creation.
#[derive(Clone, Debug)]
pub struct ArenaConfig {
    /// Total arena capacity in bytes, fixed for the instance's lifetime.
    ///
    /// Must be at least [`BlockArena::MIN_CAPACITY`](crate::BlockArena::MIN_CAPACITY):
    /// one sentinel pair plus one payload byte.
    pub capacity: usize,

    /// Minimum leftover payload (in bytes) that justifies splitting a
    /// free block on allocation.
    ///
    /// When the selected block's surplus after carving out a request is
    /// below this threshold, the whole block is handed out instead of
    /// creating a free remainder smaller than one sentinel word.
    /// Default: 8. Must be at least 1.
    pub min_split: usize,

    /// Emit a diagnostic line (operation + block map) to stderr after
    /// each mutating operation. No effect on allocator semantics.
    ///
    /// Default: `false`.
    pub trace: bool,
}

impl ArenaConfig {
    /// Default minimum split threshold: one sentinel word (8 bytes).
    pub const DEFAULT_MIN_SPLIT: usize = 8;

    /// Create a new arena config for the given byte capacity.
    ///
    /// Uses default values for all other parameters.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            min_split: Self::DEFAULT_MIN_SPLIT,
            trace: false,
        }
    }
}
