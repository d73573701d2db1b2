//! The block arena: storage, counters, and the allocate/deallocate protocol.

use crate::coalesce;
use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::handle::BlockHandle;
use crate::scan;
use crate::sentinel::{self, PAIR_BYTES, WORD_BYTES};

/// Fixed-capacity block arena with first-fit allocation and eager
/// coalescing.
///
/// Owns a byte buffer sized once at construction and carves it into
/// variable-sized blocks, each delimited by a mirrored sentinel pair.
/// All operations take `&mut self` and run to completion; the type is
/// deliberately not `Sync`-aware — callers wanting concurrent access
/// wrap the whole arena in their own exclusive lock.
///
/// # Example
///
/// ```
/// use quarry_arena::{ArenaConfig, BlockArena};
///
/// let mut arena = BlockArena::new(ArenaConfig::new(256))?;
/// let handle = arena.allocate(32)?;
/// arena.payload_mut(handle)?.fill(0xAB);
/// arena.deallocate(handle)?;
/// assert_eq!(arena.block_count(), 1);
/// # Ok::<(), quarry_arena::ArenaError>(())
/// ```
#[derive(Debug)]
pub struct BlockArena {
    /// Backing storage in words, so the buffer start is 8-byte aligned.
    /// The byte view is truncated to `config.capacity`.
    words: Box<[u64]>,
    /// Arena configuration, immutable after construction.
    config: ArenaConfig,
    /// Sum of payload sizes of all blocks currently marked free.
    free_bytes: usize,
    /// Number of blocks the buffer is currently divided into, free or
    /// occupied. Never below 1.
    block_count: usize,
}

impl BlockArena {
    /// Smallest accepted capacity: one sentinel pair plus one payload byte.
    pub const MIN_CAPACITY: usize = PAIR_BYTES + 1;

    /// Create an arena with the given configuration.
    ///
    /// Writes one sentinel pair describing a single free block spanning
    /// the entire usable region (`capacity - 16` bytes).
    ///
    /// # Errors
    ///
    /// [`ArenaError::CapacityTooSmall`] when `config.capacity` is below
    /// [`Self::MIN_CAPACITY`]; [`ArenaError::InvalidConfig`] when
    /// `config.min_split` is zero.
    pub fn new(config: ArenaConfig) -> Result<Self, ArenaError> {
        if config.capacity < Self::MIN_CAPACITY {
            return Err(ArenaError::CapacityTooSmall {
                capacity: config.capacity,
                minimum: Self::MIN_CAPACITY,
            });
        }
        if config.min_split == 0 {
            return Err(ArenaError::InvalidConfig {
                reason: "min_split must be at least 1".to_string(),
            });
        }

        let words = vec![0u64; config.capacity.div_ceil(WORD_BYTES)].into_boxed_slice();
        let free_bytes = config.capacity - PAIR_BYTES;
        let mut arena = Self {
            words,
            config,
            free_bytes,
            block_count: 1,
        };
        sentinel::write_pair(arena.bytes_mut(), 0, free_bytes as i64);

        arena.trace("new", format_args!("capacity={}", arena.config.capacity));
        debug_assert!(arena.valid());
        Ok(arena)
    }

    /// Allocate a block with at least `size` payload bytes.
    ///
    /// First-fit in address order: the first free block large enough is
    /// selected. When the surplus left after carving out `size` bytes is
    /// below the configured split threshold, the whole block is handed
    /// out; otherwise the block is split and the remainder becomes a new
    /// free block. The arena is unchanged on any error path.
    ///
    /// # Errors
    ///
    /// [`ArenaError::CapacityExhausted`] when `size` exceeds the total
    /// free bytes, or when free space is fragmented across blocks that
    /// are each too small.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn allocate(&mut self, size: usize) -> Result<BlockHandle, ArenaError> {
        assert!(size > 0, "allocation size must be non-zero");

        // Cheap global bound check before the linear walk.
        if size > self.free_bytes {
            return Err(ArenaError::CapacityExhausted {
                requested: size,
                free_bytes: self.free_bytes,
            });
        }

        let Some(block) = scan::first_fit(self.bytes(), size) else {
            // Aggregate free bytes suffice, but no single block does.
            return Err(ArenaError::CapacityExhausted {
                requested: size,
                free_bytes: self.free_bytes,
            });
        };

        let available = block.payload_len;
        if available < size + PAIR_BYTES + self.config.min_split {
            // Surplus too small to justify a split: hand out the whole block.
            sentinel::write_pair(self.bytes_mut(), block.start, -(available as i64));
            self.free_bytes -= available;
        } else {
            let remainder = available - size - PAIR_BYTES;
            let split_at = block.start + PAIR_BYTES + size;
            sentinel::write_pair(self.bytes_mut(), block.start, -(size as i64));
            sentinel::write_pair(self.bytes_mut(), split_at, remainder as i64);
            self.free_bytes -= size + PAIR_BYTES;
            self.block_count += 1;
        }

        let handle = BlockHandle::new(block.payload_start());
        self.trace("allocate", format_args!("size={size} -> {handle}"));
        debug_assert!(self.valid());
        Ok(handle)
    }

    /// Return a block to the arena, merging it with any free neighbour.
    ///
    /// Deallocating a block that is already free is a silent no-op, not
    /// an error: repeated deallocation of the same handle is tolerated.
    /// A handle whose block has since been absorbed into a merged
    /// neighbour no longer addresses a block and is rejected as invalid.
    ///
    /// # Errors
    ///
    /// [`ArenaError::InvalidHandle`] when the handle does not address a
    /// structurally valid block. The arena is unchanged.
    pub fn deallocate(&mut self, handle: BlockHandle) -> Result<(), ArenaError> {
        let Some(block) = sentinel::block_at_payload(self.bytes(), handle.offset) else {
            return Err(ArenaError::InvalidHandle {
                offset: handle.offset,
            });
        };
        if block.free {
            // Double free: already deallocated, tolerated silently.
            return Ok(());
        }

        let span = coalesce::merge_free_neighbours(self.bytes_mut(), block);
        sentinel::write_pair(self.bytes_mut(), span.start, span.payload_len as i64);
        self.free_bytes += block.payload_len + span.merges * PAIR_BYTES;
        self.block_count -= span.merges;

        self.trace(
            "deallocate",
            format_args!("{handle} merges={}", span.merges),
        );
        debug_assert!(self.valid());
        Ok(())
    }

    /// Total arena capacity in bytes, fixed at construction.
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Sum of payload sizes of all blocks currently marked free.
    pub fn free_bytes(&self) -> usize {
        self.free_bytes
    }

    /// Number of blocks the buffer is currently divided into.
    pub fn block_count(&self) -> usize {
        self.block_count
    }

    /// Payload size of the largest free block, or 0 when none is free.
    ///
    /// Computed by a walk; the largest single allocation that can
    /// currently succeed.
    pub fn largest_free_block(&self) -> usize {
        scan::Blocks::new(self.bytes())
            .filter(|b| b.free)
            .map(|b| b.payload_len)
            .max()
            .unwrap_or(0)
    }

    /// Byte view of the arena, truncated to the configured capacity.
    pub(crate) fn bytes(&self) -> &[u8] {
        &bytemuck::cast_slice(&self.words)[..self.config.capacity]
    }

    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        &mut bytemuck::cast_slice_mut(&mut self.words)[..self.config.capacity]
    }

    /// Record free_bytes/block_count for the audit cross-checks.
    pub(crate) fn counters(&self) -> (usize, usize) {
        (self.free_bytes, self.block_count)
    }

    fn trace(&self, op: &str, detail: std::fmt::Arguments<'_>) {
        if self.config.trace {
            eprintln!("[quarry-arena] {op} {detail} | {}", self.layout());
        }
    }
}
