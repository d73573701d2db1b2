//! Linear traversal over the block chain.
//!
//! The buffer carries no side index: each sentinel's magnitude is the
//! stride to the next block, so a walk from offset 0 visits every block
//! in address order. [`first_fit`] implements the allocation policy —
//! the first free block large enough wins, with no attempt to find a
//! tighter candidate.

use crate::sentinel::{self, Block};

/// Iterator over the blocks of an arena buffer, in address order.
///
/// Stops at the end of the buffer, or early if a sentinel fails to
/// decode — the iterator never strides into structural nonsense.
/// Precise corruption reporting is the audit pass's job.
pub(crate) struct Blocks<'a> {
    bytes: &'a [u8],
    cursor: usize,
}

impl<'a> Blocks<'a> {
    /// Walk `bytes` from offset 0.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, cursor: 0 }
    }
}

impl Iterator for Blocks<'_> {
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        if self.cursor >= self.bytes.len() {
            return None;
        }
        let block = sentinel::block_at(self.bytes, self.cursor)?;
        self.cursor = block.end();
        Some(block)
    }
}

/// First free block (in address order) with at least `size` payload bytes.
///
/// Occupied blocks and undersized free blocks are skipped by striding
/// past them. Returns `None` when the walk reaches the end of the buffer
/// without a fit — which can happen even when aggregate free bytes would
/// suffice, because free space may be fragmented.
pub(crate) fn first_fit(bytes: &[u8], size: usize) -> Option<Block> {
    Blocks::new(bytes).find(|b| b.free && b.payload_len >= size)
}
