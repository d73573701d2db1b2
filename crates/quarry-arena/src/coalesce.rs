//! Free-neighbour absorption on deallocation.
//!
//! When a block is freed, the blocks immediately before and after it are
//! inspected and absorbed if free. At most one merge happens per side:
//! because every deallocation coalesces eagerly, no two adjacent blocks
//! are ever both free, so a chain of free neighbours cannot exist.

use crate::sentinel::{self, Block, PAIR_BYTES, WORD_BYTES};

/// The span a freed block occupies after absorbing free neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct MergedSpan {
    /// Header offset of the merged block.
    pub start: usize,
    /// Payload size of the merged block in bytes.
    pub payload_len: usize,
    /// Number of neighbours absorbed (0..=2).
    pub merges: usize,
}

/// The block immediately preceding the header at `start`, located by
/// walking backward through its trailer word.
///
/// Returns `None` at the arena start, or when the implied block does not
/// validate forward from its own header and end exactly at `start`.
pub(crate) fn prev_block(bytes: &[u8], start: usize) -> Option<Block> {
    let trailer_at = start.checked_sub(WORD_BYTES)?;
    let trailer = sentinel::read_word(bytes, trailer_at);
    if trailer == 0 {
        return None;
    }
    let payload_len: usize = trailer.unsigned_abs().try_into().ok()?;
    let prev_start = trailer_at.checked_sub(WORD_BYTES + payload_len)?;
    let block = sentinel::block_at(bytes, prev_start)?;
    (block.end() == start).then_some(block)
}

/// The block whose header sits at `end`, if one validates there.
pub(crate) fn next_block(bytes: &[u8], end: usize) -> Option<Block> {
    sentinel::block_at(bytes, end)
}

/// Absorb free neighbours of `block` into a single merged span.
///
/// Zeroes the sentinel words at each absorbed junction so that a stale
/// handle into an absorbed block can never re-validate later; the caller
/// writes the fresh pair over the merged span. Does not touch counters.
pub(crate) fn merge_free_neighbours(bytes: &mut [u8], block: Block) -> MergedSpan {
    let mut span = MergedSpan {
        start: block.start,
        payload_len: block.payload_len,
        merges: 0,
    };

    if let Some(prev) = prev_block(bytes, block.start) {
        if prev.free {
            span.start = prev.start;
            span.payload_len += prev.payload_len + PAIR_BYTES;
            span.merges += 1;
            // The junction words become payload interior; stale sentinel
            // values there would let an absorbed handle validate again.
            sentinel::write_word(bytes, block.start - WORD_BYTES, 0);
            sentinel::write_word(bytes, block.start, 0);
        }
    }

    if let Some(next) = next_block(bytes, block.end()) {
        if next.free {
            span.payload_len += next.payload_len + PAIR_BYTES;
            span.merges += 1;
            sentinel::write_word(bytes, next.start - WORD_BYTES, 0);
            sentinel::write_word(bytes, next.start, 0);
        }
    }

    span
}
