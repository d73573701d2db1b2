//! Sentinel codec: the mirrored boundary markers that delimit blocks.
//!
//! Every block is bounded by two identical `i64` words — a header
//! immediately before the payload and a trailer immediately after it.
//! The magnitude is the payload size in bytes; the sign is the occupancy
//! state (positive = free, negative = occupied). A zero word is never
//! written by any operation and always means corruption.
//!
//! The sentinel doubles as the traversal index: striding forward by
//! `PAIR_BYTES + |header|` lands on the next block's header, and the word
//! just before a header is the previous block's trailer. No module
//! outside this one interprets raw sentinel words.

/// Width of one sentinel word in bytes.
pub(crate) const WORD_BYTES: usize = std::mem::size_of::<i64>();

/// Per-block overhead: one header plus one trailer.
pub(crate) const PAIR_BYTES: usize = 2 * WORD_BYTES;

/// Read the sentinel word at `offset`.
///
/// # Panics
///
/// Panics if `offset + WORD_BYTES` exceeds the buffer. Callers validate
/// bounds first; this is an internal primitive.
pub(crate) fn read_word(bytes: &[u8], offset: usize) -> i64 {
    let mut word = [0u8; WORD_BYTES];
    word.copy_from_slice(&bytes[offset..offset + WORD_BYTES]);
    i64::from_ne_bytes(word)
}

/// Write the sentinel word `value` at `offset`.
pub(crate) fn write_word(bytes: &mut [u8], offset: usize, value: i64) {
    bytes[offset..offset + WORD_BYTES].copy_from_slice(&value.to_ne_bytes());
}

/// Write `value` as the header at `start` and again as the mirrored
/// trailer at `start + WORD_BYTES + |value|`.
pub(crate) fn write_pair(bytes: &mut [u8], start: usize, value: i64) {
    debug_assert_ne!(value, 0, "zero sentinels are never written");
    let payload = value.unsigned_abs() as usize;
    write_word(bytes, start, value);
    write_word(bytes, start + WORD_BYTES + payload, value);
}

/// Decoded description of one block in the chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Block {
    /// Byte offset of the header word.
    pub start: usize,
    /// Payload size in bytes (sentinel magnitude).
    pub payload_len: usize,
    /// Occupancy state (sentinel sign).
    pub free: bool,
}

impl Block {
    /// Offset of the first payload byte.
    pub fn payload_start(&self) -> usize {
        self.start + WORD_BYTES
    }

    /// Offset one past the trailer word — the next block's header, or the
    /// end of the arena.
    pub fn end(&self) -> usize {
        self.start + PAIR_BYTES + self.payload_len
    }
}

/// Decode the block whose header sits at `start`.
///
/// Returns `None` unless the implied block lies fully inside the buffer
/// with a non-zero header and an agreeing trailer. This is the single
/// in-bounds predicate the rest of the crate relies on.
pub(crate) fn block_at(bytes: &[u8], start: usize) -> Option<Block> {
    if start.checked_add(PAIR_BYTES)? > bytes.len() {
        return None;
    }
    let header = read_word(bytes, start);
    if header == 0 {
        return None;
    }
    let payload_len = header.unsigned_abs().try_into().ok()?;
    let end = start.checked_add(PAIR_BYTES)?.checked_add(payload_len)?;
    if end > bytes.len() {
        return None;
    }
    let trailer = read_word(bytes, start + WORD_BYTES + payload_len);
    if trailer != header {
        return None;
    }
    Some(Block {
        start,
        payload_len,
        free: header > 0,
    })
}

/// Decode the block whose payload starts at `payload_offset`.
///
/// This is the handle-resolution path: a handle carries the payload
/// offset, one word past the header.
pub(crate) fn block_at_payload(bytes: &[u8], payload_offset: usize) -> Option<Block> {
    let start = payload_offset.checked_sub(WORD_BYTES)?;
    block_at(bytes, start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_round_trips_through_block_at() {
        let mut bytes = vec![0u8; 64];
        write_pair(&mut bytes, 0, 48);
        let block = block_at(&bytes, 0).unwrap();
        assert_eq!(block.start, 0);
        assert_eq!(block.payload_len, 48);
        assert!(block.free);
        assert_eq!(block.end(), 64);
    }

    #[test]
    fn negative_pair_decodes_as_occupied() {
        let mut bytes = vec![0u8; 32];
        write_pair(&mut bytes, 0, -16);
        let block = block_at(&bytes, 0).unwrap();
        assert_eq!(block.payload_len, 16);
        assert!(!block.free);
        assert_eq!(block.payload_start(), WORD_BYTES);
    }

    #[test]
    fn zero_header_is_rejected() {
        let bytes = vec![0u8; 32];
        assert!(block_at(&bytes, 0).is_none());
    }

    #[test]
    fn block_overrunning_buffer_is_rejected() {
        let mut bytes = vec![0u8; 32];
        // Header claims 100 payload bytes; the trailer would land outside.
        write_word(&mut bytes, 0, 100);
        assert!(block_at(&bytes, 0).is_none());
    }

    #[test]
    fn disagreeing_trailer_is_rejected() {
        let mut bytes = vec![0u8; 32];
        write_pair(&mut bytes, 0, 16);
        write_word(&mut bytes, WORD_BYTES + 16, 12);
        assert!(block_at(&bytes, 0).is_none());
    }

    #[test]
    fn sign_mismatch_is_rejected() {
        let mut bytes = vec![0u8; 32];
        write_pair(&mut bytes, 0, 16);
        write_word(&mut bytes, WORD_BYTES + 16, -16);
        assert!(block_at(&bytes, 0).is_none());
    }

    #[test]
    fn start_past_buffer_is_rejected() {
        let mut bytes = vec![0u8; 32];
        write_pair(&mut bytes, 0, 16);
        assert!(block_at(&bytes, 32).is_none());
        assert!(block_at(&bytes, usize::MAX - 4).is_none());
    }

    #[test]
    fn payload_offset_below_first_header_is_rejected() {
        let mut bytes = vec![0u8; 32];
        write_pair(&mut bytes, 0, 16);
        assert!(block_at_payload(&bytes, 0).is_none());
        assert!(block_at_payload(&bytes, WORD_BYTES - 1).is_none());
        assert!(block_at_payload(&bytes, WORD_BYTES).is_some());
    }
}
