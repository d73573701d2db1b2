//! Structural self-check and block-map rendering.
//!
//! The audit pass walks the whole buffer and verifies every sentinel
//! pair plus the arena's counters. It is diagnostic, not part of normal
//! control flow: mutating operations end with `debug_assert!(valid())`,
//! which compiles out in release builds.

use std::fmt;

use crate::arena::BlockArena;
use crate::error::ArenaError;
use crate::scan::Blocks;
use crate::sentinel::{self, PAIR_BYTES, WORD_BYTES};

impl BlockArena {
    /// Verify the sentinel chain and counters, reporting the first
    /// violation found.
    ///
    /// Walks from offset 0 to the end of the buffer, checking at every
    /// step that the header is non-zero, the implied block lies in
    /// bounds, and the mirrored trailer agrees in sign and magnitude;
    /// then cross-checks `free_bytes`, `block_count`, and the overhead
    /// bound against the walked chain.
    ///
    /// # Errors
    ///
    /// [`ArenaError::Corrupted`] naming the offset and nature of the
    /// first violation.
    pub fn audit(&self) -> Result<(), ArenaError> {
        let bytes = self.bytes();
        let corrupt = |offset: usize, reason: &str| ArenaError::Corrupted {
            offset,
            reason: reason.to_string(),
        };

        let mut cursor = 0;
        let mut free_sum = 0usize;
        let mut walked = 0usize;
        while cursor < bytes.len() {
            if cursor + PAIR_BYTES > bytes.len() {
                return Err(corrupt(cursor, "trailing bytes too small for a block"));
            }
            let header = sentinel::read_word(bytes, cursor);
            if header == 0 {
                return Err(corrupt(cursor, "zero sentinel"));
            }
            let payload_len: usize = header
                .unsigned_abs()
                .try_into()
                .map_err(|_| corrupt(cursor, "block size overflows"))?;
            let end = cursor
                .checked_add(PAIR_BYTES)
                .and_then(|c| c.checked_add(payload_len))
                .ok_or_else(|| corrupt(cursor, "block size overflows"))?;
            if end > bytes.len() {
                return Err(corrupt(cursor, "block overruns arena"));
            }
            let trailer = sentinel::read_word(bytes, cursor + WORD_BYTES + payload_len);
            if trailer != header {
                return Err(corrupt(cursor, "trailer disagrees with header"));
            }
            if header > 0 {
                free_sum += payload_len;
            }
            walked += 1;
            cursor = end;
        }

        let (free_bytes, block_count) = self.counters();
        if walked != block_count {
            return Err(corrupt(0, "block count disagrees with walked chain"));
        }
        if free_sum != free_bytes {
            return Err(corrupt(0, "free byte counter disagrees with walked chain"));
        }
        if self.capacity() < free_bytes + block_count * PAIR_BYTES {
            return Err(corrupt(0, "counters exceed arena capacity"));
        }
        Ok(())
    }

    /// Whether the structural self-check passes.
    pub fn valid(&self) -> bool {
        self.audit().is_ok()
    }

    /// Render the block chain, e.g. `[used 4][used 4][free 43]`.
    pub fn layout(&self) -> BlockMap<'_> {
        BlockMap {
            bytes: self.bytes(),
        }
    }
}

/// `Display` adapter over the block chain.
///
/// One bracket per block in address order, marked `free` or `used` with
/// the payload size in bytes. Rendering stops with `[?]` if a sentinel
/// fails to decode.
pub struct BlockMap<'a> {
    bytes: &'a [u8],
}

impl fmt::Display for BlockMap<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut cursor = 0;
        let mut blocks = Blocks::new(self.bytes);
        for block in &mut blocks {
            let state = if block.free { "free" } else { "used" };
            write!(f, "[{state} {}]", block.payload_len)?;
            cursor = block.end();
        }
        if cursor < self.bytes.len() {
            write!(f, "[?]")?;
        }
        Ok(())
    }
}
