//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during arena operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// Requested construction capacity cannot hold even one block.
    CapacityTooSmall {
        /// The capacity that was requested.
        capacity: usize,
        /// The smallest capacity the arena accepts.
        minimum: usize,
    },
    /// A configuration value other than capacity failed validation.
    InvalidConfig {
        /// What was wrong with the configuration.
        reason: String,
    },
    /// No block can satisfy the request — either total free bytes are
    /// insufficient, or free space is fragmented across blocks that are
    /// each too small.
    CapacityExhausted {
        /// Number of bytes requested.
        requested: usize,
        /// Total free bytes at the time of the request.
        free_bytes: usize,
    },
    /// A handle that does not address the payload of a live block.
    InvalidHandle {
        /// The payload offset the handle carried.
        offset: usize,
    },
    /// A typed value does not fit in the block's payload.
    ValueTooLarge {
        /// Size of the value in bytes.
        size: usize,
        /// Payload capacity of the block.
        payload: usize,
    },
    /// A block's payload is not aligned for the requested type.
    Misaligned {
        /// The payload offset of the block.
        offset: usize,
        /// The alignment the type requires.
        align: usize,
    },
    /// The structural self-check found a damaged sentinel chain.
    Corrupted {
        /// Byte offset where the first violation was detected.
        offset: usize,
        /// What the check found there.
        reason: String,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityTooSmall { capacity, minimum } => {
                write!(
                    f,
                    "arena capacity too small: {capacity} bytes, minimum {minimum} bytes"
                )
            }
            Self::InvalidConfig { reason } => {
                write!(f, "invalid arena config: {reason}")
            }
            Self::CapacityExhausted {
                requested,
                free_bytes,
            } => {
                write!(
                    f,
                    "arena exhausted: requested {requested} bytes, {free_bytes} bytes free"
                )
            }
            Self::InvalidHandle { offset } => {
                write!(f, "invalid handle: offset {offset} does not address a live block")
            }
            Self::ValueTooLarge { size, payload } => {
                write!(
                    f,
                    "value of {size} bytes exceeds block payload of {payload} bytes"
                )
            }
            Self::Misaligned { offset, align } => {
                write!(
                    f,
                    "block payload at offset {offset} is not aligned to {align} bytes"
                )
            }
            Self::Corrupted { offset, reason } => {
                write!(f, "arena corrupted at offset {offset}: {reason}")
            }
        }
    }
}

impl Error for ArenaError {}
