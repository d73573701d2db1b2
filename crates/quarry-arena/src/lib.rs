//! Fixed-capacity block arena with sentinel bookkeeping and coalescing.
//!
//! Services allocation and deallocation requests from a single contiguous
//! byte buffer sized once at construction. No dynamic memory is touched
//! after [`BlockArena::new`] returns, which suits real-time and
//! resource-constrained contexts where heap calls are off the table.
//! This crate is the only one in the workspace permitted `unsafe` code
//! (confined to `place.rs`).
//!
//! # Architecture
//!
//! The buffer is tiled into back-to-back blocks, each delimited by a
//! mirrored pair of signed sentinel words:
//!
//! ```text
//! [ hdr | payload ........ | trl ][ hdr | payload | trl ][ hdr | ... ]
//!   i64    |value| bytes     i64
//! ```
//!
//! The sentinel's magnitude is the payload size in bytes; its sign is the
//! occupancy state (positive = free, negative = occupied). The same word
//! serves as the traversal stride, so there is no side index to keep in
//! sync with the buffer.
//!
//! ```text
//! BlockArena (arena.rs — storage, counters, allocate/deallocate)
//! ├── sentinel.rs  word codec + block decoding/validation
//! ├── scan.rs      first-fit walk over the block chain
//! ├── coalesce.rs  free-neighbour absorption on deallocate
//! ├── place.rs     typed construct/destroy layer over raw payloads
//! └── audit.rs     structural self-check + block-map rendering
//! ```
//!
//! # Safety
//!
//! Positions are byte offsets into the owned buffer, never raw pointers;
//! every offset is validated against the arena bounds before use. The
//! only `unsafe` code is the in-place value move and drop in `place.rs`,
//! each with a mandatory `// SAFETY:` comment.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod arena;
mod audit;
mod coalesce;
pub mod config;
pub mod error;
pub mod handle;
mod place;
mod scan;
mod sentinel;

// Public re-exports for the primary API surface.
pub use arena::BlockArena;
pub use audit::BlockMap;
pub use config::ArenaConfig;
pub use error::ArenaError;
pub use handle::BlockHandle;
