//! Typed construct/destroy layer over raw block payloads.
//!
//! A thin placement layer: [`BlockArena::construct`] moves a value into a
//! previously allocated, not-yet-initialized payload and
//! [`BlockArena::destroy`] runs a value's drop in place without releasing
//! the block. Neither alters arena bookkeeping; releasing the block is a
//! separate, explicit [`BlockArena::deallocate`] call.
//!
//! This module holds the crate's only `unsafe` code: the in-place write
//! and the in-place drop. Everything around them — bounds, occupancy,
//! size, and alignment — is validated first through safe offset checks.

#![allow(unsafe_code)]

use std::mem;

use crate::arena::BlockArena;
use crate::error::ArenaError;
use crate::handle::BlockHandle;
use crate::sentinel::{self, Block};

impl BlockArena {
    /// Allocate a block sized for `count` values of type `T`.
    ///
    /// Computes `count * size_of::<T>()` with overflow checking and
    /// delegates to [`BlockArena::allocate`]. A request whose byte size
    /// overflows `usize` is reported as [`ArenaError::CapacityExhausted`]
    /// with the request saturated.
    ///
    /// # Panics
    ///
    /// Panics if `count` is zero or `T` is zero-sized.
    pub fn allocate_for<T>(&mut self, count: usize) -> Result<BlockHandle, ArenaError> {
        assert!(count > 0, "allocation count must be non-zero");
        assert!(mem::size_of::<T>() > 0, "zero-sized types need no storage");
        let size = count.checked_mul(mem::size_of::<T>()).unwrap_or(usize::MAX);
        self.allocate(size)
    }

    /// Shared view of a block's payload bytes.
    ///
    /// # Errors
    ///
    /// [`ArenaError::InvalidHandle`] when the handle does not address a
    /// live occupied block.
    pub fn payload(&self, handle: BlockHandle) -> Result<&[u8], ArenaError> {
        let block = self.occupied_block(handle)?;
        Ok(&self.bytes()[block.payload_start()..block.payload_start() + block.payload_len])
    }

    /// Mutable view of a block's payload bytes.
    ///
    /// # Errors
    ///
    /// [`ArenaError::InvalidHandle`] when the handle does not address a
    /// live occupied block.
    pub fn payload_mut(&mut self, handle: BlockHandle) -> Result<&mut [u8], ArenaError> {
        let block = self.occupied_block(handle)?;
        let start = block.payload_start();
        let len = block.payload_len;
        Ok(&mut self.bytes_mut()[start..start + len])
    }

    /// Move `value` into the start of the block's payload and return a
    /// reference to it.
    ///
    /// Does not drop any value previously constructed at that address —
    /// callers re-initializing a payload must [`BlockArena::destroy`] the
    /// old value first or accept the leak.
    ///
    /// # Errors
    ///
    /// [`ArenaError::InvalidHandle`] when the handle does not address a
    /// live occupied block; [`ArenaError::ValueTooLarge`] when `T` does
    /// not fit the payload; [`ArenaError::Misaligned`] when the payload's
    /// address is not aligned for `T`.
    pub fn construct<T>(&mut self, handle: BlockHandle, value: T) -> Result<&mut T, ArenaError> {
        let ptr = self.typed_payload::<T>(handle)?;
        // SAFETY: `typed_payload` verified the pointer addresses at least
        // `size_of::<T>()` in-bounds payload bytes, aligned for `T`, in
        // storage this arena exclusively owns and borrows mutably here.
        unsafe {
            ptr.write(value);
            Ok(&mut *ptr)
        }
    }

    /// Run `T`'s drop for the value at the start of the block's payload,
    /// without releasing the block.
    ///
    /// # Errors
    ///
    /// Same validation as [`BlockArena::construct`].
    ///
    /// # Safety
    ///
    /// The caller must guarantee that a valid `T` was previously
    /// constructed at this handle and has not already been destroyed.
    pub unsafe fn destroy<T>(&mut self, handle: BlockHandle) -> Result<(), ArenaError> {
        let ptr = self.typed_payload::<T>(handle)?;
        // SAFETY: pointer validity as in `construct`; the caller asserts
        // an initialized `T` lives there.
        unsafe {
            ptr.drop_in_place();
        }
        Ok(())
    }

    /// Resolve a handle to a validated, aligned `*mut T` at the payload
    /// start. All checks happen on offsets before the pointer is formed.
    fn typed_payload<T>(&mut self, handle: BlockHandle) -> Result<*mut T, ArenaError> {
        let block = self.occupied_block(handle)?;
        if mem::size_of::<T>() > block.payload_len {
            return Err(ArenaError::ValueTooLarge {
                size: mem::size_of::<T>(),
                payload: block.payload_len,
            });
        }
        let start = block.payload_start();
        let bytes = self.bytes_mut();
        let ptr = bytes[start..].as_mut_ptr();
        if ptr.addr() % mem::align_of::<T>() != 0 {
            return Err(ArenaError::Misaligned {
                offset: start,
                align: mem::align_of::<T>(),
            });
        }
        Ok(ptr.cast::<T>())
    }

    /// Decode the occupied block a handle addresses.
    ///
    /// A handle to a block that has been deallocated (or absorbed into a
    /// merged neighbour) confers no further payload access.
    fn occupied_block(&self, handle: BlockHandle) -> Result<Block, ArenaError> {
        match sentinel::block_at_payload(self.bytes(), handle.offset()) {
            Some(block) if !block.free => Ok(block),
            _ => Err(ArenaError::InvalidHandle {
                offset: handle.offset(),
            }),
        }
    }
}
