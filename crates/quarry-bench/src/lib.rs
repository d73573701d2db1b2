//! Benchmark workloads for the quarry block arena.
//!
//! Provides deterministic, seed-driven allocate/free sequences so the
//! criterion benches measure the same block-chain shapes on every run:
//!
//! - [`churn_workload`]: random interleaving of allocations and frees
//! - [`run_workload`]: drive a workload against an arena
//! - [`drain_refill_cycle`]: fill to exhaustion, then free forward

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use quarry_arena::{ArenaConfig, BlockArena, BlockHandle};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// One step of a benchmark workload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArenaOp {
    /// Allocate a block with this many payload bytes.
    Allocate(usize),
    /// Free the live handle at this index (taken modulo the live count).
    Free(usize),
}

/// Build a deterministic allocate/free interleaving.
///
/// Roughly 60% allocations so the chain stays populated; sizes are drawn
/// uniformly from `1..=max_size`. Identical seeds produce identical
/// sequences.
pub fn churn_workload(seed: u64, ops: usize, max_size: usize) -> Vec<ArenaOp> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..ops)
        .map(|_| {
            if rng.random_range(0..10) < 6 {
                ArenaOp::Allocate(rng.random_range(1..=max_size))
            } else {
                ArenaOp::Free(rng.random_range(0..usize::MAX))
            }
        })
        .collect()
}

/// Drive a workload against `arena`, tracking live handles.
///
/// Allocations that fail (arena exhausted or fragmented) are skipped;
/// frees with no live handle are skipped. Returns the number of
/// completed allocations.
pub fn run_workload(arena: &mut BlockArena, ops: &[ArenaOp]) -> usize {
    let mut live: Vec<BlockHandle> = Vec::new();
    let mut completed = 0;
    for op in ops {
        match *op {
            ArenaOp::Allocate(size) => {
                if let Ok(handle) = arena.allocate(size) {
                    live.push(handle);
                    completed += 1;
                }
            }
            ArenaOp::Free(index) => {
                if !live.is_empty() {
                    let handle = live.swap_remove(index % live.len());
                    arena
                        .deallocate(handle)
                        .expect("workload handles are always live");
                }
            }
        }
    }
    for handle in live {
        arena
            .deallocate(handle)
            .expect("workload handles are always live");
    }
    completed
}

/// Fill the arena to exhaustion with `size`-byte records, then free them
/// in allocation order. Returns the number of records that fit.
pub fn drain_refill_cycle(arena: &mut BlockArena, size: usize) -> usize {
    let mut handles = Vec::new();
    while let Ok(handle) = arena.allocate(size) {
        handles.push(handle);
    }
    let count = handles.len();
    for handle in handles {
        arena
            .deallocate(handle)
            .expect("drained handles are always live");
    }
    count
}

/// Build the arena all benches use: 64KiB, default split threshold.
pub fn bench_arena() -> BlockArena {
    BlockArena::new(ArenaConfig::new(64 * 1024)).expect("bench capacity is valid")
}
