//! Workload profiles for benchmarking lazy-arena.
//!
//! - [`mixed_sizes`]: deterministic sequence of small allocation sizes
//! - [`nested_scratch`]: outer context plus a forgotten nested scratch
//!   context, released by a single pop

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use lazy_arena::{ArenaError, ArenaStack};

/// Deterministic allocation sizes in `1..=max`, derived from `seed`.
///
/// Uses a xorshift sequence so the same seed always yields the same
/// workload across runs and machines.
pub fn mixed_sizes(count: usize, max: usize, seed: u64) -> Vec<usize> {
    let mut state = seed.max(1);
    (0..count)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state % max.max(1) as u64) as usize + 1
        })
        .collect()
}

/// Push an outer context, allocate `sizes` from it, push a nested scratch
/// context that is never popped explicitly, and release both with one pop.
///
/// Returns the number of contexts released.
pub fn nested_scratch(
    stack: &mut ArenaStack,
    outer_bytes: usize,
    scratch_bytes: usize,
    sizes: &[usize],
) -> Result<usize, ArenaError> {
    let outer = stack.push_context(outer_bytes)?;
    for &size in sizes {
        stack.allocate(size)?;
    }
    stack.push_context(scratch_bytes)?;
    stack.allocate(sizes.first().copied().unwrap_or(0))?;
    Ok(stack.pop_context(outer))
}
