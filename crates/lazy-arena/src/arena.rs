//! Fixed-capacity bump arenas.
//!
//! An [`Arena`] is a single contiguous byte block with a cursor that only
//! moves forward. Allocations are served by advancing the cursor; nothing
//! is ever released individually. The block is reclaimed all at once by
//! [`reset`](Arena::reset) (cursor rewound, memory kept) or by dropping the
//! arena (memory released).

use std::alloc::{alloc_zeroed, Layout};
use std::ptr::{self, NonNull};

use crate::error::ArenaError;

/// A fixed-size memory block with bump allocation.
///
/// The backing block is reserved in full at construction and never grows.
/// The cursor satisfies `0 <= used() <= capacity()` at all times.
pub struct Arena {
    /// Backing storage. Allocated to full capacity at creation.
    memory: Box<[u8]>,
    /// Bump pointer: next free byte.
    offset: usize,
}

impl Arena {
    /// Reserve a new arena of `capacity` bytes.
    ///
    /// An allocator refusal surfaces as
    /// [`ArenaError::ContextAllocationFailure`] instead of aborting the
    /// process. The block comes from a zeroed allocation, so no byte is
    /// written here and pages are committed lazily by the OS.
    pub fn try_new(capacity: usize) -> Result<Self, ArenaError> {
        Ok(Self {
            memory: zeroed_block(capacity)?,
            offset: 0,
        })
    }

    /// Bump-allocate `size` bytes.
    ///
    /// Returns `(offset, slice)` where `offset` is the starting position
    /// within this arena. No alignment padding is applied: consecutive
    /// allocations are byte-adjacent. On failure the cursor is unchanged.
    pub fn alloc_bytes(&mut self, size: usize) -> Result<(usize, &mut [u8]), ArenaError> {
        let start = self.offset;
        let end = self.fit(start, size, 0)?;
        self.offset = end;
        Ok((start, &mut self.memory[start..end]))
    }

    /// Bump-allocate `size` bytes whose address is a multiple of `align`.
    ///
    /// Padding inserted before the allocation is consumed from the arena's
    /// capacity. `align` must be a non-zero power of two.
    pub fn alloc_bytes_aligned(
        &mut self,
        size: usize,
        align: usize,
    ) -> Result<(usize, &mut [u8]), ArenaError> {
        if !align.is_power_of_two() {
            return Err(ArenaError::InvalidAlignment { align });
        }
        let addr = (self.memory.as_ptr() as usize).wrapping_add(self.offset);
        let padding = addr.wrapping_neg() & (align - 1);
        let start = match self.offset.checked_add(padding) {
            Some(start) if start <= self.memory.len() => start,
            _ => return Err(self.exhausted(size.saturating_add(padding))),
        };
        let end = self.fit(start, size, padding)?;
        self.offset = end;
        Ok((start, &mut self.memory[start..end]))
    }

    /// Bump-allocate `size` bytes and return a raw pointer to them.
    ///
    /// The pointer stays valid until the arena is reset or dropped. It is
    /// not aligned beyond what byte offsets give.
    pub fn allocate(&mut self, size: usize) -> Result<NonNull<[u8]>, ArenaError> {
        self.alloc_bytes(size).map(|(_, bytes)| NonNull::from(bytes))
    }

    /// Aligned counterpart of [`allocate`](Self::allocate).
    pub fn allocate_aligned(
        &mut self,
        size: usize,
        align: usize,
    ) -> Result<NonNull<[u8]>, ArenaError> {
        self.alloc_bytes_aligned(size, align)
            .map(|(_, bytes)| NonNull::from(bytes))
    }

    /// Reset the bump pointer to zero without deallocating.
    ///
    /// Memory is NOT zeroed. Every pointer previously handed out becomes
    /// logically invalid; the bytes stay as they were until overwritten.
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Get a shared view of an allocated range.
    ///
    /// Returns `None` if the range extends past the cursor.
    pub fn slice(&self, offset: usize, len: usize) -> Option<&[u8]> {
        let end = offset.checked_add(len)?;
        if end > self.offset {
            return None;
        }
        Some(&self.memory[offset..end])
    }

    /// Byte offset of `ptr` from the start of this arena, if the whole
    /// range lies inside the arena's block.
    pub fn offset_of(&self, ptr: NonNull<[u8]>) -> Option<usize> {
        let base = self.memory.as_ptr() as usize;
        let addr = ptr.cast::<u8>().as_ptr() as usize;
        let offset = addr.checked_sub(base)?;
        let end = offset.checked_add(ptr.len())?;
        (end <= self.memory.len()).then_some(offset)
    }

    /// Base address of the backing block.
    pub fn as_ptr(&self) -> *const u8 {
        self.memory.as_ptr()
    }

    /// Number of bytes currently allocated.
    pub fn used(&self) -> usize {
        self.offset
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.memory.len()
    }

    /// Remaining free capacity in bytes.
    pub fn remaining(&self) -> usize {
        self.memory.len() - self.offset
    }

    /// Memory held by the backing block in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.memory.len()
    }

    fn fit(&self, start: usize, size: usize, padding: usize) -> Result<usize, ArenaError> {
        match start.checked_add(size) {
            Some(end) if end <= self.memory.len() => Ok(end),
            _ => Err(self.exhausted(size.saturating_add(padding))),
        }
    }

    fn exhausted(&self, requested: usize) -> ArenaError {
        ArenaError::ArenaExhausted {
            requested,
            remaining: self.remaining(),
            capacity: self.capacity(),
        }
    }
}

#[allow(unsafe_code)]
fn zeroed_block(capacity: usize) -> Result<Box<[u8]>, ArenaError> {
    let failure = ArenaError::ContextAllocationFailure {
        requested: capacity,
    };
    if capacity == 0 {
        return Ok(Box::default());
    }
    let layout = Layout::array::<u8>(capacity).map_err(|_| failure.clone())?;
    // SAFETY: `layout` has non-zero size. A non-null result points to
    // `capacity` initialised (zeroed) bytes allocated by the global
    // allocator with the layout `Box<[u8]>` uses to free a slice of that
    // length, so ownership can pass to the box.
    unsafe {
        let ptr = alloc_zeroed(layout);
        if ptr.is_null() {
            return Err(failure);
        }
        Ok(Box::from_raw(ptr::slice_from_raw_parts_mut(ptr, capacity)))
    }
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("capacity", &self.capacity())
            .field("used", &self.offset)
            .finish()
    }
}
