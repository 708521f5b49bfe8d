//! Bounded stacks of nested arena contexts.
//!
//! An [`ArenaStack`] owns a sequence of [`Arena`]s. The most recently
//! pushed arena is the active one: every allocation goes to it. Popping a
//! context releases its arena together with every arena pushed after it,
//! so a caller that forgets to pop a nested scratch context is cleaned up
//! by its parent's pop.

use std::ptr::NonNull;

use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::arena::Arena;
use crate::config::StackConfig;
use crate::error::ArenaError;
use crate::handle::ContextHandle;

/// An ordered, bounded stack of owned arenas.
///
/// Entries are indexed `0..depth()`. A [`ContextHandle`] is the index an
/// arena had when it was pushed. Storage for the default depth lives
/// inline; deeper configurations spill to the heap once, at construction.
pub struct ArenaStack {
    entries: SmallVec<[Arena; StackConfig::DEFAULT_MAX_DEPTH]>,
    /// Push serial of each entry, parallel to `entries`.
    serials: SmallVec<[u64; StackConfig::DEFAULT_MAX_DEPTH]>,
    /// Total pushes ever made; never reused.
    pushes: u64,
    max_depth: usize,
    /// Sum of the capacities of all arenas on the stack.
    reserved_bytes: usize,
}

impl ArenaStack {
    /// Create an empty stack from a validated config.
    pub fn new(config: StackConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        Ok(Self {
            entries: SmallVec::with_capacity(config.max_depth),
            serials: SmallVec::with_capacity(config.max_depth),
            pushes: 0,
            max_depth: config.max_depth,
            reserved_bytes: 0,
        })
    }

    /// Create an empty stack with the default maximum depth.
    pub fn with_default() -> Self {
        Self {
            entries: SmallVec::new(),
            serials: SmallVec::new(),
            pushes: 0,
            max_depth: StackConfig::DEFAULT_MAX_DEPTH,
            reserved_bytes: 0,
        }
    }

    /// Push a new arena of `size` bytes and make it the active context.
    ///
    /// Fails with [`ArenaError::StackOverflow`] when the stack is already at
    /// its maximum depth, or [`ArenaError::ContextAllocationFailure`] when
    /// the backing block cannot be reserved. The stack is unchanged on
    /// failure. Arenas already on the stack are never touched.
    pub fn push_context(&mut self, size: usize) -> Result<ContextHandle, ArenaError> {
        if self.entries.len() >= self.max_depth {
            let err = ArenaError::StackOverflow {
                max_depth: self.max_depth,
            };
            debug!(depth = self.entries.len(), size, %err, "push_context rejected");
            return Err(err);
        }
        let arena = Arena::try_new(size).inspect_err(|err| {
            debug!(depth = self.entries.len(), size, %err, "push_context rejected");
        })?;

        let handle = ContextHandle::new(self.entries.len());
        self.entries.push(arena);
        self.serials.push(self.pushes);
        self.pushes += 1;
        self.reserved_bytes += size;
        debug!(%handle, size, reserved_bytes = self.reserved_bytes, "context pushed");
        Ok(handle)
    }

    /// Bump-allocate `size` bytes from the active context.
    ///
    /// Fails with [`ArenaError::NoActiveContext`] on an empty stack;
    /// [`ArenaError::ArenaExhausted`] from the active arena is passed
    /// through unchanged.
    pub fn allocate(&mut self, size: usize) -> Result<NonNull<[u8]>, ArenaError> {
        let depth = self.entries.len();
        let arena = self.active_mut()?;
        let ptr = arena.allocate(size)?;
        trace!(depth, size, used = arena.used(), "allocated");
        Ok(ptr)
    }

    /// Bump-allocate `size` bytes aligned to `align` from the active context.
    pub fn allocate_aligned(
        &mut self,
        size: usize,
        align: usize,
    ) -> Result<NonNull<[u8]>, ArenaError> {
        let depth = self.entries.len();
        let arena = self.active_mut()?;
        let ptr = arena.allocate_aligned(size, align)?;
        trace!(depth, size, align, used = arena.used(), "allocated aligned");
        Ok(ptr)
    }

    /// Run `f` against the active arena.
    ///
    /// This is the borrow-checked way to allocate: slices obtained inside
    /// `f` cannot outlive the call.
    pub fn with_active<R>(&mut self, f: impl FnOnce(&mut Arena) -> R) -> Result<R, ArenaError> {
        self.active_mut().map(f)
    }

    /// Pop `handle` and every context pushed after it.
    ///
    /// Arenas are released from the top down. Afterwards the active context
    /// is the one just below `handle`, or none when `handle` was the
    /// bottom. A no-op on an empty stack, and for handles above the current
    /// top (already popped). Returns the number of contexts released.
    pub fn pop_context(&mut self, handle: ContextHandle) -> usize {
        let target = handle.index();
        let depth = self.entries.len();
        if target >= depth {
            return 0;
        }

        let released = depth - target;
        if released > 1 {
            warn!(
                %handle,
                orphaned = released - 1,
                "popping context also releases nested contexts that were never popped"
            );
        }
        while self.entries.len() > target {
            if let Some(arena) = self.entries.pop() {
                self.reserved_bytes -= arena.memory_bytes();
            }
            self.serials.pop();
        }
        debug!(%handle, released, reserved_bytes = self.reserved_bytes, "context popped");
        released
    }

    /// Push serial of the context at `handle`, if it is still open.
    ///
    /// Serials are unique for the life of the stack, so a serial taken
    /// at push time tells a context apart from a later one that reused
    /// its index.
    pub fn serial(&self, handle: ContextHandle) -> Option<u64> {
        self.serials.get(handle.index()).copied()
    }

    /// Pop `handle` only if it still names the context pushed with
    /// `serial`. Returns the number of contexts released.
    pub fn pop_context_if(&mut self, handle: ContextHandle, serial: u64) -> usize {
        if self.serial(handle) != Some(serial) {
            debug!(%handle, serial, "context already popped; skipping");
            return 0;
        }
        self.pop_context(handle)
    }

    /// Rewind the active arena's cursor to zero.
    ///
    /// Arenas below the top are unaffected. A no-op on an empty stack.
    pub fn reset_top(&mut self) {
        let depth = self.entries.len();
        if let Some(arena) = self.entries.last_mut() {
            trace!(depth, discarded = arena.used(), "active context reset");
            arena.reset();
        }
    }

    /// Pop every context. Returns the number released.
    pub fn clear(&mut self) -> usize {
        self.pop_context(ContextHandle::new(0))
    }

    /// Number of contexts currently on the stack.
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// Whether no context is open.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Handle of the active context, if any.
    pub fn top(&self) -> Option<ContextHandle> {
        self.entries.len().checked_sub(1).map(ContextHandle::new)
    }

    /// The configured maximum depth.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Total bytes held by open contexts.
    ///
    /// Contexts that were pushed and never popped stay counted here for as
    /// long as the stack lives.
    pub fn reserved_bytes(&self) -> usize {
        self.reserved_bytes
    }

    /// Look up the arena behind `handle`, if it is still open.
    pub fn arena(&self, handle: ContextHandle) -> Option<&Arena> {
        self.entries.get(handle.index())
    }

    fn active_mut(&mut self) -> Result<&mut Arena, ArenaError> {
        self.entries.last_mut().ok_or(ArenaError::NoActiveContext)
    }
}

impl Default for ArenaStack {
    fn default() -> Self {
        Self::with_default()
    }
}

impl std::fmt::Debug for ArenaStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArenaStack")
            .field("depth", &self.entries.len())
            .field("max_depth", &self.max_depth)
            .field("reserved_bytes", &self.reserved_bytes)
            .finish()
    }
}

impl Drop for ArenaStack {
    fn drop(&mut self) {
        if !self.entries.is_empty() {
            warn!(
                open_contexts = self.entries.len(),
                reserved_bytes = self.reserved_bytes,
                "arena stack dropped with contexts still open"
            );
        }
    }
}
