//! The calling thread's context stack.
//!
//! Each thread gets its own [`ArenaStack`], created lazily with
//! [`StackConfig::default()`] the first time any function in this module
//! runs on that thread. Stacks are never shared, so nothing here locks or
//! uses atomics.
//!
//! # Lifecycle
//!
//! - **Init:** lazy, on first use. [`configure_thread`] swaps in a stack
//!   with a different depth limit while no context is open.
//! - **Teardown:** the library never pops contexts on its own. Contexts
//!   left open stay reserved for the life of the thread and show up in
//!   [`reserved_bytes`]. When the thread exits, the thread-local destructor
//!   drops the stack, releasing what is left and emitting a `warn` event
//!   that names the number of contexts and bytes nobody popped.
//!
//! # Panics
//!
//! Calling into this module from inside a [`with_active`] closure re-enters
//! the thread's stack and panics. So does calling it from another
//! thread-local destructor after this thread's stack has been destroyed.

use std::cell::RefCell;
use std::ptr::NonNull;

use tracing::debug;

use crate::arena::Arena;
use crate::config::StackConfig;
use crate::error::ArenaError;
use crate::handle::ContextHandle;
use crate::stack::ArenaStack;

thread_local! {
    static STACK: RefCell<ArenaStack> = RefCell::new(ArenaStack::with_default());
}

fn with_stack<R>(f: impl FnOnce(&mut ArenaStack) -> R) -> R {
    STACK.with(|stack| f(&mut stack.borrow_mut()))
}

/// Replace this thread's stack with an empty one built from `config`.
///
/// Fails with [`ArenaError::ContextsOpen`] if any context is open, or
/// [`ArenaError::InvalidConfig`] if `config` does not validate.
pub fn configure_thread(config: StackConfig) -> Result<(), ArenaError> {
    let fresh = ArenaStack::new(config)?;
    with_stack(|stack| {
        if !stack.is_empty() {
            return Err(ArenaError::ContextsOpen {
                depth: stack.depth(),
            });
        }
        debug!(max_depth = fresh.max_depth(), "thread context stack configured");
        *stack = fresh;
        Ok(())
    })
}

/// Push a new `size`-byte context on this thread and make it active.
///
/// See [`ArenaStack::push_context`].
pub fn push_context(size: usize) -> Result<ContextHandle, ArenaError> {
    with_stack(|stack| stack.push_context(size))
}

/// Allocate `size` bytes from this thread's active context.
///
/// The pointer is valid until the owning context is reset or popped. It
/// carries no alignment guarantee beyond byte offsets; use
/// [`allocate_aligned`] when one is needed.
pub fn allocate(size: usize) -> Result<NonNull<[u8]>, ArenaError> {
    with_stack(|stack| stack.allocate(size))
}

/// Allocate `size` bytes aligned to `align` from this thread's active
/// context.
pub fn allocate_aligned(size: usize, align: usize) -> Result<NonNull<[u8]>, ArenaError> {
    with_stack(|stack| stack.allocate_aligned(size, align))
}

/// Run `f` against this thread's active arena.
///
/// # Panics
///
/// If `f` calls back into this module.
pub fn with_active<R>(f: impl FnOnce(&mut Arena) -> R) -> Result<R, ArenaError> {
    with_stack(|stack| stack.with_active(f))
}

/// Pop `handle` and every context pushed after it on this thread.
///
/// A no-op on an empty stack. Returns the number of contexts released.
pub fn pop_context(handle: ContextHandle) -> usize {
    with_stack(|stack| stack.pop_context(handle))
}

/// Push a context and return its handle with its push serial.
pub(crate) fn push_context_with_serial(size: usize) -> Result<(ContextHandle, u64), ArenaError> {
    with_stack(|stack| {
        let handle = stack.push_context(size)?;
        let serial = stack.serial(handle).ok_or(ArenaError::NoActiveContext)?;
        Ok((handle, serial))
    })
}

/// Pop `handle` only while it still names the context pushed with `serial`.
pub(crate) fn pop_context_if(handle: ContextHandle, serial: u64) -> usize {
    with_stack(|stack| stack.pop_context_if(handle, serial))
}

/// Non-panicking [`pop_context_if`] for drop paths; `None` when the stack
/// is gone or busy.
pub(crate) fn try_pop_context_if(handle: ContextHandle, serial: u64) -> Option<usize> {
    STACK
        .try_with(|stack| {
            stack
                .try_borrow_mut()
                .ok()
                .map(|mut stack| stack.pop_context_if(handle, serial))
        })
        .ok()
        .flatten()
}

/// Rewind this thread's active context. A no-op when none is open.
pub fn reset_top() {
    with_stack(|stack| stack.reset_top());
}

/// Number of contexts open on this thread.
pub fn depth() -> usize {
    with_stack(|stack| stack.depth())
}

/// Handle of this thread's active context, if any.
pub fn top() -> Option<ContextHandle> {
    with_stack(|stack| stack.top())
}

/// Maximum depth of this thread's stack.
pub fn max_depth() -> usize {
    with_stack(|stack| stack.max_depth())
}

/// Bytes held by contexts open on this thread.
pub fn reserved_bytes() -> usize {
    with_stack(|stack| stack.reserved_bytes())
}
