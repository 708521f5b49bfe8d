//! Scoped contexts on the calling thread's stack.
//!
//! [`ContextScope`] pops its context when dropped, and with it any nested
//! context a callee pushed and forgot. [`with_context`] wraps the same
//! pattern around a closure.

use tracing::warn;

use crate::error::ArenaError;
use crate::handle::ContextHandle;
use crate::local;

/// Guard for a context pushed on the calling thread's stack.
///
/// The context stays active until something is pushed above it. Dropping
/// the guard pops the context and everything above it, including on
/// unwind. Like [`ContextHandle`], a scope cannot leave its thread.
///
/// If the context was already popped some other way, dropping or
/// releasing the scope does nothing, even when a newer context has since
/// taken the same stack index.
///
/// ```
/// use lazy_arena::{local, scope};
///
/// {
///     let _outer = scope::enter(1024).unwrap();
///     local::allocate(16).unwrap();
///     let _scratch = local::push_context(256).unwrap(); // never popped
/// }
/// assert_eq!(local::depth(), 0);
/// ```
#[derive(Debug)]
#[must_use = "dropping a ContextScope immediately pops its context"]
pub struct ContextScope {
    handle: ContextHandle,
    serial: u64,
}

impl ContextScope {
    /// Handle of the scoped context.
    pub fn handle(&self) -> ContextHandle {
        self.handle
    }

    /// Pop the context now. Returns the number of contexts released.
    pub fn release(self) -> usize {
        let (handle, serial) = (self.handle, self.serial);
        std::mem::forget(self);
        local::pop_context_if(handle, serial)
    }
}

impl Drop for ContextScope {
    fn drop(&mut self) {
        if local::try_pop_context_if(self.handle, self.serial).is_none() {
            warn!(handle = %self.handle, "context scope dropped while its stack was unavailable");
        }
    }
}

/// Push a `size`-byte context on this thread and guard it.
pub fn enter(size: usize) -> Result<ContextScope, ArenaError> {
    local::push_context_with_serial(size).map(|(handle, serial)| ContextScope { handle, serial })
}

/// Run `f` inside a fresh `size`-byte context.
///
/// The context, and anything `f` pushes and leaves open, is popped when
/// `f` returns or unwinds.
pub fn with_context<R>(size: usize, f: impl FnOnce(ContextHandle) -> R) -> Result<R, ArenaError> {
    let scope = enter(size)?;
    Ok(f(scope.handle()))
}
