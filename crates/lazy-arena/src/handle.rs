//! Context handles.
//!
//! A [`ContextHandle`] is the stack depth index at the moment a context was
//! pushed. It carries no pointer and no generation: validity is purely a
//! matter of discipline (same thread, not yet popped).

use std::fmt;
use std::marker::PhantomData;

/// Identifies one pushed arena context.
///
/// Equal to the context's 0-based position on its stack. Handles are
/// `!Send` and `!Sync`: a handle only means something to the stack that
/// issued it, and thread-local stacks must not see handles from other
/// threads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextHandle {
    index: usize,
    _not_send: PhantomData<*const ()>,
}

impl ContextHandle {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            index,
            _not_send: PhantomData,
        }
    }

    /// The stack position this handle refers to.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for ContextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ctx#{}", self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trip() {
        let h = ContextHandle::new(3);
        assert_eq!(h.index(), 3);
        assert_eq!(h.to_string(), "ctx#3");
    }

    #[test]
    fn handles_order_by_depth() {
        assert!(ContextHandle::new(0) < ContextHandle::new(1));
    }
}
