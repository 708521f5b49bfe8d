//! Arena-specific error types.

use thiserror::Error;

/// Errors that can occur during arena and context-stack operations.
///
/// Every failure is reported to the immediate caller through the
/// operation's own `Result`. None of them is retried or recovered from
/// inside the library.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ArenaError {
    /// Pushing a context when the stack is already at its nesting limit.
    #[error("context stack overflow: maximum depth {max_depth} reached")]
    StackOverflow {
        /// The configured maximum nesting depth.
        max_depth: usize,
    },
    /// The system allocator could not supply a new context's backing block.
    #[error("failed to reserve {requested} bytes for a new context")]
    ContextAllocationFailure {
        /// Number of bytes requested for the arena.
        requested: usize,
    },
    /// The active arena does not have room for the request.
    #[error(
        "arena exhausted: requested {requested} bytes, {remaining} of {capacity} bytes remaining"
    )]
    ArenaExhausted {
        /// Number of bytes requested, including alignment padding.
        requested: usize,
        /// Bytes left between the cursor and the end of the arena.
        remaining: usize,
        /// Total arena capacity.
        capacity: usize,
    },
    /// An allocation was attempted with no context on the stack.
    #[error("no active arena context")]
    NoActiveContext,
    /// An aligned allocation was requested with an alignment that is not a
    /// power of two.
    #[error("invalid alignment {align}: must be a non-zero power of two")]
    InvalidAlignment {
        /// The rejected alignment.
        align: usize,
    },
    /// A [`StackConfig`](crate::StackConfig) failed validation.
    #[error("invalid stack configuration: {reason}")]
    InvalidConfig {
        /// What was wrong with the configuration.
        reason: &'static str,
    },
    /// The thread's stack cannot be reconfigured while contexts are open.
    #[error("cannot reconfigure the context stack while {depth} context(s) are open")]
    ContextsOpen {
        /// Number of contexts still on the stack.
        depth: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_message_names_all_sizes() {
        let err = ArenaError::ArenaExhausted {
            requested: 10,
            remaining: 6,
            capacity: 16,
        };
        assert_eq!(
            err.to_string(),
            "arena exhausted: requested 10 bytes, 6 of 16 bytes remaining"
        );
    }

    #[test]
    fn overflow_message_names_depth() {
        let err = ArenaError::StackOverflow { max_depth: 16 };
        assert!(err.to_string().contains("16"));
    }
}
