//! Context stack configuration.

use crate::error::ArenaError;

/// Configuration for an [`ArenaStack`](crate::ArenaStack).
///
/// Only bounds the number of nested contexts; it has no effect on how
/// individual arenas behave. Fixed once the stack is constructed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StackConfig {
    /// Maximum number of contexts that may be open at once.
    ///
    /// Default: 16. Pushing past this depth fails with
    /// [`ArenaError::StackOverflow`] rather than growing the stack.
    pub max_depth: usize,
}

impl StackConfig {
    /// Default maximum nesting depth.
    pub const DEFAULT_MAX_DEPTH: usize = 16;

    /// Create a config with the given maximum depth.
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Check structural invariants.
    ///
    /// A depth of zero would produce a stack on which every push fails.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.max_depth == 0 {
            return Err(ArenaError::InvalidConfig {
                reason: "max_depth must be at least 1",
            });
        }
        Ok(())
    }
}

impl Default for StackConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_DEPTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_depth_is_16() {
        assert_eq!(StackConfig::default().max_depth, 16);
    }

    #[test]
    fn zero_depth_rejected() {
        let err = StackConfig::new(0).validate().unwrap_err();
        assert!(matches!(err, ArenaError::InvalidConfig { .. }));
    }

    #[test]
    fn custom_depth_validates() {
        assert!(StackConfig::new(1).validate().is_ok());
        assert!(StackConfig::new(64).validate().is_ok());
    }
}
