//! Bump-pointer arenas with a per-thread stack of nestable contexts.
//!
//! A caller reserves one block up front and carves allocations out of it
//! in O(1) with no per-allocation release. The block is reclaimed all at
//! once, by rewinding its cursor (cheap, memory kept) or by popping the
//! context (memory released). Contexts nest: a routine can push its own
//! scratch arena without touching its caller's allocations, and popping a
//! context also pops anything pushed after it.
//!
//! # Architecture
//!
//! ```text
//! local (thread_local! RefCell<ArenaStack>, one per thread)
//! └── ArenaStack (bounded, default depth 16, handle = index)
//!     └── Arena[] (fixed Box<[u8]> block + bump cursor)
//! scope (ContextScope guard / with_context, pops on drop)
//! ```
//!
//! # Example
//!
//! ```
//! use lazy_arena::{local, ArenaError};
//!
//! let ctx = local::push_context(512)?;
//! let a = local::allocate(4)?;
//! assert_eq!(a.len(), 4);
//!
//! let nested = local::push_context(1024)?; // never popped explicitly
//! local::allocate(4)?;
//!
//! local::pop_context(ctx); // releases `nested` too
//! assert_eq!(local::allocate(4), Err(ArenaError::NoActiveContext));
//! # let _ = nested;
//! # Ok::<(), ArenaError>(())
//! ```
//!
//! # Alignment
//!
//! [`allocate`](ArenaStack::allocate) hands out byte-exact offsets with no
//! padding. Callers that store typed data use
//! [`allocate_aligned`](ArenaStack::allocate_aligned), which pads the
//! cursor and charges the padding to the arena.
//!
//! All memory access in this crate goes through slices; returned raw
//! pointers are for the caller to dereference.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod arena;
pub mod config;
pub mod error;
pub mod handle;
pub mod local;
pub mod scope;
pub mod stack;

// Public re-exports for the primary API surface.
pub use arena::Arena;
pub use config::StackConfig;
pub use error::ArenaError;
pub use handle::ContextHandle;
pub use scope::ContextScope;
pub use stack::ArenaStack;
