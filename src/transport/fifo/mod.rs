//! FIFO transport implementation
//!
//! A session talks to its daemon through two filesystem endpoints derived
//! from its [`ScopeKey`](crate::types::identifiers::ScopeKey):
//!
//! ```text
//!  controller ──write──▶ duo-{group}-{name}       (named pipe) ──▶ daemon ──stdin──▶ worker
//!  controller ◀──tail─── duo-{group}-{name}.log   (append-only) ◀───── worker stdout/stderr
//! ```

mod channel;
mod lifecycle;
mod reader;
pub(crate) mod sys;

// Re-export public types
pub use channel::FifoTransport;
