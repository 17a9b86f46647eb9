//! Type definitions for the Droid agent SDK
//!
//! - [`identifiers`] - Type-safe ID wrappers (`SessionId`, `RequestId`) and `ScopeKey`
//! - [`options`] - Session configuration and autonomy levels
//! - [`events`] - Classified session notifications
//! - [`agent`] - Agent-to-agent message convention

pub mod agent;
pub mod events;
pub mod identifiers;
pub mod options;

// Re-export commonly used types
pub use agent::AgentMessage;
pub use events::{Event, EventKind};
pub use identifiers::{RequestId, ScopeKey, SessionId};
pub use options::{AutonomyLevel, SessionOptions, SessionOptionsBuilder};
