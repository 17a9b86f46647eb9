//! Swarms of named sessions
//!
//! A [`Swarm`] spawns sessions that share a group scope and working
//! directory, and routes [`AgentMessage`](crate::AgentMessage)s between
//! them by name.

mod core;
mod interaction;
mod spawn;

pub use self::core::{AgentSummary, Swarm};
