//! # Droid Agent SDK for Rust
//!
//! Drive long-lived Droid CLI worker sessions from Rust. Each session runs
//! behind a detached daemon that outlives the controlling process, so a
//! controller can restart, re-attach and keep talking to the same worker.
//!
//! ## Quick Start
//!
//! ```no_run
//! use droid_agent::{DroidSession, EventKind, SessionOptions};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = DroidSession::new("alice", "glm-4.6", "42", "/work", SessionOptions::default());
//!     session.start().await?;
//!     session.send("What does this repository do?").await?;
//!
//!     let mut events = Box::pin(session.stream_events()?);
//!     while let Some(event) = events.next().await {
//!         let event = event?;
//!         match event.kind {
//!             EventKind::TextDelta => print!("{}", event.text().unwrap_or_default()),
//!             EventKind::Complete => break,
//!             _ => {}
//!         }
//!     }
//!
//!     session.cleanup();
//!     Ok(())
//! }
//! ```
//!
//! ## Swarms
//!
//! A [`Swarm`] spawns named sessions in one group and routes messages
//! between them:
//!
//! ```no_run
//! # use droid_agent::{SessionOptions, Swarm};
//! # async fn example() -> droid_agent::Result<()> {
//! let swarm = Swarm::new("42", "/work", SessionOptions::from_env())
//!     .with_repository("acme/widgets")
//!     .with_branch("feature/retry", "main");
//!
//! swarm.spawn("architect", "glm-4.6").await?;
//! swarm.spawn("coder", "glm-4.6").await?;
//! swarm
//!     .send_to("architect", "coder", "Implement the retry loop in client.rs")
//!     .await?;
//!
//! swarm.shutdown();
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//!  DroidSession ──send──▶ /tmp/duo-{group}-{name}      (FIFO)
//!                                     │
//!                                     ▼
//!                              droid-daemon ──stdin──▶ droid exec
//!                                                          │
//!  DroidSession ◀──tail── /tmp/duo-{group}-{name}.log ◀────┘
//! ```
//!
//! - [`types`]: identifiers, options, events and agent messages
//! - [`control`]: the JSON-RPC envelope codec and request vocabulary
//! - [`message`]: classification of notifications into events
//! - [`transport`]: the FIFO + log channel pair
//! - [`daemon`]: launching daemons and the daemon's relay loop
//! - [`session`]: the session state machine
//! - [`swarm`]: named session registry
//! - [`error`]: error types and handling
//!
//! ## Configuration
//!
//! [`SessionOptions::from_env`] reads:
//!
//! - `DROID_CHANNEL_DIR` - directory for channel pairs (default `/tmp`)
//! - `DROID_AUTO_LEVEL` - `low`, `medium` or `high` (default `high`)
//! - `DROID_DAEMON_BIN` - daemon binary (default: next to the current executable, then `PATH`)
//! - `DROID_BIN` - worker binary (default `~/.local/bin/droid`, then `PATH`)
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, DroidError>`](Result):
//!
//! ```no_run
//! # use droid_agent::{DroidError, Swarm, SessionOptions};
//! # async fn example(swarm: &Swarm) {
//! match swarm.send_to("architect", "reviewer", "ready for review").await {
//!     Ok(()) => {}
//!     Err(DroidError::SessionNotFound(name)) => log::warn!("no agent named {name}"),
//!     Err(e) => log::error!("send failed: {e}"),
//! }
//! # }
//! ```
//!
//! ## Platform
//!
//! Unix only: the command channel is a named pipe and daemons are managed
//! with signals.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod control;
pub mod daemon;
pub mod error;
pub mod message;
pub mod session;
pub mod swarm;
pub mod transport;
pub mod types;

// Re-export commonly used types for external API
pub use control::protocol::PermissionAction;
pub use daemon::{DaemonHandle, DaemonLauncher, Launcher};
pub use error::{DroidError, Result};
pub use message::parse_event;
pub use session::{DroidSession, SessionStatus};
pub use swarm::{AgentSummary, Swarm};
pub use transport::FifoTransport;

// Re-export type submodules for flat public API
pub use types::agent::AgentMessage;
pub use types::events::{Event, EventKind};
pub use types::identifiers::{RequestId, ScopeKey, SessionId};
pub use types::options::{AutonomyLevel, SessionOptions, SessionOptionsBuilder};

/// Version of the SDK
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
