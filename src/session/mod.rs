//! Droid sessions
//!
//! A [`DroidSession`] drives one worker through its channel pair:
//!
//! ```no_run
//! use droid_agent::{DroidSession, SessionOptions};
//! use futures::StreamExt;
//!
//! # async fn example() -> droid_agent::Result<()> {
//! let session = DroidSession::new("alice", "glm-4.6", "42", "/work", SessionOptions::from_env());
//! let id = session.start().await?;
//! println!("session {id}");
//!
//! session.send("List the failing tests").await?;
//!
//! let mut events = Box::pin(session.stream_events()?);
//! while let Some(event) = events.next().await {
//!     let event = event?;
//!     if let Some(text) = event.text() {
//!         print!("{text}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod core;
mod events;
mod interaction;
mod lifecycle;
mod state;

pub use self::core::DroidSession;
pub use state::SessionStatus;
