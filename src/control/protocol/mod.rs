//! Envelope protocol spoken with the Droid worker
//!
//! This module provides the envelope types, the line codec and the request
//! vocabulary used over a session's channel pair.
//!
//! # Example: Encoding a request
//!
//! ```rust
//! use droid_agent::control::protocol::{encode_request, requests};
//!
//! let line = encode_request(&requests::interrupt_session()).unwrap();
//! assert!(line.ends_with('\n'));
//! assert!(line.contains("\"type\":\"request\""));
//! ```
//!
//! # Example: Decoding log lines
//!
//! ```rust
//! use droid_agent::control::protocol::{Envelope, decode};
//!
//! let line = r#"{"type":"response","id":"init","result":{"sessionId":"abc"}}"#;
//! match decode(line) {
//!     Some(Envelope::Response(response)) => {
//!         assert_eq!(response.session_id().unwrap().as_str(), "abc");
//!     }
//!     _ => unreachable!(),
//! }
//!
//! // Garbage is skipped, not an error
//! assert!(decode("partial {\"ty").is_none());
//! ```

mod codec;
mod messages;
pub mod requests;

// Re-export public types
pub use codec::{decode, encode, encode_request};
pub use messages::{
    Envelope, FACTORY_API_VERSION, JSONRPC_VERSION, Notification, Request, Response,
    SESSION_NOTIFICATION_METHOD,
};
pub use requests::PermissionAction;
