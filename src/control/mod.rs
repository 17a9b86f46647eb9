//! Control protocol for communicating with the Droid worker
//!
//! See [`protocol`] for the envelope codec and request vocabulary.

pub mod protocol;

pub use protocol::{Envelope, Notification, Request, Response, decode, encode, encode_request};
