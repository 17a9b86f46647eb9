//! Session event parsing
//!
//! Turns activity log lines into [`Event`](crate::types::events::Event)s.

mod parser;

pub use parser::{event_from_notification, parse_event};
