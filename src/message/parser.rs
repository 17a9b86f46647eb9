//! Event parser for Droid activity log lines

use crate::control::protocol::{Envelope, Notification, decode};
use crate::types::events::Event;

/// Parse one activity log line into a session event
///
/// # Arguments
/// * `line` - Raw line from the activity log
///
/// # Returns
/// The classified event when the line is a session notification carrying a
/// payload object, `None` for every other line (responses, foreign output,
/// partial writes, other notification methods).
#[must_use]
pub fn parse_event(line: &str) -> Option<Event> {
    match decode(line)? {
        Envelope::Notification(notification) => event_from_notification(notification),
        Envelope::Request(_) | Envelope::Response(_) => None,
    }
}

/// Unwrap and classify the payload of a session notification
#[must_use]
pub fn event_from_notification(mut notification: Notification) -> Option<Event> {
    if !notification.is_session_notification() {
        return None;
    }
    match notification.params.remove("notification")? {
        serde_json::Value::Object(payload) => Some(Event::from_notification(payload)),
        _ => None,
    }
}
