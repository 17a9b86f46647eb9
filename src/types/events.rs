//! Session events
//!
//! Typed view of the payload carried inside `droid.session_notification`.
//! Only the wire-level `type` tag is interpreted; everything else stays in
//! the raw `data` mapping behind a few accessors.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of a session event, keyed by the payload's `type` tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A fresh session finished initializing
    SessionInitialized,
    /// A resumed session finished loading
    SessionLoaded,
    /// The worker switched between idle and working
    #[serde(rename = "droid_working_state_changed")]
    WorkingStateChanged,
    /// A complete message was appended to the conversation
    #[serde(rename = "create_message")]
    MessageCreated,
    /// The session title changed
    #[serde(rename = "session_title_updated")]
    TitleUpdated,
    /// Streaming reasoning text
    #[serde(rename = "thinking_text_delta")]
    ThinkingDelta,
    /// Streaming assistant text
    #[serde(rename = "assistant_text_delta")]
    TextDelta,
    /// The worker invoked a tool
    ToolCall,
    /// A tool returned
    ToolResult,
    /// An MCP server changed status
    #[serde(rename = "mcp_status_changed")]
    McpStatus,
    /// The current turn finished
    Complete,
    /// The worker reported an error
    Error,
    /// Any tag outside the known vocabulary
    #[serde(other)]
    Unknown,
}

impl EventKind {
    /// Classify a wire tag; unrecognized tags are [`EventKind::Unknown`]
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "session_initialized" => Self::SessionInitialized,
            "session_loaded" => Self::SessionLoaded,
            "droid_working_state_changed" => Self::WorkingStateChanged,
            "create_message" => Self::MessageCreated,
            "session_title_updated" => Self::TitleUpdated,
            "thinking_text_delta" => Self::ThinkingDelta,
            "assistant_text_delta" => Self::TextDelta,
            "tool_call" => Self::ToolCall,
            "tool_result" => Self::ToolResult,
            "mcp_status_changed" => Self::McpStatus,
            "complete" => Self::Complete,
            "error" => Self::Error,
            _ => Self::Unknown,
        }
    }

    /// Wire tag for this kind
    #[must_use]
    pub const fn as_tag(self) -> &'static str {
        match self {
            Self::SessionInitialized => "session_initialized",
            Self::SessionLoaded => "session_loaded",
            Self::WorkingStateChanged => "droid_working_state_changed",
            Self::MessageCreated => "create_message",
            Self::TitleUpdated => "session_title_updated",
            Self::ThinkingDelta => "thinking_text_delta",
            Self::TextDelta => "assistant_text_delta",
            Self::ToolCall => "tool_call",
            Self::ToolResult => "tool_result",
            Self::McpStatus => "mcp_status_changed",
            Self::Complete => "complete",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }
}

/// A classified session notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Classified kind
    pub kind: EventKind,
    /// Raw notification payload
    pub data: Map<String, Value>,
}

impl Event {
    /// Classify a notification payload
    ///
    /// A missing or non-string `type` is treated as `"unknown"`.
    #[must_use]
    pub fn from_notification(data: Map<String, Value>) -> Self {
        let kind = data
            .get("type")
            .and_then(Value::as_str)
            .map_or(EventKind::Unknown, EventKind::from_tag);
        Self { kind, data }
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    /// `messageId`, when present
    #[must_use]
    pub fn message_id(&self) -> Option<&str> {
        self.str_field("messageId")
    }

    /// Text content: `textDelta` for deltas, otherwise `text`
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.str_field("textDelta")
            .filter(|s| !s.is_empty())
            .or_else(|| self.str_field("text"))
    }

    /// `newState` of a working-state change
    #[must_use]
    pub fn new_state(&self) -> Option<&str> {
        self.str_field("newState")
    }

    /// `blockIndex` of a delta, defaulting to 0
    #[must_use]
    pub fn block_index(&self) -> u64 {
        self.data
            .get("blockIndex")
            .and_then(Value::as_u64)
            .unwrap_or(0)
    }

    /// The `message` object of a created message
    #[must_use]
    pub fn message(&self) -> Option<&Map<String, Value>> {
        self.data.get("message").and_then(Value::as_object)
    }

    /// Role of a created message, empty when absent
    #[must_use]
    pub fn role(&self) -> &str {
        self.message()
            .and_then(|m| m.get("role"))
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    /// Content blocks of a created message, empty when absent
    #[must_use]
    pub fn content(&self) -> &[Value] {
        self.message()
            .and_then(|m| m.get("content"))
            .and_then(Value::as_array)
            .map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("payload must be an object"),
        }
    }

    #[test]
    fn text_delta_accessors() {
        let event = Event::from_notification(payload(json!({
            "type": "assistant_text_delta",
            "messageId": "msg-1",
            "textDelta": "Hello",
        })));
        assert_eq!(event.kind, EventKind::TextDelta);
        assert_eq!(event.message_id(), Some("msg-1"));
        assert_eq!(event.text(), Some("Hello"));
        assert_eq!(event.block_index(), 0);
    }

    #[test]
    fn unknown_and_missing_tags() {
        let event = Event::from_notification(payload(json!({"type": "some_unknown_type"})));
        assert_eq!(event.kind, EventKind::Unknown);

        let event = Event::from_notification(payload(json!({"messageId": "m"})));
        assert_eq!(event.kind, EventKind::Unknown);

        let event = Event::from_notification(payload(json!({"type": 7})));
        assert_eq!(event.kind, EventKind::Unknown);
    }

    #[test]
    fn every_known_tag_round_trips() {
        let kinds = [
            EventKind::SessionInitialized,
            EventKind::SessionLoaded,
            EventKind::WorkingStateChanged,
            EventKind::MessageCreated,
            EventKind::TitleUpdated,
            EventKind::ThinkingDelta,
            EventKind::TextDelta,
            EventKind::ToolCall,
            EventKind::ToolResult,
            EventKind::McpStatus,
            EventKind::Complete,
            EventKind::Error,
        ];
        for kind in kinds {
            assert_eq!(EventKind::from_tag(kind.as_tag()), kind);
            let via_serde: EventKind = serde_json::from_value(json!(kind.as_tag())).unwrap();
            assert_eq!(via_serde, kind);
        }
    }

    #[test]
    fn serde_falls_back_to_unknown() {
        let kind: EventKind = serde_json::from_value(json!("brand_new_event")).unwrap();
        assert_eq!(kind, EventKind::Unknown);
    }

    #[test]
    fn created_message_accessors() {
        let event = Event::from_notification(payload(json!({
            "type": "create_message",
            "message": {
                "role": "assistant",
                "content": [{"type": "text", "text": "done"}],
            },
        })));
        assert_eq!(event.kind, EventKind::MessageCreated);
        assert_eq!(event.role(), "assistant");
        assert_eq!(event.content().len(), 1);
    }

    #[test]
    fn working_state_accessor() {
        let event = Event::from_notification(payload(json!({
            "type": "droid_working_state_changed",
            "newState": "idle",
        })));
        assert_eq!(event.kind, EventKind::WorkingStateChanged);
        assert_eq!(event.new_state(), Some("idle"));
        assert_eq!(event.role(), "");
        assert!(event.content().is_empty());
    }
}
