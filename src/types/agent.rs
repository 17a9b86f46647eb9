//! Agent-to-agent message convention
//!
//! An [`AgentMessage`] is plain user-message text wrapped in a tagged block,
//! so a receiving agent can tell who addressed it:
//!
//! ```text
//! <MESSAGE from="opus" to="orchestrator">
//! Review complete
//! </MESSAGE>
//! ```

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

static MESSAGE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)\A<MESSAGE from="(\w+)" to="(\w+)">\n(.*)\n</MESSAGE>"#)
        .unwrap_or_else(|e| unreachable!("static pattern is valid: {e}"))
});

/// A message from one agent to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentMessage {
    /// Sender name
    #[serde(rename = "from")]
    pub from_agent: String,
    /// Recipient name
    #[serde(rename = "to")]
    pub to_agent: String,
    /// Message body
    pub content: String,
    /// When the message was written, if known
    pub timestamp: Option<DateTime<Utc>>,
}

impl AgentMessage {
    /// Create an untimestamped message
    pub fn new(
        from_agent: impl Into<String>,
        to_agent: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            from_agent: from_agent.into(),
            to_agent: to_agent.into(),
            content: content.into(),
            timestamp: None,
        }
    }

    /// Stamp the message with the current time
    #[must_use]
    pub fn stamped(mut self) -> Self {
        self.timestamp = Some(Utc::now());
        self
    }

    /// Render the tagged block sent as user-message text
    #[must_use]
    pub fn format(&self) -> String {
        format!(
            "<MESSAGE from=\"{}\" to=\"{}\">\n{}\n</MESSAGE>",
            self.from_agent, self.to_agent, self.content
        )
    }

    /// Parse a tagged block produced by [`AgentMessage::format`]
    ///
    /// Names must be word characters. The timestamp is not part of the text
    /// form and comes back as `None`.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let caps = MESSAGE_BLOCK.captures(text)?;
        Some(Self::new(&caps[1], &caps[2], &caps[3]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_contains_tags() {
        let msg = AgentMessage::new("opus", "orchestrator", "Review complete");
        let formatted = msg.format();
        assert!(formatted.contains(r#"<MESSAGE from="opus" to="orchestrator">"#));
        assert!(formatted.contains("Review complete"));
        assert!(formatted.ends_with("</MESSAGE>"));
    }

    #[test]
    fn parse_block() {
        let text = "<MESSAGE from=\"opus\" to=\"orchestrator\">\nReview complete, no issues found.\n</MESSAGE>";
        let msg = AgentMessage::parse(text).expect("block should parse");
        assert_eq!(msg.from_agent, "opus");
        assert_eq!(msg.to_agent, "orchestrator");
        assert_eq!(msg.content, "Review complete, no issues found.");
    }

    #[test]
    fn parse_format_round_trip() {
        for (from, to, body) in [
            ("alice", "bob", "hi"),
            ("a_1", "B2", "line one\nline two\n\nline four"),
            ("x", "y", ""),
        ] {
            let msg = AgentMessage::new(from, to, body);
            assert_eq!(AgentMessage::parse(&msg.format()), Some(msg));
        }
    }

    #[test]
    fn parse_rejects_other_text() {
        assert!(AgentMessage::parse("hello").is_none());
        assert!(AgentMessage::parse("<MESSAGE from=\"a b\" to=\"c\">\nx\n</MESSAGE>").is_none());
    }

    #[test]
    fn serializes_with_short_keys() {
        let msg = AgentMessage {
            timestamp: "2025-01-18T12:00:00Z".parse().ok(),
            ..AgentMessage::new("opus", "orchestrator", "Done")
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["from"], "opus");
        assert_eq!(value["to"], "orchestrator");
        assert_eq!(value["content"], "Done");
        assert_eq!(value["timestamp"], "2025-01-18T12:00:00Z");
    }
}
