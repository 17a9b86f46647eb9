//! Integration tests for the envelope codec and event classification

use droid_agent::control::protocol::{Envelope, Notification, decode, encode, requests};
use droid_agent::{AgentMessage, EventKind, RequestId, parse_event};
use serde_json::{Map, Value, json};

#[test]
fn test_request_ids() {
    assert_eq!(requests::interrupt_session().id, RequestId::new("interrupt"));
    assert_eq!(requests::retry_mcp_server("github").id.as_str(), "mcp-retry-github");

    let first = requests::add_user_message("a").id;
    let second = requests::add_user_message("a").id;
    assert_ne!(first, second);
}

#[test]
fn test_encode_notification_then_decode() {
    let mut params = Map::new();
    params.insert(
        "notification".into(),
        json!({"type": "tool_call", "toolName": "Read"}),
    );
    let envelope = Envelope::Notification(Notification {
        method: "droid.session_notification".into(),
        params,
    });

    let line = encode(&envelope).unwrap();
    assert!(line.ends_with('\n'));
    assert_eq!(line.matches('\n').count(), 1);

    let decoded = decode(&line).unwrap();
    assert_eq!(decoded, envelope);

    let event = parse_event(&line).unwrap();
    assert_eq!(event.kind, EventKind::ToolCall);
    assert_eq!(event.data["toolName"], "Read");
}

#[test]
fn test_decode_rejects_non_envelopes() {
    assert!(decode("not valid json").is_none());
    assert!(decode("[1, 2, 3]").is_none());
    assert!(decode(r#"{"type":"unknown_type"}"#).is_none());
    assert!(decode(r#"{"method":"x"}"#).is_none());

    let request = droid_agent::control::encode_request(&requests::interrupt_session()).unwrap();
    assert!(decode(&request).is_none());
}

#[test]
fn test_unknown_event_tag_is_unknown() {
    let line = json!({
        "type": "notification",
        "method": "droid.session_notification",
        "params": {"notification": {"type": "brand_new_thing", "x": 1}}
    })
    .to_string();

    let event = parse_event(&line).unwrap();
    assert_eq!(event.kind, EventKind::Unknown);
    assert_eq!(event.data["x"], Value::from(1));
}

#[test]
fn test_create_message_accessors() {
    let line = json!({
        "kind": "notification",
        "method": "session-notification",
        "params": {"notification": {
            "type": "create_message",
            "messageId": "m-1",
            "message": {"role": "assistant", "content": [{"type": "text", "text": "done"}]}
        }}
    })
    .to_string();

    let event = parse_event(&line).unwrap();
    assert_eq!(event.kind, EventKind::MessageCreated);
    assert_eq!(event.message_id(), Some("m-1"));
    assert_eq!(event.role(), "assistant");
    assert_eq!(event.content().len(), 1);
}

#[test]
fn test_agent_message_text_form() {
    let message = AgentMessage::new("architect", "coder", "line one\nline two");
    let parsed = AgentMessage::parse(&message.format()).unwrap();
    assert_eq!(parsed, message);

    assert!(AgentMessage::parse("plain text").is_none());
    assert!(AgentMessage::parse("<MESSAGE from=\"a b\" to=\"c\">\nx\n</MESSAGE>").is_none());
}
