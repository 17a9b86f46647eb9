//! Line codec for envelopes
//!
//! Every envelope is one JSON object on one line. Outbound lines carry the
//! JSON-RPC version, the `factoryApiVersion` tag and a `type` discriminator
//! so the receiver can classify a line without any surrounding context.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::types::identifiers::RequestId;

use super::messages::{
    Envelope, FACTORY_API_VERSION, JSONRPC_VERSION, Notification, Request, Response,
};

/// Wire header shared by every envelope
#[derive(Serialize)]
struct Wire<'a, B: Serialize> {
    jsonrpc: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(rename = "factoryApiVersion")]
    api_version: &'static str,
    #[serde(flatten)]
    body: &'a B,
}

/// Encode an envelope as a single newline-terminated line
///
/// # Errors
/// Returns `DroidError::Json` if a parameter value cannot be serialized
pub fn encode(envelope: &Envelope) -> Result<String> {
    let kind = envelope.kind();
    let mut line = match envelope {
        Envelope::Request(body) => to_line(kind, body)?,
        Envelope::Response(body) => to_line(kind, body)?,
        Envelope::Notification(body) => to_line(kind, body)?,
    };
    line.push('\n');
    Ok(line)
}

/// Encode a request as a single newline-terminated line
///
/// # Errors
/// Returns `DroidError::Json` if a parameter value cannot be serialized
pub fn encode_request(request: &Request) -> Result<String> {
    let mut line = to_line("request", request)?;
    line.push('\n');
    Ok(line)
}

fn to_line<B: Serialize>(kind: &'static str, body: &B) -> Result<String> {
    Ok(serde_json::to_string(&Wire {
        jsonrpc: JSONRPC_VERSION,
        kind,
        api_version: FACTORY_API_VERSION,
        body,
    })?)
}

/// Decode one log line into a response or notification
///
/// Returns `None` for anything else: invalid JSON, non-objects, request
/// lines, and missing or unknown discriminators. The log is a live stream
/// that may hold partial or foreign lines, so callers skip these.
///
/// The discriminator is read from `type`, or from `kind` when `type` is
/// absent.
#[must_use]
pub fn decode(line: &str) -> Option<Envelope> {
    let Value::Object(mut object) = serde_json::from_str::<Value>(line.trim()).ok()? else {
        return None;
    };

    let kind = discriminator(&object)?;
    match kind.as_str() {
        "response" => Some(Envelope::Response(Response {
            id: object
                .remove("id")
                .and_then(|v| v.as_str().map(RequestId::from))
                .unwrap_or_default(),
            result: object.remove("result").filter(|v| !v.is_null()),
            error: object.remove("error").filter(|v| !v.is_null()),
        })),
        "notification" => Some(Envelope::Notification(Notification {
            method: object.remove("method")?.as_str()?.to_string(),
            params: match object.remove("params") {
                Some(Value::Object(params)) => params,
                None | Some(Value::Null) => Map::new(),
                Some(_) => return None,
            },
        })),
        _ => None,
    }
}

fn discriminator(object: &Map<String, Value>) -> Option<String> {
    object
        .get("type")
        .or_else(|| object.get("kind"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_line_is_self_describing() {
        let request = Request::new("droid.interrupt_session", Map::new(), "interrupt");
        let line = encode_request(&request).unwrap();
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);

        let value: Value = serde_json::from_str(line.trim()).unwrap();
        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["type"], "request");
        assert_eq!(value["factoryApiVersion"], "1.0.0");
        assert_eq!(value["method"], "droid.interrupt_session");
        assert_eq!(value["params"], json!({}));
        assert_eq!(value["id"], "interrupt");
    }

    #[test]
    fn request_lines_decode_to_none() {
        let request = Request::new("droid.load_session", Map::new(), "load");
        let line = encode(&request.into()).unwrap();
        assert!(decode(&line).is_none());
    }

    #[test]
    fn malformed_lines_decode_to_none() {
        for line in [
            "",
            "not valid json",
            "{\"type\":\"response\"",
            "[1,2,3]",
            "42",
            r#"{"id":"init","result":{}}"#,
            r#"{"type":"unknown_type"}"#,
            r#"{"type":"notification","params":{}}"#,
            r#"{"type":"notification","method":"m","params":[1]}"#,
        ] {
            assert!(decode(line).is_none(), "expected None for {line:?}");
        }
    }

    #[test]
    fn response_round_trip() {
        let response = Response {
            id: RequestId::new("init"),
            result: Some(json!({"sessionId": "sess-1"})),
            error: None,
        };
        let line = encode(&response.clone().into()).unwrap();
        assert_eq!(decode(&line), Some(Envelope::Response(response)));
    }

    #[test]
    fn notification_round_trip() {
        let mut params = Map::new();
        params.insert("notification".into(), json!({"type": "complete"}));
        let notification = Notification {
            method: "droid.session_notification".into(),
            params,
        };
        let line = encode(&notification.clone().into()).unwrap();
        assert_eq!(decode(&line), Some(Envelope::Notification(notification)));
    }

    #[test]
    fn kind_is_accepted_as_discriminator() {
        let line = r#"{"kind":"response","id":"init","result":{"sessionId":"sess-7"}}"#;
        let Some(Envelope::Response(response)) = decode(line) else {
            panic!("expected a response");
        };
        assert_eq!(response.session_id().map(|id| id.to_string()), Some("sess-7".into()));
        assert!(!response.is_error());
    }

    #[test]
    fn error_response() {
        let line = r#"{"type":"response","id":"load","error":{"code":-32000,"message":"no such session"}}"#;
        let Some(Envelope::Response(response)) = decode(line) else {
            panic!("expected a response");
        };
        assert!(response.is_error());
        assert!(response.session_id().is_none());
        assert_eq!(response.id.as_str(), "load");
    }

    #[test]
    fn notification_without_params() {
        let line = r#"{"type":"notification","method":"droid.session_notification"}"#;
        let Some(Envelope::Notification(notification)) = decode(line) else {
            panic!("expected a notification");
        };
        assert!(notification.is_session_notification());
        assert!(notification.payload().is_none());
    }
}
