//! Envelope message types
//!
//! The three wire envelopes exchanged with the worker: requests go out
//! through the command FIFO, responses and notifications come back through
//! the activity log.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::identifiers::{RequestId, SessionId};

/// JSON-RPC version stamped on every envelope
pub const JSONRPC_VERSION: &str = "2.0";

/// Protocol version tag the worker expects on every envelope
pub const FACTORY_API_VERSION: &str = "1.0.0";

/// Method of the notification carrying session events
pub const SESSION_NOTIFICATION_METHOD: &str = "droid.session_notification";

/// Request from controller to worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Method name
    pub method: String,
    /// Parameter mapping
    #[serde(default)]
    pub params: Map<String, Value>,
    /// Correlation ID
    pub id: RequestId,
}

impl Request {
    /// Create a request
    pub fn new(
        method: impl Into<String>,
        params: Map<String, Value>,
        id: impl Into<RequestId>,
    ) -> Self {
        Self {
            method: method.into(),
            params,
            id: id.into(),
        }
    }
}

/// Response from worker to controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Correlation ID of the answered request
    #[serde(default)]
    pub id: RequestId,
    /// Result payload on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error payload on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl Response {
    /// Whether the worker answered with an error
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// `result.sessionId`, when the result carries one
    #[must_use]
    pub fn session_id(&self) -> Option<SessionId> {
        self.result
            .as_ref()?
            .get("sessionId")?
            .as_str()
            .map(SessionId::from)
    }
}

/// Notification from worker to controller (no ID)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Method name
    pub method: String,
    /// Parameter mapping
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl Notification {
    /// Whether this notification carries a session event
    ///
    /// Accepts the dashed spelling as well as the canonical method name.
    #[must_use]
    pub fn is_session_notification(&self) -> bool {
        self.method == SESSION_NOTIFICATION_METHOD || self.method == "session-notification"
    }

    /// The inner `params.notification` payload
    #[must_use]
    pub fn payload(&self) -> Option<&Map<String, Value>> {
        self.params.get("notification").and_then(Value::as_object)
    }
}

/// One wire-level message unit
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// Outbound call
    Request(Request),
    /// Answer to a call
    Response(Response),
    /// Unsolicited event
    Notification(Notification),
}

impl Envelope {
    /// Discriminator written to the `type` field
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Request(_) => "request",
            Self::Response(_) => "response",
            Self::Notification(_) => "notification",
        }
    }
}

impl From<Request> for Envelope {
    fn from(request: Request) -> Self {
        Self::Request(request)
    }
}

impl From<Response> for Envelope {
    fn from(response: Response) -> Self {
        Self::Response(response)
    }
}

impl From<Notification> for Envelope {
    fn from(notification: Notification) -> Self {
        Self::Notification(notification)
    }
}
