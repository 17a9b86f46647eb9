//! Request vocabulary understood by the worker
//!
//! Request methods (controller → worker):
//! - `droid.initialize_session` - start a new session
//! - `droid.load_session` - restore an existing session
//! - `droid.add_user_message` - send user text
//! - `droid.interrupt_session` - abandon in-flight work
//! - `droid.update_session_settings` - change autonomy or model
//! - `droid.request_permission` - grant or deny a tool
//! - `droid.authenticate_mcp_server` / `retry_mcp_server` /
//!   `toggle_mcp_server` / `clear_mcp_auth` - MCP server control
//!
//! Call classes that can only happen once per session use a fixed ID
//! (`init`, `load`, `interrupt`, `settings`). Repeatable calls are keyed by
//! the tool or server they target, and user messages get a random suffix.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::types::identifiers::{RequestId, SessionId};
use crate::types::options::AutonomyLevel;

use super::messages::Request;

/// Decision sent with a permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionAction {
    /// Let the tool run
    #[default]
    Allow,
    /// Refuse the tool
    Deny,
}

impl PermissionAction {
    /// Wire spelling
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
        }
    }
}

fn params(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

// ============================================================================
// Session lifecycle
// ============================================================================

/// Start a new session on `machine_id`, rooted at `cwd`
#[must_use]
pub fn initialize_session(machine_id: &str, cwd: &str) -> Request {
    Request::new(
        "droid.initialize_session",
        params(json!({"machineId": machine_id, "cwd": cwd})),
        "init",
    )
}

/// Restore an existing session
#[must_use]
pub fn load_session(session_id: &SessionId) -> Request {
    Request::new(
        "droid.load_session",
        params(json!({"sessionId": session_id.as_str()})),
        "load",
    )
}

/// Abandon the current turn
#[must_use]
pub fn interrupt_session() -> Request {
    Request::new("droid.interrupt_session", Map::new(), "interrupt")
}

/// Change autonomy level and/or model; `None` leaves a setting untouched
#[must_use]
pub fn update_session_settings(
    auto_mode: Option<AutonomyLevel>,
    model: Option<&str>,
) -> Request {
    let mut map = Map::new();
    if let Some(level) = auto_mode {
        map.insert("autoMode".into(), Value::from(level.as_str()));
    }
    if let Some(model) = model {
        map.insert("model".into(), Value::from(model));
    }
    Request::new("droid.update_session_settings", map, "settings")
}

// ============================================================================
// Messages
// ============================================================================

/// Send user text
#[must_use]
pub fn add_user_message(text: &str) -> Request {
    Request::new(
        "droid.add_user_message",
        params(json!({"text": text})),
        RequestId::unique("msg"),
    )
}

// ============================================================================
// Permissions
// ============================================================================

/// Grant or deny a tool, optionally remembering the decision
#[must_use]
pub fn request_permission(
    tool_name: &str,
    action: PermissionAction,
    remember: bool,
) -> Request {
    Request::new(
        "droid.request_permission",
        params(json!({
            "toolName": tool_name,
            "action": action.as_str(),
            "remember": remember,
        })),
        format!("perm-{tool_name}"),
    )
}

// ============================================================================
// MCP (Model Context Protocol)
// ============================================================================

/// Authenticate an MCP server, with an optional token
#[must_use]
pub fn authenticate_mcp_server(server_name: &str, auth_token: Option<&str>) -> Request {
    let mut map = params(json!({"serverName": server_name}));
    if let Some(token) = auth_token.filter(|t| !t.is_empty()) {
        map.insert("authToken".into(), Value::from(token));
    }
    Request::new(
        "droid.authenticate_mcp_server",
        map,
        format!("mcp-auth-{server_name}"),
    )
}

/// Retry a failed MCP server connection
#[must_use]
pub fn retry_mcp_server(server_name: &str) -> Request {
    Request::new(
        "droid.retry_mcp_server",
        params(json!({"serverName": server_name})),
        format!("mcp-retry-{server_name}"),
    )
}

/// Enable or disable an MCP server
#[must_use]
pub fn toggle_mcp_server(server_name: &str, enabled: bool) -> Request {
    Request::new(
        "droid.toggle_mcp_server",
        params(json!({"serverName": server_name, "enabled": enabled})),
        format!("mcp-toggle-{server_name}"),
    )
}

/// Drop stored credentials for an MCP server
#[must_use]
pub fn clear_mcp_auth(server_name: &str) -> Request {
    Request::new(
        "droid.clear_mcp_auth",
        params(json!({"serverName": server_name})),
        format!("mcp-clear-{server_name}"),
    )
}
