//! Sending calls to a running session

use crate::control::protocol::{PermissionAction, Request, requests};
use crate::error::Result;
use crate::types::agent::AgentMessage;
use crate::types::options::AutonomyLevel;

use super::core::DroidSession;

impl DroidSession {
    /// Send user text to the worker
    ///
    /// # Errors
    /// - `DroidError::SessionNotAlive` if no channel pair is attached
    /// - any error from the FIFO write
    pub async fn send(&self, text: &str) -> Result<()> {
        self.request(requests::add_user_message(text)).await
    }

    /// Send `text` addressed from this session to `target`
    ///
    /// # Errors
    /// Same as [`send`](Self::send)
    pub async fn send_to(&self, target: &str, text: &str) -> Result<()> {
        let message = AgentMessage::new(&self.name, target, text);
        self.send(&message.format()).await
    }

    /// Ask the worker to stop its current turn
    ///
    /// Advisory. A no-op when no channel pair is attached.
    ///
    /// # Errors
    /// Any error from the FIFO write
    pub async fn interrupt(&self) -> Result<()> {
        let Some(transport) = self.attached() else {
            log::debug!("[{}] interrupt with nothing attached", self.name);
            return Ok(());
        };
        transport.send(&requests::interrupt_session()).await
    }

    /// Change the autonomy level and/or model mid-session
    ///
    /// # Errors
    /// Same as [`send`](Self::send)
    pub async fn update_settings(
        &self,
        auto_level: Option<AutonomyLevel>,
        model: Option<&str>,
    ) -> Result<()> {
        self.request(requests::update_session_settings(auto_level, model))
            .await
    }

    /// Answer a tool permission prompt
    ///
    /// # Errors
    /// Same as [`send`](Self::send)
    pub async fn grant_permission(
        &self,
        tool_name: &str,
        action: PermissionAction,
        remember: bool,
    ) -> Result<()> {
        self.request(requests::request_permission(tool_name, action, remember))
            .await
    }

    /// Authenticate an MCP server, optionally with a token
    ///
    /// # Errors
    /// Same as [`send`](Self::send)
    pub async fn authenticate_mcp_server(
        &self,
        server_name: &str,
        auth_token: Option<&str>,
    ) -> Result<()> {
        self.request(requests::authenticate_mcp_server(server_name, auth_token))
            .await
    }

    /// Retry a failed MCP server
    ///
    /// # Errors
    /// Same as [`send`](Self::send)
    pub async fn retry_mcp_server(&self, server_name: &str) -> Result<()> {
        self.request(requests::retry_mcp_server(server_name)).await
    }

    /// Enable or disable an MCP server
    ///
    /// # Errors
    /// Same as [`send`](Self::send)
    pub async fn toggle_mcp_server(&self, server_name: &str, enabled: bool) -> Result<()> {
        self.request(requests::toggle_mcp_server(server_name, enabled))
            .await
    }

    /// Drop stored MCP credentials
    ///
    /// # Errors
    /// Same as [`send`](Self::send)
    pub async fn clear_mcp_auth(&self, server_name: &str) -> Result<()> {
        self.request(requests::clear_mcp_auth(server_name)).await
    }

    async fn request(&self, request: Request) -> Result<()> {
        let transport = self.require_transport()?;
        transport.send(&request).await
    }
}
