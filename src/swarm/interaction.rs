//! Messaging between swarm members

use crate::error::Result;
use crate::types::agent::AgentMessage;

use super::core::Swarm;

impl Swarm {
    /// Deliver `text` to `to`, attributed to `from`
    ///
    /// `from` need not be registered.
    ///
    /// # Errors
    /// - `DroidError::SessionNotFound` if `to` is not registered
    /// - any error from the target's [`send`](crate::DroidSession::send)
    pub async fn send_to(&self, from: &str, to: &str, text: &str) -> Result<()> {
        let target = self.get(to)?;
        let message = AgentMessage::new(from, to, text);
        log::debug!("[{}] {} -> {}", self.group, from, to);
        target.send(&message.format()).await
    }
}
