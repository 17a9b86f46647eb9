//! Spawning sessions into a swarm

use std::sync::Arc;

use crate::error::Result;
use crate::session::DroidSession;

use super::core::Swarm;

impl Swarm {
    /// Start a session named `name` and register it
    ///
    /// A session already registered under `name` is removed and cleaned up
    /// first, since both would share one channel pair. On start failure the
    /// new session is cleaned up and nothing is registered, so a failed
    /// respawn leaves `name` unregistered and the previous session gone.
    ///
    /// # Errors
    /// Any error from [`DroidSession::start`]
    pub async fn spawn(&self, name: &str, model: &str) -> Result<Arc<DroidSession>> {
        let previous = self.sessions.write().remove(name);
        if let Some(previous) = previous {
            log::warn!("[{}] replacing existing session {}", self.group, name);
            previous.cleanup();
        }

        let session = Arc::new(
            DroidSession::new(name, model, &self.group, &self.cwd, self.options.clone())
                .with_launcher(Arc::clone(&self.launcher)),
        );

        match session.start().await {
            Ok(session_id) => {
                log::info!("[{}] spawned {} ({})", self.group, name, session_id);
            }
            Err(e) => {
                log::warn!("[{}] failed to spawn {}: {}", self.group, name, e);
                session.cleanup();
                return Err(e);
            }
        }

        self.sessions
            .write()
            .insert(name.to_string(), Arc::clone(&session));
        Ok(session)
    }
}
