//! Session start, resume and teardown

use std::sync::Arc;

use crate::daemon::{DaemonArgs, DaemonMode};
use crate::error::{DroidError, Result};
use crate::transport::FifoTransport;
use crate::types::identifiers::SessionId;

use super::core::DroidSession;
use super::state::SessionState;

impl DroidSession {
    /// Start a new worker session
    ///
    /// Creates a fresh channel pair, launches a daemon in start mode and
    /// polls the log for the worker's session ID.
    ///
    /// # Errors
    /// - `DroidError::InvalidState` unless the session is unstarted
    /// - `DroidError::ChannelCreation` if the pair could not be created
    /// - `DroidError::Launch` if the daemon could not be started
    /// - `DroidError::SessionStart` if no session ID appeared in time
    ///
    /// After a launch or timeout failure the session stays `Starting`;
    /// call [`cleanup`](Self::cleanup) to release the pair.
    pub async fn start(&self) -> Result<SessionId> {
        let transport = self.begin("start")?;
        self.launch(
            &transport,
            &self.daemon_args(DaemonMode::Start {
                model: self.model.clone(),
            }),
        )?;

        let timeout = self.options.start_timeout;
        let Some(session_id) = transport
            .wait_for_session_id(timeout, self.options.poll_interval)
            .await
        else {
            return Err(DroidError::session_start(format!(
                "no session ID for {} within {timeout:?}",
                transport.scope()
            )));
        };

        self.activate(&transport, session_id.clone())?;
        log::info!("[{}] session {} active", transport.scope(), session_id);
        Ok(session_id)
    }

    /// Re-attach a worker to an existing session ID
    ///
    /// Creates a fresh channel pair, launches a daemon in resume mode and
    /// waits the configured settle delay. The worker's reply is not
    /// checked; the session is `Active` with `session_id` afterwards.
    ///
    /// # Errors
    /// Same as [`start`](Self::start), minus `SessionStart`
    pub async fn resume(&self, session_id: impl Into<SessionId>) -> Result<()> {
        let session_id = session_id.into();
        let transport = self.begin("resume")?;
        self.launch(
            &transport,
            &self.daemon_args(DaemonMode::Resume {
                session_id: session_id.clone(),
            }),
        )?;

        tokio::time::sleep(self.options.resume_settle).await;

        self.activate(&transport, session_id.clone())?;
        log::info!("[{}] session {} resumed", transport.scope(), session_id);
        Ok(())
    }

    /// Tear down the channel pair and mark the session terminated
    ///
    /// Idempotent. Valid from any state.
    pub fn cleanup(&self) {
        let previous = std::mem::replace(&mut *self.state.write(), SessionState::Terminated);
        if let Some(transport) = previous.transport() {
            transport.cleanup();
        }
    }

    /// Move `Unstarted` to `Starting` on a freshly created pair
    fn begin(&self, operation: &'static str) -> Result<Arc<FifoTransport>> {
        let mut state = self.state.write();
        if !matches!(*state, SessionState::Unstarted) {
            return Err(DroidError::InvalidState {
                name: self.name.clone(),
                state: state.status().as_str(),
                operation,
            });
        }

        let transport = Arc::new(FifoTransport::create(self.scope(), &self.options)?);
        *state = SessionState::Starting {
            transport: Arc::clone(&transport),
        };
        Ok(transport)
    }

    fn launch(&self, transport: &FifoTransport, args: &DaemonArgs) -> Result<()> {
        if let Some(handle) = self.launcher.launch(args, &self.options)? {
            transport.attach_owner(handle);
        }
        Ok(())
    }

    /// Move `Starting` to `Active`, unless a cleanup got there first
    fn activate(&self, transport: &Arc<FifoTransport>, session_id: SessionId) -> Result<()> {
        let mut state = self.state.write();
        if !state.is_starting_on(transport) {
            return Err(DroidError::session_not_alive(&self.name));
        }
        *state = SessionState::Active {
            transport: Arc::clone(transport),
            session_id,
        };
        Ok(())
    }
}

impl Drop for DroidSession {
    fn drop(&mut self) {
        if self.state.get_mut().transport().is_some() {
            self.cleanup();
        }
    }
}
