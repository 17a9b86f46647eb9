//! Core session structure and accessors

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::daemon::{DaemonArgs, DaemonLauncher, DaemonMode, Launcher};
use crate::error::{DroidError, Result};
use crate::transport::FifoTransport;
use crate::types::identifiers::{ScopeKey, SessionId};
use crate::types::options::SessionOptions;

use super::state::{SessionState, SessionStatus};

/// One long-lived conversation with a Droid worker
///
/// A session owns a channel pair and the daemon serving it. Input goes out
/// through [`send`](Self::send) and friends; output comes back as
/// [`Event`](crate::types::Event)s from [`stream_events`](Self::stream_events).
///
/// All methods take `&self`, so a session can be shared behind an `Arc`.
/// Dropping a session that still holds a channel pair cleans it up.
pub struct DroidSession {
    pub(super) name: String,
    pub(super) model: String,
    pub(super) group: String,
    pub(super) cwd: PathBuf,
    pub(super) options: SessionOptions,
    pub(super) launcher: Arc<dyn Launcher>,
    pub(super) state: RwLock<SessionState>,
}

impl DroidSession {
    /// Create an unstarted session launched through [`DaemonLauncher`]
    pub fn new(
        name: impl Into<String>,
        model: impl Into<String>,
        group: impl Into<String>,
        cwd: impl Into<PathBuf>,
        options: SessionOptions,
    ) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            group: group.into(),
            cwd: cwd.into(),
            options,
            launcher: Arc::new(DaemonLauncher::new()),
            state: RwLock::new(SessionState::Unstarted),
        }
    }

    /// Replace the launcher used by `start` and `resume`
    #[must_use]
    pub fn with_launcher(mut self, launcher: Arc<dyn Launcher>) -> Self {
        self.launcher = launcher;
        self
    }

    /// Participant name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Model requested at start
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Group scope
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Worker working directory
    #[must_use]
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Options this session was built with
    #[must_use]
    pub const fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Scope key deriving the channel paths
    #[must_use]
    pub fn scope(&self) -> ScopeKey {
        ScopeKey::new(&self.group, &self.name)
    }

    /// Worker-assigned session ID, once active
    #[must_use]
    pub fn session_id(&self) -> Option<SessionId> {
        self.state.read().session_id().cloned()
    }

    /// Current life-cycle state
    #[must_use]
    pub fn state(&self) -> SessionStatus {
        self.state.read().status()
    }

    /// Whether the owning daemon still runs; false if never started
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.attached().is_some_and(|transport| transport.is_alive())
    }

    /// Channel pair, if attached
    pub(super) fn attached(&self) -> Option<Arc<FifoTransport>> {
        self.state.read().transport().cloned()
    }

    /// Channel pair, or `SessionNotAlive`
    pub(super) fn require_transport(&self) -> Result<Arc<FifoTransport>> {
        self.attached()
            .ok_or_else(|| DroidError::session_not_alive(&self.name))
    }

    /// Launch arguments for this session in `mode`
    pub(super) fn daemon_args(&self, mode: DaemonMode) -> DaemonArgs {
        DaemonArgs {
            name: self.name.clone(),
            group: self.group.clone(),
            mode,
            cwd: self.cwd.clone(),
            auto_level: self.options.auto_level,
        }
    }
}

impl fmt::Debug for DroidSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DroidSession")
            .field("name", &self.name)
            .field("model", &self.model)
            .field("group", &self.group)
            .field("cwd", &self.cwd)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
