//! Core swarm structure, registry access and shutdown

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

use crate::daemon::{DaemonLauncher, Launcher};
use crate::error::{DroidError, Result};
use crate::session::{DroidSession, SessionStatus};
use crate::types::identifiers::SessionId;
use crate::types::options::SessionOptions;

/// Registry of named sessions sharing a group and working directory
///
/// The swarm owns its sessions: [`shutdown`](Self::shutdown), or dropping
/// the swarm, cleans every one of them up. Lookups hand out `Arc`s, so a
/// caller may keep using a session after it left the registry.
pub struct Swarm {
    pub(super) group: String,
    pub(super) cwd: PathBuf,
    pub(super) options: SessionOptions,
    pub(super) launcher: Arc<dyn Launcher>,
    pub(super) repository: Option<String>,
    pub(super) branch: Option<String>,
    pub(super) base_branch: Option<String>,
    pub(super) sessions: RwLock<HashMap<String, Arc<DroidSession>>>,
}

/// Point-in-time view of one registered session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentSummary {
    /// Registry name
    pub name: String,
    /// Model requested at start
    pub model: String,
    /// Worker session ID, once active
    pub session_id: Option<SessionId>,
    /// Life-cycle state
    pub state: SessionStatus,
    /// Whether the daemon still runs
    pub alive: bool,
}

impl Swarm {
    /// Create an empty swarm launching daemons through [`DaemonLauncher`]
    pub fn new(group: impl Into<String>, cwd: impl Into<PathBuf>, options: SessionOptions) -> Self {
        Self {
            group: group.into(),
            cwd: cwd.into(),
            options,
            launcher: Arc::new(DaemonLauncher::new()),
            repository: None,
            branch: None,
            base_branch: None,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Replace the launcher handed to every spawned session
    #[must_use]
    pub fn with_launcher(mut self, launcher: Arc<dyn Launcher>) -> Self {
        self.launcher = launcher;
        self
    }

    /// Record the repository the swarm works on
    #[must_use]
    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    /// Record the working branch and the branch it was cut from
    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>, base_branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self.base_branch = Some(base_branch.into());
        self
    }

    /// Group scope shared by every session
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Working directory shared by every session
    #[must_use]
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Options handed to every session
    #[must_use]
    pub const fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Repository metadata
    #[must_use]
    pub fn repository(&self) -> Option<&str> {
        self.repository.as_deref()
    }

    /// Working branch metadata
    #[must_use]
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    /// Base branch metadata
    #[must_use]
    pub fn base_branch(&self) -> Option<&str> {
        self.base_branch.as_deref()
    }

    /// Look up a session by name
    ///
    /// # Errors
    /// `DroidError::SessionNotFound` if no session is registered under `name`
    pub fn get(&self, name: &str) -> Result<Arc<DroidSession>> {
        self.sessions
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| DroidError::session_not_found(name))
    }

    /// Whether `name` is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.sessions.read().contains_key(name)
    }

    /// Registered names, sorted
    #[must_use]
    pub fn agents(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sessions.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Session ID per registered name (`None` until active)
    #[must_use]
    pub fn session_ids(&self) -> HashMap<String, Option<SessionId>> {
        self.sessions
            .read()
            .iter()
            .map(|(name, session)| (name.clone(), session.session_id()))
            .collect()
    }

    /// Snapshot of the registered sessions, sorted by name
    #[must_use]
    pub fn sessions(&self) -> Vec<Arc<DroidSession>> {
        let mut sessions: Vec<(String, Arc<DroidSession>)> = self
            .sessions
            .read()
            .iter()
            .map(|(name, session)| (name.clone(), Arc::clone(session)))
            .collect();
        sessions.sort_by(|a, b| a.0.cmp(&b.0));
        sessions.into_iter().map(|(_, session)| session).collect()
    }

    /// Summary of every registered session, sorted by name
    #[must_use]
    pub fn summaries(&self) -> Vec<AgentSummary> {
        let mut summaries: Vec<AgentSummary> = self
            .sessions
            .read()
            .iter()
            .map(|(name, session)| AgentSummary {
                name: name.clone(),
                model: session.model().to_string(),
                session_id: session.session_id(),
                state: session.state(),
                alive: session.is_alive(),
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }

    /// Number of registered sessions
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    /// Whether no session is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Unregister one session and clean it up
    ///
    /// # Errors
    /// `DroidError::SessionNotFound` if no session is registered under `name`
    pub fn remove(&self, name: &str) -> Result<Arc<DroidSession>> {
        let session = self
            .sessions
            .write()
            .remove(name)
            .ok_or_else(|| DroidError::session_not_found(name))?;
        log::debug!("[{}] removing {}", self.group, name);
        session.cleanup();
        Ok(session)
    }

    /// Clean up every session and empty the registry
    ///
    /// Idempotent.
    pub fn shutdown(&self) {
        let drained: Vec<(String, Arc<DroidSession>)> = self.sessions.write().drain().collect();
        if drained.is_empty() {
            return;
        }

        log::info!("[{}] shutting down {} session(s)", self.group, drained.len());
        for (name, session) in drained {
            log::debug!("[{}] cleaning up {}", self.group, name);
            session.cleanup();
        }
    }
}

impl Drop for Swarm {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for Swarm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Swarm")
            .field("group", &self.group)
            .field("cwd", &self.cwd)
            .field("repository", &self.repository)
            .field("branch", &self.branch)
            .field("agents", &self.agents())
            .finish_non_exhaustive()
    }
}
