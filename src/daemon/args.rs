//! Positional launch arguments shared by the launcher and the daemon binary
//!
//! ```text
//! droid-daemon start  <name> <model> <group> <cwd> <auto>
//! droid-daemon resume <name> <group> <session_id> <cwd> <auto>
//! ```

use std::path::PathBuf;

use crate::control::protocol::{Request, requests};
use crate::error::{DroidError, Result};
use crate::types::identifiers::{ScopeKey, SessionId};
use crate::types::options::AutonomyLevel;

/// Usage line printed on bad arguments
pub const USAGE: &str = "usage: droid-daemon start <name> <model> <group> <cwd> <auto>\n       \
                         droid-daemon resume <name> <group> <session_id> <cwd> <auto>";

/// Which life-cycle call the daemon opens with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaemonMode {
    /// `initialize_session` with the given model
    Start {
        /// Model passed to the worker with `-m`
        model: String,
    },
    /// `load_session`; the worker restores the original model
    Resume {
        /// Session to restore
        session_id: SessionId,
    },
}

/// Everything a daemon needs to know at launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonArgs {
    /// Participant name
    pub name: String,
    /// Group scope
    pub group: String,
    /// Start or resume
    pub mode: DaemonMode,
    /// Worker working directory
    pub cwd: PathBuf,
    /// Worker autonomy level
    pub auto_level: AutonomyLevel,
}

impl DaemonArgs {
    /// Scope key deriving the channel paths
    #[must_use]
    pub fn scope(&self) -> ScopeKey {
        ScopeKey::new(&self.group, &self.name)
    }

    /// Model for the worker command line (`None` on resume)
    #[must_use]
    pub fn model(&self) -> Option<&str> {
        match &self.mode {
            DaemonMode::Start { model } => Some(model),
            DaemonMode::Resume { .. } => None,
        }
    }

    /// The single life-cycle call written before any FIFO input
    #[must_use]
    pub fn opening_request(&self, machine_id: &str) -> Request {
        match &self.mode {
            DaemonMode::Start { .. } => {
                requests::initialize_session(machine_id, &self.cwd.to_string_lossy())
            }
            DaemonMode::Resume { session_id } => requests::load_session(session_id),
        }
    }

    /// Render as positional arguments (without the program name)
    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        let cwd = self.cwd.to_string_lossy().into_owned();
        let auto = self.auto_level.as_str().to_string();
        match &self.mode {
            DaemonMode::Start { model } => vec![
                "start".into(),
                self.name.clone(),
                model.clone(),
                self.group.clone(),
                cwd,
                auto,
            ],
            DaemonMode::Resume { session_id } => vec![
                "resume".into(),
                self.name.clone(),
                self.group.clone(),
                session_id.to_string(),
                cwd,
                auto,
            ],
        }
    }

    /// Parse positional arguments (without the program name)
    ///
    /// # Errors
    /// Returns `DroidError::InvalidArguments` on an unknown mode, wrong
    /// argument count, or an unknown autonomy level
    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let Some((mode, rest)) = args.split_first() else {
            return Err(DroidError::invalid_arguments(USAGE));
        };

        let [name, second, third, cwd, auto] = rest else {
            return Err(DroidError::invalid_arguments(format!(
                "{mode}: expected 5 arguments, got {}\n{USAGE}",
                rest.len()
            )));
        };

        let (group, mode) = match mode.as_str() {
            "start" => (third, DaemonMode::Start { model: second.clone() }),
            "resume" => (
                second,
                DaemonMode::Resume {
                    session_id: SessionId::new(third.clone()),
                },
            ),
            other => {
                return Err(DroidError::invalid_arguments(format!(
                    "unknown mode '{other}'\n{USAGE}"
                )));
            }
        };

        Ok(Self {
            name: name.clone(),
            group: group.clone(),
            mode,
            cwd: PathBuf::from(cwd),
            auto_level: auto.parse()?,
        })
    }
}
