//! Session state machine
//!
//! ```text
//! Unstarted ──start/resume──▶ Starting ──session id──▶ Active
//!     │                          │                       │
//!     └──────────── cleanup ─────┴───────────────────────┴──▶ Terminated
//! ```
//!
//! Each transition replaces the whole value, so a reader never observes a
//! session ID without its channel pair or the reverse.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::transport::FifoTransport;
use crate::types::identifiers::SessionId;

/// Internal state carrying the attached channel pair
#[derive(Debug, Clone, Default)]
pub(crate) enum SessionState {
    /// Nothing created yet
    #[default]
    Unstarted,
    /// Channel pair exists, daemon launched, no session ID yet
    Starting { transport: Arc<FifoTransport> },
    /// Session ID resolved
    Active {
        transport: Arc<FifoTransport>,
        session_id: SessionId,
    },
    /// Cleaned up; terminal
    Terminated,
}

impl SessionState {
    /// Channel pair, attached from `Starting` on
    pub(crate) const fn transport(&self) -> Option<&Arc<FifoTransport>> {
        match self {
            Self::Starting { transport } | Self::Active { transport, .. } => Some(transport),
            Self::Unstarted | Self::Terminated => None,
        }
    }

    /// Session ID, only once `Active`
    pub(crate) const fn session_id(&self) -> Option<&SessionId> {
        match self {
            Self::Active { session_id, .. } => Some(session_id),
            _ => None,
        }
    }

    /// Whether `self` is `Starting` on exactly `transport`
    pub(crate) fn is_starting_on(&self, transport: &Arc<FifoTransport>) -> bool {
        matches!(self, Self::Starting { transport: t } if Arc::ptr_eq(t, transport))
    }

    /// Public projection without the channel pair
    pub(crate) const fn status(&self) -> SessionStatus {
        match self {
            Self::Unstarted => SessionStatus::Unstarted,
            Self::Starting { .. } => SessionStatus::Starting,
            Self::Active { .. } => SessionStatus::Active,
            Self::Terminated => SessionStatus::Terminated,
        }
    }
}

/// Where a session is in its life cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Constructed, never started
    Unstarted,
    /// Daemon launched, waiting for a session ID
    Starting,
    /// Session ID known; accepting input
    Active,
    /// Cleaned up
    Terminated,
}

impl SessionStatus {
    /// Lowercase label used in errors and logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unstarted => "unstarted",
            Self::Starting => "starting",
            Self::Active => "active",
            Self::Terminated => "terminated",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
