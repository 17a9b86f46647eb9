//! Error types for the Droid agent SDK

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the Droid agent SDK
#[derive(Error, Debug)]
pub enum DroidError {
    /// The command FIFO or activity log could not be created
    #[error("Failed to create channel endpoint {}: {source}", .path.display())]
    ChannelCreation {
        /// Endpoint path that could not be created
        path: PathBuf,
        /// Underlying filesystem error
        source: std::io::Error,
    },

    /// A write was attempted but no command FIFO exists
    #[error("Command channel not found: {}", .0.display())]
    CommandChannelMissing(PathBuf),

    /// No session identifier appeared in the log before the timeout
    #[error("Session start failed: {0}")]
    SessionStart(String),

    /// The operation requires an attached channel pair
    #[error("Session not alive: {0}")]
    SessionNotAlive(String),

    /// Swarm lookup or address miss
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Life-cycle operation invoked from the wrong state
    #[error("Session {name} cannot {operation} while {state}")]
    InvalidState {
        /// Participant name
        name: String,
        /// Current state label
        state: &'static str,
        /// Rejected operation
        operation: &'static str,
    },

    /// The daemon or worker process could not be launched
    #[error("Launch error: {0}")]
    Launch(String),

    /// Bad positional arguments handed to the daemon
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Timeout error
    #[error("Timeout: {0}")]
    Timeout(String),

    /// JSON encode error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Droid SDK operations
pub type Result<T> = std::result::Result<T, DroidError>;

impl DroidError {
    /// Create a channel creation error
    pub fn channel_creation(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ChannelCreation {
            path: path.into(),
            source,
        }
    }

    /// Create a session start error
    pub fn session_start(msg: impl Into<String>) -> Self {
        Self::SessionStart(msg.into())
    }

    /// Create a session-not-alive error
    pub fn session_not_alive(name: impl Into<String>) -> Self {
        Self::SessionNotAlive(name.into())
    }

    /// Create a session not found error
    pub fn session_not_found(name: impl Into<String>) -> Self {
        Self::SessionNotFound(name.into())
    }

    /// Create a launch error
    pub fn launch(msg: impl Into<String>) -> Self {
        Self::Launch(msg.into())
    }

    /// Create an invalid arguments error
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Whether this error means a swarm lookup missed
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::SessionNotFound(_))
    }
}
