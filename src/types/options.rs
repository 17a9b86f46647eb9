//! Session options and configuration
//!
//! This module contains the configuration shared by sessions and swarms,
//! including a builder pattern and environment overrides.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DroidError, Result};

/// Environment variable naming the channel directory
pub const ENV_CHANNEL_DIR: &str = "DROID_CHANNEL_DIR";
/// Environment variable naming the worker binary
pub const ENV_WORKER_BIN: &str = "DROID_BIN";
/// Environment variable naming the daemon binary
pub const ENV_DAEMON_BIN: &str = "DROID_DAEMON_BIN";
/// Environment variable overriding the autonomy level
pub const ENV_AUTO_LEVEL: &str = "DROID_AUTO_LEVEL";

const DEFAULT_CHANNEL_DIR: &str = "/tmp";
const DEFAULT_START_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);
const DEFAULT_TAIL_INTERVAL: Duration = Duration::from_millis(100);
const DEFAULT_RESUME_SETTLE: Duration = Duration::from_secs(2);
const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Autonomy Level
// ============================================================================

/// How much the worker may do without asking (`--auto`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutonomyLevel {
    /// Read-only operations
    Low,
    /// Reversible edits
    Medium,
    /// Everything the worker permits
    #[default]
    High,
}

impl AutonomyLevel {
    /// Wire and CLI spelling
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for AutonomyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AutonomyLevel {
    type Err = DroidError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(DroidError::invalid_arguments(format!(
                "unknown autonomy level '{other}'"
            ))),
        }
    }
}

// ============================================================================
// Session Options
// ============================================================================

/// Options for sessions, their channels and their daemons
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Directory holding the command FIFOs and activity logs
    pub channel_dir: PathBuf,
    /// Autonomy level handed to the worker
    pub auto_level: AutonomyLevel,
    /// How long `start` waits for a session ID
    pub start_timeout: Duration,
    /// How often `start` re-reads the log
    pub poll_interval: Duration,
    /// Sleep between log reads once the tail reaches end-of-file
    pub tail_interval: Duration,
    /// Delay after launching a resume daemon before the session is active
    pub resume_settle: Duration,
    /// Upper bound on a single FIFO write (`None` waits forever)
    pub write_timeout: Option<Duration>,
    /// Daemon binary (searched next to the current executable, then on PATH)
    pub daemon_program: Option<PathBuf>,
    /// Worker binary handed to the daemon
    pub worker_program: Option<PathBuf>,
    /// Extra environment for the daemon process
    pub env: HashMap<String, String>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            channel_dir: PathBuf::from(DEFAULT_CHANNEL_DIR),
            auto_level: AutonomyLevel::default(),
            start_timeout: DEFAULT_START_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            tail_interval: DEFAULT_TAIL_INTERVAL,
            resume_settle: DEFAULT_RESUME_SETTLE,
            write_timeout: Some(DEFAULT_WRITE_TIMEOUT),
            daemon_program: None,
            worker_program: None,
            env: HashMap::new(),
        }
    }
}

impl SessionOptions {
    /// Create a new builder for `SessionOptions`
    #[must_use]
    pub fn builder() -> SessionOptionsBuilder {
        SessionOptionsBuilder::default()
    }

    /// Defaults overridden by `DROID_*` environment variables
    ///
    /// An unparseable `DROID_AUTO_LEVEL` is ignored with a warning.
    #[must_use]
    pub fn from_env() -> Self {
        let mut options = Self::default();

        if let Ok(dir) = std::env::var(ENV_CHANNEL_DIR)
            && !dir.is_empty()
        {
            options.channel_dir = PathBuf::from(dir);
        }
        if let Ok(level) = std::env::var(ENV_AUTO_LEVEL) {
            match level.parse() {
                Ok(level) => options.auto_level = level,
                Err(e) => log::warn!("Ignoring {ENV_AUTO_LEVEL}: {e}"),
            }
        }
        if let Ok(bin) = std::env::var(ENV_DAEMON_BIN) {
            options.daemon_program = Some(PathBuf::from(bin));
        }
        if let Ok(bin) = std::env::var(ENV_WORKER_BIN) {
            options.worker_program = Some(PathBuf::from(bin));
        }

        options
    }
}

// ============================================================================
// Builder for SessionOptions
// ============================================================================

/// Builder for `SessionOptions`
#[derive(Debug, Default)]
pub struct SessionOptionsBuilder {
    options: SessionOptions,
}

impl SessionOptionsBuilder {
    /// Set the channel directory
    #[must_use]
    pub fn channel_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.options.channel_dir = dir.into();
        self
    }

    /// Set the autonomy level
    #[must_use]
    pub const fn auto_level(mut self, level: AutonomyLevel) -> Self {
        self.options.auto_level = level;
        self
    }

    /// Set the session ID discovery timeout
    #[must_use]
    pub const fn start_timeout(mut self, timeout: Duration) -> Self {
        self.options.start_timeout = timeout;
        self
    }

    /// Set the session ID discovery poll interval
    #[must_use]
    pub const fn poll_interval(mut self, interval: Duration) -> Self {
        self.options.poll_interval = interval;
        self
    }

    /// Set the log tail sleep interval
    #[must_use]
    pub const fn tail_interval(mut self, interval: Duration) -> Self {
        self.options.tail_interval = interval;
        self
    }

    /// Set the resume settle delay
    #[must_use]
    pub const fn resume_settle(mut self, delay: Duration) -> Self {
        self.options.resume_settle = delay;
        self
    }

    /// Set the FIFO write timeout
    #[must_use]
    pub const fn write_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.options.write_timeout = timeout;
        self
    }

    /// Set the daemon binary
    #[must_use]
    pub fn daemon_program(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.daemon_program = Some(path.into());
        self
    }

    /// Set the worker binary
    #[must_use]
    pub fn worker_program(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.worker_program = Some(path.into());
        self
    }

    /// Add an environment variable for the daemon
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.env.insert(key.into(), value.into());
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> SessionOptions {
        self.options
    }
}
