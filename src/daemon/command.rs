//! Worker command building and binary discovery

use std::env;
use std::path::{Path, PathBuf};

use tokio::process::Command;

use crate::error::{DroidError, Result};

use super::args::DaemonArgs;

/// Worker binary name searched on `PATH`
pub const WORKER_NAME: &str = "droid";

/// Daemon binary name searched next to the current executable and on `PATH`
pub const DAEMON_NAME: &str = "droid-daemon";

/// Wire format spoken on both worker stdin and stdout
const STREAM_FORMAT: &str = "stream-jsonrpc";

/// Command builder for the worker process
pub struct WorkerCommand<'a> {
    program: &'a Path,
    args: &'a DaemonArgs,
}

impl<'a> WorkerCommand<'a> {
    /// Create a new command builder
    pub const fn new(program: &'a Path, args: &'a DaemonArgs) -> Self {
        Self { program, args }
    }

    /// Argument vector after the program name
    #[must_use]
    pub fn arguments(&self) -> Vec<String> {
        let mut argv = vec![
            "exec".to_string(),
            "--input-format".to_string(),
            STREAM_FORMAT.to_string(),
            "--output-format".to_string(),
            STREAM_FORMAT.to_string(),
        ];

        if let Some(model) = self.args.model() {
            argv.push("-m".to_string());
            argv.push(model.to_string());
        }

        argv.push("--auto".to_string());
        argv.push(self.args.auto_level.as_str().to_string());
        argv.push("--allow-background-processes".to_string());
        argv
    }

    /// Build the worker command, rooted at the session's working directory
    pub fn build(&self) -> Command {
        let mut cmd = Command::new(self.program);
        cmd.args(self.arguments()).current_dir(&self.args.cwd);
        cmd
    }
}

/// Locate the worker binary
///
/// Order: `configured`, `~/.local/bin/droid`, then `PATH`.
///
/// # Errors
/// Returns `DroidError::Launch` if no candidate exists
pub fn find_worker(configured: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = configured {
        return Ok(path.to_path_buf());
    }

    if let Ok(home) = env::var("HOME") {
        let local = PathBuf::from(home).join(".local/bin").join(WORKER_NAME);
        if local.is_file() {
            return Ok(local);
        }
    }

    which::which(WORKER_NAME)
        .map_err(|e| DroidError::launch(format!("worker binary '{WORKER_NAME}' not found: {e}")))
}

/// Locate the daemon binary
///
/// Order: `configured`, a sibling of the current executable (or of its
/// parent directory, which covers test binaries under `target/*/deps`),
/// then `PATH`.
///
/// # Errors
/// Returns `DroidError::Launch` if no candidate exists
pub fn find_daemon(configured: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = configured {
        return Ok(path.to_path_buf());
    }

    if let Ok(exe) = env::current_exe() {
        let siblings = exe
            .ancestors()
            .skip(1)
            .take(2)
            .map(|dir| dir.join(DAEMON_NAME));
        for candidate in siblings {
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
    }

    which::which(DAEMON_NAME)
        .map_err(|e| DroidError::launch(format!("daemon binary '{DAEMON_NAME}' not found: {e}")))
}
