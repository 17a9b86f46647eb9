//! Launching detached daemons

use std::collections::HashMap;
use std::fmt;
use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};

use crate::error::{DroidError, Result};
use crate::types::options::{ENV_CHANNEL_DIR, ENV_WORKER_BIN, SessionOptions};

use super::args::DaemonArgs;
use super::command::{DAEMON_NAME, find_daemon};
use super::handle::DaemonHandle;

/// Environment variables never forwarded from `SessionOptions::env`
///
/// These change how the daemon and worker load code.
pub const DANGEROUS_ENV_VARS: &[&str] = &[
    "LD_PRELOAD",
    "LD_LIBRARY_PATH",
    "DYLD_INSERT_LIBRARIES",
    "DYLD_LIBRARY_PATH",
    "NODE_OPTIONS",
];

/// Starts the process that serves a channel pair
///
/// The channel pair already exists when `launch` runs. Implementations
/// return a handle when they started a process the session should own,
/// or `None` when the endpoint is served some other way.
pub trait Launcher: Send + Sync + fmt::Debug {
    /// Launch a daemon for `args`
    ///
    /// # Errors
    /// Returns `DroidError::Launch` if the process could not be started
    fn launch(&self, args: &DaemonArgs, options: &SessionOptions) -> Result<Option<DaemonHandle>>;
}

/// Launches the `droid-daemon` binary as a detached process
///
/// The daemon gets its own process group and null stdio so it outlives
/// the controller and never touches the controlling terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct DaemonLauncher;

impl DaemonLauncher {
    /// Create a new launcher
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Launcher for DaemonLauncher {
    fn launch(&self, args: &DaemonArgs, options: &SessionOptions) -> Result<Option<DaemonHandle>> {
        let program = find_daemon(options.daemon_program.as_deref())?;

        let mut env: HashMap<&str, &str> = HashMap::new();
        for (key, value) in &options.env {
            if DANGEROUS_ENV_VARS.contains(&key.as_str()) {
                log::warn!("Not forwarding {key} to daemon");
            } else {
                env.insert(key, value);
            }
        }

        let mut cmd = Command::new(&program);
        cmd.args(args.to_args())
            .envs(env)
            .env(ENV_CHANNEL_DIR, &options.channel_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .process_group(0);

        if let Some(ref worker) = options.worker_program {
            cmd.env(ENV_WORKER_BIN, worker);
        }

        let child = cmd.spawn().map_err(|e| {
            DroidError::launch(format!("failed to start {}: {e}", program.display()))
        })?;

        log::debug!(
            "Launched {} for {} (pid {})",
            program.display(),
            args.scope(),
            child.id()
        );

        let marker = program
            .file_name()
            .map_or_else(|| DAEMON_NAME.to_string(), |n| n.to_string_lossy().into_owned());

        Ok(Some(DaemonHandle::from_child(child, marker)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daemon::args::DaemonMode;
    use crate::types::options::AutonomyLevel;
    use std::path::PathBuf;

    fn args() -> DaemonArgs {
        DaemonArgs {
            name: "alice".into(),
            group: "42".into(),
            mode: DaemonMode::Start {
                model: "m".into(),
            },
            cwd: PathBuf::from("/"),
            auto_level: AutonomyLevel::High,
        }
    }

    #[test]
    fn missing_program_is_launch_error() {
        let options = SessionOptions::builder()
            .daemon_program("/nonexistent/droid-daemon")
            .build();
        let err = DaemonLauncher::new().launch(&args(), &options).unwrap_err();
        assert!(matches!(err, DroidError::Launch(_)));
    }

    #[test]
    fn launched_handle_uses_program_name() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-daemon");
        std::fs::write(&script, "#!/bin/sh\nsleep 30\n").unwrap();
        let mut perms = std::fs::metadata(&script).unwrap().permissions();
        std::os::unix::fs::PermissionsExt::set_mode(&mut perms, 0o755);
        std::fs::set_permissions(&script, perms).unwrap();

        let options = SessionOptions::builder().daemon_program(&script).build();
        let handle = DaemonLauncher::new()
            .launch(&args(), &options)
            .unwrap()
            .expect("process launcher always returns a handle");
        assert_eq!(handle.marker(), "fake-daemon");
        handle.terminate();
    }
}
