//! Channel pair: command FIFO plus activity log

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use parking_lot::Mutex;

use crate::control::protocol::{Request, encode_request};
use crate::daemon::DaemonHandle;
use crate::error::{DroidError, Result};
use crate::types::identifiers::ScopeKey;
use crate::types::options::SessionOptions;

use super::sys;

/// Permission bits of a freshly created command FIFO
const FIFO_MODE: libc::mode_t = 0o600;

/// FIFO-based transport for one Droid session
///
/// Commands go out through a named pipe read by the session's daemon; the
/// worker's output comes back through an append-only log. The log is only
/// ever truncated, never deleted, so its content belongs to the current
/// incarnation of the pair.
#[derive(Debug)]
pub struct FifoTransport {
    pub(super) scope: ScopeKey,
    pub(super) command_path: PathBuf,
    pub(super) log_path: PathBuf,
    pub(super) owner: Mutex<Option<DaemonHandle>>,
    pub(super) write_timeout: Option<Duration>,
    pub(super) tail_interval: Duration,
}

impl FifoTransport {
    /// Create a fresh channel pair for `scope`
    ///
    /// Removes any stale command endpoint, creates a new FIFO and truncates
    /// the log. Calling this twice on the same scope leaves one FIFO and an
    /// empty log.
    ///
    /// # Errors
    /// Returns `DroidError::ChannelCreation` naming the endpoint the
    /// filesystem refused
    pub fn create(scope: ScopeKey, options: &SessionOptions) -> Result<Self> {
        let dir = &options.channel_dir;
        let command_path = scope.command_path(dir);
        let log_path = scope.log_path(dir);

        std::fs::create_dir_all(dir).map_err(|e| DroidError::channel_creation(dir, e))?;

        match std::fs::remove_file(&command_path) {
            Ok(()) => log::debug!("Removed stale command FIFO {}", command_path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(DroidError::channel_creation(&command_path, e)),
        }

        sys::make_fifo(&command_path, FIFO_MODE)
            .map_err(|e| DroidError::channel_creation(&command_path, e))?;

        std::fs::File::create(&log_path).map_err(|e| DroidError::channel_creation(&log_path, e))?;

        log::debug!("Created channel pair for {scope} at {}", command_path.display());

        Ok(Self::assemble(scope, command_path, log_path, None, options))
    }

    /// Re-attach to an existing channel pair without touching the filesystem
    pub fn restore(
        scope: ScopeKey,
        owner: Option<DaemonHandle>,
        options: &SessionOptions,
    ) -> Self {
        let command_path = scope.command_path(&options.channel_dir);
        let log_path = scope.log_path(&options.channel_dir);
        Self::assemble(scope, command_path, log_path, owner, options)
    }

    fn assemble(
        scope: ScopeKey,
        command_path: PathBuf,
        log_path: PathBuf,
        owner: Option<DaemonHandle>,
        options: &SessionOptions,
    ) -> Self {
        Self {
            scope,
            command_path,
            log_path,
            owner: Mutex::new(owner),
            write_timeout: options.write_timeout,
            tail_interval: options.tail_interval,
        }
    }

    /// Record the daemon that owns this pair, replacing any previous owner
    pub fn attach_owner(&self, handle: DaemonHandle) {
        if let Some(previous) = self.owner.lock().replace(handle) {
            log::warn!("Replacing owner {} of {}", previous.pid(), self.scope);
            previous.terminate();
        }
    }

    /// Process ID of the owning daemon, if any
    #[must_use]
    pub fn owner_pid(&self) -> Option<u32> {
        self.owner.lock().as_ref().map(DaemonHandle::pid)
    }

    /// Scope this pair was derived from
    #[must_use]
    pub const fn scope(&self) -> &ScopeKey {
        &self.scope
    }

    /// Command FIFO path
    #[must_use]
    pub fn command_path(&self) -> &Path {
        &self.command_path
    }

    /// Activity log path
    #[must_use]
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Write one encoded request to the command FIFO
    ///
    /// Opening a FIFO for writing blocks until a reader has it open, so the
    /// open-write-close runs on the blocking pool. Concurrent sends arrive
    /// as whole lines in no guaranteed order.
    ///
    /// # Errors
    /// - `DroidError::CommandChannelMissing` if the FIFO does not exist
    /// - `DroidError::Timeout` if no reader appeared within the write timeout
    /// - `DroidError::Io` if the write itself failed
    pub async fn send(&self, request: &Request) -> Result<()> {
        if !self.command_path.exists() {
            return Err(DroidError::CommandChannelMissing(self.command_path.clone()));
        }

        let line = encode_request(request)?;
        let path = self.command_path.clone();
        let write = tokio::task::spawn_blocking(move || write_line(&path, &line));

        let joined = match self.write_timeout {
            Some(limit) => match tokio::time::timeout(limit, write).await {
                Ok(joined) => joined,
                Err(_) => {
                    log::warn!(
                        "No reader on {} after {:?}; dropping {}",
                        self.command_path.display(),
                        limit,
                        request.method
                    );
                    sys::release_blocked_writers(&self.command_path);
                    return Err(DroidError::timeout(format!(
                        "write to {} timed out",
                        self.command_path.display()
                    )));
                }
            },
            None => write.await,
        };

        match joined.map_err(|e| DroidError::Io(std::io::Error::other(e)))? {
            Ok(()) => {
                log::debug!("[{}] sent {} ({})", self.scope, request.method, request.id.as_str());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(DroidError::CommandChannelMissing(self.command_path.clone()))
            }
            Err(e) => Err(DroidError::Io(e)),
        }
    }
}

/// Blocking open-write-close of one line
fn write_line(path: &Path, line: &str) -> std::io::Result<()> {
    let mut fifo = OpenOptions::new().write(true).open(path)?;
    fifo.write_all(line.as_bytes())?;
    fifo.flush()
}
