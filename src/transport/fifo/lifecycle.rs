//! Liveness and teardown for the FIFO transport

use super::channel::FifoTransport;
use super::sys;

impl FifoTransport {
    /// Whether the owning daemon still runs
    ///
    /// False when no owner is recorded. Probe failures read as "not alive".
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.owner
            .lock()
            .as_mut()
            .is_some_and(|handle| handle.is_running())
    }

    /// Tear down the pair: terminate the owner, then remove the command FIFO
    ///
    /// Idempotent and best-effort; "already gone" is never an error. The log
    /// is left in place.
    pub fn cleanup(&self) {
        if let Some(handle) = self.owner.lock().take() {
            log::debug!("[{}] terminating daemon {}", self.scope, handle.pid());
            handle.terminate();
        }

        sys::release_blocked_writers(&self.command_path);

        match std::fs::remove_file(&self.command_path) {
            Ok(()) => log::debug!("[{}] removed {}", self.scope, self.command_path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!(
                "[{}] failed to remove {}: {}",
                self.scope,
                self.command_path.display(),
                e
            ),
        }
    }
}
