//! Handle on a launched daemon process

use std::process::Child;

use crate::transport::fifo::sys;

/// Longest command name the kernel reports for a process
const COMM_LEN: usize = 15;

/// The detached daemon that owns a channel pair
///
/// Processes launched by this controller keep their [`Child`], so liveness
/// comes from the child's exit status. Handles rebuilt from a bare pid fall
/// back to probing the pid and matching its command name against `marker`,
/// which is approximate: a recycled pid running a same-named program passes.
#[derive(Debug)]
pub struct DaemonHandle {
    pid: u32,
    marker: String,
    child: Option<Child>,
}

impl DaemonHandle {
    /// Wrap a child this process spawned
    pub fn from_child(child: Child, marker: impl Into<String>) -> Self {
        Self {
            pid: child.id(),
            marker: truncate_comm(marker.into()),
            child: Some(child),
        }
    }

    /// Refer to a daemon by pid alone
    pub fn from_pid(pid: u32, marker: impl Into<String>) -> Self {
        Self {
            pid,
            marker: truncate_comm(marker.into()),
            child: None,
        }
    }

    /// Process ID
    #[must_use]
    pub const fn pid(&self) -> u32 {
        self.pid
    }

    /// Command-name substring identifying the daemon
    #[must_use]
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Whether the daemon still runs
    pub fn is_running(&mut self) -> bool {
        if let Some(child) = self.child.as_mut() {
            return matches!(child.try_wait(), Ok(None));
        }
        sys::process_exists(self.pid)
            && sys::process_name(self.pid).is_some_and(|name| name.contains(&self.marker))
    }

    /// Send SIGTERM if still running and reap the child off-thread
    pub fn terminate(mut self) {
        if self.is_running() {
            match sys::send_signal(self.pid, libc::SIGTERM) {
                Ok(()) => log::debug!("Sent SIGTERM to daemon {}", self.pid),
                Err(e) => log::debug!("Daemon {} already gone: {}", self.pid, e),
            }
        }
        if let Some(mut child) = self.child.take() {
            let pid = self.pid;
            std::thread::spawn(move || match child.wait() {
                Ok(status) => log::debug!("Daemon {pid} exited: {status}"),
                Err(e) => log::warn!("Failed to reap daemon {pid}: {e}"),
            });
        }
    }
}

fn truncate_comm(marker: String) -> String {
    marker.chars().take(COMM_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    #[test]
    fn marker_is_truncated_to_comm_length() {
        let handle = DaemonHandle::from_pid(1, "a-very-long-daemon-name");
        assert_eq!(handle.marker(), "a-very-long-dae");
    }

    #[test]
    fn foreign_process_does_not_match_marker() {
        let mut handle = DaemonHandle::from_pid(std::process::id(), "no-such-daemon-x");
        assert!(!handle.is_running());
    }

    #[test]
    fn child_handle_tracks_exit() {
        let child = Command::new("sleep").arg("30").spawn().unwrap();
        let mut handle = DaemonHandle::from_child(child, "sleep");
        assert!(handle.is_running());

        let pid = handle.pid();
        handle.terminate();
        for _ in 0..50 {
            if !sys::process_exists(pid) {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(20));
        }
        assert!(!sys::process_exists(pid));
    }
}
