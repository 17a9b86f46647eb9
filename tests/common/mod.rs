//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use droid_agent::daemon::{DaemonArgs, DaemonHandle, Launcher};
use droid_agent::{DroidError, Result, SessionOptions};

/// Launcher that writes canned worker output into the log instead of
/// starting a process
#[derive(Debug, Default)]
pub struct ScriptedLauncher {
    lines: Vec<String>,
    fail_from: Option<usize>,
    launches: AtomicUsize,
}

impl ScriptedLauncher {
    /// Append `lines` to the log on every launch
    pub fn writing<I, S>(lines: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arc::new(Self {
            lines: lines.into_iter().map(Into::into).collect(),
            ..Self::default()
        })
    }

    /// Write nothing
    pub fn silent() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Fail every launch
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail_from: Some(0),
            ..Self::default()
        })
    }

    /// Append `lines` on the first `successes` launches, then fail
    pub fn failing_after<I, S>(successes: usize, lines: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arc::new(Self {
            lines: lines.into_iter().map(Into::into).collect(),
            fail_from: Some(successes),
            ..Self::default()
        })
    }

    /// Number of launch attempts so far
    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }
}

impl Launcher for ScriptedLauncher {
    fn launch(&self, args: &DaemonArgs, options: &SessionOptions) -> Result<Option<DaemonHandle>> {
        let attempt = self.launches.fetch_add(1, Ordering::SeqCst);
        if self.fail_from.is_some_and(|from| attempt >= from) {
            return Err(DroidError::launch("scripted failure"));
        }

        let log = args.scope().log_path(&options.channel_dir);
        let mut file = std::fs::OpenOptions::new().append(true).open(log)?;
        for line in &self.lines {
            writeln!(file, "{line}")?;
        }
        Ok(None)
    }
}

/// Options rooted in `dir` with test-friendly timings
pub fn options(dir: &Path) -> SessionOptions {
    SessionOptions::builder()
        .channel_dir(dir)
        .start_timeout(Duration::from_secs(2))
        .poll_interval(Duration::from_millis(20))
        .tail_interval(Duration::from_millis(10))
        .resume_settle(Duration::from_millis(10))
        .write_timeout(Some(Duration::from_secs(2)))
        .build()
}

/// A response line carrying `session_id`, in the short `kind` form
pub fn init_response(session_id: &str) -> String {
    format!(r#"{{"kind":"response","id":"init","result":{{"sessionId":"{session_id}"}}}}"#)
}

/// Read everything written to the FIFO at `path` on a background thread
pub fn drain_fifo(path: &Path) -> std::thread::JoinHandle<String> {
    let path = path.to_path_buf();
    std::thread::spawn(move || std::fs::read_to_string(path).unwrap_or_default())
}
