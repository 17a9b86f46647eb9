//! The daemon side of a channel pair
//!
//! Runs the worker with its output appended to the activity log, writes
//! the opening life-cycle call, then copies every line written to the
//! command FIFO onto the worker's stdin until a termination signal.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tokio::net::unix::pipe;
use tokio::process::ChildStdin;
use tokio::signal::unix::{SignalKind, signal};
use tokio_util::codec::{FramedRead, LinesCodec};

use crate::control::protocol::encode_request;
use crate::error::{DroidError, Result};
use crate::types::options::{ENV_CHANNEL_DIR, ENV_WORKER_BIN};

use super::args::DaemonArgs;
use super::command::{WorkerCommand, find_worker};

/// Pause before reopening the command FIFO after a failure
const REOPEN_DELAY: Duration = Duration::from_millis(100);

/// Where the daemon finds its channel pair and its worker
#[derive(Debug, Clone, Default)]
pub struct DaemonConfig {
    /// Directory holding the channel pair
    pub channel_dir: PathBuf,
    /// Explicit worker binary
    pub worker_program: Option<PathBuf>,
}

impl DaemonConfig {
    /// Read `DROID_CHANNEL_DIR` (default `/tmp`) and `DROID_BIN`
    #[must_use]
    pub fn from_env() -> Self {
        let channel_dir = std::env::var(ENV_CHANNEL_DIR)
            .ok()
            .filter(|dir| !dir.is_empty())
            .map_or_else(|| PathBuf::from("/tmp"), PathBuf::from);
        let worker_program = std::env::var(ENV_WORKER_BIN).ok().map(PathBuf::from);
        Self {
            channel_dir,
            worker_program,
        }
    }
}

/// Serve one channel pair until SIGTERM or SIGINT
///
/// The daemon never exits on its own. If the worker dies, the exit is
/// logged and the FIFO keeps being drained until a signal arrives.
///
/// # Errors
/// Returns an error if the log cannot be opened, the worker cannot be
/// started, or the opening call cannot be written. Failures inside the
/// relay loop are logged and retried.
pub async fn run(args: DaemonArgs, config: DaemonConfig) -> Result<()> {
    let scope = args.scope();
    let fifo_path = scope.command_path(&config.channel_dir);
    let log_path = scope.log_path(&config.channel_dir);

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;
    let err_file = log_file.try_clone()?;

    let worker = find_worker(config.worker_program.as_deref())?;
    let mut child = WorkerCommand::new(&worker, &args)
        .build()
        .stdin(Stdio::piped())
        .stdout(Stdio::from(log_file))
        .stderr(Stdio::from(err_file))
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| DroidError::launch(format!("failed to start {}: {e}", worker.display())))?;

    log::info!(
        "[{scope}] worker {} running (pid {:?})",
        worker.display(),
        child.id()
    );

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| DroidError::launch("worker stdin not available"))?;

    let opening = args.opening_request(&machine_id());
    write_line(&mut stdin, &encode_request(&opening)?).await?;
    log::debug!("[{scope}] wrote {}", opening.method);

    let mut terminate = signal(SignalKind::terminate())?;
    let mut interrupt = signal(SignalKind::interrupt())?;

    let relay = relay_commands(&fifo_path, &mut stdin);
    tokio::pin!(relay);
    let mut worker_exited = false;

    loop {
        tokio::select! {
            () = &mut relay => break,
            _ = terminate.recv() => {
                log::info!("[{scope}] SIGTERM, stopping worker");
                break;
            }
            _ = interrupt.recv() => {
                log::info!("[{scope}] SIGINT, stopping worker");
                break;
            }
            status = child.wait(), if !worker_exited => {
                log::warn!("[{scope}] worker exited: {status:?}; waiting for a signal");
                worker_exited = true;
            }
        }
    }

    if let Err(e) = child.kill().await {
        log::debug!("[{scope}] worker already gone: {e}");
    }
    Ok(())
}

/// Forward FIFO lines to the worker forever
///
/// End-of-input on the FIFO means the last writer closed; the pipe is
/// reopened for the next one. Any error pauses briefly and retries.
async fn relay_commands(fifo: &Path, stdin: &mut ChildStdin) {
    loop {
        match relay_once(fifo, stdin).await {
            Ok(forwarded) => log::debug!("Writer closed after {forwarded} line(s)"),
            Err(e) => {
                log::debug!("Relay on {} failed: {e}", fifo.display());
                tokio::time::sleep(REOPEN_DELAY).await;
            }
        }
    }
}

/// Read one writer session from the FIFO
async fn relay_once(fifo: &Path, stdin: &mut ChildStdin) -> Result<usize> {
    let receiver = open_receiver(fifo)?;
    let mut lines = FramedRead::new(receiver, LinesCodec::new());
    let mut forwarded = 0;

    while let Some(line) = lines.next().await {
        let line = line.map_err(|e| DroidError::Io(std::io::Error::other(e)))?;
        if line.trim().is_empty() {
            continue;
        }
        write_line(stdin, &line).await?;
        forwarded += 1;
    }

    if forwarded == 0 {
        tokio::time::sleep(REOPEN_DELAY).await;
    }
    Ok(forwarded)
}

#[cfg(target_os = "linux")]
fn open_receiver(fifo: &Path) -> Result<pipe::Receiver> {
    // Holding a write reference keeps the pipe from reporting end-of-input
    // between writers.
    Ok(pipe::OpenOptions::new().read_write(true).open_receiver(fifo)?)
}

#[cfg(not(target_os = "linux"))]
fn open_receiver(fifo: &Path) -> Result<pipe::Receiver> {
    Ok(pipe::OpenOptions::new().open_receiver(fifo)?)
}

async fn write_line(stdin: &mut ChildStdin, line: &str) -> Result<()> {
    stdin.write_all(line.trim_end_matches('\n').as_bytes()).await?;
    stdin.write_all(b"\n").await?;
    stdin.flush().await?;
    Ok(())
}

/// Host name reported to the worker as `machineId`
fn machine_id() -> String {
    hostname::get().map_or_else(
        |e| {
            log::warn!("Failed to read host name: {e}");
            "localhost".to_string()
        },
        |name| name.to_string_lossy().into_owned(),
    )
}
