//! Detached daemons serving channel pairs
//!
//! A daemon sits between a session's command FIFO and a worker process:
//!
//! ```text
//!  FIFO ──lines──▶ droid-daemon ──stdin──▶ droid exec ──stdout/stderr──▶ log
//! ```
//!
//! The controller side launches daemons through a [`Launcher`] and keeps a
//! [`DaemonHandle`] on them; the `droid-daemon` binary runs [`run`].

mod args;
mod command;
mod handle;
mod launcher;
mod relay;

pub use args::{DaemonArgs, DaemonMode, USAGE};
pub use command::{DAEMON_NAME, WORKER_NAME, WorkerCommand, find_daemon, find_worker};
pub use handle::DaemonHandle;
pub use launcher::{DANGEROUS_ENV_VARS, DaemonLauncher, Launcher};
pub use relay::{DaemonConfig, run};
