//! Daemon bridging a session's command FIFO to a Droid worker process
//!
//! Launched detached by `DaemonLauncher`; one instance per channel pair.

use anyhow::{Context, Result};
use droid_agent::daemon::{self, DaemonArgs, DaemonConfig};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = DaemonArgs::parse(std::env::args().skip(1))?;
    let config = DaemonConfig::from_env();
    let scope = args.scope();

    daemon::run(args, config)
        .await
        .with_context(|| format!("daemon for {scope} failed"))
}
