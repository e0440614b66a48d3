//! Best-effort teardown of a dnsmasq instance.
//!
//! Signalling goes through an external termination utility (`kill` unless
//! configured otherwise). Its outcome is logged and never propagated: the
//! process may already be gone, and stopping must stay idempotent.

use std::io;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;

use tokio::fs;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::StopError;

const TERMINATION_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::termination");

/// Removes the pid file at `path`.
///
/// Returns `Ok(true)` when a file was removed and `Ok(false)` when none
/// existed.
pub(crate) async fn remove_pid_file(path: &Path) -> Result<bool, StopError> {
    match fs::remove_file(path).await {
        Ok(()) => {
            debug!(target: TERMINATION_TARGET, path = %path.display(), "removed pid file");
            Ok(true)
        }
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(StopError::RemovePidFile {
            path: path.to_path_buf(),
            source: Arc::new(source),
        }),
    }
}

/// Invokes `program <pid>` and waits for it to finish.
pub(crate) async fn signal(program: &Path, pid: u32) {
    let status = Command::new(program)
        .arg(pid.to_string())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;
    match status {
        Ok(status) if status.success() => debug!(
            target: TERMINATION_TARGET,
            pid,
            "termination signal delivered"
        ),
        Ok(status) => debug!(
            target: TERMINATION_TARGET,
            pid,
            code = status.code(),
            "termination utility reported failure"
        ),
        Err(error) => warn!(
            target: TERMINATION_TARGET,
            pid,
            program = %program.display(),
            %error,
            "failed to run termination utility"
        ),
    }
}
