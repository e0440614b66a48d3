//! Error types for the dnsmasq server lifecycle.
//!
//! I/O errors are wrapped in `Arc` so the enums stay `Clone` and small enough
//! for the `result_large_err` lint.

use std::io;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::supervisor::ProcessOutput;

/// Errors raised by [`DnsmasqDhcp::start`](crate::DnsmasqDhcp::start).
#[derive(Debug, Clone, Error)]
pub enum StartError {
    /// The executable was not found when the instance was built.
    #[error("'{binary}' was not found in any of {searched:?}")]
    BinaryNotFound {
        /// Executable name that was searched for.
        binary: String,
        /// Directories that were searched, in order.
        searched: Vec<PathBuf>,
    },
    /// The executable could not be spawned.
    #[error("failed to spawn '{binary}': {source}", binary = .binary.display())]
    Spawn {
        /// Resolved executable path.
        binary: PathBuf,
        /// Underlying IO error.
        #[source]
        source: Arc<io::Error>,
    },
    /// Collecting output from or waiting on the process failed.
    #[error("failed to supervise '{binary}': {source}", binary = .binary.display())]
    Io {
        /// Resolved executable path.
        binary: PathBuf,
        /// Underlying IO error.
        #[source]
        source: Arc<io::Error>,
    },
    /// The process exited with a nonzero status.
    #[error("dnsmasq exited with status {}{}", .output.code, stderr_suffix(.output))]
    ProcessFailed {
        /// Everything the process reported before it closed.
        output: ProcessOutput,
    },
}

impl StartError {
    /// Output of the failed process, when the failure came from its exit status.
    #[must_use]
    pub const fn output(&self) -> Option<&ProcessOutput> {
        match self {
            Self::ProcessFailed { output } => Some(output),
            _ => None,
        }
    }
}

fn stderr_suffix(output: &ProcessOutput) -> String {
    output
        .stderr
        .as_deref()
        .map(|stderr| format!(": {stderr}"))
        .unwrap_or_default()
}

/// Problems with the pid file dnsmasq leaves behind.
///
/// Only logged: a pid that cannot be recovered leaves the recorded pid as it
/// was and never fails a start.
#[derive(Debug, Error)]
pub(crate) enum PidFileError {
    #[error("failed to read pid file '{path}': {source}", path = .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse pid file '{path}': {source}", path = .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseIntError,
    },
}

/// Errors raised by [`DnsmasqDhcp::stop`](crate::DnsmasqDhcp::stop).
///
/// Failures of the termination utility itself are logged and never surface
/// here.
#[derive(Debug, Clone, Error)]
pub enum StopError {
    /// The pid file exists but could not be removed.
    #[error("failed to remove pid file '{path}': {source}", path = .path.display())]
    RemovePidFile {
        /// Pid file path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: Arc<io::Error>,
    },
}
