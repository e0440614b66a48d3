//! Child process supervision.
//!
//! Runs the resolved executable to completion, collecting both output streams
//! concurrently so neither pipe can fill and stall the child, then reads the
//! pid file the process left behind.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use serde::Serialize;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::debug;

use crate::error::{PidFileError, StartError};

const SUPERVISOR_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::supervisor");

/// What a supervised process reported before it closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessOutput {
    /// Trimmed standard output, or `None` when the stream stayed empty.
    pub stdout: Option<String>,
    /// Trimmed standard error, or `None` when the stream stayed empty.
    pub stderr: Option<String>,
    /// Exit code; `-1` when the process was terminated by a signal.
    pub code: i32,
}

impl ProcessOutput {
    /// Whether the process exited with status zero.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.code == 0
    }
}

/// Runs `binary` with `arguments` until it exits.
///
/// Standard input is closed. A nonzero exit is reported through
/// [`ProcessOutput::code`] rather than as an error; only spawn and pipe
/// failures are errors here.
pub(crate) async fn run(binary: &Path, arguments: &[String]) -> Result<ProcessOutput, StartError> {
    let mut child = Command::new(binary)
        .args(arguments)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| StartError::Spawn {
            binary: binary.to_path_buf(),
            source: Arc::new(source),
        })?;
    debug!(
        target: SUPERVISOR_TARGET,
        binary = %binary.display(),
        pid = child.id(),
        "spawned process"
    );

    let stdout_pipe = child.stdout.take();
    let stderr_pipe = child.stderr.take();
    let (status, stdout, stderr) = tokio::try_join!(
        child.wait(),
        collect(stdout_pipe),
        collect(stderr_pipe)
    )
    .map_err(|source| StartError::Io {
        binary: binary.to_path_buf(),
        source: Arc::new(source),
    })?;

    let output = ProcessOutput {
        stdout,
        stderr,
        code: status.code().unwrap_or(-1),
    };
    debug!(
        target: SUPERVISOR_TARGET,
        binary = %binary.display(),
        code = output.code,
        "process exited"
    );
    Ok(output)
}

async fn collect<R>(pipe: Option<R>) -> io::Result<Option<String>>
where
    R: AsyncRead + Unpin,
{
    let Some(mut stream) = pipe else {
        return Ok(None);
    };
    let mut buffer = Vec::new();
    stream.read_to_end(&mut buffer).await?;
    let text = String::from_utf8_lossy(&buffer);
    let trimmed = text.trim();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_owned()))
}

/// Reads the process id dnsmasq wrote to `path`.
///
/// * `Ok(Some(pid))` - the file holds an integer.
/// * `Ok(None)` - the file is missing or blank.
/// * `Err(Read)` - the file exists but could not be read.
/// * `Err(Parse)` - the file holds something other than an integer.
pub(crate) async fn read_pid(path: &Path) -> Result<Option<u32>, PidFileError> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(PidFileError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<u32>()
        .map(Some)
        .map_err(|source| PidFileError::Parse {
            path: PathBuf::from(path),
            source,
        })
}
