//! The supervised dnsmasq server handle.
//!
//! A [`DnsmasqDhcp`] owns one validated configuration, the argument list
//! derived from it, and the executable path resolved at construction. Its
//! lifecycle is `start` (run dnsmasq until it closes, then record the pid it
//! wrote) followed by any number of `stop` calls.

use std::path::{Path, PathBuf};

use dnsmasq_config::{ConfigError, Configuration};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::arguments::build_arguments;
use crate::error::{StartError, StopError};
use crate::resolver::SearchPath;
use crate::supervisor::{self, ProcessOutput};
use crate::termination;

const SERVER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::server");

/// Executable name looked up in the search path.
pub const DEFAULT_BINARY_NAME: &str = "dnsmasq";

/// Utility invoked with the pid to stop a running instance.
pub const DEFAULT_TERMINATION_PROGRAM: &str = "kill";

/// Handle on one dnsmasq DHCP server.
///
/// `start` takes `&mut self`, so one handle can never drive two overlapping
/// starts.
#[derive(Debug, Clone)]
pub struct DnsmasqDhcp {
    config: Configuration,
    arguments: Vec<String>,
    binary_name: String,
    binary: Option<PathBuf>,
    search_path: SearchPath,
    termination_program: PathBuf,
    pid: Option<u32>,
}

impl DnsmasqDhcp {
    /// Validates `value` and builds a server using the inherited `PATH`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found in `value`.
    pub fn new(value: &Value) -> Result<Self, ConfigError> {
        Configuration::from_value(value).map(Self::from_config)
    }

    /// Builds a server from an already validated configuration.
    #[must_use]
    pub fn from_config(config: Configuration) -> Self {
        Self::builder(config).build()
    }

    /// Starts a builder for overriding the search path, executable name or
    /// termination utility.
    #[must_use]
    pub fn builder(config: Configuration) -> DnsmasqDhcpBuilder {
        DnsmasqDhcpBuilder {
            config,
            search_path: None,
            binary_name: DEFAULT_BINARY_NAME.to_owned(),
            termination_program: PathBuf::from(DEFAULT_TERMINATION_PROGRAM),
        }
    }

    /// The validated configuration.
    #[must_use]
    pub const fn config(&self) -> &Configuration {
        &self.config
    }

    /// Arguments passed to dnsmasq on every start.
    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Resolved executable path, or `None` when it was not found.
    #[must_use]
    pub fn binary(&self) -> Option<&Path> {
        self.binary.as_deref()
    }

    /// Directories that were searched for the executable.
    #[must_use]
    pub const fn search_path(&self) -> &SearchPath {
        &self.search_path
    }

    /// Process id recorded by the last successful start.
    #[must_use]
    pub const fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Records a process id, e.g. one recovered from an earlier run.
    pub const fn set_pid(&mut self, pid: Option<u32>) {
        self.pid = pid;
    }

    /// Runs dnsmasq until it closes and records the pid it wrote.
    ///
    /// dnsmasq daemonises by default, so the launched process exits once the
    /// server is up; the returned [`ProcessOutput`] is what it printed before
    /// doing so. The pid file is read after every close, whatever the exit
    /// status, and a pid found there replaces the recorded one. A pid file
    /// that cannot be read or parsed is logged and leaves the pid unchanged.
    ///
    /// # Errors
    ///
    /// * [`StartError::BinaryNotFound`] without spawning anything when the
    ///   executable was not resolved.
    /// * [`StartError::ProcessFailed`] when dnsmasq exits nonzero.
    /// * Spawn and pipe I/O errors as they occur.
    pub async fn start(&mut self) -> Result<ProcessOutput, StartError> {
        let Some(binary) = self.binary.as_deref() else {
            return Err(StartError::BinaryNotFound {
                binary: self.binary_name.clone(),
                searched: self.search_path.directories().to_vec(),
            });
        };
        info!(
            target: SERVER_TARGET,
            binary = %binary.display(),
            interface = self.config.interface(),
            pid_file = %self.config.pid_file().display(),
            "starting dnsmasq"
        );

        let output = supervisor::run(binary, &self.arguments).await?;
        match supervisor::read_pid(self.config.pid_file()).await {
            Ok(Some(pid)) => self.pid = Some(pid),
            Ok(None) => {}
            Err(error) => warn!(
                target: SERVER_TARGET,
                %error,
                code = output.code,
                "ignoring unreadable pid file; pid left unchanged"
            ),
        }
        if !output.success() {
            return Err(StartError::ProcessFailed { output });
        }

        info!(target: SERVER_TARGET, pid = self.pid, "dnsmasq started");
        Ok(output)
    }

    /// Stops the server and removes its pid file.
    ///
    /// The recorded pid takes precedence over `override_pid`. The pid file is
    /// removed and the recorded pid cleared whether or not a pid is known;
    /// with one, the termination utility is invoked and its outcome only
    /// logged. Calling `stop` again is harmless.
    ///
    /// Returns the pid that was signalled, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StopError::RemovePidFile`] when the pid file exists but
    /// cannot be removed.
    pub async fn stop(&mut self, override_pid: Option<u32>) -> Result<Option<u32>, StopError> {
        let target_pid = self.pid.or(override_pid);
        termination::remove_pid_file(self.config.pid_file()).await?;
        self.pid = None;

        let Some(pid) = target_pid else {
            debug!(target: SERVER_TARGET, "no pid known; nothing to signal");
            return Ok(None);
        };
        info!(target: SERVER_TARGET, pid, "stopping dnsmasq");
        termination::signal(&self.termination_program, pid).await;
        Ok(Some(pid))
    }
}

/// Builder for [`DnsmasqDhcp`].
#[derive(Debug, Clone)]
pub struct DnsmasqDhcpBuilder {
    config: Configuration,
    search_path: Option<SearchPath>,
    binary_name: String,
    termination_program: PathBuf,
}

impl DnsmasqDhcpBuilder {
    /// Searches `search_path` instead of the inherited `PATH`.
    #[must_use]
    pub fn search_path(mut self, search_path: SearchPath) -> Self {
        self.search_path = Some(search_path);
        self
    }

    /// Looks up `name` instead of [`DEFAULT_BINARY_NAME`].
    #[must_use]
    pub fn binary_name(mut self, name: impl Into<String>) -> Self {
        self.binary_name = name.into();
        self
    }

    /// Stops the server with `program` instead of
    /// [`DEFAULT_TERMINATION_PROGRAM`].
    #[must_use]
    pub fn termination_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.termination_program = program.into();
        self
    }

    /// Derives the argument list and resolves the executable.
    ///
    /// A missing executable is not an error here; it surfaces from
    /// [`DnsmasqDhcp::start`].
    #[must_use]
    pub fn build(self) -> DnsmasqDhcp {
        let search_path = self.search_path.unwrap_or_else(SearchPath::from_env);
        let binary = search_path.resolve(&self.binary_name);
        let arguments = build_arguments(&self.config);
        debug!(
            target: SERVER_TARGET,
            binary = %self.binary_name,
            resolved = binary.is_some(),
            arguments = ?arguments,
            "built dnsmasq server"
        );
        DnsmasqDhcp {
            config: self.config,
            arguments,
            binary_name: self.binary_name,
            binary,
            search_path,
            termination_program: self.termination_program,
            pid: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn config(pid_file: &Path) -> Configuration {
        Configuration::from_value(&json!({
            "interface": "eth0",
            "beginIP": "192.168.1.2",
            "endIP": "192.168.1.254",
            "pidFile": pid_file,
        }))
        .expect("valid config")
    }

    #[test]
    fn invalid_configuration_is_rejected_before_resolution() {
        let error = DnsmasqDhcp::new(&json!({"interface": "eth0"})).expect_err("invalid");
        assert_eq!(error.field(), Some("beginIP"));
    }

    #[test]
    fn builder_records_unresolved_binary() {
        let dir = TempDir::new().expect("temp dir");
        let server = DnsmasqDhcp::builder(config(&dir.path().join("x.pid")))
            .search_path(SearchPath::new([dir.path()]))
            .binary_name("dnsmasq-missing-for-test")
            .build();

        assert_eq!(server.binary(), None);
        assert_eq!(server.pid(), None);
        assert_eq!(server.arguments(), build_arguments(server.config()).as_slice());
    }

    #[tokio::test]
    async fn start_without_binary_fails_fast() {
        let dir = TempDir::new().expect("temp dir");
        let mut server = DnsmasqDhcp::builder(config(&dir.path().join("x.pid")))
            .search_path(SearchPath::new([dir.path()]))
            .binary_name("dnsmasq-missing-for-test")
            .build();

        let error = server.start().await.expect_err("binary missing");
        match error {
            StartError::BinaryNotFound { binary, searched } => {
                assert_eq!(binary, "dnsmasq-missing-for-test");
                assert_eq!(searched, server.search_path().directories());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn stop_without_pid_is_a_no_op() {
        let dir = TempDir::new().expect("temp dir");
        let mut server = DnsmasqDhcp::builder(config(&dir.path().join("x.pid")))
            .search_path(SearchPath::new([dir.path()]))
            .build();

        assert_eq!(server.stop(None).await.expect("stop"), None);
        assert_eq!(server.stop(None).await.expect("second stop"), None);
    }
}
