//! Shell-script stand-ins for dnsmasq and the termination utility.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use dnsmasq_config::Configuration;
use once_cell::sync::Lazy;
use serde_json::json;
use tempfile::TempDir;
use tokio::sync::Mutex;

use crate::{DnsmasqDhcp, SearchPath};

/// Serialises writing and executing scripts across test threads. A script
/// still open for writing when another thread forks fails to exec with
/// `ETXTBSY`.
pub(crate) static SPAWN_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Name the fake dnsmasq is installed under. Distinct from `dnsmasq` so a
/// real installation in `/usr/sbin` never shadows it.
pub(crate) const FAKE_DNSMASQ: &str = "fake-dnsmasq";

const FAKE_KILL: &str = "fake-kill";

/// Prints a banner and exits cleanly without writing a pid file.
pub(crate) const QUIET_DNSMASQ: &str = "#!/bin/sh\necho \"dnsmasq started successfully\"\n";

/// Records its arguments, writes pid 4242 to the `--pid-file` path and exits
/// cleanly.
pub(crate) const PID_WRITING_DNSMASQ: &str = r#"#!/bin/sh
printf '%s\n' "$@" > "$(dirname "$0")/args.log"
for arg in "$@"; do
  case "$arg" in
    --pid-file=*) echo 4242 > "${arg#--pid-file=}" ;;
  esac
done
echo "dnsmasq started successfully"
"#;

/// Writes a non-numeric pid file and exits cleanly.
pub(crate) const GARBAGE_PID_DNSMASQ: &str = r#"#!/bin/sh
for arg in "$@"; do
  case "$arg" in
    --pid-file=*) echo "not-a-pid" > "${arg#--pid-file=}" ;;
  esac
done
echo "dnsmasq started successfully"
"#;

/// Complains on stderr and exits with status 3.
pub(crate) const FAILING_DNSMASQ: &str =
    "#!/bin/sh\necho \"dnsmasq: unknown interface eth9\" >&2\nexit 3\n";

/// Writes pid 4343, then fails like a dnsmasq that forked before a late
/// configuration error.
pub(crate) const LATE_FAILING_DNSMASQ: &str = r#"#!/bin/sh
for arg in "$@"; do
  case "$arg" in
    --pid-file=*) echo 4343 > "${arg#--pid-file=}" ;;
  esac
done
echo "dnsmasq: failed to bind DHCP server socket" >&2
exit 2
"#;

/// Appends its arguments to `kill.log` beside the script.
pub(crate) const RECORDING_KILL: &str = "#!/bin/sh\necho \"$@\" >> \"$(dirname \"$0\")/kill.log\"\n";

/// Always fails, like `kill` aimed at a process that is already gone.
pub(crate) const FAILING_KILL: &str = "#!/bin/sh\nexit 1\n";

/// Scratch directory holding the fake executables, pid file and logs.
pub(crate) struct FakeTools {
    dir: TempDir,
}

impl FakeTools {
    pub(crate) fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir"),
        }
    }

    pub(crate) fn install_dnsmasq(&self, script: &str) {
        write_executable(&self.dir.path().join(FAKE_DNSMASQ), script);
    }

    pub(crate) fn install_kill(&self, script: &str) {
        write_executable(&self.dir.path().join(FAKE_KILL), script);
    }

    pub(crate) fn pid_file(&self) -> PathBuf {
        self.dir.path().join("dnsmasq.pid")
    }

    /// Builds a server that resolves [`FAKE_DNSMASQ`] from this directory and
    /// stops through the fake termination utility.
    pub(crate) fn server(&self) -> DnsmasqDhcp {
        let config = Configuration::from_value(&json!({
            "interface": "eth0",
            "beginIP": "192.168.1.100",
            "endIP": "192.168.1.200",
            "domain": "lab.example.com",
            "pidFile": self.pid_file(),
            "hostsSpec": [{"macAddr": "00:11:22:33:44:55", "ip": "192.168.1.10"}],
        }))
        .expect("valid config");
        DnsmasqDhcp::builder(config)
            .search_path(SearchPath::new([self.dir.path()]))
            .binary_name(FAKE_DNSMASQ)
            .termination_program(self.dir.path().join(FAKE_KILL))
            .build()
    }

    /// Arguments the fake dnsmasq received, one per line.
    pub(crate) fn recorded_arguments(&self) -> Vec<String> {
        read_optional(&self.dir.path().join("args.log"))
            .map(|log| log.lines().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    /// Pids passed to the fake termination utility, in call order.
    pub(crate) fn signalled_pids(&self) -> Vec<String> {
        read_optional(&self.dir.path().join("kill.log"))
            .map(|log| log.lines().map(str::to_owned).collect())
            .unwrap_or_default()
    }
}

fn read_optional(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok()
}

fn write_executable(path: &Path, script: &str) {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o755)
        .open(path)
        .expect("create script");
    file.write_all(script.as_bytes()).expect("write script");
    file.sync_all().expect("sync script");
}
