//! Default values applied by configuration validation.

use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use crate::id::IdGenerator;
use crate::lease::{LeaseLength, LeaseUnit};

/// Netmask applied to the lease pool when none is configured.
pub const DEFAULT_NETMASK: IpAddr = IpAddr::V4(Ipv4Addr::new(255, 255, 255, 0));

/// Address dnsmasq listens on when none is configured.
pub const DEFAULT_LISTEN_ADDRESS: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// DNS port handed to dnsmasq so it does not contend for port 53.
pub const DEFAULT_PORT: u16 = 5353;

/// Lease length handed out when none is configured.
pub const DEFAULT_LEASE_LENGTH: LeaseLength = LeaseLength::new(24, LeaseUnit::Hours);

/// Default log filter: quiet dependencies, supervisor events at `info`.
pub const DEFAULT_LOG_FILTER: &str = "warn,dnsmasq_dhcp=info,dnsmasq_config=info";

/// Prefix for generated pid file names.
const PID_FILE_PREFIX: &str = "dnsmasq-dhcp";

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
#[must_use]
pub const fn default_log_format() -> crate::logging::LogFormat {
    crate::logging::LogFormat::Json
}

/// Builds a fresh pid file path under the system temporary directory.
///
/// Each call consumes one id from `ids`, so two instances built from
/// configurations without a `pidFile` never share a path.
#[must_use]
pub fn default_pid_file(ids: &dyn IdGenerator) -> PathBuf {
    let mut path = env::temp_dir();
    path.push(format!("{PID_FILE_PREFIX}-{}.pid", ids.next_id()));
    path
}
