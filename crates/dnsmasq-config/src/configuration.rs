//! The validated dnsmasq DHCP configuration.

use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use crate::defaults::{
    DEFAULT_LEASE_LENGTH, DEFAULT_LISTEN_ADDRESS, DEFAULT_NETMASK, DEFAULT_PORT, default_pid_file,
};
use crate::error::ConfigError;
use crate::host::{HostBinding, MacAddress};
use crate::id::{IdGenerator, UuidGenerator};
use crate::lease::LeaseLength;
use crate::schema::Fields;

const TOP_LEVEL_KEYS: &[&str] = &[
    "interface",
    "beginIP",
    "endIP",
    "netmask",
    "leaseLength",
    "port",
    "authoritative",
    "listenAddress",
    "domain",
    "pidFile",
    "hostsSpec",
];

const HOST_KEYS: &[&str] = &["macAddr", "ip"];

/// Fully defaulted, validated settings for one supervised dnsmasq instance.
///
/// A `Configuration` can only be obtained through validation, so every
/// optional field already holds its default and argument construction never
/// needs to re-check anything.
///
/// ```
/// use dnsmasq_config::Configuration;
/// use serde_json::json;
///
/// let config = Configuration::from_value(&json!({
///     "interface": "eth0",
///     "beginIP": "192.168.1.2",
///     "endIP": "192.168.1.254",
/// }))?;
/// assert_eq!(config.lease_length().to_string(), "24h");
/// assert!(config.authoritative());
/// # Ok::<(), dnsmasq_config::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    interface: String,
    begin_ip: IpAddr,
    end_ip: IpAddr,
    netmask: IpAddr,
    lease_length: LeaseLength,
    port: u16,
    authoritative: bool,
    listen_address: IpAddr,
    domain: Option<String>,
    pid_file: PathBuf,
    hosts: Vec<HostBinding>,
}

impl Configuration {
    /// Validates `value`, generating a random pid file path if none is given.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first offending field.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        Self::from_value_with(value, &UuidGenerator)
    }

    /// Validates `value`, drawing the default pid file id from `ids`.
    ///
    /// `ids` is consulted at most once, after every other field has passed
    /// validation, and only when `pidFile` is absent.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first offending field.
    pub fn from_value_with(value: &Value, ids: &dyn IdGenerator) -> Result<Self, ConfigError> {
        let fields = Fields::root(value)?;
        fields.reject_unknown(TOP_LEVEL_KEYS)?;

        let interface = fields.required_non_empty("interface")?.to_owned();
        let begin_ip = fields.required_ip("beginIP")?;
        let end_ip = fields.required_ip("endIP")?;
        let netmask = fields.optional_ip("netmask")?.unwrap_or(DEFAULT_NETMASK);
        let lease_length = fields
            .optional_parsed::<LeaseLength>("leaseLength")?
            .unwrap_or(DEFAULT_LEASE_LENGTH);
        let port = fields.optional_port("port")?.unwrap_or(DEFAULT_PORT);
        let authoritative = fields.optional_bool("authoritative")?.unwrap_or(true);
        let listen_address = fields
            .optional_ip("listenAddress")?
            .unwrap_or(DEFAULT_LISTEN_ADDRESS);
        let domain = fields.optional_domain("domain")?.map(str::to_owned);
        let hosts = match fields.optional_objects("hostsSpec")? {
            Some(entries) => entries
                .iter()
                .map(host_binding)
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };
        let explicit_pid_file = fields.optional_str("pidFile")?;
        if let Some(path) = explicit_pid_file {
            fields.ensure_non_empty("pidFile", path)?;
        }
        let pid_file = explicit_pid_file.map_or_else(|| default_pid_file(ids), PathBuf::from);

        Ok(Self {
            interface,
            begin_ip,
            end_ip,
            netmask,
            lease_length,
            port,
            authoritative,
            listen_address,
            domain,
            pid_file,
            hosts,
        })
    }

    /// Parses JSON text and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON, otherwise any
    /// validation error.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Reads a JSON configuration file and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read, otherwise
    /// the errors of [`Configuration::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = path.as_ref();
        let text = fs::read_to_string(file).map_err(|source| ConfigError::Read {
            path: file.to_path_buf(),
            source: Arc::new(source),
        })?;
        Self::from_json_str(&text)
    }

    /// Network interface dnsmasq binds to.
    #[must_use]
    pub fn interface(&self) -> &str {
        self.interface.as_str()
    }

    /// First address of the lease pool.
    #[must_use]
    pub const fn begin_ip(&self) -> IpAddr {
        self.begin_ip
    }

    /// Last address of the lease pool.
    #[must_use]
    pub const fn end_ip(&self) -> IpAddr {
        self.end_ip
    }

    /// Netmask of the lease pool.
    #[must_use]
    pub const fn netmask(&self) -> IpAddr {
        self.netmask
    }

    /// Lease length handed to clients.
    #[must_use]
    pub const fn lease_length(&self) -> LeaseLength {
        self.lease_length
    }

    /// DNS port dnsmasq listens on.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Whether dnsmasq runs in DHCP-authoritative mode.
    #[must_use]
    pub const fn authoritative(&self) -> bool {
        self.authoritative
    }

    /// Address dnsmasq listens on.
    #[must_use]
    pub const fn listen_address(&self) -> IpAddr {
        self.listen_address
    }

    /// Local domain, if configured.
    #[must_use]
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Path dnsmasq writes its pid to.
    #[must_use]
    pub fn pid_file(&self) -> &Path {
        self.pid_file.as_path()
    }

    /// Static host bindings in input order.
    #[must_use]
    pub fn hosts(&self) -> &[HostBinding] {
        &self.hosts
    }
}

fn host_binding(entry: &Fields<'_>) -> Result<HostBinding, ConfigError> {
    entry.reject_unknown(HOST_KEYS)?;
    let mac_addr = entry.required_parsed::<MacAddress>("macAddr")?;
    let ip = entry.required_ip("ip")?;
    Ok(HostBinding::new(mac_addr, ip))
}
