//! Static host bindings handed to dnsmasq as `--dhcp-host` entries.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use thiserror::Error;

const MAC_OCTETS: usize = 6;

/// Hardware address written as six hex pairs separated by `:` or `-`.
///
/// Hex digits may be upper- or lower-case, matching what dnsmasq itself
/// accepts in `--dhcp-host`, and each separator is checked on its own so
/// `00:1A-2B:3C-4D:5E` is valid. The spelling is preserved so the value
/// reaches dnsmasq exactly as the caller wrote it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MacAddress(String);

impl MacAddress {
    /// Returns the address as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raised when text is not a separated hex-pair MAC address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{input}' is not a MAC address of six hex pairs separated by ':' or '-'")]
pub struct MacAddressParseError {
    /// Rejected input.
    pub input: String,
}

impl FromStr for MacAddress {
    type Err = MacAddressParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if is_mac_address(input) {
            Ok(Self(input.to_owned()))
        } else {
            Err(MacAddressParseError {
                input: input.to_owned(),
            })
        }
    }
}

fn is_mac_address(input: &str) -> bool {
    let pairs: Vec<&str> = input.split([':', '-']).collect();
    pairs.len() == MAC_OCTETS
        && pairs
            .iter()
            .all(|pair| pair.len() == 2 && pair.bytes().all(|byte| byte.is_ascii_hexdigit()))
}

/// Fixed MAC-to-IP assignment that bypasses dynamic pool allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostBinding {
    mac_addr: MacAddress,
    ip: IpAddr,
}

impl HostBinding {
    /// Creates a binding from validated parts.
    #[must_use]
    pub const fn new(mac_addr: MacAddress, ip: IpAddr) -> Self {
        Self { mac_addr, ip }
    }

    /// Hardware address of the bound client.
    #[must_use]
    pub const fn mac_addr(&self) -> &MacAddress {
        &self.mac_addr
    }

    /// Address reserved for the client.
    #[must_use]
    pub const fn ip(&self) -> IpAddr {
        self.ip
    }
}
