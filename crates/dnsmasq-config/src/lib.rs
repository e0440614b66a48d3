//! Configuration schema for a supervised dnsmasq DHCP server.
//!
//! Callers describe the server with a loosely typed JSON object. The
//! validator in this crate checks it against a fixed schema (required
//! fields, types, format constraints), fills in defaults, and yields an
//! immutable [`Configuration`]. Any problem is reported as a [`ConfigError`]
//! naming the offending field before anything touches the filesystem or
//! spawns a process.
//!
//! The crate also carries the logging settings shared with the supervisor
//! crate's telemetry setup.

mod configuration;
pub mod defaults;
mod error;
mod host;
mod id;
mod lease;
mod logging;
mod schema;

pub use configuration::Configuration;
pub use error::ConfigError;
pub use host::{HostBinding, MacAddress, MacAddressParseError};
pub use id::{IdGenerator, UuidGenerator};
pub use lease::{LeaseLength, LeaseLengthParseError, LeaseUnit};
pub use logging::{LogFormat, LogFormatParseError, LoggingConfig};
