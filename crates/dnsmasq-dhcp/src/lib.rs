//! Supervision of a dnsmasq DHCP server.
//!
//! [`DnsmasqDhcp`] turns a loosely typed JSON description of a DHCP server
//! into a validated [`dnsmasq_config::Configuration`], derives the dnsmasq
//! command line from it, and locates the dnsmasq executable once. `start`
//! runs dnsmasq until it daemonises and records the pid it wrote; `stop`
//! removes the pid file and asks the termination utility to end the process.
//!
//! ```no_run
//! use dnsmasq_dhcp::DnsmasqDhcp;
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut server = DnsmasqDhcp::new(&json!({
//!     "interface": "eth0",
//!     "beginIP": "192.168.1.100",
//!     "endIP": "192.168.1.200",
//! }))?;
//! let output = server.start().await?;
//! println!("{:?} (pid {:?})", output.stdout, server.pid());
//! server.stop(None).await?;
//! # Ok(())
//! # }
//! ```

mod arguments;
mod error;
mod resolver;
mod server;
mod supervisor;
pub mod telemetry;
mod termination;

#[cfg(all(test, unix))]
mod tests;

pub use arguments::build_arguments;
pub use dnsmasq_config;
pub use error::{StartError, StopError};
pub use resolver::{SYSTEM_BINARY_DIR, SearchPath};
pub use server::{
    DEFAULT_BINARY_NAME, DEFAULT_TERMINATION_PROGRAM, DnsmasqDhcp, DnsmasqDhcpBuilder,
};
pub use supervisor::ProcessOutput;
