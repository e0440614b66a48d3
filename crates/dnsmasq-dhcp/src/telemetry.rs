//! Optional tracing subscriber installation for hosts that do not bring their
//! own.
//!
//! Every supervisor event carries a `dnsmasq_dhcp::<module>` target, so the
//! default [`LoggingConfig`] filter surfaces resolution, spawn, exit and stop
//! events at `info` while keeping dependencies at `warn`.

use std::io::{self, IsTerminal};

use dnsmasq_config::{LogFormat, LoggingConfig};
use once_cell::sync::OnceCell;
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

static TELEMETRY_GUARD: OnceCell<()> = OnceCell::new();

/// Handle returned once telemetry is in place.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured filter directive did not parse.
    #[error("invalid log filter '{filter}': {reason}")]
    Filter {
        /// Directive as configured.
        filter: String,
        /// Parser message.
        reason: String,
    },
    /// Another global subscriber was already installed by the host.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Installs the global tracing subscriber on first use.
///
/// Later calls return a fresh [`TelemetryHandle`] without touching global
/// state, even when they pass a different configuration.
///
/// ```rust
/// use dnsmasq_dhcp::dnsmasq_config::LoggingConfig;
/// use dnsmasq_dhcp::telemetry;
///
/// # fn main() -> Result<(), telemetry::TelemetryError> {
/// let config = LoggingConfig::default();
/// let _first = telemetry::initialise(&config)?;
/// let _second = telemetry::initialise(&config)?;
/// # Ok(())
/// # }
/// ```
pub fn initialise(config: &LoggingConfig) -> Result<TelemetryHandle, TelemetryError> {
    TELEMETRY_GUARD
        .get_or_try_init(|| install_subscriber(config))
        .map(|_| TelemetryHandle)
}

fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(&config.filter).map_err(|error| TelemetryError::Filter {
        filter: config.filter.clone(),
        reason: error.to_string(),
    })
}

fn install_subscriber(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let filter = env_filter(config)?;
    let ansi = config.use_ansi(io::stderr().is_terminal());

    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .with_ansi(ansi)
        .with_timer(fmt::time::UtcTime::rfc_3339());

    let subscriber: Box<dyn Subscriber + Send + Sync> = match config.format {
        LogFormat::Json => Box::new(builder.json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(builder.compact().finish()),
    };

    tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)
}
