//! Logging settings for hosts that let the supervisor install its own
//! subscriber.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::defaults::{default_log_filter_string, default_log_format};

/// How supervisor events are rendered.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One JSON object per event, fields flattened.
    #[default]
    Json,
    /// Single human-readable line per event.
    Compact,
}

/// Errors encountered while parsing a [`LogFormat`] from text.
pub type LogFormatParseError = strum::ParseError;

/// Logging settings consumed by `dnsmasq_dhcp::telemetry`.
///
/// Every field is optional in serialised form:
///
/// ```json
/// {"filter": "warn,dnsmasq_dhcp=debug", "format": "compact", "ansi": false}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoggingConfig {
    /// `tracing` filter directive. The default keeps third-party crates at
    /// `warn` and the supervisor crates at `info`.
    pub filter: String,
    /// Output format.
    pub format: LogFormat,
    /// Forces colour on or off; `None` enables it only when stderr is a
    /// terminal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ansi: Option<bool>,
}

impl LoggingConfig {
    /// Whether colour codes should be written, given whether stderr is a
    /// terminal.
    #[must_use]
    pub fn use_ansi(&self, stderr_is_terminal: bool) -> bool {
        self.ansi.unwrap_or(stderr_is_terminal)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter_string(),
            format: default_log_format(),
            ansi: None,
        }
    }
}
