//! Validation errors raised while building a [`Configuration`](crate::Configuration).

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors raised while validating a configuration.
///
/// Every variant is produced before any filesystem or process side effect,
/// apart from [`ConfigError::Read`], which reports the file read itself.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// The configuration value was not a JSON object.
    #[error("configuration must be an object, got {found}")]
    NotAnObject {
        /// JSON type that was supplied instead.
        found: &'static str,
    },
    /// A required field was absent.
    #[error("'{field}' is required")]
    MissingField {
        /// Field path, e.g. `interface` or `hostsSpec[0].ip`.
        field: String,
    },
    /// A field that the schema does not define was supplied.
    #[error("'{field}' is not allowed")]
    UnknownField {
        /// Field path of the unexpected key.
        field: String,
    },
    /// A field held a value of the wrong JSON type.
    #[error("'{field}' must be {expected}, got {found}")]
    InvalidType {
        /// Field path.
        field: String,
        /// Expected type description.
        expected: &'static str,
        /// JSON type that was supplied.
        found: &'static str,
    },
    /// A field had the right type but violated a format constraint.
    #[error("'{field}' is invalid: {reason}")]
    InvalidValue {
        /// Field path.
        field: String,
        /// Constraint that was violated.
        reason: String,
    },
    /// JSON text could not be parsed.
    #[error("failed to parse configuration: {source}")]
    Parse {
        /// Underlying parser error.
        #[source]
        source: Arc<serde_json::Error>,
    },
    /// A configuration file could not be read.
    #[error("failed to read configuration file '{path}': {source}")]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: Arc<io::Error>,
    },
}

impl ConfigError {
    /// Field path the error refers to, when it concerns a single field.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingField { field }
            | Self::UnknownField { field }
            | Self::InvalidType { field, .. }
            | Self::InvalidValue { field, .. } => Some(field.as_str()),
            Self::NotAnObject { .. } | Self::Parse { .. } | Self::Read { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(source: serde_json::Error) -> Self {
        Self::Parse {
            source: Arc::new(source),
        }
    }
}
