//! Field-level schema checks over a loosely typed JSON object.
//!
//! [`Fields`] wraps one JSON object and knows the path it was reached by, so
//! every error names the offending field precisely (`hostsSpec[2].ip`).

use std::net::IpAddr;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::error::ConfigError;

const MAX_DOMAIN_LENGTH: usize = 253;
const MAX_LABEL_LENGTH: usize = 63;

/// Returns the JSON type name used in error messages.
pub(crate) const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Borrowed view of one configuration object.
pub(crate) struct Fields<'a> {
    map: &'a Map<String, Value>,
    prefix: String,
}

impl<'a> Fields<'a> {
    pub(crate) fn root(value: &'a Value) -> Result<Self, ConfigError> {
        Self::nested(value, String::new())
    }

    fn nested(value: &'a Value, prefix: String) -> Result<Self, ConfigError> {
        match value {
            Value::Object(map) => Ok(Self { map, prefix }),
            other if prefix.is_empty() => Err(ConfigError::NotAnObject {
                found: json_type(other),
            }),
            other => Err(ConfigError::InvalidType {
                field: prefix,
                expected: "an object",
                found: json_type(other),
            }),
        }
    }

    pub(crate) fn path(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_owned()
        } else {
            format!("{}.{key}", self.prefix)
        }
    }

    /// Rejects keys outside `allowed`, reporting the first in key order.
    pub(crate) fn reject_unknown(&self, allowed: &[&str]) -> Result<(), ConfigError> {
        match self.map.keys().find(|key| !allowed.contains(&key.as_str())) {
            Some(key) => Err(ConfigError::UnknownField {
                field: self.path(key),
            }),
            None => Ok(()),
        }
    }

    pub(crate) fn optional_str(&self, key: &str) -> Result<Option<&'a str>, ConfigError> {
        match self.map.get(key) {
            None => Ok(None),
            Some(Value::String(text)) => Ok(Some(text.as_str())),
            Some(other) => Err(self.invalid_type(key, "a string", other)),
        }
    }

    pub(crate) fn required_str(&self, key: &str) -> Result<&'a str, ConfigError> {
        self.optional_str(key)?
            .ok_or_else(|| ConfigError::MissingField {
                field: self.path(key),
            })
    }

    /// A required string that must contain something other than whitespace.
    pub(crate) fn required_non_empty(&self, key: &str) -> Result<&'a str, ConfigError> {
        let text = self.required_str(key)?;
        self.ensure_non_empty(key, text)?;
        Ok(text)
    }

    pub(crate) fn ensure_non_empty(&self, key: &str, text: &str) -> Result<(), ConfigError> {
        if text.trim().is_empty() {
            return Err(self.invalid_value(key, "must not be empty"));
        }
        Ok(())
    }

    pub(crate) fn required_ip(&self, key: &str) -> Result<IpAddr, ConfigError> {
        let text = self.required_str(key)?;
        self.parse_ip(key, text)
    }

    pub(crate) fn optional_ip(&self, key: &str) -> Result<Option<IpAddr>, ConfigError> {
        self.optional_str(key)?
            .map(|text| self.parse_ip(key, text))
            .transpose()
    }

    /// Parses a value through its [`FromStr`] impl, reporting the impl's message.
    pub(crate) fn optional_parsed<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional_str(key)?
            .map(|text| {
                text.parse::<T>()
                    .map_err(|error| self.invalid_value(key, &error.to_string()))
            })
            .transpose()
    }

    pub(crate) fn required_parsed<T>(&self, key: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional_parsed(key)?
            .ok_or_else(|| ConfigError::MissingField {
                field: self.path(key),
            })
    }

    /// Accepts an integer or a numeric string in `0..=65535`.
    pub(crate) fn optional_port(&self, key: &str) -> Result<Option<u16>, ConfigError> {
        let out_of_range =
            || self.invalid_value(key, "must be a port number between 0 and 65535");
        match self.map.get(key) {
            None => Ok(None),
            Some(Value::Number(number)) => number
                .as_u64()
                .and_then(|raw| u16::try_from(raw).ok())
                .map(Some)
                .ok_or_else(out_of_range),
            Some(Value::String(text)) => text
                .trim()
                .parse::<u16>()
                .map(Some)
                .map_err(|_| out_of_range()),
            Some(other) => Err(self.invalid_type(key, "a port number", other)),
        }
    }

    /// Accepts a boolean or the strings `"true"`/`"false"`.
    pub(crate) fn optional_bool(&self, key: &str) -> Result<Option<bool>, ConfigError> {
        match self.map.get(key) {
            None => Ok(None),
            Some(Value::Bool(flag)) => Ok(Some(*flag)),
            Some(Value::String(text)) if text.eq_ignore_ascii_case("true") => Ok(Some(true)),
            Some(Value::String(text)) if text.eq_ignore_ascii_case("false") => Ok(Some(false)),
            Some(other) => Err(self.invalid_type(key, "a boolean", other)),
        }
    }

    /// Visits each object in an optional array, handing out nested views.
    pub(crate) fn optional_objects(
        &self,
        key: &str,
    ) -> Result<Option<Vec<Fields<'a>>>, ConfigError> {
        match self.map.get(key) {
            None => Ok(None),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(index, item)| Self::nested(item, format!("{}[{index}]", self.path(key))))
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(other) => Err(self.invalid_type(key, "an array", other)),
        }
    }

    pub(crate) fn optional_domain(&self, key: &str) -> Result<Option<&'a str>, ConfigError> {
        let Some(text) = self.optional_str(key)? else {
            return Ok(None);
        };
        if !is_domain_name(text) {
            return Err(self.invalid_value(key, &format!("'{text}' is not a valid domain name")));
        }
        Ok(Some(text))
    }

    fn parse_ip(&self, key: &str, text: &str) -> Result<IpAddr, ConfigError> {
        text.parse::<IpAddr>()
            .map_err(|_| self.invalid_value(key, &format!("'{text}' is not a valid IP address")))
    }

    fn invalid_type(&self, key: &str, expected: &'static str, found: &Value) -> ConfigError {
        ConfigError::InvalidType {
            field: self.path(key),
            expected,
            found: json_type(found),
        }
    }

    fn invalid_value(&self, key: &str, reason: &str) -> ConfigError {
        ConfigError::InvalidValue {
            field: self.path(key),
            reason: reason.to_owned(),
        }
    }
}

/// Checks hostname syntax: at least two labels, a non-numeric top-level label.
pub(crate) fn is_domain_name(text: &str) -> bool {
    if text.is_empty() || text.len() > MAX_DOMAIN_LENGTH {
        return false;
    }
    let labels: Vec<&str> = text.split('.').collect();
    if labels.len() < 2 || !labels.iter().all(|label| is_label(label)) {
        return false;
    }
    labels
        .last()
        .is_some_and(|tld| !tld.bytes().all(|byte| byte.is_ascii_digit()))
}

fn is_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= MAX_LABEL_LENGTH
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || byte == b'-')
}
