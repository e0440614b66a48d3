//! Lease length values in dnsmasq's `<integer>(m|h)` notation.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Unit suffix of a lease length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeaseUnit {
    /// `m` suffix.
    Minutes,
    /// `h` suffix.
    Hours,
}

impl LeaseUnit {
    /// Returns the single-character suffix dnsmasq expects.
    #[must_use]
    pub const fn suffix(self) -> char {
        match self {
            Self::Minutes => 'm',
            Self::Hours => 'h',
        }
    }
}

/// Duration of a DHCP lease as understood by dnsmasq.
///
/// ```
/// use dnsmasq_config::{LeaseLength, LeaseUnit};
///
/// let lease: LeaseLength = "90m".parse().unwrap();
/// assert_eq!(lease, LeaseLength::new(90, LeaseUnit::Minutes));
/// assert_eq!(lease.to_string(), "90m");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LeaseLength {
    amount: u64,
    unit: LeaseUnit,
}

impl LeaseLength {
    /// Creates a lease length from its parts.
    #[must_use]
    pub const fn new(amount: u64, unit: LeaseUnit) -> Self {
        Self { amount, unit }
    }

    /// Numeric part of the lease length.
    #[must_use]
    pub const fn amount(self) -> u64 {
        self.amount
    }

    /// Unit of the lease length.
    #[must_use]
    pub const fn unit(self) -> LeaseUnit {
        self.unit
    }
}

impl fmt::Display for LeaseLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.suffix())
    }
}

/// Raised when text is not a usable `<integer>(m|h)` lease length.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeaseLengthParseError {
    /// The text does not have the `<integer>(m|h)` shape.
    #[error("lease length must be an integer followed by 'm' or 'h', got '{input}'")]
    Malformed {
        /// Rejected input.
        input: String,
    },
    /// The shape is right but the amount does not fit in 64 bits.
    #[error("lease length '{input}' is too large; the amount must not exceed {max}", max = u64::MAX)]
    OutOfRange {
        /// Rejected input.
        input: String,
    },
}

impl LeaseLengthParseError {
    /// Text that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        match self {
            Self::Malformed { input } | Self::OutOfRange { input } => input,
        }
    }
}

impl FromStr for LeaseLength {
    type Err = LeaseLengthParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let malformed = || LeaseLengthParseError::Malformed {
            input: input.to_owned(),
        };
        let (digits, unit) = match (input.strip_suffix('m'), input.strip_suffix('h')) {
            (Some(digits), _) => (digits, LeaseUnit::Minutes),
            (_, Some(digits)) => (digits, LeaseUnit::Hours),
            _ => return Err(malformed()),
        };
        if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(malformed());
        }
        // Only digits remain, so overflow is the sole way parsing can fail.
        let amount = digits
            .parse::<u64>()
            .map_err(|_| LeaseLengthParseError::OutOfRange {
                input: input.to_owned(),
            })?;
        Ok(Self::new(amount, unit))
    }
}
