//! Unique id generation for default pid file paths.

use uuid::Uuid;

/// Source of globally unique identifiers.
///
/// Validation asks for at most one id per configuration, and only when the
/// caller left `pidFile` unset. Tests inject a deterministic implementation.
#[cfg_attr(test, mockall::automock)]
pub trait IdGenerator {
    /// Returns a fresh identifier suitable for use in a file name.
    fn next_id(&self) -> String;
}

/// Generates random (version 4) UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
