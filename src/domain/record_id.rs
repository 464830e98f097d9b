//! Type-safe record identifier.
//!
//! [`RecordId`] is a newtype wrapper around [`uuid::Uuid`] (v4) used as the
//! primary key of both pets and messages. Stored as hyphenated text.

use std::fmt;

/// Unique identifier for a stored record.
///
/// Generated freshly for every insert and never reused. Pets and messages
/// written in the same transaction get independent identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId(uuid::Uuid);

impl RecordId {
    /// Creates a new random `RecordId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_generates_unique_ids() {
        let a = RecordId::new();
        let b = RecordId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn display_is_hyphenated_uuid() {
        let id = RecordId::new();
        let s = id.to_string();
        assert_eq!(s.len(), 36);
        assert_eq!(s, id.as_uuid().hyphenated().to_string());
    }

    #[test]
    fn generated_ids_are_v4() {
        let id = RecordId::default();
        assert_eq!(id.as_uuid().get_version_num(), 4);
    }
}
