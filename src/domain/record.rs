//! Records written by the coordinated write: one [`Pet`] into datastore
//! `a`, one [`Message`] into datastore `b`.

use super::RecordId;

/// Prefix prepended to the submitted name to form the greeting message.
const GREETING_PREFIX: &str = "Hello, ";

/// A row of the `pet` table in datastore `a`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pet {
    /// Primary key.
    pub id: RecordId,
    /// Nickname, taken verbatim from the request.
    pub nickname: String,
}

impl Pet {
    /// Creates a pet with a fresh identifier.
    #[must_use]
    pub fn named(nickname: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(),
            nickname: nickname.into(),
        }
    }
}

/// A row of the `message` table in datastore `b`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Primary key.
    pub id: RecordId,
    /// Message text.
    pub message: String,
}

impl Message {
    /// Creates the greeting for `name` (`"Hello, " + name`) with a fresh
    /// identifier.
    #[must_use]
    pub fn greeting(name: &str) -> Self {
        Self {
            id: RecordId::new(),
            message: format!("{GREETING_PREFIX}{name}"),
        }
    }
}
