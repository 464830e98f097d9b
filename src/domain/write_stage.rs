//! Progress of a single coordinated write.

use std::fmt;

/// Stage reached by a write request.
///
/// `Started → InsertedA → InsertedB → (Aborted | Committed)`. Only the two
/// terminal stages are ever observable by other requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStage {
    /// Global transaction begun, nothing staged yet.
    Started,
    /// Pet staged in datastore `a`.
    InsertedA,
    /// Message staged in datastore `b`.
    InsertedB,
    /// Both inserts rolled back.
    Aborted,
    /// Both inserts committed.
    Committed,
}

impl WriteStage {
    /// Snake-case name used in log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::InsertedA => "inserted_a",
            Self::InsertedB => "inserted_b",
            Self::Aborted => "aborted",
            Self::Committed => "committed",
        }
    }
}

impl fmt::Display for WriteStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_log_name() {
        assert_eq!(WriteStage::InsertedB.to_string(), "inserted_b");
    }
}
