//! Global and branch transaction identifiers.

use std::fmt;

/// XA-style transaction identifier.
///
/// `gtrid` identifies the global transaction; `bqual` is `0` for the global
/// transaction itself and `1..` for each enlisted branch, in enlistment
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Xid {
    gtrid: uuid::Uuid,
    bqual: u32,
}

impl Xid {
    /// Creates a fresh global identifier.
    #[must_use]
    pub fn new_global() -> Self {
        Self {
            gtrid: uuid::Uuid::new_v4(),
            bqual: 0,
        }
    }

    /// Derives the identifier of the branch with the given qualifier.
    #[must_use]
    pub const fn branch(&self, bqual: u32) -> Self {
        Self {
            gtrid: self.gtrid,
            bqual,
        }
    }

    /// Global transaction id shared by all branches.
    #[must_use]
    pub const fn gtrid(&self) -> &uuid::Uuid {
        &self.gtrid
    }

    /// Branch qualifier; `0` for the global transaction.
    #[must_use]
    pub const fn bqual(&self) -> u32 {
        self.bqual
    }

    /// Returns `true` when this identifies the global transaction rather
    /// than a branch.
    #[must_use]
    pub const fn is_global(&self) -> bool {
        self.bqual == 0
    }
}

impl fmt::Display for Xid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_global() {
            write!(f, "{}", self.gtrid)
        } else {
            write!(f, "{}.{}", self.gtrid, self.bqual)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branches_share_gtrid() {
        let global = Xid::new_global();
        let branch = global.branch(2);
        assert_eq!(global.gtrid(), branch.gtrid());
        assert_eq!(branch.bqual(), 2);
        assert!(global.is_global());
        assert!(!branch.is_global());
    }

    #[test]
    fn display_appends_branch_qualifier() {
        let global = Xid::new_global();
        assert_eq!(global.to_string(), global.gtrid().to_string());
        assert_eq!(global.branch(1).to_string(), format!("{}.1", global.gtrid()));
    }

    #[test]
    fn new_globals_are_distinct() {
        assert_ne!(Xid::new_global(), Xid::new_global());
    }
}
