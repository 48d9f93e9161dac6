//! Revision markers
//!
//! A revision identifies one state of the repository. Besides concrete
//! numbered revisions there are two sentinels used as log-query range
//! endpoints: `Undefined` (no bound / not applicable) and `Head` (most
//! recent).

use serde::{Deserialize, Serialize};

/// An ordered identifier of repository state at one point in time.
///
/// Total order: `Undefined < Number(a) < Number(b) < Head` for `a < b`.
/// The derived ordering relies on the variant declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Revision {
    /// No revision bound / not applicable.
    Undefined,
    /// A concrete, committed revision.
    Number(u64),
    /// The most recent revision in the repository.
    Head,
}

impl Revision {
    /// Whether this is a concrete numbered revision rather than a sentinel.
    pub fn is_concrete(&self) -> bool {
        matches!(self, Revision::Number(_))
    }

    /// The revision number, if concrete.
    pub fn number(&self) -> Option<u64> {
        match self {
            Revision::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<u64> for Revision {
    fn from(n: u64) -> Self {
        Revision::Number(n)
    }
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Revision::Undefined => write!(f, "undefined"),
            Revision::Number(n) => write!(f, "{}", n),
            Revision::Head => write!(f, "HEAD"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revision_ordering() {
        assert!(Revision::Undefined < Revision::Number(0));
        assert!(Revision::Number(0) < Revision::Number(1));
        assert!(Revision::Number(u64::MAX) < Revision::Head);
    }

    #[test]
    fn test_revision_concreteness() {
        assert!(Revision::Number(42).is_concrete());
        assert!(!Revision::Undefined.is_concrete());
        assert!(!Revision::Head.is_concrete());
        assert_eq!(Revision::Number(42).number(), Some(42));
        assert_eq!(Revision::Head.number(), None);
    }

    #[test]
    fn test_revision_from_number() {
        assert_eq!(Revision::from(42), Revision::Number(42));
        assert!(Revision::from(0).is_concrete());
    }

    #[test]
    fn test_revision_display() {
        assert_eq!(Revision::Number(7).to_string(), "7");
        assert_eq!(Revision::Head.to_string(), "HEAD");
        assert_eq!(Revision::Undefined.to_string(), "undefined");
    }
}
