//! Agent identifiers.
//!
//! Proposers and responders live in disjoint id spaces, so each gets its own
//! newtype. Ids are 0-based positions into the preference tables; `Display`
//! prints them one-based (`p1`, `r3`) the way agents are usually numbered
//! when a market is written down by hand.

use std::fmt;

/// Identifier of an agent on the proposing side (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ProposerId(pub u32);

impl ProposerId {
    /// Position of this proposer in the proposer table
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Build an id from a table position
    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }
}

impl fmt::Display for ProposerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", u64::from(self.0) + 1)
    }
}

/// Identifier of an agent on the responding side (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ResponderId(pub u32);

impl ResponderId {
    /// Position of this responder in the responder table
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Build an id from a table position
    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }
}

impl fmt::Display for ResponderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", u64::from(self.0) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_one_based() {
        assert_eq!(ProposerId(0).to_string(), "p1");
        assert_eq!(ResponderId(2).to_string(), "r3");
        assert_eq!(ProposerId(u32::MAX).to_string(), "p4294967296");
    }

    #[test]
    fn test_index_roundtrip() {
        assert_eq!(ProposerId::from_index(7).index(), 7);
        assert_eq!(ResponderId::from_index(0).index(), 0);
    }

    #[test]
    fn test_ordering_follows_index() {
        let mut ids = vec![ProposerId(3), ProposerId(0), ProposerId(2)];
        ids.sort();
        assert_eq!(ids, vec![ProposerId(0), ProposerId(2), ProposerId(3)]);
    }
}
