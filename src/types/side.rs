//! Market sides.
//!
//! A two-sided market has a proposing side and a responding side. The engine
//! always runs with proposers making offers; swapping the roles is done by
//! transposing the market (see [`Market::transposed`](crate::types::Market::transposed)).

use std::fmt;

/// Which side of the market an agent (or a preference table) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    /// Offering side - makes one offer per round while single
    #[default]
    Proposer,
    /// Receiving side - holds at most one tentative offer
    Responder,
}

impl Side {
    /// Returns the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::Proposer => Side::Responder,
            Side::Responder => Side::Proposer,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Proposer => f.write_str("proposer"),
            Side::Responder => f.write_str("responder"),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Proposer.opposite(), Side::Responder);
        assert_eq!(Side::Responder.opposite(), Side::Proposer);
    }

    #[test]
    fn test_side_display() {
        assert_eq!(Side::Proposer.to_string(), "proposer");
        assert_eq!(Side::Responder.to_string(), "responder");
    }
}
