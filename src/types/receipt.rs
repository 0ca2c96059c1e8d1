//! Match receipt for finished runs.
//!
//! The MatchReceipt is a fixed-size summary of a run, including the digest
//! of the final matching for cross-checking two runs without comparing the
//! matchings themselves.

use ssz_rs::prelude::*;

use crate::types::MatchOutcome;

/// Receipt summarizing a completed matching run.
///
/// ## Digest
///
/// The 32-byte digest is the SHA-256 of the final matching
/// (see [`Matching::digest`](crate::types::Matching::digest)). Two runs over
/// the same market must produce the same digest.
///
/// ## Example
///
/// ```
/// use deferred_acceptance::types::MatchReceipt;
///
/// let receipt = MatchReceipt::new(
///     4,          // proposers
///     3,          // responders
///     5,          // rounds_used
///     3,          // matched_pairs
///     1,          // final_singles
///     9,          // offers_made
///     [0u8; 32],  // digest (would be computed)
/// );
/// assert!(!receipt.is_complete());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct MatchReceipt {
    /// Number of proposers in the market
    pub proposers: u64,

    /// Number of responders in the market
    pub responders: u64,

    /// Rounds executed before the fixed point
    pub rounds_used: u64,

    /// Pairs in the final matching
    pub matched_pairs: u64,

    /// Proposers left permanently single
    pub final_singles: u64,

    /// Offers made over the whole run
    pub offers_made: u64,

    /// SHA-256 of the final matching (32 bytes)
    pub digest: [u8; 32],
}

impl MatchReceipt {
    /// Create a new match receipt
    ///
    /// # Arguments
    ///
    /// * `proposers` - Market size on the proposing side
    /// * `responders` - Market size on the responding side
    /// * `rounds_used` - Rounds executed
    /// * `matched_pairs` - Pairs in the final matching
    /// * `final_singles` - Proposers left single
    /// * `offers_made` - Offers made over the run
    /// * `digest` - 32-byte hash of the final matching
    pub fn new(
        proposers: u64,
        responders: u64,
        rounds_used: u64,
        matched_pairs: u64,
        final_singles: u64,
        offers_made: u64,
        digest: [u8; 32],
    ) -> Self {
        Self {
            proposers,
            responders,
            rounds_used,
            matched_pairs,
            final_singles,
            offers_made,
            digest,
        }
    }

    /// Summarize a completed run
    pub fn from_outcome(outcome: &MatchOutcome) -> Self {
        Self::new(
            outcome.matching.n_proposers() as u64,
            outcome.matching.n_responders() as u64,
            outcome.rounds_used,
            outcome.matching.matched_pairs() as u64,
            outcome.final_singles.len() as u64,
            outcome.total_offers(),
            outcome.digest(),
        )
    }

    /// Get the digest as a hex string
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }

    /// True if every proposer ended up matched
    pub fn is_complete(&self) -> bool {
        self.final_singles == 0
    }

    /// Fraction of proposers that ended up matched
    ///
    /// Returns None for an empty (default) receipt.
    pub fn match_rate(&self) -> Option<f64> {
        if self.proposers == 0 {
            None
        } else {
            Some(self.matched_pairs as f64 / self.proposers as f64)
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
