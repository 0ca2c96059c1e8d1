//! Matching results and round diagnostics.
//!
//! ## Tagged states
//!
//! "Responder holds nobody" is `None` in the holder vector, and a proposer's
//! situation is always one of the three [`ProposerStatus`] variants. There
//! is no sentinel id, so "unmatched" cannot be confused with agent 0.

use std::collections::BTreeSet;

use sha2::{Digest, Sha256};

use crate::types::{ProposerId, ResponderId};

/// Where a proposer stands at a round boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProposerStatus {
    /// Without a tentative match; will offer next round
    #[default]
    Single,
    /// Tentatively held by this responder
    Held(ResponderId),
    /// Rejected by every responder on his list; makes no more offers
    Exhausted,
}

impl ProposerStatus {
    /// True for `Single` and `Exhausted`
    #[inline]
    pub fn is_single(self) -> bool {
        !matches!(self, ProposerStatus::Held(_))
    }
}

// ============================================================================
// Matching
// ============================================================================

/// A one-to-one partial matching between proposers and responders.
///
/// Both directions are stored and kept consistent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Matching {
    /// `holders[r]` = proposer matched to responder `r`
    holders: Vec<Option<ProposerId>>,

    /// `partners[p]` = responder matched to proposer `p`
    partners: Vec<Option<ResponderId>>,
}

impl Matching {
    /// Build a matching from the responder-side view.
    ///
    /// Returns None if a proposer appears twice or is out of range.
    pub fn from_holders(n_proposers: usize, holders: Vec<Option<ProposerId>>) -> Option<Self> {
        let mut partners = vec![None; n_proposers];
        for (r, holder) in holders.iter().enumerate() {
            if let Some(p) = holder {
                let slot = partners.get_mut(p.index())?;
                if slot.is_some() {
                    return None;
                }
                *slot = Some(ResponderId::from_index(r));
            }
        }
        Some(Self { holders, partners })
    }

    /// Build a matching from explicit pairs.
    ///
    /// Returns None if an agent appears twice or is out of range.
    pub fn from_pairs(
        n_proposers: usize,
        n_responders: usize,
        pairs: impl IntoIterator<Item = (ProposerId, ResponderId)>,
    ) -> Option<Self> {
        let mut holders = vec![None; n_responders];
        for (p, r) in pairs {
            let slot = holders.get_mut(r.index())?;
            if slot.is_some() {
                return None;
            }
            *slot = Some(p);
        }
        Self::from_holders(n_proposers, holders)
    }

    /// Number of proposers in the market
    #[inline]
    pub fn n_proposers(&self) -> usize {
        self.partners.len()
    }

    /// Number of responders in the market
    #[inline]
    pub fn n_responders(&self) -> usize {
        self.holders.len()
    }

    /// Proposer matched to `r`, if any
    #[inline]
    pub fn holder(&self, r: ResponderId) -> Option<ProposerId> {
        self.holders[r.index()]
    }

    /// Responder matched to `p`, if any
    #[inline]
    pub fn partner(&self, p: ProposerId) -> Option<ResponderId> {
        self.partners[p.index()]
    }

    /// Responder-side view, indexed by responder
    pub fn holders(&self) -> &[Option<ProposerId>] {
        &self.holders
    }

    /// Matched pairs in responder order
    pub fn pairs(&self) -> impl Iterator<Item = (ProposerId, ResponderId)> + '_ {
        self.holders
            .iter()
            .enumerate()
            .filter_map(|(r, h)| h.map(|p| (p, ResponderId::from_index(r))))
    }

    /// Number of matched pairs
    pub fn matched_pairs(&self) -> usize {
        self.holders.iter().filter(|h| h.is_some()).count()
    }

    /// Proposers with no partner
    pub fn single_proposers(&self) -> impl Iterator<Item = ProposerId> + '_ {
        self.partners
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_none())
            .map(|(p, _)| ProposerId::from_index(p))
    }

    /// Responders with no partner
    pub fn unmatched_responders(&self) -> impl Iterator<Item = ResponderId> + '_ {
        self.holders
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_none())
            .map(|(r, _)| ResponderId::from_index(r))
    }

    /// SHA-256 over a canonical encoding of the matching.
    ///
    /// Layout: `n_proposers` and `n_responders` as u64 LE, then one entry per
    /// responder: `0x00` if unmatched, `0x01` followed by the proposer id as
    /// u32 LE otherwise.
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update((self.n_proposers() as u64).to_le_bytes());
        hasher.update((self.n_responders() as u64).to_le_bytes());
        for holder in &self.holders {
            match holder {
                None => hasher.update([0u8]),
                Some(p) => {
                    hasher.update([1u8]);
                    hasher.update(p.0.to_le_bytes());
                }
            }
        }
        let result = hasher.finalize();

        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        hash
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Counters for a single round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoundStats {
    /// 1-based round number
    pub round: u64,
    /// Offers made in the proposal step
    pub offers: usize,
    /// Candidates turned away in the resolution step (new offerors and displaced holders)
    pub rejections: usize,
    /// Holders displaced by a better offer
    pub displaced: usize,
    /// Proposers who ran out of responders this round
    pub newly_exhausted: usize,
    /// Proposers who will offer next round
    pub active_singles: usize,
}

/// Owned copy of the engine state at a round boundary.
///
/// Attached to errors and collected by
/// [`RecordingObserver`](crate::engine::RecordingObserver).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StateSnapshot {
    /// Rounds completed when the snapshot was taken
    pub round: u64,
    /// `holders[r]` = proposer tentatively held by responder `r`
    pub holders: Vec<Option<ProposerId>>,
    /// Status of every proposer
    pub statuses: Vec<ProposerStatus>,
    /// Proposals made so far by every proposer
    pub cursors: Vec<usize>,
}

impl StateSnapshot {
    /// Proposers without a tentative match, permanently single ones included
    pub fn singles(&self) -> Vec<ProposerId> {
        self.statuses
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_single())
            .map(|(p, _)| ProposerId::from_index(p))
            .collect()
    }
}

// ============================================================================
// MatchOutcome
// ============================================================================

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    /// Final stable matching
    pub matching: Matching,

    /// Rounds executed before the fixed point was reached
    pub rounds_used: u64,

    /// Proposers who exhausted their list without being held
    pub final_singles: BTreeSet<ProposerId>,

    /// Final proposal cursor of every proposer
    pub cursors: Vec<usize>,

    /// Per-round counters, in order
    pub history: Vec<RoundStats>,
}

impl MatchOutcome {
    /// Proposer matched to `r`, if any
    #[inline]
    pub fn holder(&self, r: ResponderId) -> Option<ProposerId> {
        self.matching.holder(r)
    }

    /// Responder matched to `p`, if any
    #[inline]
    pub fn partner(&self, p: ProposerId) -> Option<ResponderId> {
        self.matching.partner(p)
    }

    /// Total offers made over the whole run
    pub fn total_offers(&self) -> u64 {
        self.history.iter().map(|s| s.offers as u64).sum()
    }

    /// Digest of the final matching (see [`Matching::digest`])
    pub fn digest(&self) -> [u8; 32] {
        self.matching.digest()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
