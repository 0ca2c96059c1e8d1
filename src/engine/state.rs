//! Per-run engine state and the round transition.
//!
//! ## State
//!
//! - `cursors[p]`: proposals made so far by proposer `p`. Also the position
//!   of the next responder he will try.
//! - `holders[r]`: proposer tentatively held by responder `r`.
//! - `statuses[p]`: `Single`, `Held(r)` or `Exhausted`.
//! - `singles`: proposers that offer next round, ascending id. Never contains
//!   an exhausted proposer.
//!
//! ## Round
//!
//! 1. Every proposer in `singles` offers to his cursor position; cursor += 1.
//! 2. Offers are grouped per responder (BTreeMap, so resolution order is
//!    fixed). Each responder keeps the best of {holder} ∪ {offerors}; all
//!    others go back to single.
//! 3. Rejected proposers whose cursor reached `nW` become `Exhausted`; the
//!    rest form the next `singles`.
//!
//! The state is owned by one run and dropped into a
//! [`MatchOutcome`](crate::types::MatchOutcome) at the end.

use std::collections::{BTreeMap, BTreeSet};

use crate::engine::RoundSnapshot;
use crate::types::{
    Market, MatchOutcome, Matching, ProposerId, ProposerStatus, ResponderId, RoundStats,
    StateSnapshot,
};

/// Mutable bookkeeping for one run.
#[derive(Debug, Clone)]
pub(crate) struct RoundState {
    cursors: Vec<usize>,
    holders: Vec<Option<ProposerId>>,
    statuses: Vec<ProposerStatus>,
    singles: Vec<ProposerId>,
    n_responders: usize,
}

impl RoundState {
    /// Round-0 state: nobody held, every proposer single with cursor 0.
    pub(crate) fn new(market: &Market) -> Self {
        Self {
            cursors: vec![0; market.n_proposers()],
            holders: vec![None; market.n_responders()],
            statuses: vec![ProposerStatus::Single; market.n_proposers()],
            singles: market.proposers().collect(),
            n_responders: market.n_responders(),
        }
    }

    /// True once no proposer will make another offer
    #[inline]
    pub(crate) fn is_terminal(&self) -> bool {
        self.singles.is_empty()
    }

    #[inline]
    pub(crate) fn cursors(&self) -> &[usize] {
        &self.cursors
    }

    /// Execute one round (proposal, resolution, termination bookkeeping).
    ///
    /// Fails only on an internal inconsistency.
    pub(crate) fn advance(&mut self, market: &Market, round: u64) -> Result<RoundStats, String> {
        let mut stats = RoundStats {
            round,
            ..RoundStats::default()
        };

        // Proposal step: collect every offer before resolving any.
        let mut offers: BTreeMap<ResponderId, Vec<ProposerId>> = BTreeMap::new();
        for p in std::mem::take(&mut self.singles) {
            let cursor = self.cursors[p.index()];
            let r = market.proposer_choice(p, cursor).ok_or_else(|| {
                format!("{p} is single with an exhausted list (cursor {cursor})")
            })?;
            self.cursors[p.index()] = cursor + 1;
            offers.entry(r).or_default().push(p);
            stats.offers += 1;
        }

        // Resolution step: each responder keeps the best of holder + offerors.
        let mut rejected = Vec::new();
        for (r, mut pool) in offers {
            let previous = self.holders[r.index()];
            pool.extend(previous);

            let best = select_holder(&pool, |p| market.responder_rank(r, p))
                .ok_or_else(|| format!("{r} received an empty offer pool"))?;

            self.holders[r.index()] = Some(best);
            self.statuses[best.index()] = ProposerStatus::Held(r);

            for p in pool.into_iter().filter(|&p| p != best) {
                if previous == Some(p) {
                    stats.displaced += 1;
                }
                self.statuses[p.index()] = ProposerStatus::Single;
                rejected.push(p);
            }
        }
        stats.rejections = rejected.len();

        // Termination bookkeeping: rejected proposers with nobody left to try
        // are retired, everyone else offers again next round.
        rejected.sort_unstable();
        for p in rejected {
            if self.cursors[p.index()] >= self.n_responders {
                self.statuses[p.index()] = ProposerStatus::Exhausted;
                stats.newly_exhausted += 1;
            } else {
                self.singles.push(p);
            }
        }
        stats.active_singles = self.singles.len();

        Ok(stats)
    }

    /// Re-verify the round invariants.
    ///
    /// `previous_cursors` is the cursor vector before the round, if the caller
    /// kept one, and is used to check monotonic advance.
    pub(crate) fn check_invariants(
        &self,
        market: &Market,
        previous_cursors: Option<&[usize]>,
    ) -> Result<(), String> {
        // Responders hold at most one proposer each, and he agrees he is held there.
        let mut held = BTreeSet::new();
        for (r, holder) in self.holders.iter().enumerate() {
            let r = ResponderId(r as u32);
            let Some(p) = *holder else { continue };
            if p.index() >= market.n_proposers() {
                return Err(format!("{r} holds unknown proposer {p}"));
            }
            if !held.insert(p) {
                return Err(format!("{p} is held by more than one responder"));
            }
            if self.statuses[p.index()] != ProposerStatus::Held(r) {
                return Err(format!(
                    "{r} holds {p} but his status is {:?}",
                    self.statuses[p.index()]
                ));
            }
        }

        // Matched ∪ single = M, disjoint; cursors bounded and frozen while held.
        let queued: BTreeSet<ProposerId> = self.singles.iter().copied().collect();
        if queued.len() != self.singles.len() {
            return Err("a proposer is queued twice in the single set".into());
        }
        for (index, status) in self.statuses.iter().enumerate() {
            let p = ProposerId(index as u32);
            let cursor = self.cursors[index];
            if cursor > self.n_responders {
                return Err(format!("{p} cursor {cursor} exceeds {}", self.n_responders));
            }
            if let Some(before) = previous_cursors {
                if cursor < before[index] {
                    return Err(format!("{p} cursor moved back from {} to {cursor}", before[index]));
                }
            }
            match *status {
                ProposerStatus::Held(r) => {
                    if self.holders[r.index()] != Some(p) {
                        return Err(format!("{p} claims {r} but {r} does not hold him"));
                    }
                    if queued.contains(&p) {
                        return Err(format!("{p} is both held and single"));
                    }
                    let last = cursor.checked_sub(1).and_then(|c| market.proposer_choice(p, c));
                    if last != Some(r) {
                        return Err(format!("{p} is held by {r} but his cursor is {cursor}"));
                    }
                }
                ProposerStatus::Single => {
                    if !queued.contains(&p) {
                        return Err(format!("{p} is single but not queued to offer"));
                    }
                }
                ProposerStatus::Exhausted => {
                    if queued.contains(&p) {
                        return Err(format!("{p} is exhausted but still queued to offer"));
                    }
                    if cursor != self.n_responders {
                        return Err(format!("{p} is exhausted with cursor {cursor}"));
                    }
                }
            }
        }

        Ok(())
    }

    /// Borrowed view for observers
    pub(crate) fn view<'a>(&'a self, round: u64, stats: &'a RoundStats) -> RoundSnapshot<'a> {
        RoundSnapshot {
            round,
            holders: &self.holders,
            statuses: &self.statuses,
            cursors: &self.cursors,
            stats,
        }
    }

    /// Owned copy for error reports
    pub(crate) fn snapshot(&self, round: u64) -> StateSnapshot {
        StateSnapshot {
            round,
            holders: self.holders.clone(),
            statuses: self.statuses.clone(),
            cursors: self.cursors.clone(),
        }
    }

    /// Consume the state into the final outcome.
    ///
    /// Fails, handing back the state, if the holder vector does not describe a
    /// one-to-one matching.
    pub(crate) fn into_outcome(
        self,
        rounds_used: u64,
        history: Vec<RoundStats>,
    ) -> Result<MatchOutcome, StateSnapshot> {
        let Some(matching) = Matching::from_holders(self.statuses.len(), self.holders.clone())
        else {
            return Err(self.snapshot(rounds_used));
        };
        let final_singles = self
            .statuses
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == ProposerStatus::Exhausted)
            .map(|(p, _)| ProposerId(p as u32))
            .collect();

        Ok(MatchOutcome {
            matching,
            rounds_used,
            final_singles,
            cursors: self.cursors,
            history,
        })
    }
}

/// Pick the candidate a responder keeps: lowest rank, ties to the lowest id.
///
/// Ranks come from strict preference lists, so ties do not occur for
/// validated markets; the id fallback keeps the choice deterministic anyway.
pub(crate) fn select_holder(
    pool: &[ProposerId],
    rank: impl Fn(ProposerId) -> usize,
) -> Option<ProposerId> {
    pool.iter().copied().min_by_key(|&p| (rank(p), p))
}

// ============================================================================
// Unit Tests
// ============================================================================
