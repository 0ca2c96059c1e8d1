//! Stability checks.
//!
//! These work on any [`Matching`], not only on engine output, and are what
//! the tests use to hold the engine to its guarantees:
//!
//! - [`blocking_pairs`] / [`is_stable`]: no proposer and responder would both
//!   rather be with each other than with their current partners.
//! - [`stable_matchings`] / [`is_proposer_optimal`]: brute-force enumeration,
//!   only for small markets.
//!
//! Preference lists are complete, so being matched to anyone is better than
//! being unmatched for every agent.

use crate::error::ConfigError;
use crate::types::{Market, Matching, ProposerId, ResponderId};

/// Largest side size [`stable_matchings`] will enumerate.
pub const MAX_ENUMERATION_SIZE: usize = 8;

/// Every blocking pair of `matching`, in proposer order then preference order.
///
/// `(p, r)` blocks if they are not matched to each other, `p` prefers `r` to
/// his partner (or is single) and `r` prefers `p` to her holder (or is
/// unmatched).
pub fn blocking_pairs(market: &Market, matching: &Matching) -> Vec<(ProposerId, ResponderId)> {
    let mut pairs = Vec::new();
    for p in market.proposers() {
        let partner_rank = matching
            .partner(p)
            .map_or(usize::MAX, |r| market.proposer_rank(p, r));

        // Only responders ranked strictly above his partner can block.
        for position in 0..market.n_responders().min(partner_rank) {
            let Some(r) = market.proposer_choice(p, position) else {
                break;
            };
            let prefers_p = match matching.holder(r) {
                None => true,
                Some(h) => market.responder_rank(r, p) < market.responder_rank(r, h),
            };
            if prefers_p {
                pairs.push((p, r));
            }
        }
    }
    pairs
}

/// True if `matching` has no blocking pair.
pub fn is_stable(market: &Market, matching: &Matching) -> bool {
    blocking_pairs(market, matching).is_empty()
}

/// Every stable matching of `market`, found by exhaustive search.
///
/// Order of the result is deterministic but otherwise unspecified.
///
/// # Errors
///
/// [`ConfigError::MarketTooLarge`] if either side exceeds
/// [`MAX_ENUMERATION_SIZE`].
pub fn stable_matchings(market: &Market) -> Result<Vec<Matching>, ConfigError> {
    let (n_p, n_r) = (market.n_proposers(), market.n_responders());
    if n_p > MAX_ENUMERATION_SIZE || n_r > MAX_ENUMERATION_SIZE {
        return Err(ConfigError::MarketTooLarge {
            max: MAX_ENUMERATION_SIZE,
            proposers: n_p,
            responders: n_r,
        });
    }

    let mut found = Vec::new();
    let mut holders = vec![None; n_r];
    enumerate(market, 0, &mut holders, &mut found);
    Ok(found)
}

/// Assign proposer `next` to every free responder (or to nobody) and recurse.
fn enumerate(
    market: &Market,
    next: usize,
    holders: &mut [Option<ProposerId>],
    found: &mut Vec<Matching>,
) {
    if next == market.n_proposers() {
        if let Some(matching) = Matching::from_holders(next, holders.to_vec()) {
            if is_stable(market, &matching) {
                found.push(matching);
            }
        }
        return;
    }

    let p = ProposerId(next as u32);
    for r in 0..holders.len() {
        if holders[r].is_none() {
            holders[r] = Some(p);
            enumerate(market, next + 1, holders, found);
            holders[r] = None;
        }
    }
    enumerate(market, next + 1, holders, found);
}

/// True if `matching` is stable and no stable matching gives any proposer a
/// responder he strictly prefers.
///
/// # Errors
///
/// Same as [`stable_matchings`].
pub fn is_proposer_optimal(market: &Market, matching: &Matching) -> Result<bool, ConfigError> {
    if !is_stable(market, matching) {
        return Ok(false);
    }
    let rank = |m: &Matching, p: ProposerId| {
        m.partner(p)
            .map_or(usize::MAX, |r| market.proposer_rank(p, r))
    };

    Ok(stable_matchings(market)?
        .iter()
        .all(|other| market.proposers().all(|p| rank(matching, p) <= rank(other, p))))
}

// ============================================================================
// Unit Tests
// ============================================================================
