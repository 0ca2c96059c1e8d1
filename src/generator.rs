//! Seeded preference generation.
//!
//! Preference tables are an input to the engine, never something it samples
//! itself. These helpers materialize random tables up front from a seed, so
//! a run over a generated market is as reproducible as one over hand-written
//! lists.
//!
//! ChaCha8 is used because its output is fixed by the seed on every platform
//! and across `rand` releases.
//!
//! ## Example
//!
//! ```
//! use deferred_acceptance::generator::{generate_market, generate_preferences};
//!
//! let list = generate_preferences(42, 5);
//! assert_eq!(list, generate_preferences(42, 5));
//!
//! let mut sorted = list.clone();
//! sorted.sort();
//! assert_eq!(sorted, vec![0, 1, 2, 3, 4]);
//!
//! let market = generate_market(42, 4, 3).unwrap();
//! assert_eq!(market.n_proposers(), 4);
//! ```

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::ConfigError;
use crate::types::Market;

/// A uniformly random permutation of `0..n`, fixed by `seed`.
pub fn generate_preferences(seed: u64, n: usize) -> Vec<u32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    permutation(&mut rng, n)
}

/// A market with uniformly random complete preference lists on both sides.
///
/// One master seed drives a stream of per-agent seeds, proposers first.
///
/// # Errors
///
/// [`ConfigError::EmptyMarket`] if either side is empty.
pub fn generate_market(
    seed: u64,
    n_proposers: usize,
    n_responders: usize,
) -> Result<Market, ConfigError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let proposer_prefs = (0..n_proposers)
        .map(|_| generate_preferences(rng.gen(), n_responders))
        .collect();
    let responder_prefs = (0..n_responders)
        .map(|_| generate_preferences(rng.gen(), n_proposers))
        .collect();

    Market::with_sizes(n_proposers, n_responders, proposer_prefs, responder_prefs)
}

/// A market where every agent on a side shares the same random ranking.
///
/// Maximum contention: every round, all single proposers collide at the same
/// responder, and exactly one of them is kept.
pub fn generate_common_market(
    seed: u64,
    n_proposers: usize,
    n_responders: usize,
) -> Result<Market, ConfigError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let proposer_list = permutation(&mut rng, n_responders);
    let responder_list = permutation(&mut rng, n_proposers);

    Market::with_sizes(
        n_proposers,
        n_responders,
        vec![proposer_list; n_proposers],
        vec![responder_list; n_responders],
    )
}

fn permutation<R: Rng>(rng: &mut R, n: usize) -> Vec<u32> {
    let mut list: Vec<u32> = (0..n).map(|i| i as u32).collect();
    list.shuffle(rng);
    list
}

// ============================================================================
// Unit Tests
// ============================================================================
