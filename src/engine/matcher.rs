//! Round-synchronous deferred-acceptance engine.

use tracing::{debug, error, trace};

use crate::engine::{EngineConfig, NoopObserver, RoundObserver};
use crate::engine::state::RoundState;
use crate::error::MatchError;
use crate::types::{Market, MatchOutcome};
use crate::LOG_TARGET;

/// Proposer-proposing deferred-acceptance engine.
///
/// The engine itself is stateless between runs: every call to
/// [`run`](Self::run) builds fresh round state from the market, drives it to
/// a fixed point and hands the result back. The same engine (and the same
/// market) can be reused any number of times and always yields the same
/// outcome.
///
/// ## Guarantees
///
/// - The returned matching is stable and proposer-optimal.
/// - At most `nM * nW` rounds are executed.
/// - Proposers in `final_singles` were rejected by every responder.
///
/// ## Example
///
/// ```
/// use deferred_acceptance::engine::{DeferredAcceptance, NoopObserver};
/// use deferred_acceptance::types::{Market, ProposerId, ResponderId};
///
/// let market = Market::from_one_based(
///     &[vec![1, 2], vec![1, 2]],
///     &[vec![2, 1], vec![1, 2]],
/// ).unwrap();
///
/// let outcome = DeferredAcceptance::default().run(&market, &mut NoopObserver).unwrap();
///
/// assert_eq!(outcome.holder(ResponderId(0)), Some(ProposerId(1)));
/// assert_eq!(outcome.holder(ResponderId(1)), Some(ProposerId(0)));
/// assert_eq!(outcome.rounds_used, 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DeferredAcceptance {
    config: EngineConfig,
}

impl DeferredAcceptance {
    /// Create an engine with the given configuration
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Run the protocol to its fixed point.
    ///
    /// `observer` is called once at the end of every round.
    ///
    /// # Errors
    ///
    /// - [`MatchError::Aborted`] if the abort signal is raised between rounds
    /// - [`MatchError::InvariantViolation`] / [`MatchError::RoundLimitExceeded`]
    ///   on an engine defect
    pub fn run<O>(&self, market: &Market, observer: &mut O) -> Result<MatchOutcome, MatchError>
    where
        O: RoundObserver + ?Sized,
    {
        let _span = tracing::debug_span!(
            target: LOG_TARGET,
            "deferred_acceptance",
            proposers = market.n_proposers(),
            responders = market.n_responders()
        )
        .entered();

        let limit = market.round_bound();
        let mut state = RoundState::new(market);
        let mut history = Vec::new();
        let mut round = 0u64;

        while !state.is_terminal() {
            if self.config.abort_requested() {
                debug!(target: LOG_TARGET, round, "run aborted");
                return Err(MatchError::Aborted {
                    round,
                    partial: Box::new(state.snapshot(round)),
                });
            }
            if round >= limit {
                error!(target: LOG_TARGET, limit, "round bound exceeded");
                return Err(MatchError::RoundLimitExceeded {
                    limit,
                    state: Box::new(state.snapshot(round)),
                });
            }
            round += 1;

            let before = self.config.check_invariants.then(|| state.cursors().to_vec());
            let stats = state
                .advance(market, round)
                .and_then(|stats| {
                    if self.config.check_invariants {
                        state.check_invariants(market, before.as_deref())?;
                    }
                    Ok(stats)
                })
                .map_err(|detail| violation(&state, round, detail))?;

            trace!(
                target: LOG_TARGET,
                round,
                offers = stats.offers,
                rejections = stats.rejections,
                exhausted = stats.newly_exhausted,
                active = stats.active_singles,
                "round complete"
            );

            observer.on_round(&state.view(round, &stats));
            history.push(stats);
        }

        let outcome = state.into_outcome(round, history).map_err(|snapshot| {
            let detail = String::from("final holders are not a one-to-one matching");
            error!(target: LOG_TARGET, round, %detail, "invariant violated");
            MatchError::InvariantViolation {
                round,
                detail,
                state: Box::new(snapshot),
            }
        })?;

        debug!(
            target: LOG_TARGET,
            rounds = outcome.rounds_used,
            matched = outcome.matching.matched_pairs(),
            singles = outcome.final_singles.len(),
            "fixed point reached"
        );
        Ok(outcome)
    }
}

fn violation(state: &RoundState, round: u64, detail: String) -> MatchError {
    error!(target: LOG_TARGET, round, %detail, "invariant violated");
    MatchError::InvariantViolation {
        round,
        detail,
        state: Box::new(state.snapshot(round)),
    }
}

/// Validate the inputs and run the engine with the default configuration.
///
/// Ids are 0-based. `proposer_prefs` must hold `n_proposers` permutations of
/// `0..n_responders` and `responder_prefs` `n_responders` permutations of
/// `0..n_proposers`.
///
/// # Example
///
/// ```
/// use deferred_acceptance::types::{ProposerId, ResponderId};
///
/// let outcome = deferred_acceptance::run(1, 1, vec![vec![0]], vec![vec![0]]).unwrap();
/// assert_eq!(outcome.holder(ResponderId(0)), Some(ProposerId(0)));
/// assert_eq!(outcome.rounds_used, 1);
/// ```
pub fn run(
    n_proposers: usize,
    n_responders: usize,
    proposer_prefs: Vec<Vec<u32>>,
    responder_prefs: Vec<Vec<u32>>,
) -> Result<MatchOutcome, MatchError> {
    let market = Market::with_sizes(n_proposers, n_responders, proposer_prefs, responder_prefs)?;
    DeferredAcceptance::default().run(&market, &mut NoopObserver)
}

// ============================================================================
// Unit Tests
// ============================================================================
