//! Round observers.
//!
//! An observer is called synchronously once at the end of every round with a
//! borrowed view of the engine state. It cannot change that state; the run
//! continues as soon as the call returns.
//!
//! Closures taking `&RoundSnapshot` are observers:
//!
//! ```
//! use deferred_acceptance::engine::{DeferredAcceptance, RoundSnapshot};
//! use deferred_acceptance::types::Market;
//!
//! let market = Market::new(vec![vec![0, 1], vec![0, 1]], vec![vec![1, 0], vec![0, 1]]).unwrap();
//! let mut singles_per_round = Vec::new();
//! let mut observer = |s: &RoundSnapshot<'_>| singles_per_round.push(s.singles().count());
//!
//! DeferredAcceptance::default().run(&market, &mut observer).unwrap();
//! assert_eq!(singles_per_round, vec![1, 0]);
//! ```

use crate::types::{ProposerId, ProposerStatus, ResponderId, RoundStats, StateSnapshot};
use crate::LOG_TARGET;

/// Borrowed view of the engine state at the end of a round.
#[derive(Debug, Clone, Copy)]
pub struct RoundSnapshot<'a> {
    /// 1-based number of the round just completed
    pub round: u64,
    /// `holders[r]` = proposer tentatively held by responder `r`
    pub holders: &'a [Option<ProposerId>],
    /// Status of every proposer
    pub statuses: &'a [ProposerStatus],
    /// Proposals made so far by every proposer
    pub cursors: &'a [usize],
    /// Counters for the round just completed
    pub stats: &'a RoundStats,
}

impl<'a> RoundSnapshot<'a> {
    /// Proposers without a tentative match, permanently single ones included
    pub fn singles(&self) -> impl Iterator<Item = ProposerId> + 'a {
        self.statuses
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_single())
            .map(|(p, _)| ProposerId(p as u32))
    }

    /// Current tentative pairs in responder order
    pub fn pairs(&self) -> impl Iterator<Item = (ProposerId, ResponderId)> + 'a {
        self.holders
            .iter()
            .enumerate()
            .filter_map(|(r, h)| h.map(|p| (p, ResponderId(r as u32))))
    }

    /// Copy the view into an owned snapshot
    pub fn to_state(&self) -> StateSnapshot {
        StateSnapshot {
            round: self.round,
            holders: self.holders.to_vec(),
            statuses: self.statuses.to_vec(),
            cursors: self.cursors.to_vec(),
        }
    }
}

/// Receives one callback per completed round.
pub trait RoundObserver {
    /// Called after the resolution step and termination check of every round
    fn on_round(&mut self, snapshot: &RoundSnapshot<'_>);
}

impl<F> RoundObserver for F
where
    F: FnMut(&RoundSnapshot<'_>),
{
    fn on_round(&mut self, snapshot: &RoundSnapshot<'_>) {
        self(snapshot)
    }
}

/// Observer that ignores every round.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RoundObserver for NoopObserver {
    fn on_round(&mut self, _snapshot: &RoundSnapshot<'_>) {}
}

/// Observer that emits one `debug` event per round.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RoundObserver for TracingObserver {
    fn on_round(&mut self, snapshot: &RoundSnapshot<'_>) {
        let pairs: Vec<String> = snapshot.pairs().map(|(p, r)| format!("{r}:{p}")).collect();
        let singles: Vec<String> = snapshot.singles().map(|p| p.to_string()).collect();
        tracing::debug!(
            target: LOG_TARGET,
            round = snapshot.round,
            pairs = %pairs.join(" "),
            singles = %singles.join(" "),
            "round snapshot"
        );
    }
}

/// Observer that keeps an owned copy of every round.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    /// Snapshots in round order
    pub rounds: Vec<StateSnapshot>,
}

impl RecordingObserver {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }
}

impl RoundObserver for RecordingObserver {
    fn on_round(&mut self, snapshot: &RoundSnapshot<'_>) {
        self.rounds.push(snapshot.to_state());
    }
}
