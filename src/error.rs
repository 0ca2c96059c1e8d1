//! Error types.
//!
//! Two families:
//!
//! - [`ConfigError`]: the market handed to the engine is malformed. Always
//!   raised before the first round, so no partial state exists.
//! - [`MatchError`]: anything that stops a run. Besides wrapping
//!   configuration errors it covers engine defects (a broken round invariant
//!   or a run that outlives the `nM * nW` round bound) and caller aborts.
//!
//! Defects carry the full round state at the moment they were detected. They
//! are never recovered from: once an invariant is broken the termination
//! argument no longer holds.

use thiserror::Error;

use crate::types::{Side, StateSnapshot};

/// Malformed market input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// One side of the market has no agents
    #[error("market needs at least one agent per side (got {proposers} proposers, {responders} responders)")]
    EmptyMarket { proposers: usize, responders: usize },

    /// More agents than a 32-bit id can address
    #[error("{side} side has {count} agents, more than ids can address")]
    TooManyAgents { side: Side, count: usize },

    /// Declared market size does not match the number of preference lists
    #[error("expected {expected} {side} preference lists, found {found}")]
    RowCount { side: Side, expected: usize, found: usize },

    /// A list does not rank every agent on the opposite side
    #[error("{side} #{agent} ranks {found} agents, expected {expected}")]
    ListLength {
        side: Side,
        agent: usize,
        expected: usize,
        found: usize,
    },

    /// A list names an agent that does not exist
    #[error("{side} #{agent} ranks unknown agent {id} (ids must be below {bound})")]
    OutOfRange {
        side: Side,
        agent: usize,
        id: u32,
        bound: usize,
    },

    /// A list ranks the same agent twice
    #[error("{side} #{agent} ranks agent {id} more than once")]
    Duplicate { side: Side, agent: usize, id: u32 },

    /// A one-based list contains 0
    #[error("{side} #{agent} contains 0 in a one-based preference list")]
    ZeroIndex { side: Side, agent: usize },

    /// Exhaustive enumeration requested on a market that is too big for it
    #[error("enumeration supports at most {max} agents per side, market is {proposers}x{responders}")]
    MarketTooLarge {
        max: usize,
        proposers: usize,
        responders: usize,
    },
}

/// Why a matching run did not produce an outcome.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Bad input, detected before round 0
    #[error("invalid market: {0}")]
    Config(#[from] ConfigError),

    /// Internal defect: a round left the state inconsistent
    #[error("invariant violated in round {round}: {detail}")]
    InvariantViolation {
        round: u64,
        detail: String,
        state: Box<StateSnapshot>,
    },

    /// Internal defect: the run did not reach a fixed point within `nM * nW` rounds
    #[error("no fixed point within {limit} rounds")]
    RoundLimitExceeded { limit: u64, state: Box<StateSnapshot> },

    /// The caller raised the abort signal; `partial` is the state after `round` rounds
    #[error("run aborted after {round} rounds")]
    Aborted {
        round: u64,
        partial: Box<StateSnapshot>,
    },
}

impl MatchError {
    /// True for errors that indicate a bug in the engine rather than bad input
    /// or a caller decision.
    pub fn is_defect(&self) -> bool {
        matches!(
            self,
            MatchError::InvariantViolation { .. } | MatchError::RoundLimitExceeded { .. }
        )
    }

    /// Round state attached to the error, if any.
    pub fn state(&self) -> Option<&StateSnapshot> {
        match self {
            MatchError::Config(_) => None,
            MatchError::InvariantViolation { state, .. } => Some(state),
            MatchError::RoundLimitExceeded { state, .. } => Some(state),
            MatchError::Aborted { partial, .. } => Some(partial),
        }
    }
}
