//! Preference tables and the two-sided market.
//!
//! ## Representation
//!
//! A [`PreferenceTable`] holds one strict ranking per agent over every agent
//! on the opposite side. Alongside each ranking it keeps the inverse
//! permutation, so both "who is my k-th choice" and "what rank do I give
//! agent x" are O(1).
//!
//! ## Validation
//!
//! Every list must be a permutation of `0..n_opposite`. This is checked once,
//! when the table is built; the engine relies on it and never re-checks.
//!
//! ## Example
//!
//! ```
//! use deferred_acceptance::types::{Market, ProposerId, ResponderId};
//!
//! // Same market written 0-based and 1-based
//! let a = Market::new(vec![vec![1, 0], vec![0, 1]], vec![vec![0, 1], vec![1, 0]]).unwrap();
//! let b = Market::from_one_based(&[vec![2, 1], vec![1, 2]], &[vec![1, 2], vec![2, 1]]).unwrap();
//! assert_eq!(a, b);
//!
//! assert_eq!(a.proposer_choice(ProposerId(0), 0), Some(ResponderId(1)));
//! assert_eq!(a.responder_rank(ResponderId(1), ProposerId(1)), 0);
//! ```

use crate::error::ConfigError;
use crate::types::{ProposerId, ResponderId, Side};

/// Strict rankings for every agent on one side of the market.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceTable {
    /// Which side these agents are on
    side: Side,

    /// Number of agents on the opposite side (the length of every list)
    opposite: usize,

    /// `lists[a][k]` = the k-th choice of agent `a`
    lists: Vec<Vec<u32>>,

    /// `ranks[a][x]` = position of agent `x` in `lists[a]`
    ranks: Vec<Vec<u32>>,
}

impl PreferenceTable {
    /// Build a table from 0-based rankings.
    ///
    /// # Arguments
    ///
    /// * `side` - Side the ranking agents are on
    /// * `lists` - One ranking per agent, most preferred first
    /// * `opposite` - Number of agents on the other side
    ///
    /// # Errors
    ///
    /// Any list that is not a permutation of `0..opposite`.
    pub fn new(side: Side, lists: Vec<Vec<u32>>, opposite: usize) -> Result<Self, ConfigError> {
        if opposite > u32::MAX as usize {
            return Err(ConfigError::TooManyAgents {
                side: side.opposite(),
                count: opposite,
            });
        }

        let mut ranks = Vec::with_capacity(lists.len());
        for (agent, list) in lists.iter().enumerate() {
            if list.len() != opposite {
                return Err(ConfigError::ListLength {
                    side,
                    agent,
                    expected: opposite,
                    found: list.len(),
                });
            }

            let mut rank = vec![u32::MAX; opposite];
            for (position, &id) in list.iter().enumerate() {
                let slot = rank.get_mut(id as usize).ok_or(ConfigError::OutOfRange {
                    side,
                    agent,
                    id,
                    bound: opposite,
                })?;
                if *slot != u32::MAX {
                    return Err(ConfigError::Duplicate { side, agent, id });
                }
                *slot = position as u32;
            }
            ranks.push(rank);
        }

        Ok(Self {
            side,
            opposite,
            lists,
            ranks,
        })
    }

    /// Build a table from 1-based rankings (agent 1 is the first agent).
    pub fn from_one_based(
        side: Side,
        lists: &[Vec<u32>],
        opposite: usize,
    ) -> Result<Self, ConfigError> {
        let mut shifted = Vec::with_capacity(lists.len());
        for (agent, list) in lists.iter().enumerate() {
            let row = list
                .iter()
                .map(|&id| id.checked_sub(1).ok_or(ConfigError::ZeroIndex { side, agent }))
                .collect::<Result<Vec<_>, _>>()?;
            shifted.push(row);
        }
        Self::new(side, shifted, opposite)
    }

    /// Side of the ranking agents
    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Number of ranking agents
    #[inline]
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// True if the table has no agents
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Full ranking of `agent`, most preferred first
    #[inline]
    pub fn list(&self, agent: usize) -> &[u32] {
        &self.lists[agent]
    }

    /// The `position`-th choice of `agent`, or None past the end of the list
    #[inline]
    pub fn choice(&self, agent: usize, position: usize) -> Option<u32> {
        self.lists[agent].get(position).copied()
    }

    /// Rank `agent` gives to `other` (0 = most preferred)
    #[inline]
    pub fn rank(&self, agent: usize, other: usize) -> usize {
        self.ranks[agent][other] as usize
    }
}

// ============================================================================
// Market
// ============================================================================

/// A complete two-sided market: proposer rankings over responders and
/// responder rankings over proposers.
///
/// Immutable once built. Market sizes need not be equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Market {
    proposers: PreferenceTable,
    responders: PreferenceTable,
}

impl Market {
    /// Build a market whose sizes are taken from the number of lists on each side.
    ///
    /// Ids are 0-based.
    pub fn new(
        proposer_prefs: Vec<Vec<u32>>,
        responder_prefs: Vec<Vec<u32>>,
    ) -> Result<Self, ConfigError> {
        let n_proposers = proposer_prefs.len();
        let n_responders = responder_prefs.len();
        Self::with_sizes(n_proposers, n_responders, proposer_prefs, responder_prefs)
    }

    /// Build a market with declared sizes, checking the lists against them.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::EmptyMarket`] if either size is zero
    /// - [`ConfigError::RowCount`] if a side has the wrong number of lists
    /// - any per-list error from [`PreferenceTable::new`]
    pub fn with_sizes(
        n_proposers: usize,
        n_responders: usize,
        proposer_prefs: Vec<Vec<u32>>,
        responder_prefs: Vec<Vec<u32>>,
    ) -> Result<Self, ConfigError> {
        check_sizes(n_proposers, n_responders, proposer_prefs.len(), responder_prefs.len())?;

        Ok(Self {
            proposers: PreferenceTable::new(Side::Proposer, proposer_prefs, n_responders)?,
            responders: PreferenceTable::new(Side::Responder, responder_prefs, n_proposers)?,
        })
    }

    /// Build a market from 1-based lists; sizes come from the number of lists.
    pub fn from_one_based(
        proposer_prefs: &[Vec<u32>],
        responder_prefs: &[Vec<u32>],
    ) -> Result<Self, ConfigError> {
        let n_proposers = proposer_prefs.len();
        let n_responders = responder_prefs.len();
        check_sizes(n_proposers, n_responders, n_proposers, n_responders)?;

        Ok(Self {
            proposers: PreferenceTable::from_one_based(Side::Proposer, proposer_prefs, n_responders)?,
            responders: PreferenceTable::from_one_based(
                Side::Responder,
                responder_prefs,
                n_proposers,
            )?,
        })
    }

    /// Number of proposers (`nM`)
    #[inline]
    pub fn n_proposers(&self) -> usize {
        self.proposers.len()
    }

    /// Number of responders (`nW`)
    #[inline]
    pub fn n_responders(&self) -> usize {
        self.responders.len()
    }

    /// Upper bound on the number of rounds any run can take: `nM * nW`.
    ///
    /// Every round advances at least one cursor and cursors are bounded by `nW`.
    pub fn round_bound(&self) -> u64 {
        self.n_proposers() as u64 * self.n_responders() as u64
    }

    /// Proposer rankings
    #[inline]
    pub fn proposer_table(&self) -> &PreferenceTable {
        &self.proposers
    }

    /// Responder rankings
    #[inline]
    pub fn responder_table(&self) -> &PreferenceTable {
        &self.responders
    }

    /// The `position`-th choice of proposer `p`, or None once his list is exhausted
    #[inline]
    pub fn proposer_choice(&self, p: ProposerId, position: usize) -> Option<ResponderId> {
        self.proposers.choice(p.index(), position).map(ResponderId)
    }

    /// Rank proposer `p` gives to responder `r` (0 = most preferred)
    #[inline]
    pub fn proposer_rank(&self, p: ProposerId, r: ResponderId) -> usize {
        self.proposers.rank(p.index(), r.index())
    }

    /// Rank responder `r` gives to proposer `p` (0 = most preferred)
    #[inline]
    pub fn responder_rank(&self, r: ResponderId, p: ProposerId) -> usize {
        self.responders.rank(r.index(), p.index())
    }

    /// Iterate over all proposer ids
    pub fn proposers(&self) -> impl Iterator<Item = ProposerId> {
        (0..self.n_proposers()).map(ProposerId::from_index)
    }

    /// Iterate over all responder ids
    pub fn responders(&self) -> impl Iterator<Item = ResponderId> {
        (0..self.n_responders()).map(ResponderId::from_index)
    }

    /// The same market with the roles swapped: responders become the
    /// proposing side.
    ///
    /// Running the engine on the transposed market yields the
    /// responder-optimal stable matching (with ids swapped accordingly).
    pub fn transposed(&self) -> Market {
        let mut proposers = self.responders.clone();
        let mut responders = self.proposers.clone();
        proposers.side = proposers.side.opposite();
        responders.side = responders.side.opposite();
        Market {
            proposers,
            responders,
        }
    }
}

fn check_sizes(
    n_proposers: usize,
    n_responders: usize,
    proposer_rows: usize,
    responder_rows: usize,
) -> Result<(), ConfigError> {
    if n_proposers == 0 || n_responders == 0 {
        return Err(ConfigError::EmptyMarket {
            proposers: n_proposers,
            responders: n_responders,
        });
    }
    if n_proposers > u32::MAX as usize {
        return Err(ConfigError::TooManyAgents {
            side: Side::Proposer,
            count: n_proposers,
        });
    }
    if n_responders > u32::MAX as usize {
        return Err(ConfigError::TooManyAgents {
            side: Side::Responder,
            count: n_responders,
        });
    }
    if proposer_rows != n_proposers {
        return Err(ConfigError::RowCount {
            side: Side::Proposer,
            expected: n_proposers,
            found: proposer_rows,
        });
    }
    if responder_rows != n_responders {
        return Err(ConfigError::RowCount {
            side: Side::Responder,
            expected: n_responders,
            found: responder_rows,
        });
    }
    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================
