//! Core data types for the matching engine
//!
//! ## Types
//!
//! - [`ProposerId`], [`ResponderId`]: 0-based agent identifiers
//! - [`Side`]: Proposer or Responder
//! - [`PreferenceTable`], [`Market`]: validated strict rankings
//! - [`Matching`], [`MatchOutcome`], [`RoundStats`], [`StateSnapshot`]: results
//! - [`MatchReceipt`]: ssz-encodable run summary

mod agent;
mod outcome;
mod preference;
mod receipt;
mod side;

pub use agent::{ProposerId, ResponderId};
pub use outcome::{MatchOutcome, Matching, ProposerStatus, RoundStats, StateSnapshot};
pub use preference::{Market, PreferenceTable};
pub use receipt::MatchReceipt;
pub use side::Side;
