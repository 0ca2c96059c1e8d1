//! # Deferred Acceptance
//!
//! Deterministic stable matching for two-sided markets.
//!
//! ## Architecture
//!
//! - **Types**: agent ids, validated preference tables, outcomes, receipts
//! - **Engine**: round-synchronous proposer-proposing deferred acceptance
//! - **Generator**: seeded random preference tables
//! - **Verify**: blocking-pair search and brute-force stable matching enumeration
//!
//! ## Design Principles
//!
//! 1. **Determinism**: identical markets give identical rounds, matchings and digests
//! 2. **Fail fast**: malformed preference lists are rejected before round 0
//! 3. **Bounded**: a run never exceeds `nM * nW` rounds; exceeding it is a defect
//! 4. **Synchronous**: single-threaded, no suspension points
//!
//! ## Example
//!
//! ```
//! use deferred_acceptance::{run, ProposerId, ResponderId};
//!
//! // Two proposers, two responders, 0-based ids.
//! let outcome = run(
//!     2,
//!     2,
//!     vec![vec![0, 1], vec![0, 1]],
//!     vec![vec![1, 0], vec![0, 1]],
//! )
//! .unwrap();
//!
//! assert_eq!(outcome.holder(ResponderId(0)), Some(ProposerId(1)));
//! assert!(outcome.final_singles.is_empty());
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: ids, preference tables, outcomes, receipts
pub mod types;

/// Matching engine: round-synchronous deferred acceptance
pub mod engine;

/// Error types
pub mod error;

/// Seeded preference generation
pub mod generator;

/// Stability checks and brute-force enumeration
pub mod verify;

/// `tracing` target used by every event the crate emits
pub const LOG_TARGET: &str = "deferred_acceptance";

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use engine::{run, DeferredAcceptance, EngineConfig, RoundObserver};
pub use error::{ConfigError, MatchError};
pub use types::{Market, MatchOutcome, MatchReceipt, Matching, ProposerId, ResponderId};
