//! Deferred-acceptance engine.
//!
//! ## Design Principles
//!
//! 1. **Determinism**: same market always produces the same rounds and matching
//! 2. **Round-synchronous**: all offers of a round are collected before any
//!    responder decides
//! 3. **Owned state**: cursors, holders and the single set belong to one run
//!    and never escape it except as an owned copy
//! 4. **No I/O**: visualization and logging hook in through [`RoundObserver`]
//!    and `tracing`
//!
//! ## Round Rules
//!
//! - Every single proposer offers to the next responder on his list
//! - Each responder with offers keeps the best of her holder and the offerors
//! - Everyone else returns to single; cursors are never rewound
//! - A single proposer with no responders left is permanently single
//!
//! ## Example
//!
//! ```
//! use deferred_acceptance::engine::{DeferredAcceptance, EngineConfig, TracingObserver};
//! use deferred_acceptance::generator::generate_market;
//!
//! let market = generate_market(7, 5, 5).unwrap();
//! let engine = DeferredAcceptance::new(EngineConfig::default());
//! let outcome = engine.run(&market, &mut TracingObserver).unwrap();
//!
//! assert_eq!(outcome.matching.matched_pairs(), 5);
//! assert!(outcome.rounds_used <= market.round_bound());
//! ```

mod config;
mod matcher;
mod observer;
mod state;

pub use config::{AbortSignal, EngineConfig};
pub use matcher::{run, DeferredAcceptance};
pub use observer::{NoopObserver, RecordingObserver, RoundObserver, RoundSnapshot, TracingObserver};
