//! Engine configuration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative abort flag, checked by the engine once per round.
///
/// Clones share the flag, so a clone can be handed to whoever decides when
/// to stop (an observer, another thread, a signal handler).
///
/// ```
/// use deferred_acceptance::engine::AbortSignal;
///
/// let signal = AbortSignal::new();
/// let handle = signal.clone();
/// handle.raise();
/// assert!(signal.is_raised());
/// ```
#[derive(Debug, Clone, Default)]
pub struct AbortSignal(Arc<AtomicBool>);

impl AbortSignal {
    /// Create a lowered signal
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the run to stop before its next round
    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// True once [`raise`](Self::raise) has been called on any clone
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Engine settings.
///
/// ## Defaults
///
/// - `check_invariants`: true. After every round the engine re-verifies the
///   round invariants and fails with
///   [`MatchError::InvariantViolation`](crate::MatchError::InvariantViolation)
///   on the first breach. Costs O(nM + nW) per round.
/// - `abort`: none
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Re-verify round invariants after every round
    pub check_invariants: bool,

    /// Optional abort flag checked before every round
    pub abort: Option<AbortSignal>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            check_invariants: true,
            abort: None,
        }
    }
}

impl EngineConfig {
    /// Default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the per-round invariant checks
    pub fn with_invariant_checks(mut self, enabled: bool) -> Self {
        self.check_invariants = enabled;
        self
    }

    /// Attach an abort signal
    pub fn with_abort(mut self, signal: AbortSignal) -> Self {
        self.abort = Some(signal);
        self
    }

    /// True if an attached abort signal has been raised
    pub(crate) fn abort_requested(&self) -> bool {
        self.abort.as_ref().is_some_and(AbortSignal::is_raised)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(config.check_invariants);
        assert!(config.abort.is_none());
        assert!(!config.abort_requested());
    }

    #[test]
    fn test_builder_setters() {
        let signal = AbortSignal::new();
        let config = EngineConfig::new()
            .with_invariant_checks(false)
            .with_abort(signal.clone());

        assert!(!config.check_invariants);
        assert!(!config.abort_requested());

        signal.raise();
        assert!(config.abort_requested());
    }
}
