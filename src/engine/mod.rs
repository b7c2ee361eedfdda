//! Matching engine for stable marriage instances.
//!
//! ## Design Principles
//!
//! 1. **Determinism**: the same instance always yields the same matchings in
//!    the same order
//! 2. **Synchronous Execution**: every call runs to completion, no shared state
//! 3. **Owned Branches**: each enumeration branch works on its own clone
//!
//! ## Operations
//!
//! - [`MatchingEngine::solve`]: deferred acceptance from the empty matching,
//!   giving the side-A-optimal stable matching
//! - [`MatchingEngine::break_pair`]: break one engagement of a stable matching
//!   and re-stabilise, yielding the next matching along a rotation
//! - [`MatchingEngine::quick_all_stable`]: every stable matching, by recursive
//!   breaks from the deferred-acceptance result
//! - [`MatchingEngine::brute_all_stable`]: every stable matching, by filtering
//!   all N! assignments through [`is_stable`] (validation only)
//!
//! ## Example
//!
//! ```
//! use stable_marriage::engine::{is_stable, MatchingEngine};
//! use stable_marriage::types::Instance;
//!
//! let instance = Instance::from_ordinal(3, 63).unwrap();
//! let mut engine = MatchingEngine::new(&instance);
//!
//! let best = engine.solve();
//! assert!(is_stable(&instance, &best));
//!
//! let all = engine.quick_all_stable();
//! assert_eq!(all.len(), 2);
//! assert_eq!(all[0], best);
//! ```

mod acceptance;
mod oracle;
mod rotation;

pub use acceptance::Exhausted;
pub use oracle::is_stable;

use crate::types::Instance;

/// Runs the matching algorithms against one instance and counts the work done.
#[derive(Debug, Clone)]
pub struct MatchingEngine<'a> {
    instance: &'a Instance,
    proposals: u64,
    breaks_attempted: u64,
    breaks_succeeded: u64,
}

impl<'a> MatchingEngine<'a> {
    /// Engine over `instance` with zeroed counters.
    pub fn new(instance: &'a Instance) -> Self {
        Self {
            instance,
            proposals: 0,
            breaks_attempted: 0,
            breaks_succeeded: 0,
        }
    }

    /// The instance this engine works on
    #[inline]
    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    /// Proposals made so far, across all calls
    #[inline]
    pub fn proposals(&self) -> u64 {
        self.proposals
    }

    /// Breaks that passed the eligibility checks
    #[inline]
    pub fn breaks_attempted(&self) -> u64 {
        self.breaks_attempted
    }

    /// Breaks that re-stabilised into a new matching
    #[inline]
    pub fn breaks_succeeded(&self) -> u64 {
        self.breaks_succeeded
    }

    /// Zero all counters
    pub fn reset_stats(&mut self) {
        self.proposals = 0;
        self.breaks_attempted = 0;
        self.breaks_succeeded = 0;
    }
}
