//! # Stable Marriage
//!
//! Stable matchings between two equal-size groups with strict, complete
//! preference lists.
//!
//! ## Architecture
//!
//! - **Comb**: factorials, binomials, permutation streams and multiset unranking
//! - **Codec**: bit-packed `"<N>-<base64url>"` codes for integer sequences
//! - **Types**: `Instance` (preferences) and `Matching` (engine state)
//! - **Engine**: deferred acceptance, rotation enumeration, stability oracle
//! - **Printed**: plain-text rendering for presentation layers
//!
//! ## Design Principles
//!
//! 1. **Determinism**: identical instances yield identical matchings, in order
//! 2. **Addressability**: every instance of size N ≤ 6 has an integer ordinal,
//!    and every instance and complete matching has a short code
//! 3. **Synchronous Execution**: pure single-threaded computation
//!
//! ## Example
//!
//! ```
//! use stable_marriage::{Instance, MatchingEngine};
//!
//! let instance = Instance::decode("3-hhJSYYA").unwrap();
//! let mut engine = MatchingEngine::new(&instance);
//!
//! let all = engine.quick_all_stable();
//! assert_eq!(all.len(), 1);
//! assert_eq!(all[0].encode().unwrap(), "3-JSUA");
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Error taxonomy
pub mod error;

/// Combinatorics utilities
pub mod comb;

/// Compact integer-sequence codes
pub mod codec;

/// Core data types: Instance, Matching, Side
pub mod types;

/// Matching engine: deferred acceptance and rotation enumeration
pub mod engine;

/// Text rendering
pub mod printed;

/// Flat entry points for presentation layers
pub mod api;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use error::{MatchError, Result};
pub use types::{FreeList, Instance, Matching, Side};
pub use engine::{is_stable, Exhausted, MatchingEngine};
pub use printed::PrintedInstance;
