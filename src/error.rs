//! Error taxonomy for the stable-marriage core.
//!
//! Only conditions a caller can provoke with ordinary input are errors here.
//! A break that finds no rotation is an `Option::None`, and a deferred
//! acceptance run that fails on a validated instance is a panic: both are
//! described on the operations that produce them.

use thiserror::Error;

use crate::types::Side;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MatchError>;

/// Everything that can go wrong while building, addressing or decoding
/// instances and matchings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// Ordinal outside `[0, count)` for the requested size.
    #[error("ordinal {ordinal} is outside [0, {count}) for size {size}")]
    OrdinalOutOfRange {
        size: usize,
        ordinal: i128,
        count: u128,
    },

    /// A code string that cannot be decoded.
    #[error("malformed code `{code}`: {reason}")]
    MalformedCode { code: String, reason: String },

    /// `choose(total, group)` with `group > total`.
    #[error("cannot choose {group} out of {total}")]
    InvalidChoose { total: u64, group: u64 },

    /// A combinatorial quantity does not fit in 128 bits.
    #[error("{0} overflows 128 bits")]
    Overflow(&'static str),

    /// Combination unranking consumed its whole source sequence.
    #[error("combination ordinal {ordinal} exceeds the source sequence")]
    CombinationOutOfRange { ordinal: u128 },

    /// A preference row that is not a permutation of `0..N`.
    #[error("preferences of agent {agent} on side {side:?} are not a permutation")]
    InvalidPreferences { side: Side, agent: usize },

    /// A side-A to side-B assignment that is not a bijection of `0..N`.
    #[error("side-B agent {agent} is out of range or assigned twice")]
    InvalidAssignment { agent: usize },

    /// Only complete matchings have a code.
    #[error("side-A agent {agent} is unmatched")]
    IncompleteMatching { agent: usize },
}

impl MatchError {
    pub(crate) fn malformed(code: &str, reason: impl Into<String>) -> Self {
        MatchError::MalformedCode {
            code: code.to_string(),
            reason: reason.into(),
        }
    }
}
