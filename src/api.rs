//! The operations a presentation layer needs, as free functions.
//!
//! ```
//! use stable_marriage::api;
//!
//! let instance = api::build_instance_from_ordinal(3, 63).unwrap();
//! let code = api::encode_instance(&instance);
//! assert_eq!(code, "3-GGJGJSA");
//!
//! let all = api::enumerate_all_stable_matchings(&api::decode_instance(&code).unwrap());
//! assert_eq!(all.len(), 2);
//! assert!(all.iter().all(|m| api::is_stable_matching(&instance, m)));
//!
//! let encoded = api::encode_matching(&all[1]).unwrap();
//! assert_eq!(api::decode_matching(&encoded).unwrap(), all[1]);
//! ```

use crate::engine::{is_stable, MatchingEngine};
use crate::error::Result;
use crate::types::{Instance, Matching};

/// Uniformly random instance of `size`.
pub fn build_random_instance(size: usize) -> Instance {
    Instance::random(size)
}

/// Canonical instance at `ordinal`; see [`Instance::from_ordinal`].
pub fn build_instance_from_ordinal(size: usize, ordinal: i128) -> Result<Instance> {
    Instance::from_ordinal(size, ordinal)
}

/// Number of canonical instances of `size`.
pub fn count_instances(size: usize) -> Result<u128> {
    Instance::count(size)
}

/// Instance from an `"<N>-<payload>"` code.
pub fn decode_instance(code: &str) -> Result<Instance> {
    Instance::decode(code)
}

/// Code of `instance`.
pub fn encode_instance(instance: &Instance) -> String {
    instance.encode()
}

/// The side-A-optimal stable matching.
pub fn solve_one_stable_matching(instance: &Instance) -> Matching {
    MatchingEngine::new(instance).solve()
}

/// Every stable matching, the side-A-optimal one first.
pub fn enumerate_all_stable_matchings(instance: &Instance) -> Vec<Matching> {
    MatchingEngine::new(instance).quick_all_stable()
}

/// Matching from an `"<N>-<payload>"` code.
pub fn decode_matching(code: &str) -> Result<Matching> {
    Matching::decode(code)
}

/// Code of a complete matching.
pub fn encode_matching(matching: &Matching) -> Result<String> {
    matching.encode()
}

/// See [`is_stable`].
pub fn is_stable_matching(instance: &Instance, matching: &Matching) -> bool {
    is_stable(instance, matching)
}
