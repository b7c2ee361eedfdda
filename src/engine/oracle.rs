//! Brute-force stability checks, used to cross-validate the rotation search.

use tracing::debug;

use super::MatchingEngine;
use crate::comb::permutations;
use crate::types::{Instance, Matching};

/// True when `matching` is a complete bijection with no blocking pair.
///
/// A blocking pair is a side-A agent `i` and side-B agent `j`, not paired
/// with each other, who both rank the other strictly above their current
/// partners. Ranks are taken from `instance`, not from the matching's own
/// rank arrays. O(N²).
pub fn is_stable(instance: &Instance, matching: &Matching) -> bool {
    let size = instance.size();
    if matching.size() != size {
        return false;
    }
    let Some(pairs) = matching.assignment() else {
        return false;
    };

    let mut partners = vec![None; size];
    for (i, &j) in pairs.iter().enumerate() {
        match partners.get_mut(j) {
            Some(slot) if slot.is_none() => *slot = Some(i),
            _ => return false,
        }
    }

    for (i, &current) in pairs.iter().enumerate() {
        let held_a = instance.rank_a(i, current);
        for (j, partner) in partners.iter().enumerate() {
            if j == current {
                continue;
            }
            let Some(partner) = *partner else {
                return false;
            };
            let blocks = instance.rank_a(i, j) < held_a
                && instance.rank_b(j, i) < instance.rank_b(j, partner);
            if blocks {
                return false;
            }
        }
    }
    true
}

impl MatchingEngine<'_> {
    /// Every stable matching, found by testing all N! assignments.
    ///
    /// Results are in lexicographic order of assignment. Only practical for
    /// small N.
    pub fn brute_all_stable(&mut self) -> Vec<Matching> {
        let instance = self.instance;
        let stable: Vec<Matching> = permutations((0..instance.size()).collect())
            .filter_map(|pairs| Matching::from_pairs(instance, &pairs).ok())
            .filter(|matching| is_stable(instance, matching))
            .collect();
        debug!(size = instance.size(), stable = stable.len(), "brute-force enumeration");
        stable
    }
}
