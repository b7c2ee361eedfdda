//! Enumeration of all stable matchings by breaking engagements.
//!
//! ## Break
//!
//! Breaking side-A agent `m` in a stable matching frees `m` one rank lower
//! and frees its partner `w`, who keeps `m`'s rank as the bar a new proposer
//! must beat. Deferred acceptance then resumes. It either ends with `w`
//! taking someone it prefers to `m` (a new stable matching, where `m` and
//! everyone displaced along the way are worse off) or some proposer runs out
//! of candidates (no rotation moves `m` away from `w`).
//!
//! ## Search
//!
//! Depth-first from the deferred-acceptance result. A matching reached by
//! breaking `m` is only broken again at agents `>= m`. Matchings are
//! deduplicated by assignment, and a matching already explored from some
//! bound is not explored again from a bound at least as high.

use std::collections::HashMap;

use tracing::{debug, trace};

use super::MatchingEngine;
use crate::types::Matching;

impl MatchingEngine<'_> {
    /// Break `m`'s engagement in `base` and re-stabilise a clone.
    ///
    /// Returns `None` (no rotation) when `base` is incomplete or sized for
    /// another instance, `m` is below `base.broken_from()`, `m` already holds
    /// its last choice, `m`'s partner holds its first choice, or
    /// re-stabilisation exhausts an agent. `base` is left untouched.
    pub fn break_pair(&mut self, base: &Matching, m: usize) -> Option<Matching> {
        let size = self.instance.size();
        if base.size() != size {
            return None;
        }
        if m >= size || base.broken_from().is_some_and(|bound| m < bound) {
            return None;
        }
        let w = base.partner_a(m)?;
        if base.rank_a()[m] + 1 >= size || base.rank_b()[w] == Some(0) {
            return None;
        }
        if base.free_list().count() > 0 {
            return None;
        }

        self.breaks_attempted += 1;
        let mut next = base.clone();
        next.detach(m);
        match self.stabilize(&mut next) {
            Ok(()) => {
                self.breaks_succeeded += 1;
                trace!(agent = m, partner = w, "break found a rotation");
                Some(next)
            }
            Err(e) => {
                trace!(agent = m, partner = w, %e, "break failed");
                None
            }
        }
    }

    /// Every stable matching reachable from `base` by successive breaks at
    /// agents `>= base.broken_from()`, excluding `base` itself, in discovery
    /// order and without duplicates.
    pub fn find_all_solutions(&mut self, base: &Matching) -> Vec<Matching> {
        let mut explored: HashMap<Vec<Option<usize>>, usize> = HashMap::new();
        explored.insert(base.pairs().to_vec(), base.broken_from().unwrap_or(0));
        let mut found = Vec::new();
        self.explore(base, &mut explored, &mut found);
        found
    }

    /// The deferred-acceptance result followed by every other stable matching.
    ///
    /// Never empty for a validated instance.
    pub fn quick_all_stable(&mut self) -> Vec<Matching> {
        let base = self.solve();
        let others = self.find_all_solutions(&base);
        let mut all = Vec::with_capacity(others.len() + 1);
        all.push(base);
        all.extend(others);
        debug!(
            size = self.instance.size(),
            stable = all.len(),
            breaks = self.breaks_attempted,
            "enumerated stable matchings"
        );
        all
    }

    fn explore(
        &mut self,
        matching: &Matching,
        explored: &mut HashMap<Vec<Option<usize>>, usize>,
        found: &mut Vec<Matching>,
    ) {
        let start = matching.broken_from().unwrap_or(0);
        for m in start..self.instance.size() {
            let Some(next) = self.break_pair(matching, m) else {
                continue;
            };
            match explored.get_mut(next.pairs()) {
                Some(bound) if *bound <= m => continue,
                Some(bound) => *bound = m,
                None => {
                    explored.insert(next.pairs().to_vec(), m);
                    found.push(next.clone());
                }
            }
            self.explore(&next, explored, found);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::is_stable;
    use crate::types::Instance;

    fn fixture() -> Instance {
        Instance::from_ordinal(3, 63).unwrap()
    }

    #[test]
    fn test_break_finds_rotation() {
        let instance = fixture();
        let mut engine = MatchingEngine::new(&instance);
        let base = engine.solve();
        assert_eq!(base.pairs(), &[Some(0), Some(1), Some(2)]);

        let next = engine.break_pair(&base, 1).unwrap();
        assert_eq!(next.pairs(), &[Some(0), Some(2), Some(1)]);
        assert_eq!(next.broken_from(), Some(1));
        assert!(is_stable(&instance, &next));

        // The template is untouched
        assert_eq!(base.pairs(), &[Some(0), Some(1), Some(2)]);
        assert_eq!(base.broken_from(), None);
        assert_eq!(engine.breaks_succeeded(), 1);
    }

    #[test]
    fn test_break_ineligible() {
        let instance = fixture();
        let mut engine = MatchingEngine::new(&instance);
        let base = engine.solve();

        // Agent 0 holds its partner's first choice
        assert_eq!(base.rank_b()[0], Some(0));
        assert!(engine.break_pair(&base, 0).is_none());
        // Out of range
        assert!(engine.break_pair(&base, 3).is_none());
        assert_eq!(engine.breaks_attempted(), 0);

        // Below the bound of a derived matching
        let next = engine.break_pair(&base, 2).unwrap();
        assert_eq!(next.broken_from(), Some(2));
        assert!(engine.break_pair(&next, 1).is_none());
    }

    #[test]
    fn test_break_last_choice() {
        let instance = Instance::from_ordinal(2, 0).unwrap();
        let mut engine = MatchingEngine::new(&instance);
        let base = engine.solve();
        // Agent 1 is on its last choice, agent 0's partner got its first
        assert!(engine.break_pair(&base, 1).is_none());
        assert!(engine.break_pair(&base, 0).is_none());
    }

    #[test]
    fn test_break_incomplete() {
        let instance = fixture();
        let mut engine = MatchingEngine::new(&instance);
        assert!(engine.break_pair(&Matching::empty(3), 1).is_none());
    }

    #[test]
    fn test_break_matching_of_other_size() {
        let instance = fixture();
        let mut engine = MatchingEngine::new(&instance);

        let small = Instance::from_ordinal(2, 4).unwrap();
        let smaller = MatchingEngine::new(&small).solve();
        let larger = Matching::decode(
            &MatchingEngine::new(&Instance::from_ordinal(4, 1_000).unwrap())
                .solve()
                .encode()
                .unwrap(),
        )
        .unwrap();

        for base in [&smaller, &larger] {
            for m in 0..4 {
                assert!(engine.break_pair(base, m).is_none());
            }
            assert!(engine.find_all_solutions(base).is_empty());
        }
        assert_eq!(engine.breaks_attempted(), 0);
    }

    #[test]
    fn test_quick_all_fixture() {
        let instance = fixture();
        let mut engine = MatchingEngine::new(&instance);
        let all = engine.quick_all_stable();
        let pairs: Vec<_> = all.iter().map(|m| m.assignment().unwrap()).collect();
        assert_eq!(pairs, vec![vec![0, 1, 2], vec![0, 2, 1]]);
    }

    #[test]
    fn test_quick_all_latin_square() {
        // Cyclic lists: N stable matchings, one per diagonal
        let size = 6;
        let prefs_a = (0..size)
            .map(|i| (0..size).map(|k| (i + k) % size).collect())
            .collect();
        let prefs_b = (0..size)
            .map(|j| (0..size).map(|k| (j + 1 + k) % size).collect())
            .collect();
        let instance = Instance::new(prefs_a, prefs_b).unwrap();
        let mut engine = MatchingEngine::new(&instance);
        let all = engine.quick_all_stable();

        assert_eq!(all.len(), size);
        for matching in &all {
            assert!(is_stable(&instance, matching));
        }
    }

    #[test]
    fn test_find_all_from_derived_base() {
        let instance = fixture();
        let mut engine = MatchingEngine::new(&instance);
        let base = engine.solve();
        let next = engine.break_pair(&base, 1).unwrap();
        // Side-B-optimal already: nothing further
        assert!(engine.find_all_solutions(&next).is_empty());
    }
}
