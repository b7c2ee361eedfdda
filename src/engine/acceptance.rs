//! Deferred acceptance (Gale-Shapley), side A proposing.
//!
//! ## Rules
//!
//! - The next free side-A agent `i` (cyclic scan, see [`FreeList`]) proposes
//!   to `j = prefs_a[i][rank_a[i]]`.
//! - `j` accepts when `i` ranks strictly better than the best proposal it
//!   holds; a displaced partner becomes free one rank lower.
//! - Otherwise `j` rejects and `i` moves one rank lower.
//! - An agent that has been rejected by everyone is [`Exhausted`].
//!
//! From the empty matching this takes at most N² proposals and never
//! exhausts anyone.
//!
//! [`FreeList`]: crate::types::FreeList

use thiserror::Error;
use tracing::{debug, trace};

use super::MatchingEngine;
use crate::types::Matching;

/// A side-A agent ran out of candidates: this state has no stable completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("side-A agent {agent} was rejected by every candidate")]
pub struct Exhausted {
    pub agent: usize,
}

impl MatchingEngine<'_> {
    /// The side-A-optimal stable matching.
    ///
    /// # Panics
    ///
    /// Only if deferred acceptance from the empty matching leaves an agent
    /// exhausted, which a validated [`Instance`](crate::types::Instance) rules out.
    pub fn solve(&mut self) -> Matching {
        let before = self.proposals;
        let mut matching = Matching::empty(self.instance.size());
        if let Err(e) = self.stabilize(&mut matching) {
            panic!("deferred acceptance failed on a complete instance: {e}");
        }
        debug!(
            size = self.instance.size(),
            proposals = self.proposals - before,
            score_a = matching.score_a(),
            score_b = matching.score_b(),
            "solved"
        );
        matching
    }

    /// Run proposals until nobody is free.
    ///
    /// On `Err` the matching is left mid-way and should be discarded.
    pub fn stabilize(&mut self, matching: &mut Matching) -> Result<(), Exhausted> {
        while let Some(i) = matching.next_free() {
            self.propose(matching, i)?;
        }
        Ok(())
    }

    fn propose(&mut self, matching: &mut Matching, i: usize) -> Result<(), Exhausted> {
        let instance = self.instance;
        let rank = matching.rank_a()[i];
        let Some(&j) = instance.prefs_a(i).get(rank) else {
            trace!(agent = i, "exhausted");
            return Err(Exhausted { agent: i });
        };
        self.proposals += 1;

        let offered = instance.rank_b(j, i);
        let accepted = matching.rank_b()[j].map_or(true, |held| offered < held);
        if accepted {
            let displaced = matching.engage(i, j, offered);
            trace!(from = i, to = j, rank, ?displaced, "accepted");
        } else {
            matching.reject(i);
            trace!(from = i, to = j, rank, "rejected");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::is_stable;
    use crate::types::Instance;

    #[test]
    fn test_solve_reference_instance() {
        let instance = Instance::decode("3-hhJSYYA").unwrap();
        let mut engine = MatchingEngine::new(&instance);
        let matching = engine.solve();

        assert_eq!(matching.pairs(), &[Some(0), Some(2), Some(1)]);
        assert_eq!(matching.rank_a(), &[1, 0, 2]);
        assert_eq!(matching.rank_b(), &[Some(1), Some(1), Some(0)]);
        assert!(matching.is_complete());
        assert_eq!(matching.free_list().count(), 0);
        assert!(is_stable(&instance, &matching));
    }

    #[test]
    fn test_solve_side_a_optimal() {
        // Everyone on side A gets their first choice when those differ
        let instance = Instance::new(
            vec![vec![2, 0, 1], vec![0, 1, 2], vec![1, 2, 0]],
            vec![vec![2, 1, 0], vec![0, 2, 1], vec![1, 0, 2]],
        )
        .unwrap();
        let mut engine = MatchingEngine::new(&instance);
        let matching = engine.solve();

        assert_eq!(matching.pairs(), &[Some(2), Some(0), Some(1)]);
        assert_eq!(matching.score_a(), 0);
        assert_eq!(engine.proposals(), 3);
    }

    #[test]
    fn test_solve_identical_lists() {
        let instance = Instance::from_ordinal(3, 0).unwrap();
        let mut engine = MatchingEngine::new(&instance);
        let matching = engine.solve();

        assert_eq!(matching.pairs(), &[Some(0), Some(1), Some(2)]);
        assert_eq!(matching.rank_a(), &[0, 1, 2]);
        assert!(engine.proposals() <= 9);
    }

    #[test]
    fn test_solve_empty_instance() {
        let instance = Instance::new(Vec::new(), Vec::new()).unwrap();
        let mut engine = MatchingEngine::new(&instance);
        let matching = engine.solve();
        assert_eq!(matching.size(), 0);
        assert!(matching.is_complete());
        assert_eq!(engine.proposals(), 0);
    }

    #[test]
    fn test_stabilize_reports_exhaustion() {
        let instance = Instance::from_ordinal(2, 0).unwrap();
        let mut engine = MatchingEngine::new(&instance);
        let mut matching = engine.solve();

        // Agent 1 already holds its last choice; pushing it further exhausts it
        assert_eq!(matching.rank_a(), &[0, 1]);
        matching.detach(1);
        assert_eq!(
            engine.stabilize(&mut matching),
            Err(Exhausted { agent: 1 })
        );
    }
}
