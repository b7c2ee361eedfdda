//! Matching state shared by deferred acceptance and rotation enumeration.
//!
//! ## State
//!
//! - `pairs[i]`: side-B partner of side-A agent `i`, `None` while `i` is free.
//! - `rank_a[i]`: how far down its list `i` has proposed. For an engaged
//!   agent this is the rank of its partner; every better candidate has
//!   already rejected it.
//! - `rank_b[j]`: rank (in `j`'s list) of the best proposal `j` holds, `None`
//!   before any. While `j` has a partner this is the partner's rank; after a
//!   break it is the threshold a new proposer has to beat.
//! - `broken_from`: the side-A agent whose engagement was broken to derive
//!   this matching; `None` when it came straight from deferred acceptance.
//! - a [`FreeList`] of the agents still to propose.
//!
//! A returned stable matching is a template: the engine clones it before
//! breaking an engagement, so the original is never mutated.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::codec::Codec;
use crate::error::{MatchError, Result};
use crate::types::Instance;

// ============================================================================
// FreeList
// ============================================================================

/// Count of free side-A agents plus the cursor the next scan starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FreeList {
    count: usize,
    cursor: usize,
}

impl FreeList {
    /// `count` free agents, scan starting at `cursor`.
    pub fn new(count: usize, cursor: usize) -> Self {
        Self { count, cursor }
    }

    /// Number of free agents
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Where the next scan starts
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Scan `pairs` cyclically from the cursor for a free agent and move the
    /// cursor just past it. `None` when nobody is free.
    fn next(&mut self, pairs: &[Option<usize>]) -> Option<usize> {
        if self.count == 0 || pairs.is_empty() {
            return None;
        }
        let size = pairs.len();
        let found = (0..size)
            .map(|step| (self.cursor + step) % size)
            .find(|&i| pairs[i].is_none());
        debug_assert!(found.is_some(), "free count {} but no free agent", self.count);
        if let Some(i) = found {
            self.cursor = (i + 1) % size;
        }
        found
    }
}

// ============================================================================
// Matching
// ============================================================================

/// A (possibly partial) matching between side A and side B.
///
/// Equality and hashing look at the assignment and the ranks only; the free
/// list and `broken_from` are bookkeeping of how the matching was reached.
#[derive(Debug, Clone)]
pub struct Matching {
    pairs: Vec<Option<usize>>,
    partners_b: Vec<Option<usize>>,
    rank_a: Vec<usize>,
    rank_b: Vec<Option<usize>>,
    broken_from: Option<usize>,
    free: FreeList,
}

impl Matching {
    /// Nobody paired, nobody has proposed.
    pub fn empty(size: usize) -> Self {
        Self {
            pairs: vec![None; size],
            partners_b: vec![None; size],
            rank_a: vec![0; size],
            rank_b: vec![None; size],
            broken_from: None,
            free: FreeList::new(size, 0),
        }
    }

    /// Complete matching where side-A agent `i` is paired with `pairs[i]`,
    /// ranks taken from `instance`.
    ///
    /// Fails with [`MatchError::InvalidAssignment`] unless `pairs` is a
    /// bijection of `0..instance.size()`.
    pub fn from_pairs(instance: &Instance, pairs: &[usize]) -> Result<Self> {
        let size = instance.size();
        let partners_b = invert_assignment(pairs, size)?;
        let rank_a = pairs
            .iter()
            .enumerate()
            .map(|(i, &j)| instance.rank_a(i, j))
            .collect();
        let rank_b = partners_b
            .iter()
            .enumerate()
            .map(|(j, &i)| Some(instance.rank_b(j, i)))
            .collect();

        Ok(Self {
            pairs: pairs.iter().copied().map(Some).collect(),
            partners_b: partners_b.into_iter().map(Some).collect(),
            rank_a,
            rank_b,
            broken_from: None,
            free: FreeList::default(),
        })
    }

    /// Decode a matching code: `pairs`, then `rank_a`, then `rank_b`.
    ///
    /// A code carries no instance, so only `pairs` is validated (it must be a
    /// bijection). The ranks, and the scores derived from them, are taken as
    /// given; [`Matching::from_pairs`] rebuilds them from an instance, and
    /// [`is_stable`](crate::engine::is_stable) never reads them.
    pub fn decode(code: &str) -> Result<Self> {
        let (codec, values) =
            Codec::decode(code, |n| n.checked_mul(3).unwrap_or(usize::MAX))?;
        let size = codec.size();
        let (pairs, ranks) = values.split_at(size);
        let (rank_a, rank_b) = ranks.split_at(size);
        let partners_b = invert_assignment(pairs, size)
            .map_err(|e| MatchError::malformed(code, e.to_string()))?;

        Ok(Self {
            pairs: pairs.iter().copied().map(Some).collect(),
            partners_b: partners_b.into_iter().map(Some).collect(),
            rank_a: rank_a.to_vec(),
            rank_b: rank_b.iter().copied().map(Some).collect(),
            broken_from: None,
            free: FreeList::default(),
        })
    }

    /// Encode as `"<N>-<payload>"`; only complete matchings have a code.
    pub fn encode(&self) -> Result<String> {
        let mut values = Vec::with_capacity(3 * self.size());
        for (i, pair) in self.pairs.iter().enumerate() {
            values.push(pair.ok_or(MatchError::IncompleteMatching { agent: i })?);
        }
        values.extend_from_slice(&self.rank_a);
        for (j, rank) in self.rank_b.iter().enumerate() {
            let agent = self.partners_b[j].unwrap_or(j);
            values.push(rank.ok_or(MatchError::IncompleteMatching { agent })?);
        }
        Ok(Codec::new(self.size()).encode(&values))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of agents per side
    #[inline]
    pub fn size(&self) -> usize {
        self.pairs.len()
    }

    /// Side-B partner of every side-A agent
    #[inline]
    pub fn pairs(&self) -> &[Option<usize>] {
        &self.pairs
    }

    /// Side-B partner of side-A agent `i`
    #[inline]
    pub fn partner_a(&self, i: usize) -> Option<usize> {
        self.pairs[i]
    }

    /// Side-A partner of side-B agent `j`
    #[inline]
    pub fn partner_b(&self, j: usize) -> Option<usize> {
        self.partners_b[j]
    }

    /// Proposal ranks of side A
    #[inline]
    pub fn rank_a(&self) -> &[usize] {
        &self.rank_a
    }

    /// Held-proposal ranks of side B
    #[inline]
    pub fn rank_b(&self) -> &[Option<usize>] {
        &self.rank_b
    }

    /// Agent whose engagement was broken to reach this matching
    #[inline]
    pub fn broken_from(&self) -> Option<usize> {
        self.broken_from
    }

    /// Free agents and scan cursor
    #[inline]
    pub fn free_list(&self) -> FreeList {
        self.free
    }

    /// True when every side-A agent is paired
    pub fn is_complete(&self) -> bool {
        self.pairs.iter().all(Option::is_some)
    }

    /// The assignment as plain indices, if complete
    pub fn assignment(&self) -> Option<Vec<usize>> {
        self.pairs.iter().copied().collect()
    }

    // ========================================================================
    // Scores
    // ========================================================================

    /// Sum of side A's ranks (lower is better for side A)
    pub fn score_a(&self) -> usize {
        self.rank_a.iter().sum()
    }

    /// Sum of side B's ranks (lower is better for side B)
    pub fn score_b(&self) -> usize {
        self.rank_b.iter().flatten().sum()
    }

    /// Combined score
    pub fn total_score(&self) -> usize {
        self.score_a() + self.score_b()
    }

    // ========================================================================
    // Engine transitions
    // ========================================================================

    /// Next free side-A agent, advancing the cursor.
    pub(crate) fn next_free(&mut self) -> Option<usize> {
        self.free.next(&self.pairs)
    }

    /// Engage free agent `i` with `j`, who ranks `i` at `rank`.
    ///
    /// `j`'s previous partner, if any, becomes free and moves one rank down
    /// its list; it is returned.
    pub(crate) fn engage(&mut self, i: usize, j: usize, rank: usize) -> Option<usize> {
        let displaced = self.partners_b[j].take();
        if let Some(previous) = displaced {
            self.pairs[previous] = None;
            self.rank_a[previous] += 1;
            self.free.count += 1;
        }
        self.pairs[i] = Some(j);
        self.partners_b[j] = Some(i);
        self.rank_b[j] = Some(rank);
        self.free.count -= 1;
        displaced
    }

    /// `i` was turned down; it will propose one rank lower.
    pub(crate) fn reject(&mut self, i: usize) {
        self.rank_a[i] += 1;
    }

    /// Break `i`'s engagement: `i` becomes free one rank lower, its partner
    /// becomes free but keeps `i`'s rank as the bar to beat. Records `i` as
    /// `broken_from` and points the cursor at `i`. Returns the former partner.
    pub(crate) fn detach(&mut self, i: usize) -> Option<usize> {
        let partner = self.pairs[i].take()?;
        self.partners_b[partner] = None;
        self.rank_a[i] += 1;
        self.broken_from = Some(i);
        self.free = FreeList::new(self.free.count + 1, i);
        Some(partner)
    }
}

impl PartialEq for Matching {
    fn eq(&self, other: &Self) -> bool {
        self.pairs == other.pairs && self.rank_a == other.rank_a && self.rank_b == other.rank_b
    }
}

impl Eq for Matching {}

impl Hash for Matching {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pairs.hash(state);
        self.rank_a.hash(state);
        self.rank_b.hash(state);
    }
}

impl fmt::Display for Matching {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, pair) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match pair {
                Some(j) => write!(f, "{i}-{j}")?,
                None => write!(f, "{i}-_")?,
            }
        }
        write!(
            f,
            " ({} + {} = {})",
            self.score_a(),
            self.score_b(),
            self.total_score()
        )
    }
}

/// `partners[j] = i` for `pairs[i] = j`, rejecting anything but a bijection.
fn invert_assignment(pairs: &[usize], size: usize) -> Result<Vec<usize>> {
    if pairs.len() != size {
        return Err(MatchError::InvalidAssignment {
            agent: pairs.len().min(size),
        });
    }
    let mut partners = vec![None; size];
    for (i, &j) in pairs.iter().enumerate() {
        match partners.get_mut(j) {
            Some(slot) if slot.is_none() => *slot = Some(i),
            _ => return Err(MatchError::InvalidAssignment { agent: j }),
        }
    }
    Ok(partners.into_iter().flatten().collect())
}

// ============================================================================
// Unit Tests
// ============================================================================
