//! Problem instances: strict, complete preference lists for both sides.
//!
//! ## Construction
//!
//! - [`Instance::random`] / [`Instance::random_with`]: independent uniform
//!   shuffles for every agent.
//! - [`Instance::from_ordinal`]: the canonical instance at a given position in
//!   `[0, Instance::count(N))`.
//! - [`Instance::decode`]: from an `"<N>-<payload>"` code.
//! - [`Instance::new`]: from explicit rows, validated.
//!
//! Every constructor validates that each row is a permutation of `0..N` and
//! precomputes the inverse rank tables, so rank lookups never fail.
//!
//! ## Example
//!
//! ```
//! use stable_marriage::types::Instance;
//!
//! let instance = Instance::decode("3-hhJSYYA").unwrap();
//! assert_eq!(instance.size(), 3);
//! assert_eq!(instance.prefs_a(0), &[2, 0, 1]);
//! assert_eq!(instance.encode(), "3-hhJSYYA");
//! ```

use rand::Rng;
use tracing::debug;

use crate::codec::Codec;
use crate::comb::{choose, factorial, permutations, shuffle, unrank_combination};
use crate::error::{MatchError, Result};
use crate::types::Side;

/// Immutable preference data for both sides.
///
/// `prefs_a[i]` ranks side B from agent `i`'s point of view (rank 0 first);
/// `prefs_b[j]` ranks side A for agent `j`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Instance {
    size: usize,
    prefs_a: Vec<Vec<usize>>,
    prefs_b: Vec<Vec<usize>>,
    /// `ranks_a[i][j]`: position of `j` in `prefs_a[i]`
    ranks_a: Vec<Vec<usize>>,
    /// `ranks_b[j][i]`: position of `i` in `prefs_b[j]`
    ranks_b: Vec<Vec<usize>>,
}

impl Instance {
    /// Build an instance from explicit preference rows.
    ///
    /// The size is the number of side-A rows; side B must have as many rows
    /// and every row must be a permutation of `0..size`.
    pub fn new(prefs_a: Vec<Vec<usize>>, prefs_b: Vec<Vec<usize>>) -> Result<Self> {
        let size = prefs_a.len();
        if prefs_b.len() != size {
            return Err(MatchError::InvalidPreferences {
                side: Side::B,
                agent: prefs_b.len().min(size),
            });
        }
        let ranks_a = invert_rows(&prefs_a, Side::A)?;
        let ranks_b = invert_rows(&prefs_b, Side::B)?;

        Ok(Self {
            size,
            prefs_a,
            prefs_b,
            ranks_a,
            ranks_b,
        })
    }

    /// Uniformly random instance from the thread RNG.
    pub fn random(size: usize) -> Self {
        Self::random_with(size, &mut rand::thread_rng())
    }

    /// Uniformly random instance from a caller-supplied RNG.
    ///
    /// Every row of both sides is an independent shuffle of `0..size`.
    pub fn random_with<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        let agents: Vec<usize> = (0..size).collect();
        let prefs_a: Vec<Vec<usize>> = (0..size).map(|_| shuffle(&agents, rng)).collect();
        let prefs_b: Vec<Vec<usize>> = (0..size).map(|_| shuffle(&agents, rng)).collect();
        let ranks_a = prefs_a.iter().map(|row| invert(row)).collect();
        let ranks_b = prefs_b.iter().map(|row| invert(row)).collect();
        debug!(size, "built random instance");

        Self {
            size,
            prefs_a,
            prefs_b,
            ranks_a,
            ranks_b,
        }
    }

    /// Number of canonical preference matrices for one side:
    /// `choose(N! + N - 1, N)`.
    pub fn side_count(size: usize) -> Result<u128> {
        let rows = permutation_count(size)?;
        let size = size as u64;
        let universe = rows
            .checked_add(size.saturating_sub(1))
            .ok_or(MatchError::Overflow("permutation count"))?;
        choose(universe, size)
    }

    /// Number of canonical instances of `size`: `side_count(size)²`.
    ///
    /// Fits in 128 bits up to size 6.
    pub fn count(size: usize) -> Result<u128> {
        let side = Self::side_count(size)?;
        side.checked_mul(side)
            .ok_or(MatchError::Overflow("instance count"))
    }

    /// The canonical instance at `ordinal`.
    ///
    /// `ordinal / side_count` selects side A's matrix and
    /// `ordinal % side_count` selects side B's; each matrix is a multiset of
    /// permutations unranked in lexicographic permutation order. Distinct
    /// ordinals give distinct instances.
    ///
    /// Fails with [`MatchError::OrdinalOutOfRange`] outside
    /// `[0, Instance::count(size))`.
    pub fn from_ordinal(size: usize, ordinal: i128) -> Result<Self> {
        let side = Self::side_count(size)?;
        let count = side
            .checked_mul(side)
            .ok_or(MatchError::Overflow("instance count"))?;
        let position = u128::try_from(ordinal)
            .ok()
            .filter(|&position| position < count)
            .ok_or(MatchError::OrdinalOutOfRange {
                size,
                ordinal,
                count,
            })?;

        let rows = permutation_count(size)?;
        let agents: Vec<usize> = (0..size).collect();
        let prefs_a = unrank_combination(permutations(agents.clone()), position / side, rows, size)?;
        let prefs_b = unrank_combination(permutations(agents), position % side, rows, size)?;
        debug!(size, ordinal, "built instance from ordinal");

        Self::new(prefs_a, prefs_b)
    }

    /// Decode an instance code: size prefix, then side A's rows, then side B's.
    pub fn decode(code: &str) -> Result<Self> {
        let (codec, values) = Codec::decode(code, |n| {
            n.checked_mul(n)
                .and_then(|square| square.checked_mul(2))
                .unwrap_or(usize::MAX)
        })?;
        let size = codec.size();
        let mut rows = values.chunks(size.max(1)).map(<[usize]>::to_vec);
        let prefs_a: Vec<Vec<usize>> = rows.by_ref().take(size).collect();
        let prefs_b: Vec<Vec<usize>> = rows.take(size).collect();
        let instance = Self::new(prefs_a, prefs_b)
            .map_err(|e| MatchError::malformed(code, e.to_string()))?;
        debug!(size, code, "decoded instance");

        Ok(instance)
    }

    /// Encode as `"<N>-<payload>"`, side A's rows first.
    pub fn encode(&self) -> String {
        let values: Vec<usize> = self
            .prefs_a
            .iter()
            .chain(&self.prefs_b)
            .flatten()
            .copied()
            .collect();
        Codec::new(self.size).encode(&values)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of agents per side
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Preference row of side-A agent `i`
    #[inline]
    pub fn prefs_a(&self, i: usize) -> &[usize] {
        &self.prefs_a[i]
    }

    /// Preference row of side-B agent `j`
    #[inline]
    pub fn prefs_b(&self, j: usize) -> &[usize] {
        &self.prefs_b[j]
    }

    /// Preference row of `agent` on `side`
    pub fn prefs(&self, side: Side, agent: usize) -> &[usize] {
        match side {
            Side::A => self.prefs_a(agent),
            Side::B => self.prefs_b(agent),
        }
    }

    /// Rank of side-B agent `j` in the list of side-A agent `i`
    #[inline]
    pub fn rank_a(&self, i: usize, j: usize) -> usize {
        self.ranks_a[i][j]
    }

    /// Rank of side-A agent `i` in the list of side-B agent `j`
    #[inline]
    pub fn rank_b(&self, j: usize, i: usize) -> usize {
        self.ranks_b[j][i]
    }
}

impl std::fmt::Display for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&crate::printed::PrintedInstance::new(self).print())
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// `N!` as the `u64` universe size for unranking.
fn permutation_count(size: usize) -> Result<u64> {
    let rows = factorial(size as u64)?;
    u64::try_from(rows).map_err(|_| MatchError::Overflow("permutation count"))
}

/// Inverse of a row already known to be a permutation.
fn invert(row: &[usize]) -> Vec<usize> {
    let mut ranks = vec![0; row.len()];
    for (rank, &agent) in row.iter().enumerate() {
        ranks[agent] = rank;
    }
    ranks
}

/// Validate every row as a permutation of `0..rows.len()` and invert it.
fn invert_rows(rows: &[Vec<usize>], side: Side) -> Result<Vec<Vec<usize>>> {
    let size = rows.len();
    rows.iter()
        .enumerate()
        .map(|(agent, row)| {
            if row.len() != size {
                return Err(MatchError::InvalidPreferences { side, agent });
            }
            let mut ranks = vec![None; size];
            for (rank, &other) in row.iter().enumerate() {
                match ranks.get_mut(other) {
                    Some(slot) if slot.is_none() => *slot = Some(rank),
                    _ => return Err(MatchError::InvalidPreferences { side, agent }),
                }
            }
            Ok(ranks.into_iter().flatten().collect())
        })
        .collect()
}

// ============================================================================
// Unit Tests
// ============================================================================
