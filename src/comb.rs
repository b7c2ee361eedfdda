//! Combinatorics utilities.
//!
//! ## Overview
//!
//! Instances of size N are addressed by a single integer ordinal. Each side's
//! preference matrix is a multiset of N rows drawn from the N! permutations of
//! `0..N`, so a side has `choose(N! + N - 1, N)` canonical matrices and an
//! instance is a pair of such ordinals. The helpers here provide the counting
//! ([`factorial`], [`choose`]), the lazy universe ([`Permutations`]) and the
//! inverse mapping ([`unrank_combination`]).
//!
//! All counts are `u128` and checked: a value that does not fit is reported
//! as [`MatchError::Overflow`] instead of wrapping.
//!
//! ## Example
//!
//! ```
//! use stable_marriage::comb::{choose, permutations, unrank_combination};
//!
//! assert_eq!(choose(5, 2).unwrap(), 10);
//!
//! // Multisets of two permutations of [0, 1]: (01,01), (01,10), (10,10)
//! let rows = unrank_combination(permutations(vec![0, 1]), 1, 2, 2).unwrap();
//! assert_eq!(rows, vec![vec![0, 1], vec![1, 0]]);
//! ```

use std::iter::FusedIterator;

use rand::Rng;

use crate::error::{MatchError, Result};

// ============================================================================
// Counting
// ============================================================================

/// `n!` as a checked `u128`.
///
/// Fits up to `n = 34`.
pub fn factorial(n: u64) -> Result<u128> {
    (1..=u128::from(n)).try_fold(1u128, |acc, k| {
        acc.checked_mul(k).ok_or(MatchError::Overflow("factorial"))
    })
}

/// Binomial coefficient `total` choose `group`.
///
/// Returns [`MatchError::InvalidChoose`] when `group > total` and 1 for the
/// degenerate groups `0` and `total`. Uses the symmetry
/// `choose(n, k) == choose(n, n - k)` so at most `min(k, n - k)` steps are
/// taken, each of which stays an exact binomial (`C(n - k + i, i)`).
pub fn choose(total: u64, group: u64) -> Result<u128> {
    if group > total {
        return Err(MatchError::InvalidChoose { total, group });
    }

    let group = group.min(total - group);
    let base = u128::from(total - group);
    let mut value = 1u128;
    for i in 1..=u128::from(group) {
        value = value
            .checked_mul(base + i)
            .ok_or(MatchError::Overflow("binomial coefficient"))?
            / i;
    }
    Ok(value)
}

// ============================================================================
// Unranking
// ============================================================================

/// Reconstruct the `ordinal`-th multiset of `size` elements drawn from
/// `source`, which yields `total` distinct elements in a fixed order.
///
/// Multisets are listed in lexicographic order of their sorted element
/// positions, so ordinal 0 repeats the first element `size` times. The source
/// is consumed lazily and only as far as needed.
///
/// Fails with [`MatchError::CombinationOutOfRange`] when
/// `ordinal >= choose(total + size - 1, size)` or `source` runs dry.
pub fn unrank_combination<I>(
    mut source: I,
    ordinal: u128,
    total: u64,
    size: usize,
) -> Result<Vec<I::Item>>
where
    I: Iterator,
    I::Item: Clone,
{
    if size == 0 {
        return Ok(Vec::new());
    }

    let out_of_range = MatchError::CombinationOutOfRange { ordinal };
    let mut current = source.next().ok_or_else(|| out_of_range.clone())?;
    let mut remaining = ordinal;
    let mut candidates = total;
    let mut result = Vec::with_capacity(size);

    for slot in (1..=size as u64).rev() {
        let mut i = candidates;
        loop {
            if i == 0 {
                return Err(out_of_range);
            }
            // Multisets of the remaining slots that start with `current`
            let count = choose(i + slot - 2, slot - 1)?;
            if remaining < count {
                result.push(current.clone());
                candidates = i;
                break;
            }
            remaining -= count;
            i -= 1;
            if i == 0 {
                return Err(out_of_range);
            }
            current = source.next().ok_or_else(|| out_of_range.clone())?;
        }
    }

    Ok(result)
}

// ============================================================================
// Permutations
// ============================================================================

/// Lazy, finite sequence of all permutations of a list.
///
/// The order is that of picking a leading element by position and recursing
/// on the rest: for sorted input it is lexicographic. An empty list yields a
/// single empty permutation.
#[derive(Debug, Clone)]
pub struct Permutations<T> {
    elements: Vec<T>,
    indices: Vec<usize>,
    exhausted: bool,
}

/// All permutations of `elements`; see [`Permutations`].
pub fn permutations<T: Clone>(elements: Vec<T>) -> Permutations<T> {
    let indices = (0..elements.len()).collect();
    Permutations {
        elements,
        indices,
        exhausted: false,
    }
}

impl<T> Permutations<T> {
    /// Step `indices` to the next arrangement; false once the last one is done.
    fn advance(&mut self) -> bool {
        let len = self.indices.len();
        let Some(pivot) = (1..len)
            .rev()
            .find(|&k| self.indices[k - 1] < self.indices[k])
            .map(|k| k - 1)
        else {
            return false;
        };

        let successor = (pivot + 1..len)
            .rev()
            .find(|&k| self.indices[k] > self.indices[pivot])
            .unwrap_or(pivot + 1);
        self.indices.swap(pivot, successor);
        self.indices[pivot + 1..].reverse();
        true
    }
}

impl<T: Clone> Iterator for Permutations<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let current = self
            .indices
            .iter()
            .map(|&i| self.elements[i].clone())
            .collect();
        self.exhausted = !self.advance();
        Some(current)
    }
}

impl<T: Clone> FusedIterator for Permutations<T> {}

// ============================================================================
// Shuffling
// ============================================================================

/// Uniform Fisher-Yates shuffle into a new vector.
pub fn shuffle<T: Clone, R: Rng + ?Sized>(values: &[T], rng: &mut R) -> Vec<T> {
    let mut result = values.to_vec();
    let len = result.len();
    for i in 0..len {
        let index = rng.gen_range(i..len);
        result.swap(i, index);
    }
    result
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_factorial() {
        assert_eq!(factorial(0).unwrap(), 1);
        assert_eq!(factorial(1).unwrap(), 1);
        assert_eq!(factorial(5).unwrap(), 120);
        assert_eq!(factorial(20).unwrap(), 2_432_902_008_176_640_000);
        assert!(factorial(34).is_ok());
        assert_eq!(factorial(35), Err(MatchError::Overflow("factorial")));
    }

    #[test]
    fn test_choose_values() {
        assert_eq!(choose(0, 0).unwrap(), 1);
        assert_eq!(choose(7, 0).unwrap(), 1);
        assert_eq!(choose(7, 7).unwrap(), 1);
        assert_eq!(choose(7, 1).unwrap(), 7);
        assert_eq!(choose(8, 3).unwrap(), 56);
        assert_eq!(choose(27, 4).unwrap(), 17_550);
        assert_eq!(choose(52, 5).unwrap(), 2_598_960);
    }

    #[test]
    fn test_choose_symmetry() {
        for n in 0..30 {
            for k in 0..=n {
                assert_eq!(choose(n, k).unwrap(), choose(n, n - k).unwrap());
            }
        }
    }

    #[test]
    fn test_choose_pascal() {
        for n in 1..40 {
            for k in 1..n {
                let sum = choose(n - 1, k - 1).unwrap() + choose(n - 1, k).unwrap();
                assert_eq!(choose(n, k).unwrap(), sum);
            }
        }
    }

    #[test]
    fn test_choose_invalid_and_overflow() {
        assert_eq!(
            choose(3, 4),
            Err(MatchError::InvalidChoose { total: 3, group: 4 })
        );
        assert!(matches!(choose(400, 200), Err(MatchError::Overflow(_))));
    }

    #[test]
    fn test_permutations_order() {
        let all: Vec<_> = permutations(vec![0, 1, 2]).collect();
        assert_eq!(
            all,
            vec![
                vec![0, 1, 2],
                vec![0, 2, 1],
                vec![1, 0, 2],
                vec![1, 2, 0],
                vec![2, 0, 1],
                vec![2, 1, 0],
            ]
        );
    }

    #[test]
    fn test_permutations_follow_positions() {
        let all: Vec<_> = permutations(vec!['c', 'a', 'b']).collect();
        assert_eq!(all.len(), 6);
        assert_eq!(all[0], vec!['c', 'a', 'b']);
        assert_eq!(all[1], vec!['c', 'b', 'a']);
        assert_eq!(all[5], vec!['b', 'a', 'c']);
    }

    #[test]
    fn test_permutations_edge_sizes() {
        let empty: Vec<Vec<u8>> = permutations(Vec::new()).collect();
        assert_eq!(empty, vec![Vec::<u8>::new()]);

        let mut iter = permutations(vec![7]);
        assert_eq!(iter.next(), Some(vec![7]));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);

        assert_eq!(permutations((0..5).collect()).count(), 120);
    }

    #[test]
    fn test_unrank_multisets_in_order() {
        let expected = [
            ['a', 'a'],
            ['a', 'b'],
            ['a', 'c'],
            ['b', 'b'],
            ['b', 'c'],
            ['c', 'c'],
        ];
        for (ordinal, want) in expected.iter().enumerate() {
            let got =
                unrank_combination(['a', 'b', 'c'].into_iter(), ordinal as u128, 3, 2).unwrap();
            assert_eq!(got, want.to_vec(), "ordinal {ordinal}");
        }
    }

    #[test]
    fn test_unrank_out_of_range() {
        let err = unrank_combination(['a', 'b', 'c'].into_iter(), 6, 3, 2);
        assert_eq!(err, Err(MatchError::CombinationOutOfRange { ordinal: 6 }));

        // A source shorter than advertised is also out of range
        let err = unrank_combination(['a'].into_iter(), 1, 3, 1);
        assert_eq!(err, Err(MatchError::CombinationOutOfRange { ordinal: 1 }));
    }

    #[test]
    fn test_unrank_is_injective_over_permutations() {
        let count = choose(6 + 2, 3).unwrap();
        let mut seen = std::collections::HashSet::new();
        for ordinal in 0..count {
            let rows = unrank_combination(permutations(vec![0, 1, 2]), ordinal, 6, 3).unwrap();
            assert_eq!(rows.len(), 3);
            assert!(seen.insert(rows));
        }
        assert!(unrank_combination(permutations(vec![0, 1, 2]), count, 6, 3).is_err());
    }

    #[test]
    fn test_unrank_empty_size() {
        let rows = unrank_combination(std::iter::empty::<u8>(), 0, 0, 0).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let values: Vec<usize> = (0..10).collect();
        for _ in 0..50 {
            let mut shuffled = shuffle(&values, &mut rng);
            shuffled.sort_unstable();
            assert_eq!(shuffled, values);
        }
    }

    #[test]
    fn test_shuffle_deterministic_with_seed() {
        let values: Vec<usize> = (0..8).collect();
        let a = shuffle(&values, &mut ChaCha8Rng::seed_from_u64(7));
        let b = shuffle(&values, &mut ChaCha8Rng::seed_from_u64(7));
        assert_eq!(a, b);
    }
}
