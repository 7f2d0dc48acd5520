//! Multiset of drawable tile values.
//!
//! Drawing never consumes: callers pick a value with [`NumberPool::draw`] and
//! then [`NumberPool::exclude`] it explicitly. Parity-aware partial pools
//! let the dealer alternate even and odd values.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::rng::GameRng;

/// Multiset of integers available to the dealer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberPool {
    values: Vec<u8>,
}

impl NumberPool {
    /// Create a pool from an explicit multiset.
    #[must_use]
    pub fn new(values: Vec<u8>) -> Self {
        Self { values }
    }

    /// Every value of both alphabets repeated `copies` times.
    #[must_use]
    pub fn from_alphabets(regular: &[u8], block: &[u8], copies: usize) -> Self {
        let values = regular
            .iter()
            .chain(block)
            .flat_map(|&v| std::iter::repeat(v).take(copies))
            .collect();
        Self { values }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Remaining occurrences of a value.
    #[must_use]
    pub fn count(&self, value: u8) -> usize {
        self.values.iter().filter(|&&v| v == value).count()
    }

    /// Remaining values, in insertion order.
    #[must_use]
    pub fn values(&self) -> &[u8] {
        &self.values
    }

    /// Remove one occurrence of `value`.
    ///
    /// Returns false (and leaves the pool untouched) if the value is absent.
    pub fn exclude(&mut self, value: u8) -> bool {
        match self.values.iter().position(|&v| v == value) {
            Some(idx) => {
                self.values.swap_remove(idx);
                true
            }
            None => false,
        }
    }

    /// True if even values are the majority. Ties are a coin flip.
    pub fn is_more_even(&self, rng: &mut GameRng) -> bool {
        let even = self.values.iter().filter(|&&v| v % 2 == 0).count();
        let odd = self.values.len() - even;
        match even.cmp(&odd) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => rng.coin_flip(),
        }
    }

    /// Values of the requested parity, minus `excluded`.
    ///
    /// Falls back to every non-excluded value, then to the whole pool, so
    /// the result is only empty when the pool is.
    #[must_use]
    pub fn partial_pool(&self, even: bool, excluded: &[u8]) -> Vec<u8> {
        let excluded: FxHashSet<u8> = excluded.iter().copied().collect();

        let allowed: Vec<u8> = self
            .values
            .iter()
            .copied()
            .filter(|v| !excluded.contains(v))
            .collect();

        let matching: Vec<u8> = allowed.iter().copied().filter(|v| (v % 2 == 0) == even).collect();

        if !matching.is_empty() {
            matching
        } else if !allowed.is_empty() {
            allowed
        } else {
            self.values.clone()
        }
    }

    /// Uniform draw over [`NumberPool::partial_pool`]. Does not consume.
    pub fn draw(&self, even: bool, excluded: &[u8], rng: &mut GameRng) -> Option<u8> {
        let candidates = self.partial_pool(even, excluded);
        rng.pick(&candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_alphabets() {
        let pool = NumberPool::from_alphabets(&[1, 2, 3], &[0], 2);
        assert_eq!(pool.len(), 8);
        assert_eq!(pool.count(0), 2);
        assert_eq!(pool.count(3), 2);
    }

    #[test]
    fn test_exclude_removes_one_occurrence() {
        let mut pool = NumberPool::new(vec![4, 4, 5]);
        assert!(pool.exclude(4));
        assert_eq!(pool.count(4), 1);
        assert!(pool.exclude(4));
        assert!(!pool.exclude(4));
        assert_eq!(pool.values(), &[5]);
    }

    #[test]
    fn test_is_more_even() {
        let mut rng = GameRng::new(1);
        assert!(NumberPool::new(vec![2, 4, 5]).is_more_even(&mut rng));
        assert!(!NumberPool::new(vec![1, 3, 4]).is_more_even(&mut rng));
    }

    #[test]
    fn test_is_more_even_tie_is_random() {
        let pool = NumberPool::new(vec![1, 2]);
        let mut rng = GameRng::new(3);
        let results: Vec<bool> = (0..64).map(|_| pool.is_more_even(&mut rng)).collect();
        assert!(results.contains(&true));
        assert!(results.contains(&false));
    }

    #[test]
    fn test_partial_pool_parity() {
        let pool = NumberPool::new(vec![1, 2, 3, 4, 4]);
        assert_eq!(pool.partial_pool(true, &[]), vec![2, 4, 4]);
        assert_eq!(pool.partial_pool(false, &[3]), vec![1]);
    }

    #[test]
    fn test_partial_pool_falls_back() {
        let pool = NumberPool::new(vec![1, 3, 5]);
        // No even values: parity-agnostic, still honouring exclusions
        assert_eq!(pool.partial_pool(true, &[3]), vec![1, 5]);
        // Everything excluded: whole pool
        assert_eq!(pool.partial_pool(true, &[1, 3, 5]), vec![1, 3, 5]);
        assert!(NumberPool::default().partial_pool(true, &[]).is_empty());
    }

    #[test]
    fn test_draw_does_not_consume() {
        let pool = NumberPool::new(vec![6, 8]);
        let mut rng = GameRng::new(9);
        let drawn = pool.draw(true, &[], &mut rng).unwrap();
        assert!(drawn == 6 || drawn == 8);
        assert_eq!(pool.len(), 2);
    }
}
