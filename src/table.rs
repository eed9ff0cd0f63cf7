//! Dense n-gram frequency table.
//!
//! The key space is small and fully enumerable (65,536 pairs or 16,777,216
//! triplets), so counts live in a flat `Vec<u64>` indexed by the flattened
//! key instead of a hash map. A zero slot means "never observed".

use std::collections::BTreeMap;

use crate::ngram::{Arity, ByteTuple};

#[derive(Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    arity: Arity,
    counts: Vec<u64>,
}

impl FrequencyTable {
    pub fn new(arity: Arity) -> Self {
        Self {
            arity,
            counts: vec![0; arity.key_space()],
        }
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    #[inline]
    pub fn increment(&mut self, index: usize) {
        self.counts[index] += 1;
    }

    #[inline]
    pub fn count_at(&self, index: usize) -> u64 {
        self.counts[index]
    }

    /// Count for `key`; zero for tuples of the other arity.
    pub fn get(&self, key: ByteTuple) -> u64 {
        if key.arity() != self.arity {
            return 0;
        }
        self.counts[key.flatten()]
    }

    pub fn pair(&self, x: u8, y: u8) -> u64 {
        self.get(ByteTuple::Pair([x, y]))
    }

    pub fn triplet(&self, x: u8, y: u8, z: u8) -> u64 {
        self.get(ByteTuple::Triplet([x, y, z]))
    }

    /// Highest count in the table, or 0 when empty.
    pub fn peak(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of keys observed at least once.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Observed keys in flattened-index order, as `(index, count)`.
    pub fn nonzero(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .map(|(i, &c)| (i, c))
    }

    /// Observed keys as tuples, ordered by key.
    pub fn to_map(&self) -> BTreeMap<ByteTuple, u64> {
        self.nonzero()
            .map(|(i, c)| (ByteTuple::unflatten(self.arity, i), c))
            .collect()
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.counts
    }
}

impl std::fmt::Debug for FrequencyTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrequencyTable")
            .field("arity", &self.arity)
            .field("distinct", &self.distinct())
            .field("peak", &self.peak())
            .finish()
    }
}
