//! Insertion-ordered frequency tables for tokens and n-grams.

use std::hash::{BuildHasherDefault, Hash};

use indexmap::{Equivalent, IndexMap};
use rustc_hash::FxHasher;

/// Fx-hashed map that iterates in first-insertion order.
pub type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

/// Occurrence counts keyed by token or n-gram.
///
/// Keys iterate in the order they were first seen, so tables persist with a reproducible row
/// order. Every stored count is at least one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable<K: Hash + Eq> {
    counts: FxIndexMap<K, usize>,
}

/// Distinct corpus words with their counts, in first-occurrence order.
pub type Vocabulary = FrequencyTable<String>;

impl<K: Hash + Eq> Default for FrequencyTable<K> {
    fn default() -> Self {
        Self {
            counts: FxIndexMap::default(),
        }
    }
}

impl<K: Hash + Eq> FrequencyTable<K> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts every key produced by `keys`.
    pub fn from_keys<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        let mut table = Self::new();
        table.extend(keys);
        table
    }

    /// Records one occurrence of `key`.
    pub fn insert(&mut self, key: K) {
        *self.counts.entry(key).or_insert(0) += 1;
    }

    /// Returns the count for `key`, or zero when it was never seen.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> usize
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Returns `true` when `key` has a positive count.
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.counts.contains_key(key)
    }

    /// Number of distinct keys (types).
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` when no key has been counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts (tokens).
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Largest count in the table.
    #[must_use]
    pub fn max_count(&self) -> Option<usize> {
        self.counts.values().copied().max()
    }

    /// Iterates `(key, count)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, usize)> + '_ {
        self.counts.iter().map(|(key, &count)| (key, count))
    }

    /// Iterates keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.counts.keys()
    }

    /// Iterates counts in first-seen key order.
    pub fn counts(&self) -> impl Iterator<Item = usize> + '_ {
        self.counts.values().copied()
    }

    /// Returns owned `(key, count)` rows for persistence.
    #[must_use]
    pub fn rows(&self) -> Vec<(K, usize)>
    where
        K: Clone,
    {
        self.iter().map(|(key, count)| (key.clone(), count)).collect()
    }
}

impl<K: Hash + Eq> Extend<K> for FrequencyTable<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, keys: I) {
        for key in keys {
            self.insert(key);
        }
    }
}

impl<K: Hash + Eq> FromIterator<K> for FrequencyTable<K> {
    fn from_iter<I: IntoIterator<Item = K>>(keys: I) -> Self {
        Self::from_keys(keys)
    }
}
