//! Per-collection pools of cards, as counts and as physical units
//!
//! [`PoolIndex`] answers "how many copies of X does collection C hold / still
//! need" and is what the match selector reads. [`UnitPool`] holds the actual
//! card handles the allocation loop moves. The two are maintained separately
//! so the loop can detect when they disagree.

use crate::card::{CardId, CollectionKey};
use std::collections::{HashMap, VecDeque};

/// Multiset counts of unique ids, one per collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoolIndex {
    pools: Vec<HashMap<String, usize>>,
    total: usize,
}

impl PoolIndex {
    /// Build the index for `collections` collections from `(owner, unique_id)` pairs
    pub fn build<'a, I>(collections: usize, units: I) -> Self
    where
        I: IntoIterator<Item = (CollectionKey, &'a str)>,
    {
        let mut index = Self {
            pools: vec![HashMap::new(); collections],
            total: 0,
        };
        for (key, unique_id) in units {
            index.increment(key, unique_id);
        }
        index
    }

    fn increment(&mut self, key: CollectionKey, unique_id: &str) {
        if key.0 >= self.pools.len() {
            self.pools.resize_with(key.0 + 1, HashMap::new);
        }
        *self.pools[key.0].entry(unique_id.to_string()).or_insert(0) += 1;
        self.total += 1;
    }

    /// Copies of `unique_id` currently counted for `key`
    pub fn count(&self, key: CollectionKey, unique_id: &str) -> usize {
        self.pools
            .get(key.0)
            .and_then(|pool| pool.get(unique_id))
            .copied()
            .unwrap_or(0)
    }

    /// Counts for one collection; empty when the collection has nothing left
    pub fn pool(&self, key: CollectionKey) -> Option<&HashMap<String, usize>> {
        self.pools.get(key.0).filter(|pool| !pool.is_empty())
    }

    /// Collections with a non-empty pool, in key order
    pub fn collections(&self) -> impl Iterator<Item = CollectionKey> + '_ {
        self.pools
            .iter()
            .enumerate()
            .filter(|(_, pool)| !pool.is_empty())
            .map(|(i, _)| CollectionKey(i))
    }

    /// Remove `n` copies of `unique_id` from `key`'s pool
    ///
    /// Returns false, leaving the index untouched, if fewer than `n` copies are counted.
    pub fn decrement(&mut self, key: CollectionKey, unique_id: &str, n: usize) -> bool {
        let Some(pool) = self.pools.get_mut(key.0) else {
            return n == 0;
        };
        let Some(count) = pool.get_mut(unique_id) else {
            return n == 0;
        };
        if *count < n {
            return false;
        }
        *count -= n;
        if *count == 0 {
            pool.remove(unique_id);
        }
        self.total -= n;
        true
    }

    /// Total copies across every collection
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Physical card handles grouped by owning collection and unique id
///
/// Units of the same identity are handed out oldest first.
#[derive(Debug, Clone, Default)]
pub struct UnitPool {
    units: Vec<HashMap<String, VecDeque<CardId>>>,
    len: usize,
}

impl UnitPool {
    pub fn new(collections: usize) -> Self {
        Self {
            units: vec![HashMap::new(); collections],
            len: 0,
        }
    }

    pub fn insert(&mut self, key: CollectionKey, unique_id: &str, card: CardId) {
        if key.0 >= self.units.len() {
            self.units.resize_with(key.0 + 1, HashMap::new);
        }
        self.units[key.0]
            .entry(unique_id.to_string())
            .or_default()
            .push_back(card);
        self.len += 1;
    }

    /// Take one unit of `unique_id` owned by `key`, if any remains
    pub fn take(&mut self, key: CollectionKey, unique_id: &str) -> Option<CardId> {
        let bucket = self.units.get_mut(key.0)?.get_mut(unique_id)?;
        let card = bucket.pop_front()?;
        if bucket.is_empty() {
            self.units[key.0].remove(unique_id);
        }
        self.len -= 1;
        Some(card)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Remaining units in arena order
    pub fn card_ids(&self) -> Vec<CardId> {
        let mut ids: Vec<CardId> = self
            .units
            .iter()
            .flat_map(|pool| pool.values())
            .flatten()
            .copied()
            .collect();
        ids.sort();
        ids
    }
}
