//! Picks the next (source, target) pair to move cards between

use crate::card::CollectionKey;
use crate::collection::{Collection, Priority};
use crate::pool::PoolIndex;
use std::collections::HashMap;

/// A proposed transfer of overlapping cards from one source to one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movement {
    pub source: CollectionKey,
    pub target: CollectionKey,
    /// Matched unique ids, one entry per unit, sorted
    pub cards: Vec<String>,
}

impl Movement {
    /// Number of units this movement transfers
    pub fn intersection(&self) -> usize {
        self.cards.len()
    }

    /// Matched unique ids with their unit counts
    pub fn grouped(&self) -> Vec<(&str, usize)> {
        let mut grouped: Vec<(&str, usize)> = Vec::new();
        for id in &self.cards {
            match grouped.last_mut() {
                Some((last, n)) if *last == id.as_str() => *n += 1,
                _ => grouped.push((id.as_str(), 1)),
            }
        }
        grouped
    }
}

/// Multiset intersection of two pools, flattened and sorted by unique id
pub fn intersection(
    available: &HashMap<String, usize>,
    required: &HashMap<String, usize>,
) -> Vec<String> {
    let (smaller, larger) = if available.len() <= required.len() {
        (available, required)
    } else {
        (required, available)
    };

    let mut matched: Vec<(&String, usize)> = smaller
        .iter()
        .filter_map(|(id, &a)| larger.get(id).map(|&b| (id, a.min(b))))
        .filter(|(_, n)| *n > 0)
        .collect();
    matched.sort_by(|a, b| a.0.cmp(b.0));

    matched
        .into_iter()
        .flat_map(|(id, n)| std::iter::repeat(id.clone()).take(n))
        .collect()
}

type Score = (Priority, Priority, usize);

/// Find the best movement across every source/target pair
///
/// Pairs are scored by (source priority, target priority, overlap) and
/// compared highest first. Pairs without overlap are never chosen, so a
/// high-priority source that matches nothing cannot block lower ones. Ties go
/// to the pair enumerated first: sources, then targets, in collection input
/// order. Returns `None` when no pair overlaps at all.
pub fn find_optimal_movement(
    collections: &[Collection],
    available: &PoolIndex,
    required: &PoolIndex,
) -> Option<Movement> {
    let mut best: Option<(Score, Movement)> = None;

    for source in available.collections() {
        let Some(source_pool) = available.pool(source) else {
            continue;
        };
        for target in required.collections() {
            let Some(target_pool) = required.pool(target) else {
                continue;
            };

            let cards = intersection(source_pool, target_pool);
            if cards.is_empty() {
                continue;
            }

            let score = (
                collections[source.0].priority,
                collections[target.0].priority,
                cards.len(),
            );
            let better = match &best {
                Some((best_score, _)) => score > *best_score,
                None => true,
            };
            if better {
                best = Some((
                    score,
                    Movement {
                        source,
                        target,
                        cards,
                    },
                ));
            }
        }
    }

    best.map(|(_, movement)| movement)
}

#[cfg(test)]
#[path = "selector_tests.rs"]
mod tests;
