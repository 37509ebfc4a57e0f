//! The reshuffle engine
//!
//! Cards from every active collection are expanded into single units and
//! stored in one arena. Units held by sources form the available pool, units
//! demanded by targets form the required pool. The loop repeatedly asks the
//! selector for the best (source, target) pair, moves the overlap, and stops
//! once no pair overlaps. Afterwards card counts are checked for conservation.

use crate::card::{Card, CardId, CardRecord, CollectionKey};
use crate::collection::{Collection, Role};
use crate::error::{ReshuffleError, Result};
use crate::fetch::{include_record, CollectionFetcher};
use crate::pool::{PoolIndex, UnitPool};
use crate::selector::{find_optimal_movement, Movement};
use std::collections::{HashMap, HashSet};

/// Working state of a single reshuffle run
#[derive(Debug)]
pub struct ShuffleManager {
    collections: Vec<Collection>,
    cards: Vec<Card>,
    available: UnitPool,
    required: UnitPool,
    available_index: PoolIndex,
    required_index: PoolIndex,
    allocated: Vec<CardId>,
    initially_available: usize,
    initially_required: usize,
}

impl ShuffleManager {
    /// Fetch every distinct active collection and build the run
    pub fn new<F>(inputs: &[Collection], fetcher: &F) -> Result<Self>
    where
        F: CollectionFetcher + ?Sized,
    {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut listings = Vec::new();

        for collection in inputs.iter().filter(|c| c.active) {
            if !seen.insert(collection.id.as_str()) {
                log::warn!(
                    "Collection '{}' ({}) listed more than once, fetching it once",
                    collection.name,
                    collection.id
                );
                continue;
            }
            let records = fetcher
                .fetch(collection)
                .map_err(|source| ReshuffleError::Fetch {
                    collection: collection.id.clone(),
                    source,
                })?;
            log::info!(
                "Fetched {} rows for {} '{}'",
                records.len(),
                role_label(collection.role),
                collection.name
            );
            listings.push((collection.clone(), records));
        }

        Ok(Self::from_listings(listings))
    }

    /// Build the run from already fetched listings
    ///
    /// Inactive collections are dropped. Listings for a collection id seen
    /// before are merged into the first occurrence.
    pub fn from_listings(listings: Vec<(Collection, Vec<CardRecord>)>) -> Self {
        let mut collections: Vec<Collection> = Vec::new();
        let mut keys: HashMap<String, CollectionKey> = HashMap::new();
        let mut cards: Vec<Card> = Vec::new();

        for (collection, records) in listings {
            if !collection.active {
                log::debug!("Skipping inactive collection '{}'", collection.name);
                continue;
            }
            let key = match keys.get(&collection.id) {
                Some(&key) => {
                    log::warn!(
                        "Duplicate collection id '{}', merging into '{}'",
                        collection.id,
                        collections[key.0].name
                    );
                    key
                }
                None => {
                    let key = CollectionKey(collections.len());
                    keys.insert(collection.id.clone(), key);
                    collections.push(collection);
                    key
                }
            };

            let owner = &collections[key.0];
            for record in records.iter().filter(|r| include_record(owner, r)) {
                for _ in 0..record.quantity {
                    cards.push(match owner.role {
                        Role::Source => Card::held(record, key),
                        Role::Target => Card::demanded(record, key),
                    });
                }
            }
        }

        Self::from_cards(collections, cards)
    }

    fn from_cards(collections: Vec<Collection>, cards: Vec<Card>) -> Self {
        let n = collections.len();
        let mut available = UnitPool::new(n);
        let mut required = UnitPool::new(n);

        for (i, card) in cards.iter().enumerate() {
            match (card.source, card.target) {
                (Some(source), None) => available.insert(source, &card.unique_id, CardId(i)),
                (None, Some(target)) => required.insert(target, &card.unique_id, CardId(i)),
                _ => log::warn!(
                    "Card '{}' has no single owner at creation, ignoring it",
                    card.name
                ),
            }
        }

        let available_index = PoolIndex::build(
            n,
            cards
                .iter()
                .filter_map(|c| match (c.source, c.target) {
                    (Some(source), None) => Some((source, c.unique_id.as_str())),
                    _ => None,
                }),
        );
        let required_index = PoolIndex::build(
            n,
            cards
                .iter()
                .filter_map(|c| match (c.source, c.target) {
                    (None, Some(target)) => Some((target, c.unique_id.as_str())),
                    _ => None,
                }),
        );

        Self {
            initially_available: available.len(),
            initially_required: required.len(),
            collections,
            cards,
            available,
            required,
            available_index,
            required_index,
            allocated: Vec::new(),
        }
    }

    /// Active collections in run order
    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    pub fn available_len(&self) -> usize {
        self.available.len()
    }

    pub fn required_len(&self) -> usize {
        self.required.len()
    }

    /// Run the allocation loop to completion and validate the result
    ///
    /// Errors are engine defects; the manager is consumed so a failed run
    /// cannot be resumed.
    pub fn reshuffle(mut self) -> Result<Allocation> {
        log::info!(
            "Reshuffling {} available and {} required cards across {} collections",
            self.initially_available,
            self.initially_required,
            self.collections.len()
        );

        let mut movements = 0;
        while !self.available.is_empty() && !self.required.is_empty() {
            let Some(movement) =
                find_optimal_movement(&self.collections, &self.available_index, &self.required_index)
            else {
                break;
            };
            log::debug!(
                "Moving {} cards from '{}' (priority {}) to '{}' (priority {})",
                movement.intersection(),
                self.collections[movement.source.0].name,
                self.collections[movement.source.0].priority,
                self.collections[movement.target.0].name,
                self.collections[movement.target.0].priority
            );
            self.apply(&movement)?;
            movements += 1;
        }

        validate_conservation(
            self.initially_available,
            self.available.len(),
            self.initially_required,
            self.required.len(),
            self.allocated.len(),
        )?;

        let allocation = Allocation {
            buylist: self.required.card_ids(),
            ditchlist: self.available.card_ids(),
            allocated: self.allocated,
            collections: self.collections,
            cards: self.cards,
            movements,
        };
        log::info!(
            "Reshuffle finished after {} movements: {} reshuffled, {} to buy, {} to ditch",
            allocation.movements,
            allocation.allocated.len(),
            allocation.buylist.len(),
            allocation.ditchlist.len()
        );
        Ok(allocation)
    }

    fn apply(&mut self, movement: &Movement) -> Result<()> {
        for unique_id in &movement.cards {
            let available = self
                .available
                .take(movement.source, unique_id)
                .ok_or_else(|| self.desync(movement, unique_id))?;
            self.required
                .take(movement.target, unique_id)
                .ok_or_else(|| self.desync(movement, unique_id))?;

            self.cards[available.0].target = Some(movement.target);
            self.allocated.push(available);
        }

        for (unique_id, n) in movement.grouped() {
            if !self.available_index.decrement(movement.source, unique_id, n)
                || !self.required_index.decrement(movement.target, unique_id, n)
            {
                return Err(self.desync(movement, unique_id));
            }
        }
        Ok(())
    }

    fn desync(&self, movement: &Movement, unique_id: &str) -> ReshuffleError {
        ReshuffleError::PoolDesync {
            source_id: self.collections[movement.source.0].id.clone(),
            target_id: self.collections[movement.target.0].id.clone(),
            unique_id: unique_id.to_string(),
        }
    }
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::Source => "source",
        Role::Target => "target",
    }
}

/// Check that every card is accounted for after the loop
pub fn validate_conservation(
    initially_available: usize,
    available: usize,
    initially_required: usize,
    required: usize,
    allocated: usize,
) -> Result<()> {
    if initially_available == available + allocated && initially_required == required + allocated {
        Ok(())
    } else {
        Err(ReshuffleError::Conservation {
            initially_available,
            available,
            initially_required,
            required,
            allocated,
        })
    }
}

/// Final state of a finished run
///
/// Holds the card arena plus the three outcome lists: cards moved to a
/// target, demands nobody could fill, and held cards nobody needed.
#[derive(Debug, Clone)]
pub struct Allocation {
    collections: Vec<Collection>,
    cards: Vec<Card>,
    allocated: Vec<CardId>,
    buylist: Vec<CardId>,
    ditchlist: Vec<CardId>,
    movements: usize,
}

impl Allocation {
    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    pub fn collection(&self, key: CollectionKey) -> &Collection {
        &self.collections[key.0]
    }

    pub fn card(&self, id: CardId) -> &Card {
        &self.cards[id.0]
    }

    /// Held cards reassigned to a target, in the order they were moved
    pub fn allocated(&self) -> impl Iterator<Item = &Card> + '_ {
        self.allocated.iter().map(|id| &self.cards[id.0])
    }

    /// Demanded cards no source could supply
    pub fn buylist(&self) -> impl Iterator<Item = &Card> + '_ {
        self.buylist.iter().map(|id| &self.cards[id.0])
    }

    /// Held cards no target needed
    pub fn ditchlist(&self) -> impl Iterator<Item = &Card> + '_ {
        self.ditchlist.iter().map(|id| &self.cards[id.0])
    }

    pub fn allocated_ids(&self) -> &[CardId] {
        &self.allocated
    }

    pub fn buylist_ids(&self) -> &[CardId] {
        &self.buylist
    }

    pub fn ditchlist_ids(&self) -> &[CardId] {
        &self.ditchlist
    }

    /// Number of movements the loop applied
    pub fn movements(&self) -> usize {
        self.movements
    }

    pub fn source_of(&self, card: &Card) -> Option<&Collection> {
        card.source.map(|key| &self.collections[key.0])
    }

    pub fn target_of(&self, card: &Card) -> Option<&Collection> {
        card.target.map(|key| &self.collections[key.0])
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
