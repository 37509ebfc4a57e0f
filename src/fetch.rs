//! Collaborator boundary for reading collection contents
//!
//! The engine never talks to a card catalog itself. A [`CollectionFetcher`]
//! is handed to [`ShuffleManager::new`](crate::engine::ShuffleManager::new)
//! and asked once per active collection.

use crate::card::{Board, CardRecord};
use crate::collection::Collection;
use crate::error::FetchError;
use std::collections::HashMap;
use std::path::Path;

/// Source of card listings for collections
pub trait CollectionFetcher {
    /// Return the listing for `collection`; fewer rows than expected is fine
    fn fetch(&self, collection: &Collection) -> Result<Vec<CardRecord>, FetchError>;
}

/// Whether a fetched row belongs in the run for this collection
pub fn include_record(collection: &Collection, record: &CardRecord) -> bool {
    record.board != Board::Sideboard || collection.include_sideboard
}

/// Fetcher backed by a pre-fetched snapshot keyed by collection id
#[derive(Debug, Clone, Default)]
pub struct SnapshotFetcher {
    listings: HashMap<String, Vec<CardRecord>>,
}

impl SnapshotFetcher {
    pub fn new(listings: HashMap<String, Vec<CardRecord>>) -> Self {
        Self { listings }
    }

    /// Load a snapshot file of `{ "<collection id>": [CardRecord, ...] }`
    pub fn from_path(path: &Path) -> Result<Self, FetchError> {
        let content = std::fs::read_to_string(path)?;
        let listings: HashMap<String, Vec<CardRecord>> = serde_json::from_str(&content)?;
        log::info!(
            "Loaded snapshot with {} collection listings from {}",
            listings.len(),
            path.display()
        );
        Ok(Self { listings })
    }

    pub fn insert(&mut self, collection_id: impl Into<String>, records: Vec<CardRecord>) {
        self.listings.insert(collection_id.into(), records);
    }
}

impl CollectionFetcher for SnapshotFetcher {
    fn fetch(&self, collection: &Collection) -> Result<Vec<CardRecord>, FetchError> {
        match self.listings.get(&collection.id) {
            Some(records) => Ok(records
                .iter()
                .filter(|record| include_record(collection, record))
                .cloned()
                .collect()),
            None => {
                log::warn!(
                    "No listing for collection '{}' ({}) in snapshot, treating as empty",
                    collection.name,
                    collection.id
                );
                Ok(Vec::new())
            }
        }
    }
}
