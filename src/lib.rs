//! Card Reshuffle - MTG collection reallocation
//!
//! Moves cards held in source collections (binders, retired decks) into the
//! target decks that need them, serving higher-priority collections first.
//! Whatever targets still need ends up on a buylist; whatever sources still
//! hold ends up on a ditchlist.

pub mod card;
pub mod collection;
pub mod engine;
pub mod enrichment;
pub mod error;
pub mod fetch;
pub mod pool;
pub mod render;
pub mod report;
pub mod selector;

pub use card::{Board, Card, CardId, CardRecord, CollectionKey};
pub use collection::{Collection, CollectionKind, Priority, Role};
pub use engine::{Allocation, ShuffleManager};
pub use enrichment::{enrich_report, CardStatsProvider, InclusionStats, StaticStatsProvider};
pub use error::{FetchError, ReshuffleError, Result, StatsError};
pub use fetch::{CollectionFetcher, SnapshotFetcher};
pub use render::{render, OutputFormat};
pub use report::{CardStatus, Report, ReportRow, ReportSummary};
pub use selector::{find_optimal_movement, Movement};
