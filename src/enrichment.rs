//! Decorates report rows with deck inclusion statistics
//!
//! Lookups run concurrently behind a semaphore, one per distinct card name.
//! A failed lookup only leaves that name's statistics empty.

use crate::error::StatsError;
use crate::report::Report;
use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Max outstanding lookups unless configured otherwise
pub const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 10;

/// How often a card shows up in decks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InclusionStats {
    pub inclusion_percentage: f64,
    pub num_decks: u64,
    pub total_decks: u64,
}

/// Source of per-card statistics
#[async_trait]
pub trait CardStatsProvider: Send + Sync {
    /// Statistics for `name`, or `None` when the provider has nothing for it
    async fn inclusion(&self, name: &str) -> Result<Option<InclusionStats>, StatsError>;
}

/// Parse deck counts like "6.45M", "170K" or "1234"
pub fn parse_deck_count(deck_str: &str) -> Result<u64, StatsError> {
    let trimmed = deck_str.trim();
    let invalid = || StatsError::InvalidDeckCount(deck_str.to_string());

    let (number, multiplier) = if let Some(n) = trimmed.strip_suffix(['M', 'm']) {
        (n, 1_000_000.0)
    } else if let Some(n) = trimmed.strip_suffix(['K', 'k']) {
        (n, 1_000.0)
    } else {
        return trimmed.parse::<u64>().map_err(|_| invalid());
    };

    let value: f64 = number.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid());
    }
    Ok((value * multiplier).round() as u64)
}

/// Name to look up: the front face of double-faced cards
pub fn lookup_name(name: &str) -> &str {
    name.split(" // ").next().unwrap_or(name).trim()
}

/// Fill `inclusion` on every row, issuing one lookup per distinct name
///
/// At most `max_concurrent` lookups are outstanding at once. Returns the
/// number of names that resolved to statistics.
pub async fn enrich_report<P>(report: &mut Report, provider: &P, max_concurrent: usize) -> usize
where
    P: CardStatsProvider + ?Sized,
{
    let mut names: Vec<String> = report.rows.iter().map(|row| row.name.clone()).collect();
    names.sort();
    names.dedup();

    log::info!(
        "Looking up statistics for {} distinct cards ({} rows)",
        names.len(),
        report.len()
    );

    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let lookups = names.into_iter().map(|name| {
        let semaphore = Arc::clone(&semaphore);
        async move {
            let Ok(_permit) = semaphore.acquire().await else {
                return (name, None);
            };
            let stats = match provider.inclusion(lookup_name(&name)).await {
                Ok(stats) => stats,
                Err(e) => {
                    log::warn!("Statistics lookup failed for '{}': {}. Continuing...", name, e);
                    None
                }
            };
            (name, stats)
        }
    });

    let cache: HashMap<String, Option<InclusionStats>> = join_all(lookups).await.into_iter().collect();
    let resolved = cache.values().filter(|stats| stats.is_some()).count();

    for row in &mut report.rows {
        row.inclusion = cache.get(&row.name).cloned().flatten();
    }

    log::info!("Resolved statistics for {} of {} cards", resolved, cache.len());
    resolved
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum DeckCount {
    Number(u64),
    Text(String),
}

impl DeckCount {
    fn value(&self) -> Result<u64, StatsError> {
        match self {
            DeckCount::Number(n) => Ok(*n),
            DeckCount::Text(s) => parse_deck_count(s),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct StoredStats {
    inclusion_percentage: f64,
    num_decks: DeckCount,
    total_decks: DeckCount,
}

/// Provider backed by a JSON file of statistics keyed by card name
#[derive(Debug, Default)]
pub struct StaticStatsProvider {
    stats: HashMap<String, StoredStats>,
}

impl StaticStatsProvider {
    pub fn from_path(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let stats: HashMap<String, StoredStats> = serde_json::from_str(&content)?;
        log::info!(
            "Loaded statistics for {} cards from {}",
            stats.len(),
            path.display()
        );
        Ok(Self { stats })
    }
}

#[async_trait]
impl CardStatsProvider for StaticStatsProvider {
    async fn inclusion(&self, name: &str) -> Result<Option<InclusionStats>, StatsError> {
        let Some(stored) = self.stats.get(name) else {
            return Ok(None);
        };
        Ok(Some(InclusionStats {
            inclusion_percentage: stored.inclusion_percentage,
            num_decks: stored.num_decks.value()?,
            total_decks: stored.total_decks.value()?,
        }))
    }
}

#[cfg(test)]
#[path = "enrichment_tests.rs"]
mod tests;
