//! Flattens a finished allocation into classified report rows

use crate::card::Card;
use crate::engine::Allocation;
use crate::enrichment::InclusionStats;
use serde::Serialize;

/// What happens to a card once the reshuffle is carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    /// Moves from a source into a target
    Reshuffled,
    /// Held by a source, wanted by nobody
    Ditched,
    /// Needed by a target, held by nobody
    Buylist,
}

impl CardStatus {
    /// Classify by which owners are set; `None` for a card with neither
    pub fn classify(has_source: bool, has_target: bool) -> Option<Self> {
        match (has_source, has_target) {
            (true, true) => Some(CardStatus::Reshuffled),
            (true, false) => Some(CardStatus::Ditched),
            (false, true) => Some(CardStatus::Buylist),
            (false, false) => None,
        }
    }
}

/// One physical card in the final report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub unique_id: String,
    pub name: String,
    pub type_line: String,
    pub color_identity: Vec<String>,
    pub price_usd: Option<f64>,
    /// Name of the collection the card comes from
    pub source: Option<String>,
    /// Name of the collection the card goes to
    pub target: Option<String>,
    pub inclusion: Option<InclusionStats>,
}

impl ReportRow {
    fn from_card(allocation: &Allocation, card: &Card) -> Self {
        Self {
            unique_id: card.unique_id.clone(),
            name: card.name.clone(),
            type_line: card.type_line.clone(),
            color_identity: card.color_identity.clone(),
            price_usd: card.price_usd,
            source: allocation.source_of(card).map(|c| c.name.clone()),
            target: allocation.target_of(card).map(|c| c.name.clone()),
            inclusion: None,
        }
    }

    pub fn reshuffled(&self) -> bool {
        self.source.is_some() && self.target.is_some()
    }

    pub fn ditched(&self) -> bool {
        self.source.is_some() && self.target.is_none()
    }

    pub fn buylist(&self) -> bool {
        self.source.is_none() && self.target.is_some()
    }

    pub fn status(&self) -> Option<CardStatus> {
        CardStatus::classify(self.source.is_some(), self.target.is_some())
    }
}

/// Totals over a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ReportSummary {
    pub reshuffled: usize,
    pub buylist: usize,
    pub ditched: usize,
    /// Sum of known USD prices over buylist cards
    pub buylist_usd: f64,
}

/// Every card of a run, sorted by name then unique id
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    pub rows: Vec<ReportRow>,
}

impl Report {
    /// Merge the allocated, buylist and ditchlist cards into one sorted list
    pub fn assemble(allocation: &Allocation) -> Self {
        let mut rows: Vec<ReportRow> = allocation
            .allocated()
            .chain(allocation.buylist())
            .chain(allocation.ditchlist())
            .map(|card| ReportRow::from_card(allocation, card))
            .collect();
        rows.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.unique_id.cmp(&b.unique_id))
        });
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn summary(&self) -> ReportSummary {
        self.rows
            .iter()
            .fold(ReportSummary::default(), |mut summary, row| {
                match row.status() {
                    Some(CardStatus::Reshuffled) => summary.reshuffled += 1,
                    Some(CardStatus::Ditched) => summary.ditched += 1,
                    Some(CardStatus::Buylist) => {
                        summary.buylist += 1;
                        summary.buylist_usd += row.price_usd.unwrap_or(0.0);
                    }
                    None => {}
                }
                summary
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardRecord;
    use crate::collection::{Collection, Role};
    use crate::engine::ShuffleManager;

    fn record(id: &str, name: &str, price: Option<f64>) -> CardRecord {
        CardRecord {
            price_usd: price,
            ..CardRecord::new(id, name, 1)
        }
    }

    fn sample_report() -> Report {
        let allocation = ShuffleManager::from_listings(vec![
            (
                Collection::new("binder", "Trade Binder", Role::Source),
                vec![
                    record("sol-2", "Sol Ring", Some(1.0)),
                    record("bolt", "Lightning Bolt", Some(0.5)),
                ],
            ),
            (
                Collection::new("deck", "Atraxa", Role::Target),
                vec![
                    record("sol-2", "Sol Ring", Some(1.0)),
                    record("sol-1", "Sol Ring", Some(2.0)),
                    record("cradle", "Gaea's Cradle", None),
                ],
            ),
        ])
        .reshuffle()
        .unwrap();
        Report::assemble(&allocation)
    }

    #[test]
    fn classify_covers_all_combinations() {
        assert_eq!(CardStatus::classify(true, true), Some(CardStatus::Reshuffled));
        assert_eq!(CardStatus::classify(true, false), Some(CardStatus::Ditched));
        assert_eq!(CardStatus::classify(false, true), Some(CardStatus::Buylist));
        assert_eq!(CardStatus::classify(false, false), None);
    }

    #[test]
    fn rows_sorted_by_name_then_unique_id() {
        let report = sample_report();
        let keys: Vec<(&str, &str)> = report
            .rows
            .iter()
            .map(|r| (r.name.as_str(), r.unique_id.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("Gaea's Cradle", "cradle"),
                ("Lightning Bolt", "bolt"),
                ("Sol Ring", "sol-1"),
                ("Sol Ring", "sol-2"),
            ]
        );
    }

    #[test]
    fn rows_carry_collection_names_and_flags() {
        let report = sample_report();
        let sol = report.rows.iter().find(|r| r.unique_id == "sol-2").unwrap();
        assert_eq!(sol.source.as_deref(), Some("Trade Binder"));
        assert_eq!(sol.target.as_deref(), Some("Atraxa"));
        assert!(sol.reshuffled());
        assert!(!sol.ditched());
        assert!(!sol.buylist());

        let bolt = report.rows.iter().find(|r| r.unique_id == "bolt").unwrap();
        assert!(bolt.ditched());

        let cradle = report.rows.iter().find(|r| r.unique_id == "cradle").unwrap();
        assert!(cradle.buylist());
        assert_eq!(cradle.price_usd, None);
    }

    #[test]
    fn summary_counts_and_prices_buylist() {
        let summary = sample_report().summary();
        assert_eq!(summary.reshuffled, 1);
        assert_eq!(summary.ditched, 1);
        assert_eq!(summary.buylist, 2);
        assert!((summary.buylist_usd - 2.0).abs() < f64::EPSILON);
    }
}
