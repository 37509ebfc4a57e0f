//! Card records as delivered by a fetcher, and the physical units built from them

use serde::{Deserialize, Deserializer, Serialize};

/// Handle to a collection taking part in a run (index in active input order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CollectionKey(pub(crate) usize);

impl CollectionKey {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle to one physical card in the run's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CardId(pub(crate) usize);

impl CardId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Section of a deck a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Board {
    #[default]
    Mainboard,
    Sideboard,
    Commanders,
    Companions,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PriceField {
    Number(f64),
    Text(String),
}

/// Accepts `1.5`, `"1.5"`, `null` or a missing field; unparseable text is treated as absent
fn deserialize_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<PriceField> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(PriceField::Number(n)) => Some(n),
        Some(PriceField::Text(s)) => s.trim().parse::<f64>().ok(),
        None => None,
    })
}

fn default_quantity() -> u32 {
    1
}

/// One row of a collection listing: a printing and how many copies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    pub unique_id: String,
    pub name: String,
    #[serde(default)]
    pub type_line: String,
    #[serde(default)]
    pub color_identity: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_price")]
    pub price_usd: Option<f64>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub board: Board,
}

impl CardRecord {
    pub fn new(unique_id: impl Into<String>, name: impl Into<String>, quantity: u32) -> Self {
        Self {
            unique_id: unique_id.into(),
            name: name.into(),
            type_line: String::new(),
            color_identity: Vec::new(),
            price_usd: None,
            quantity,
            board: Board::default(),
        }
    }
}

/// A single physical card
///
/// Created with exactly one of `source`/`target` set. The allocation loop
/// sets `target` on held cards it moves.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub unique_id: String,
    pub name: String,
    pub type_line: String,
    pub color_identity: Vec<String>,
    pub price_usd: Option<f64>,
    pub source: Option<CollectionKey>,
    pub target: Option<CollectionKey>,
}

impl Card {
    fn from_record(record: &CardRecord) -> Self {
        Self {
            unique_id: record.unique_id.clone(),
            name: record.name.clone(),
            type_line: record.type_line.clone(),
            color_identity: record.color_identity.clone(),
            price_usd: record.price_usd,
            source: None,
            target: None,
        }
    }

    /// A unit held by a source collection
    pub fn held(record: &CardRecord, source: CollectionKey) -> Self {
        Self {
            source: Some(source),
            ..Self::from_record(record)
        }
    }

    /// A unit needed by a target collection
    pub fn demanded(record: &CardRecord, target: CollectionKey) -> Self {
        Self {
            target: Some(target),
            ..Self::from_record(record)
        }
    }
}
