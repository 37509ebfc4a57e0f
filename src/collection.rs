//! Collections: named inventories that either supply or demand cards

use crate::error::ReshuffleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a collection gives cards away or needs them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Source,
    Target,
}

/// Where a collection's contents live upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    #[default]
    Deck,
    Binder,
}

/// Allocation priority, 1 (lowest) to 5 (highest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const MIN: Priority = Priority(1);
    pub const MAX: Priority = Priority(5);

    pub fn new(value: u8) -> Result<Self, ReshuffleError> {
        if (Self::MIN.0..=Self::MAX.0).contains(&value) {
            Ok(Priority(value))
        } else {
            Err(ReshuffleError::InvalidPriority(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority(3)
    }
}

impl TryFrom<u8> for Priority {
    type Error = ReshuffleError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Priority::new(value)
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn default_active() -> bool {
    true
}

/// A named inventory taking part in a reshuffle
///
/// Equality and hashing only consider `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub priority: Priority,
    /// Inactive collections are skipped entirely
    #[serde(default = "default_active")]
    pub active: bool,
    /// Only affects what a fetcher returns for decks
    #[serde(default)]
    pub include_sideboard: bool,
    #[serde(default)]
    pub kind: CollectionKind,
    #[serde(default)]
    pub url: Option<String>,
}

impl Collection {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
            priority: Priority::default(),
            active: true,
            include_sideboard: false,
            kind: CollectionKind::default(),
            url: None,
        }
    }

    /// Build a collection from a deck or binder URL
    ///
    /// The id is the last non-empty path segment; `/decks/` URLs are decks,
    /// everything else is treated as a binder.
    pub fn from_url(name: impl Into<String>, url: &str, role: Role) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let id = path
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or(path)
            .to_string();
        let kind = if path.contains("/decks/") {
            CollectionKind::Deck
        } else {
            CollectionKind::Binder
        };

        Self {
            kind,
            url: Some(url.to_string()),
            ..Self::new(id, name, role)
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_sideboard(mut self, include_sideboard: bool) -> Self {
        self.include_sideboard = include_sideboard;
        self
    }

    pub fn is_source(&self) -> bool {
        self.role == Role::Source
    }

    pub fn is_target(&self) -> bool {
        self.role == Role::Target
    }
}

impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Collection {}

impl std::hash::Hash for Collection {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
