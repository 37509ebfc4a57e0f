//! Error types for card_reshuffle

use thiserror::Error;

/// Failure reported by a [`CollectionFetcher`](crate::fetch::CollectionFetcher)
#[derive(Debug, Error)]
pub enum FetchError {
    /// Reading the backing source failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The backing source was not valid JSON
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// Collaborator-specific failure
    #[error("{0}")]
    Other(String),
}

/// Unified error type for reshuffle runs
#[derive(Debug, Error)]
pub enum ReshuffleError {
    /// Fetching a collection's contents failed before the run started
    #[error("Failed to fetch collection '{collection}': {source}")]
    Fetch {
        collection: String,
        #[source]
        source: FetchError,
    },

    /// The pool index claimed a unit that no card in the working set backs
    #[error(
        "Pool desync: index reports '{unique_id}' available in '{source_id}' for '{target_id}' but no matching card exists"
    )]
    PoolDesync {
        source_id: String,
        target_id: String,
        unique_id: String,
    },

    /// Card counts were not conserved across the allocation loop
    #[error(
        "Conservation violated: {initially_available} initially available != {available} available + {allocated} allocated, \
         or {initially_required} initially required != {required} required + {allocated} allocated"
    )]
    Conservation {
        initially_available: usize,
        available: usize,
        initially_required: usize,
        required: usize,
        allocated: usize,
    },

    /// Priority outside the supported 1..=5 range
    #[error("Invalid priority {0}: must be between 1 and 5")]
    InvalidPriority(u8),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialisation error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ReshuffleError {
    /// Whether this error indicates an engine defect rather than bad input
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            ReshuffleError::PoolDesync { .. } | ReshuffleError::Conservation { .. }
        )
    }
}

/// Failure of a single statistics lookup during enrichment
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Invalid deck count: {0}")]
    InvalidDeckCount(String),
    #[error("Lookup failed for '{name}': {reason}")]
    Lookup { name: String, reason: String },
}

/// Result alias for reshuffle operations
pub type Result<T> = std::result::Result<T, ReshuffleError>;
