//! Audit log of completed replacements, newest first.

use serde::{Deserialize, Serialize};

use crate::error::PriceResult;
use crate::store::{self, KeyValueStore};

const HISTORY_KEY: &str = "history";

/// Entries kept; older ones are dropped on insert.
pub const HISTORY_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub timestamp: String,
    pub source_url: String,
    pub old_price: String,
    pub new_price: String,
    pub match_count: usize,
    pub domain: String,
}

impl HistoryEntry {
    /// A new entry stamped with a fresh id and the current time.
    pub fn record(
        source_url: impl Into<String>,
        old_price: impl Into<String>,
        new_price: impl Into<String>,
        match_count: usize,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            source_url: source_url.into(),
            old_price: old_price.into(),
            new_price: new_price.into(),
            match_count,
            domain: domain.into(),
        }
    }
}

pub fn list(store: &dyn KeyValueStore) -> PriceResult<Vec<HistoryEntry>> {
    Ok(store::load(store, HISTORY_KEY)?.unwrap_or_default())
}

/// Prepend `entry`, keeping at most [`HISTORY_LIMIT`] entries.
pub fn add(store: &mut dyn KeyValueStore, entry: HistoryEntry) -> PriceResult<()> {
    let mut entries = list(store)?;
    entries.insert(0, entry);
    entries.truncate(HISTORY_LIMIT);
    store::save(store, HISTORY_KEY, &entries)
}

pub fn clear(store: &mut dyn KeyValueStore) -> PriceResult<()> {
    store::save(store, HISTORY_KEY, &Vec::<HistoryEntry>::new())
}
