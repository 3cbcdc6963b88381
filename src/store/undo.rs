//! Single-level undo: one snapshot slot per tab, last write wins.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::PriceResult;
use crate::store::{self, KeyValueStore};

const UNDO_KEY: &str = "undoSnapshots";

/// Content of a source as it was just before the last apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UndoSnapshot {
    pub tab_id: String,
    pub content: String,
    pub timestamp: String,
    pub url: String,
}

impl UndoSnapshot {
    pub fn capture(tab_id: impl Into<String>, content: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            tab_id: tab_id.into(),
            content: content.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            url: url.into(),
        }
    }
}

fn slots(store: &dyn KeyValueStore) -> PriceResult<BTreeMap<String, UndoSnapshot>> {
    Ok(store::load(store, UNDO_KEY)?.unwrap_or_default())
}

/// Store `snapshot`, overwriting whatever its tab held.
pub fn save(store: &mut dyn KeyValueStore, snapshot: UndoSnapshot) -> PriceResult<()> {
    let mut all = slots(store)?;
    all.insert(snapshot.tab_id.clone(), snapshot);
    store::save(store, UNDO_KEY, &all)
}

pub fn get(store: &dyn KeyValueStore, tab_id: &str) -> PriceResult<Option<UndoSnapshot>> {
    Ok(slots(store)?.remove(tab_id))
}

pub fn clear(store: &mut dyn KeyValueStore, tab_id: &str) -> PriceResult<()> {
    let mut all = slots(store)?;
    if all.remove(tab_id).is_some() {
        store::save(store, UNDO_KEY, &all)?;
    }
    Ok(())
}
