//! Bounded, persisted log of past exchanges, newest first.

use serde::{Deserialize, Serialize};

use crate::storage::Storage;

/// Maximum number of exchanges kept.
pub const MAX_HISTORY: usize = 25;

/// Citation attached to an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub url: String,
}

/// One completed question/answer pair. Older logs used the short keys
/// `q`, `a`, `s`, `bucket` and `ts`; those still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    #[serde(alias = "q")]
    pub question: String,
    #[serde(alias = "a")]
    pub answer: String,
    #[serde(default, alias = "s")]
    pub sources: Vec<Source>,
    #[serde(default, alias = "bucket")]
    pub category: Option<String>,
    /// Milliseconds since the Unix epoch; doubles as the entry id.
    #[serde(alias = "ts")]
    pub timestamp: i64,
}

/// History log plus the slot it is persisted to.
pub struct HistoryStore {
    storage: Box<dyn Storage>,
    entries: Vec<Exchange>,
}

impl std::fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl HistoryStore {
    /// Load the persisted log. Missing or unreadable data yields an empty log.
    pub fn load(storage: Box<dyn Storage>) -> Self {
        let entries = read_entries(storage.as_ref());
        Self { storage, entries }
    }

    pub fn entries(&self) -> &[Exchange] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Prepend, truncate to [`MAX_HISTORY`], persist. Persistence is best effort.
    pub fn append(&mut self, exchange: Exchange) {
        self.entries.insert(0, exchange);
        self.entries.truncate(MAX_HISTORY);
        self.persist();
    }

    /// Drop the persisted log and empty the in-memory one.
    pub fn clear(&mut self) -> &[Exchange] {
        self.entries.clear();
        if let Err(e) = self.storage.clear() {
            tracing::warn!(error = %e, "failed to clear persisted history");
        }
        &self.entries
    }

    pub fn find_by_timestamp(&self, timestamp: i64) -> Option<&Exchange> {
        self.entries.iter().find(|e| e.timestamp == timestamp)
    }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.entries) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize history");
                return;
            }
        };
        if let Err(e) = self.storage.write(&json) {
            tracing::warn!(error = %e, "failed to persist history");
        }
    }
}

fn read_entries(storage: &dyn Storage) -> Vec<Exchange> {
    let raw = match storage.read() {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read history");
            return Vec::new();
        }
    };
    match serde_json::from_str::<Vec<Exchange>>(&raw) {
        Ok(mut entries) => {
            entries.truncate(MAX_HISTORY);
            entries
        }
        Err(e) => {
            tracing::warn!(error = %e, "discarding corrupt history");
            Vec::new()
        }
    }
}
