use crate::store::{recent_key, KeyValueStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_RECENT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentEntry {
    pub id: String,
    pub issue: String,
    pub viewed_at: DateTime<Utc>,
}

/// Put `entry` at the front, dropping any older entry with the same id and
/// anything past `MAX_RECENT`.
pub fn push_recent(entries: &[RecentEntry], entry: RecentEntry) -> Vec<RecentEntry> {
    let mut out = Vec::with_capacity(MAX_RECENT);
    out.push(entry);
    for e in entries {
        if out.len() == MAX_RECENT {
            break;
        }
        if !out.iter().any(|o| o.id == e.id) {
            out.push(e.clone());
        }
    }
    out
}

/// Most-recent-first history of viewed items.
#[derive(Debug, Clone)]
pub struct RecentlyViewed {
    key: String,
    entries: Vec<RecentEntry>,
}

impl RecentlyViewed {
    /// Read the history from `store`. Missing, unreadable or malformed data
    /// gives an empty history.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S, namespace: &str) -> Self {
        let key = recent_key(namespace);
        let entries = match store.get(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<RecentEntry>>(&raw) {
                Ok(stored) => sanitize(stored),
                Err(e) => {
                    tracing::debug!(key = %key, error = %e, "ignoring malformed recent list");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::debug!(key = %key, error = %e, "recent list read failed");
                Vec::new()
            }
        };
        Self { key, entries }
    }

    pub fn entries(&self) -> &[RecentEntry] {
        &self.entries
    }

    pub fn record<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &mut S,
        id: &str,
        issue: &str,
        viewed_at: DateTime<Utc>,
    ) {
        let entry = RecentEntry {
            id: id.to_string(),
            issue: issue.to_string(),
            viewed_at,
        };
        self.entries = push_recent(&self.entries, entry);
        self.persist(store);
    }

    pub fn clear<S: KeyValueStore + ?Sized>(&mut self, store: &mut S) {
        self.entries.clear();
        if let Err(e) = store.remove(&self.key) {
            tracing::debug!(key = %self.key, error = %e, "recent list clear failed");
        }
    }

    fn persist<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        let result = serde_json::to_string(&self.entries)
            .map_err(crate::store::StoreError::from)
            .and_then(|data| store.set(&self.key, data));
        if let Err(e) = result {
            tracing::debug!(key = %self.key, error = %e, "recent list write failed");
        }
    }
}

fn sanitize(stored: Vec<RecentEntry>) -> Vec<RecentEntry> {
    let mut out: Vec<RecentEntry> = Vec::new();
    for e in stored {
        if out.len() == MAX_RECENT {
            break;
        }
        if !e.id.is_empty() && !out.iter().any(|o| o.id == e.id) {
            out.push(e);
        }
    }
    out
}
