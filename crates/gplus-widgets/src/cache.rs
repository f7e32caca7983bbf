//! Rendered-widget cache with per-entry TTL

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone)]
struct CacheEntry {
    html: String,
    ttl_secs: u64,
    stored_at: DateTime<Utc>,
}

/// In-memory cache for rendered widget HTML.
///
/// Entries are keyed per widget type and overwritten whole, never
/// partially updated. A TTL of 0 stores the entry but expires it
/// immediately, which callers use to bypass caching.
#[derive(Clone, Default)]
pub struct WidgetCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl WidgetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a cached value if it is still inside its TTL window.
    pub async fn get(&self, key: &str) -> Option<String> {
        let entry = {
            let entries = self.entries.read().await;
            entries.get(key).cloned()
        };

        let entry = entry?;
        let age_secs = (Utc::now() - entry.stored_at).num_seconds();
        if age_secs >= entry.ttl_secs as i64 {
            debug!(key, age_secs, ttl_secs = entry.ttl_secs, "Cache entry expired");
            let mut entries = self.entries.write().await;
            entries.remove(key);
            return None;
        }

        debug!(key, "Cache hit");
        Some(entry.html)
    }

    /// Store a value, overwriting any previous entry for the key.
    pub async fn set(&self, key: &str, html: String, ttl_secs: u64) {
        debug!(key, ttl_secs, size = html.len(), "Caching rendered widget");
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            CacheEntry {
                html,
                ttl_secs,
                stored_at: Utc::now(),
            },
        );
    }

    /// Number of stored entries, including any not yet expired-on-read.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// TTL the entry was stored with, for assertions on caching policy.
    #[cfg(test)]
    pub(crate) async fn stored_ttl(&self, key: &str) -> Option<u64> {
        self.entries.read().await.get(key).map(|e| e.ttl_secs)
    }
}
