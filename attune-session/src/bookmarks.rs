//! Persisted bookmark set

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use attune_core::Article;

use crate::store::KeyValueStore;

/// Persistence key for the saved article ids
pub const SAVED_IDS_KEY: &str = "saved_article_ids";

/// Set of saved article identities, persisted across restarts
///
/// Lifecycle is independent of the recommendation session: saving an
/// article keeps its id even after the pool it came from is replaced.
pub struct BookmarkStore {
    store: Arc<dyn KeyValueStore>,
    ids: RwLock<HashSet<String>>,
}

impl BookmarkStore {
    /// Create a bookmark store, loading the persisted id set
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let ids: HashSet<String> = store
            .get(SAVED_IDS_KEY)
            .and_then(|value| serde_json::from_str::<Vec<String>>(&value).ok())
            .map(HashSet::from_iter)
            .unwrap_or_default();
        debug!(saved = ids.len(), "loaded bookmark set");
        Self {
            store,
            ids: RwLock::new(ids),
        }
    }

    /// Whether an article id is currently saved
    pub fn is_saved(&self, article_id: &str) -> bool {
        self.ids.read().contains(article_id)
    }

    /// Toggle an article's saved state; returns the new state
    pub fn toggle(&self, article: &Article) -> bool {
        let saved = {
            let mut ids = self.ids.write();
            if ids.remove(&article.id) {
                false
            } else {
                ids.insert(article.id.clone());
                true
            }
        };
        self.persist();
        saved
    }

    /// All saved ids, in no particular order
    pub fn saved_ids(&self) -> Vec<String> {
        self.ids.read().iter().cloned().collect()
    }

    fn persist(&self) {
        let ids: Vec<String> = self.saved_ids();
        match serde_json::to_string(&ids) {
            Ok(json) => self.store.set(SAVED_IDS_KEY, &json),
            Err(err) => warn!("failed to serialize bookmark set: {err}"),
        }
    }
}
