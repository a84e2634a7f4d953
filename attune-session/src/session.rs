//! Recommendation session state machine
//!
//! One session owns the article pool fetched for the current preferences,
//! the persisted set of already-shown article ids, and the batch currently
//! on screen. Batches are drawn uniformly at random without replacement;
//! once every pool member has been shown the session is exhausted and keeps
//! serving empty batches until the next fetch.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use attune_core::{Article, PreferenceSet};
use attune_news::{build_request, filter_by_length, normalize, ArticleSearch};

use crate::store::KeyValueStore;

/// Persistence key for the shown article ids
pub const SHOWN_IDS_KEY: &str = "shown_recommendation_ids";
/// Persistence key for the batch-size preference
pub const QUANTITY_KEY: &str = "recommendation_quantity";

const DEFAULT_QUANTITY: usize = 4;
const MIN_QUANTITY: usize = 3;
const MAX_QUANTITY: usize = 5;

#[derive(Debug, Default)]
struct SessionState {
    /// Pool fetched for the current preferences; fixed until the next fetch
    pool: Vec<Article>,
    /// Identities already delivered from the current pool
    shown_ids: HashSet<String>,
    /// Batch currently on screen
    displayed: Vec<Article>,
    quantity: usize,
    is_loading: bool,
    error_message: Option<String>,
    exhausted: bool,
    no_results: bool,
}

/// Read-only view of the session state
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    /// Articles currently on screen
    pub displayed: Vec<Article>,
    /// Batch size
    pub quantity: usize,
    /// Size of the fetched pool
    pub pool_size: usize,
    /// How many pool members have been shown
    pub shown_count: usize,
    pub is_loading: bool,
    /// Every pool member has been shown at least once
    pub exhausted: bool,
    /// The last fetch produced too few articles to serve a batch
    pub no_results: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Stateful article recommendation session
///
/// Collaborators are injected: the search port, and the key-value store the
/// shown-set and quantity preference persist through. All operations take
/// `&self`; state lives behind a lock that is never held across an await,
/// and `fetch` publishes its new pool as a single state transition.
pub struct RecommendationSession {
    search: Arc<dyn ArticleSearch>,
    store: Arc<dyn KeyValueStore>,
    state: RwLock<SessionState>,
    rng: Mutex<StdRng>,
}

impl RecommendationSession {
    /// Create a session, restoring persisted state from the store
    pub fn new(search: Arc<dyn ArticleSearch>, store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_rng(search, store, StdRng::from_os_rng())
    }

    /// Create a session with a fixed RNG seed, for deterministic tests
    pub fn with_seed(
        search: Arc<dyn ArticleSearch>,
        store: Arc<dyn KeyValueStore>,
        seed: u64,
    ) -> Self {
        Self::with_rng(search, store, StdRng::seed_from_u64(seed))
    }

    fn with_rng(search: Arc<dyn ArticleSearch>, store: Arc<dyn KeyValueStore>, rng: StdRng) -> Self {
        let quantity = store
            .get(QUANTITY_KEY)
            .and_then(|value| serde_json::from_str::<usize>(&value).ok())
            .filter(|quantity| (MIN_QUANTITY..=MAX_QUANTITY).contains(quantity))
            .unwrap_or(DEFAULT_QUANTITY);

        // The persisted shown-set is only meaningful together with a live
        // pool; it is loaded here and discarded by the next fetch.
        let shown_ids: HashSet<String> = store
            .get(SHOWN_IDS_KEY)
            .and_then(|value| serde_json::from_str::<Vec<String>>(&value).ok())
            .map(HashSet::from_iter)
            .unwrap_or_default();
        debug!(
            quantity,
            shown = shown_ids.len(),
            "restored persisted session state"
        );

        Self {
            search,
            store,
            state: RwLock::new(SessionState {
                quantity,
                shown_ids,
                ..SessionState::default()
            }),
            rng: Mutex::new(rng),
        }
    }

    /// Fetch a fresh pool for the given preferences
    ///
    /// On success the pool and shown-set are replaced together and the
    /// first batch is drawn. On failure the previous pool, shown-set and
    /// batch stay untouched and the failure is stored as the user-facing
    /// error message.
    #[instrument(skip(self, preferences))]
    pub async fn fetch(&self, preferences: &PreferenceSet) {
        {
            let mut state = self.state.write();
            state.is_loading = true;
            state.error_message = None;
            state.exhausted = false;
            state.no_results = false;
        }

        let request = build_request(preferences);
        match self.search.search(&request).await {
            Err(err) => {
                warn!("article search failed: {err}");
                let mut state = self.state.write();
                state.is_loading = false;
                state.error_message = Some(err.user_message());
            }
            Ok(raw_results) => {
                let total = raw_results.len();
                let fallback_category = preferences.fallback_category();
                let normalized: Vec<Article> = raw_results
                    .into_iter()
                    .filter_map(|raw| normalize(raw, fallback_category))
                    .collect();
                let dropped = total - normalized.len();
                if dropped > 0 {
                    debug!(dropped, "dropped raw results without image or author");
                }
                let pool = filter_by_length(normalized, preferences.word_range().as_ref());
                info!(pool = pool.len(), total, "fetched article pool");

                let mut state = self.state.write();
                state.is_loading = false;
                state.pool = pool;
                state.shown_ids.clear();
                state.displayed.clear();
                if state.pool.len() <= state.quantity {
                    // Too few articles for even one full batch plus a
                    // follow-up: block display instead of serving a stub.
                    state.no_results = true;
                } else {
                    self.draw_batch(&mut state);
                }
                self.persist_shown(&state);
            }
        }
    }

    /// Replace the displayed batch with unseen articles from the pool
    ///
    /// Draws `min(quantity, unseen)` articles uniformly at random; a final
    /// short batch is served rather than padding with repeats. Once the
    /// pool is exhausted this is an idempotent empty batch.
    pub fn regenerate(&self) {
        let mut state = self.state.write();
        if state.exhausted {
            state.displayed.clear();
            return;
        }
        self.draw_batch(&mut state);
        self.persist_shown(&state);
    }

    /// Set the batch size; values outside [3, 5] are silently ignored
    ///
    /// Does not redraw the current batch.
    pub fn update_quantity(&self, quantity: usize) {
        if !(MIN_QUANTITY..=MAX_QUANTITY).contains(&quantity) {
            debug!(quantity, "ignoring out-of-range quantity");
            return;
        }
        self.state.write().quantity = quantity;
        match serde_json::to_string(&quantity) {
            Ok(json) => self.store.set(QUANTITY_KEY, &json),
            Err(err) => warn!("failed to serialize quantity: {err}"),
        }
    }

    /// Current state of the session
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read();
        SessionSnapshot {
            displayed: state.displayed.clone(),
            quantity: state.quantity,
            pool_size: state.pool.len(),
            shown_count: state.shown_ids.len(),
            is_loading: state.is_loading,
            exhausted: state.exhausted,
            no_results: state.no_results,
            error_message: state.error_message.clone(),
        }
    }

    fn draw_batch(&self, state: &mut SessionState) {
        let mut unseen: Vec<Article> = state
            .pool
            .iter()
            .filter(|article| !state.shown_ids.contains(&article.id))
            .cloned()
            .collect();

        if unseen.is_empty() {
            state.exhausted = true;
            state.displayed.clear();
            return;
        }

        let count = state.quantity.min(unseen.len());
        {
            let mut rng = self.rng.lock();
            unseen.shuffle(&mut *rng);
        }
        unseen.truncate(count);

        for article in &unseen {
            state.shown_ids.insert(article.id.clone());
        }
        state.displayed = unseen;

        // Exhaustion takes effect on the next draw; the batch just produced
        // is still shown.
        if state
            .pool
            .iter()
            .all(|article| state.shown_ids.contains(&article.id))
        {
            state.exhausted = true;
        }
    }

    fn persist_shown(&self, state: &SessionState) {
        let ids: Vec<&String> = state.shown_ids.iter().collect();
        match serde_json::to_string(&ids) {
            Ok(json) => self.store.set(SHOWN_IDS_KEY, &json),
            Err(err) => warn!("failed to serialize shown ids: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    use async_trait::async_trait;

    use crate::store::MemoryStore;
    use attune_core::{TimeBudget, Topic};
    use attune_news::{GetArticlesRequest, NewsError, RawArticle, RawAuthor};

    /// Canned search results, served in order
    struct FakeSearch {
        responses: Mutex<VecDeque<Result<Vec<RawArticle>, NewsError>>>,
    }

    impl FakeSearch {
        fn with(responses: Vec<Result<Vec<RawArticle>, NewsError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
            })
        }
    }

    #[async_trait]
    impl ArticleSearch for FakeSearch {
        async fn search(&self, _request: &GetArticlesRequest) -> Result<Vec<RawArticle>, NewsError> {
            self.responses
                .lock()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn raw_article(index: usize) -> RawArticle {
        let url = format!("https://news.example.com/story-{index}");
        RawArticle {
            uri: url.clone(),
            url: Some(url),
            title: Some(format!("Story {index}")),
            body: Some("A body with a handful of words in it for counting.".to_string()),
            authors: Some(vec![RawAuthor {
                name: Some("A. Writer".to_string()),
                uri: None,
            }]),
            image: Some("https://img.example.com/cover.jpg".to_string()),
            ..RawArticle::default()
        }
    }

    fn raws(count: usize) -> Vec<RawArticle> {
        (0..count).map(raw_article).collect()
    }

    fn session_with(
        responses: Vec<Result<Vec<RawArticle>, NewsError>>,
        store: Arc<dyn KeyValueStore>,
    ) -> RecommendationSession {
        RecommendationSession::with_seed(FakeSearch::with(responses), store, 7)
    }

    /// Put a pool in place directly, bypassing fetch
    fn install_pool(session: &RecommendationSession, count: usize) {
        let pool: Vec<Article> = raws(count)
            .into_iter()
            .filter_map(|raw| normalize(raw, None))
            .collect();
        let mut state = session.state.write();
        state.pool = pool;
        state.shown_ids.clear();
        state.displayed.clear();
        state.exhausted = false;
    }

    #[tokio::test]
    async fn test_fetch_draws_first_batch() {
        let session = session_with(vec![Ok(raws(7))], Arc::new(MemoryStore::new()));
        session.fetch(&PreferenceSet::default()).await;

        let snapshot = session.snapshot();
        assert_eq!(snapshot.pool_size, 7);
        assert_eq!(snapshot.displayed.len(), 4);
        assert_eq!(snapshot.shown_count, 4);
        assert!(!snapshot.is_loading);
        assert!(!snapshot.exhausted);
        assert_eq!(snapshot.error_message, None);
    }

    #[tokio::test]
    async fn test_pages_through_pool_without_repeats() {
        let session = session_with(vec![Ok(raws(7))], Arc::new(MemoryStore::new()));
        session.fetch(&PreferenceSet::default()).await;

        let first: HashSet<String> = session
            .snapshot()
            .displayed
            .iter()
            .map(|a| a.id.clone())
            .collect();
        assert_eq!(first.len(), 4);

        session.regenerate();
        let snapshot = session.snapshot();
        let second: HashSet<String> = snapshot.displayed.iter().map(|a| a.id.clone()).collect();
        assert_eq!(second.len(), 3, "short final batch");
        assert!(first.is_disjoint(&second));
        assert!(snapshot.exhausted, "pool drained by the second batch");

        session.regenerate();
        assert!(session.snapshot().displayed.is_empty());
    }

    #[tokio::test]
    async fn test_exhaustion_boundary_takes_effect_next_call() {
        let session = session_with(vec![], Arc::new(MemoryStore::new()));
        install_pool(&session, 4);

        session.regenerate();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.displayed.len(), 4, "all shown in one batch");
        assert!(snapshot.exhausted);

        session.regenerate();
        assert!(session.snapshot().displayed.is_empty());
    }

    #[tokio::test]
    async fn test_regenerate_after_exhaustion_is_idempotent() {
        let session = session_with(vec![], Arc::new(MemoryStore::new()));
        install_pool(&session, 4);
        session.regenerate();

        let shown_before = session.snapshot().shown_count;
        for _ in 0..3 {
            session.regenerate();
            let snapshot = session.snapshot();
            assert!(snapshot.displayed.is_empty());
            assert_eq!(snapshot.shown_count, shown_before);
        }
    }

    #[tokio::test]
    async fn test_small_pool_blocks_display() {
        // Pool of exactly `quantity` articles: blocked, not a partial serve.
        let session = session_with(vec![Ok(raws(4))], Arc::new(MemoryStore::new()));
        session.fetch(&PreferenceSet::default()).await;

        let snapshot = session.snapshot();
        assert!(snapshot.no_results);
        assert!(snapshot.displayed.is_empty());
        assert_eq!(snapshot.pool_size, 4);
    }

    #[tokio::test]
    async fn test_remote_error_keeps_previous_pool() {
        let session = session_with(
            vec![
                Ok(raws(7)),
                Err(NewsError::Api {
                    status: 429,
                    message: "API quota exceeded".to_string(),
                }),
            ],
            Arc::new(MemoryStore::new()),
        );
        session.fetch(&PreferenceSet::default()).await;
        let displayed_before = session.snapshot().displayed;

        session.fetch(&PreferenceSet::default()).await;
        let snapshot = session.snapshot();
        assert_eq!(snapshot.error_message.as_deref(), Some("API quota exceeded"));
        assert_eq!(snapshot.pool_size, 7, "failed fetch must not clear the pool");
        assert_eq!(
            snapshot
                .displayed
                .iter()
                .map(|a| a.id.clone())
                .collect::<Vec<_>>(),
            displayed_before
                .iter()
                .map(|a| a.id.clone())
                .collect::<Vec<_>>(),
            "failed fetch must not touch the batch"
        );
    }

    #[tokio::test]
    async fn test_fetch_clears_previous_error() {
        let session = session_with(
            vec![
                Err(NewsError::Transport("connection reset".to_string())),
                Ok(raws(7)),
            ],
            Arc::new(MemoryStore::new()),
        );
        session.fetch(&PreferenceSet::default()).await;
        assert!(session.snapshot().error_message.is_some());

        session.fetch(&PreferenceSet::default()).await;
        let snapshot = session.snapshot();
        assert_eq!(snapshot.error_message, None);
        assert_eq!(snapshot.pool_size, 7);
    }

    #[tokio::test]
    async fn test_normalizer_and_length_filter_shape_the_pool() {
        let mut results = raws(7);
        results[0].image = None; // dropped by the normalizer
        results.push(RawArticle {
            body: Some(vec!["word"; 5000].join(" ")),
            ..raw_article(7)
        });
        let session = session_with(vec![Ok(results)], Arc::new(MemoryStore::new()));

        let preferences = PreferenceSet {
            time_budget: Some(TimeBudget::Quick),
            ..PreferenceSet::default()
        };
        session.fetch(&preferences).await;

        // 8 raw results, one without an image, one over the word limit
        assert_eq!(session.snapshot().pool_size, 6);
    }

    #[tokio::test]
    async fn test_fallback_category_flows_from_preferences() {
        let session = session_with(vec![Ok(raws(7))], Arc::new(MemoryStore::new()));
        let preferences = PreferenceSet {
            topics: vec![Topic::Health],
            ..PreferenceSet::default()
        };
        session.fetch(&preferences).await;

        let snapshot = session.snapshot();
        assert!(snapshot
            .displayed
            .iter()
            .all(|article| article.category.as_deref() == Some("Health")));
    }

    #[tokio::test]
    async fn test_shown_ids_round_trip_across_restart() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        {
            let session = session_with(vec![Ok(raws(7))], Arc::clone(&store));
            session.fetch(&PreferenceSet::default()).await;
        }

        let persisted: Vec<String> =
            serde_json::from_str(&store.get(SHOWN_IDS_KEY).unwrap()).unwrap();
        let persisted: HashSet<String> = persisted.into_iter().collect();
        assert_eq!(persisted.len(), 4);

        // A fresh process loads the set, but it stays inert until a fetch
        // replaces the pool.
        let reloaded = session_with(vec![Ok(raws(7))], Arc::clone(&store));
        assert_eq!(reloaded.snapshot().shown_count, 4);
        assert_eq!(reloaded.snapshot().pool_size, 0);

        reloaded.fetch(&PreferenceSet::default()).await;
        let snapshot = reloaded.snapshot();
        assert_eq!(snapshot.pool_size, 7);
        assert_eq!(snapshot.shown_count, 4, "cleared, then one batch drawn");
    }

    #[tokio::test]
    async fn test_quantity_bounds_and_persistence() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let session = session_with(vec![], Arc::clone(&store));

        session.update_quantity(10);
        assert_eq!(session.snapshot().quantity, DEFAULT_QUANTITY);
        assert_eq!(store.get(QUANTITY_KEY), None);

        session.update_quantity(2);
        assert_eq!(session.snapshot().quantity, DEFAULT_QUANTITY);

        session.update_quantity(5);
        assert_eq!(session.snapshot().quantity, 5);
        assert_eq!(store.get(QUANTITY_KEY).as_deref(), Some("5"));
    }

    #[tokio::test]
    async fn test_quantity_restored_and_validated_on_load() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        store.set(QUANTITY_KEY, "5");
        let session = session_with(vec![], Arc::clone(&store));
        assert_eq!(session.snapshot().quantity, 5);

        store.set(QUANTITY_KEY, "9");
        let out_of_range = session_with(vec![], Arc::clone(&store));
        assert_eq!(out_of_range.snapshot().quantity, DEFAULT_QUANTITY);
    }

    #[tokio::test]
    async fn test_same_seed_same_draw() {
        let first = session_with(vec![Ok(raws(10))], Arc::new(MemoryStore::new()));
        let second = session_with(vec![Ok(raws(10))], Arc::new(MemoryStore::new()));
        first.fetch(&PreferenceSet::default()).await;
        second.fetch(&PreferenceSet::default()).await;

        let ids = |session: &RecommendationSession| {
            session
                .snapshot()
                .displayed
                .iter()
                .map(|a| a.id.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(&first), ids(&second));
    }
}
