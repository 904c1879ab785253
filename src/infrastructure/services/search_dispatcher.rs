//! Debounced, cached, latest-wins search dispatch

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{oneshot, watch};
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use crate::domain::cache::{fold_query, normalize, CacheConfig, ResultCache, SearchKey};
use crate::domain::search::{FilterSet, ResultSet, SearchError, SearchProvider};
use crate::domain::DomainError;
use crate::infrastructure::cache::InMemoryResultCache;
use crate::infrastructure::debounce::{DebounceConfig, Debouncer};
use crate::infrastructure::observability::{record_cache_lookup, record_provider_request};

/// Fencing token identifying one `search` call of one dispatcher
pub type Generation = u64;

/// Configuration for a search dispatcher
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DispatcherConfig {
    #[serde(default)]
    pub debounce: DebounceConfig,
    /// Upper bound on a single provider call; unbounded when absent
    #[serde(default)]
    pub provider_timeout_ms: Option<u64>,
}

impl DispatcherConfig {
    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.debounce = DebounceConfig::new(delay);
        self
    }

    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn provider_timeout(&self) -> Option<Duration> {
        self.provider_timeout_ms.map(Duration::from_millis)
    }
}

/// Where a resolved result set came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSource {
    Cache,
    Provider,
    /// Blank query without filters; the provider was not consulted
    Skipped,
}

/// A completed search, tagged with the generation that issued it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub generation: Generation,
    pub key: SearchKey,
    pub source: ResultSource,
    pub result: Result<ResultSet, SearchError>,
}

/// What a [`PendingSearch`] resolves to
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Completed(SearchOutcome),
    /// The work never ran: coalesced by a later search, cancelled, or stale
    /// by the time the debounce timer fired
    Superseded { generation: Generation },
}

impl Resolution {
    pub fn generation(&self) -> Generation {
        match self {
            Resolution::Completed(outcome) => outcome.generation,
            Resolution::Superseded { generation } => *generation,
        }
    }

    pub fn into_outcome(self) -> Option<SearchOutcome> {
        match self {
            Resolution::Completed(outcome) => Some(outcome),
            Resolution::Superseded { .. } => None,
        }
    }
}

/// Lifecycle of the dispatcher's current search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SearchPhase {
    #[default]
    Idle,
    Scheduled { generation: Generation },
    InFlight { generation: Generation },
}

/// Handle to a search issued by [`SearchDispatcher::search`].
///
/// The generation is assigned when the search is issued, not when this future
/// is first polled.
#[derive(Debug)]
pub struct PendingSearch {
    generation: Generation,
    receiver: oneshot::Receiver<SearchOutcome>,
}

impl PendingSearch {
    pub fn generation(&self) -> Generation {
        self.generation
    }
}

impl Future for PendingSearch {
    type Output = Resolution;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let generation = self.generation;

        Pin::new(&mut self.receiver).poll(cx).map(|received| match received {
            Ok(outcome) => Resolution::Completed(outcome),
            Err(_) => Resolution::Superseded { generation },
        })
    }
}

#[derive(Debug)]
struct Shared {
    provider: Arc<dyn SearchProvider>,
    cache: Arc<dyn ResultCache>,
    generation: AtomicU64,
    // Generation advances happen under this channel's lock, so the phase
    // always describes the current generation.
    phase: watch::Sender<SearchPhase>,
    provider_timeout: Option<Duration>,
}

impl Shared {
    fn current(&self) -> Generation {
        self.generation.load(Ordering::SeqCst)
    }

    fn advance(&self, next: impl FnOnce(Generation) -> SearchPhase) -> Generation {
        let mut generation = 0;

        self.phase.send_modify(|phase| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *phase = next(generation);
        });

        generation
    }

    /// Moves the phase forward only while `generation` is still current
    fn transition(&self, generation: Generation, next: SearchPhase) -> bool {
        self.phase.send_if_modified(|phase| {
            if self.current() != generation || *phase == next {
                return false;
            }

            *phase = next;
            true
        })
    }

    async fn execute(
        &self,
        generation: Generation,
        query: String,
        filters: FilterSet,
    ) -> SearchOutcome {
        let key = normalize(&query, &filters);

        if let Some(results) = self.cache.get(&key) {
            record_cache_lookup(true);
            debug!(generation, key = %key, hits = results.len(), "Search cache hit");

            return SearchOutcome {
                generation,
                key,
                source: ResultSource::Cache,
                result: Ok(results),
            };
        }

        record_cache_lookup(false);

        let provider_name = self.provider.provider_name();
        debug!(generation, key = %key, provider = provider_name, "Search cache miss, querying provider");

        let started = Instant::now();
        let request = self.provider.provide(&query, &filters);

        let result = match self.provider_timeout {
            Some(timeout) => match tokio::time::timeout(timeout, request).await {
                Ok(response) => response.map_err(|e| SearchError::from_domain(provider_name, e)),
                Err(_) => Err(SearchError::timed_out(
                    provider_name,
                    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                )),
            },
            None => request
                .await
                .map_err(|e| SearchError::from_domain(provider_name, e)),
        };

        record_provider_request(provider_name, result.is_ok(), started.elapsed());

        match &result {
            Ok(results) => {
                self.cache.set(key.clone(), results.clone());
                debug!(generation, key = %key, hits = results.len(), "Search provider answered");
            }
            Err(error) => {
                warn!(generation, key = %key, error = %error, "Search provider failed");
            }
        }

        SearchOutcome {
            generation,
            key,
            source: ResultSource::Provider,
            result,
        }
    }
}

/// Orchestrates normalization, caching, debouncing and the search provider.
///
/// Every [`SearchDispatcher::search`] advances the generation. Resolutions keep
/// the generation they were issued with, so a consumer can drop any resolution
/// that is no longer [`SearchDispatcher::is_current`], whatever order
/// responses arrive in.
///
/// The cache is owned by this dispatcher unless one is injected on purpose to
/// share results between search scopes; the generation counter is never shared.
#[derive(Debug)]
pub struct SearchDispatcher {
    shared: Arc<Shared>,
    debouncer: Debouncer,
    // Held across each generation advance and the debouncer call that goes
    // with it, so concurrent callers cannot reorder the two.
    dispatch: Mutex<()>,
}

impl SearchDispatcher {
    pub fn new(
        provider: Arc<dyn SearchProvider>,
        cache: Arc<dyn ResultCache>,
        config: &DispatcherConfig,
    ) -> Self {
        let (phase, _) = watch::channel(SearchPhase::Idle);

        Self {
            shared: Arc::new(Shared {
                provider,
                cache,
                generation: AtomicU64::new(0),
                phase,
                provider_timeout: config.provider_timeout(),
            }),
            debouncer: Debouncer::new(&config.debounce),
            dispatch: Mutex::new(()),
        }
    }

    /// Creates a dispatcher with its own, freshly built cache
    pub fn with_cache_config(
        provider: Arc<dyn SearchProvider>,
        cache_config: CacheConfig,
        config: &DispatcherConfig,
    ) -> Result<Self, DomainError> {
        let cache = InMemoryResultCache::new(cache_config)?;
        Ok(Self::new(provider, Arc::new(cache), config))
    }

    /// Issues a search; the returned future resolves once the debounced work
    /// has run or has been superseded.
    ///
    /// A blank query without filters short-circuits: pending work is cancelled
    /// and the search resolves at once with an empty result set.
    pub fn search(&self, query: impl Into<String>, filters: FilterSet) -> PendingSearch {
        let query = query.into();
        let (tx, receiver) = oneshot::channel();
        let _dispatch = self.lock_dispatch();

        if fold_query(&query).is_empty() && filters.is_empty() {
            self.debouncer.cancel();
            let generation = self.shared.advance(|_| SearchPhase::Idle);
            debug!(generation, "Blank search without filters, provider skipped");

            let _ = tx.send(SearchOutcome {
                generation,
                key: normalize(&query, &filters),
                source: ResultSource::Skipped,
                result: Ok(ResultSet::empty()),
            });

            return PendingSearch {
                generation,
                receiver,
            };
        }

        let generation = self
            .shared
            .advance(|generation| SearchPhase::Scheduled { generation });
        trace!(generation, query = %query, "Search scheduled");

        let shared = Arc::clone(&self.shared);
        self.debouncer.schedule(move || {
            if !shared.transition(generation, SearchPhase::InFlight { generation }) {
                trace!(generation, "Search stale at debounce fire, dropped");
                return;
            }

            tokio::spawn(async move {
                let outcome = shared.execute(generation, query, filters).await;
                shared.transition(generation, SearchPhase::Idle);
                let _ = tx.send(outcome);
            });
        });

        PendingSearch {
            generation,
            receiver,
        }
    }

    /// Stops any pending debounce and invalidates in-flight requests.
    ///
    /// In-flight provider calls are not aborted; their results simply stop
    /// being current.
    pub fn cancel_outstanding(&self) {
        let _dispatch = self.lock_dispatch();
        let had_pending = self.debouncer.cancel();
        let generation = self.shared.advance(|_| SearchPhase::Idle);
        debug!(generation, had_pending, "Outstanding searches cancelled");
    }

    fn lock_dispatch(&self) -> MutexGuard<'_, ()> {
        self.dispatch.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current_generation(&self) -> Generation {
        self.shared.current()
    }

    /// Whether no newer search or cancellation has been issued since `generation`
    pub fn is_current(&self, generation: Generation) -> bool {
        self.shared.current() == generation
    }

    pub fn phase(&self) -> SearchPhase {
        *self.shared.phase.borrow()
    }

    pub fn subscribe_phase(&self) -> watch::Receiver<SearchPhase> {
        self.shared.phase.subscribe()
    }

    pub fn cache(&self) -> &Arc<dyn ResultCache> {
        &self.shared.cache
    }

    pub fn provider_name(&self) -> &'static str {
        self.shared.provider.provider_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::MockResultCache;
    use crate::domain::search::{MockSearchProvider, ResultItem, ResultKind};
    use tokio_test::{assert_pending, assert_ready};

    const DEBOUNCE: Duration = Duration::from_millis(300);

    fn results(title: &str) -> ResultSet {
        ResultSet::new(vec![ResultItem::new(
            format!("id-{}", title),
            ResultKind::Talent,
            title,
        )])
    }

    fn config() -> DispatcherConfig {
        DispatcherConfig::default().with_debounce(DEBOUNCE)
    }

    fn dispatcher(provider: Arc<MockSearchProvider>) -> SearchDispatcher {
        SearchDispatcher::with_cache_config(provider, CacheConfig::default(), &config()).unwrap()
    }

    fn completed(resolution: Resolution) -> SearchOutcome {
        resolution
            .into_outcome()
            .expect("expected a completed resolution")
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_miss_then_hit() {
        let provider = Arc::new(
            MockSearchProvider::new().with_response("music", Duration::from_millis(100), results("Ada")),
        );
        let dispatcher = dispatcher(Arc::clone(&provider));

        let first = completed(dispatcher.search("music", FilterSet::new()).await);
        assert_eq!(first.source, ResultSource::Provider);
        assert_eq!(first.result, Ok(results("Ada")));
        assert_eq!(first.generation, 1);

        let second = completed(dispatcher.search("  MUSIC ", FilterSet::new()).await);
        assert_eq!(second.source, ResultSource::Cache);
        assert_eq!(second.result, Ok(results("Ada")));
        assert_eq!(second.generation, 2);
        assert_eq!(first.key, second.key);

        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolves_only_after_debounce() {
        let provider = Arc::new(MockSearchProvider::new());
        let dispatcher = dispatcher(Arc::clone(&provider));

        let mut pending = tokio_test::task::spawn(dispatcher.search("music", FilterSet::new()));
        assert_pending!(pending.poll());

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert_pending!(pending.poll());
        assert_eq!(provider.call_count(), 0);

        tokio::time::sleep(Duration::from_millis(10)).await;
        let resolution = assert_ready!(pending.poll());
        assert_eq!(completed(resolution).result, Ok(ResultSet::empty()));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_coalesces_to_latest_query() {
        let provider = Arc::new(MockSearchProvider::new());
        let dispatcher = dispatcher(Arc::clone(&provider));

        let m = dispatcher.search("m", FilterSet::new());
        tokio::time::sleep(Duration::from_millis(50)).await;
        let mu = dispatcher.search("mu", FilterSet::new());
        tokio::time::sleep(Duration::from_millis(50)).await;
        let mus = dispatcher.search("mus", FilterSet::new());

        assert_eq!(m.await, Resolution::Superseded { generation: 1 });
        assert_eq!(mu.await, Resolution::Superseded { generation: 2 });

        let last = completed(mus.await);
        assert_eq!(last.generation, 3);
        assert_eq!(provider.queries(), vec!["mus".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_fire_calls_no_provider() {
        let provider = Arc::new(MockSearchProvider::new());
        let dispatcher = dispatcher(Arc::clone(&provider));

        let pending = dispatcher.search("music", FilterSet::new());
        tokio::time::sleep(Duration::from_millis(100)).await;
        dispatcher.cancel_outstanding();

        assert_eq!(pending.await, Resolution::Superseded { generation: 1 });
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(provider.call_count(), 0);
        assert_eq!(dispatcher.current_generation(), 2);
        assert_eq!(dispatcher.phase(), SearchPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_flight_makes_result_stale() {
        let provider = Arc::new(
            MockSearchProvider::new().with_response("music", Duration::from_millis(500), results("Ada")),
        );
        let dispatcher = dispatcher(Arc::clone(&provider));

        let pending = dispatcher.search("music", FilterSet::new());
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(dispatcher.phase(), SearchPhase::InFlight { generation: 1 });

        dispatcher.cancel_outstanding();
        let outcome = completed(pending.await);

        assert!(!dispatcher.is_current(outcome.generation));
        assert_eq!(dispatcher.phase(), SearchPhase::Idle);
        // The late answer is still a valid cache entry
        assert!(dispatcher.cache().contains(&outcome.key));
    }

    #[tokio::test(start_paused = true)]
    async fn test_out_of_order_responses_keep_generation_tags() {
        let provider = Arc::new(
            MockSearchProvider::new()
                .with_response("music", Duration::from_millis(500), results("Music"))
                .with_response("dance", Duration::from_millis(100), results("Dance")),
        );
        let dispatcher = SearchDispatcher::with_cache_config(
            provider,
            CacheConfig::default(),
            &DispatcherConfig::default().with_debounce(Duration::from_millis(10)),
        )
        .unwrap();

        let music = dispatcher.search("music", FilterSet::new());
        tokio::time::sleep(Duration::from_millis(50)).await;
        let dance = dispatcher.search("dance", FilterSet::new());

        let dance = completed(dance.await);
        assert!(dispatcher.is_current(dance.generation));

        let music = completed(music.await);
        assert_eq!(music.result, Ok(results("Music")));
        assert!(!dispatcher.is_current(music.generation));
        assert!(music.generation < dance.generation);
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_failure_is_not_cached() {
        let provider = Arc::new(MockSearchProvider::new().with_error(
            "music",
            Duration::from_millis(20),
            "backend unavailable",
        ));
        let dispatcher = dispatcher(Arc::clone(&provider));

        let outcome = completed(dispatcher.search("music", FilterSet::new()).await);
        assert_eq!(
            outcome.result,
            Err(SearchError::provider("mock", "backend unavailable"))
        );
        assert!(dispatcher.cache().is_empty());

        completed(dispatcher.search("music", FilterSet::new()).await);
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_never_touches_cache_set() {
        let provider = Arc::new(MockSearchProvider::new().with_error(
            "music",
            Duration::ZERO,
            "boom",
        ));

        let mut cache = MockResultCache::new();
        cache.expect_get().times(1).returning(|_| None);
        cache.expect_set().never();

        let dispatcher = SearchDispatcher::new(provider, Arc::new(cache), &config());
        let outcome = completed(dispatcher.search("music", FilterSet::new()).await);

        assert!(outcome.result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_hit_skips_provider() {
        let provider = Arc::new(MockSearchProvider::new());

        let mut cache = MockResultCache::new();
        cache
            .expect_get()
            .times(1)
            .returning(|_| Some(results("Cached")));
        cache.expect_set().never();

        let dispatcher = SearchDispatcher::new(provider.clone(), Arc::new(cache), &config());
        let outcome = completed(dispatcher.search("music", FilterSet::new()).await);

        assert_eq!(outcome.source, ResultSource::Cache);
        assert_eq!(outcome.result, Ok(results("Cached")));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_searches_never_lose_latest_generation() {
        for _ in 0..200 {
            let provider = Arc::new(MockSearchProvider::new());
            let dispatcher = Arc::new(
                SearchDispatcher::with_cache_config(
                    provider,
                    CacheConfig::default(),
                    &DispatcherConfig::default().with_debounce(Duration::from_millis(1)),
                )
                .unwrap(),
            );
            let barrier = Arc::new(std::sync::Barrier::new(2));

            let issue = |query: &'static str| {
                let dispatcher = Arc::clone(&dispatcher);
                let barrier = Arc::clone(&barrier);
                tokio::task::spawn_blocking(move || {
                    barrier.wait();
                    dispatcher.search(query, FilterSet::new())
                })
            };

            let first = issue("a");
            let second = issue("b");
            let first = first.await.unwrap();
            let second = second.await.unwrap();

            let current = dispatcher.current_generation();
            let resolutions = [first.await, second.await];
            let latest = resolutions
                .iter()
                .find(|resolution| resolution.generation() == current)
                .expect("latest generation must resolve");

            assert!(matches!(latest, Resolution::Completed(_)));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_cancel_racing_search_leaves_no_stale_work_current() {
        for _ in 0..200 {
            let provider = Arc::new(MockSearchProvider::new());
            let dispatcher = Arc::new(
                SearchDispatcher::with_cache_config(
                    provider,
                    CacheConfig::default(),
                    &DispatcherConfig::default().with_debounce(Duration::from_millis(1)),
                )
                .unwrap(),
            );
            let barrier = Arc::new(std::sync::Barrier::new(2));

            let searching = {
                let dispatcher = Arc::clone(&dispatcher);
                let barrier = Arc::clone(&barrier);
                tokio::task::spawn_blocking(move || {
                    barrier.wait();
                    dispatcher.search("a", FilterSet::new())
                })
            };
            let cancelling = {
                let dispatcher = Arc::clone(&dispatcher);
                let barrier = Arc::clone(&barrier);
                tokio::task::spawn_blocking(move || {
                    barrier.wait();
                    dispatcher.cancel_outstanding();
                })
            };

            let pending = searching.await.unwrap();
            cancelling.await.unwrap();

            let resolution = pending.await;
            if dispatcher.is_current(resolution.generation()) {
                assert!(matches!(resolution, Resolution::Completed(_)));
            }
            assert_eq!(dispatcher.current_generation(), 2);
        }
    }

    #[test]
    fn test_provider_timeout_saturates() {
        let config = DispatcherConfig::default().with_provider_timeout(Duration::MAX);
        assert_eq!(config.provider_timeout_ms, Some(u64::MAX));
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_timeout() {
        let provider = Arc::new(
            MockSearchProvider::new().with_response("music", Duration::from_secs(5), results("Ada")),
        );
        let dispatcher = SearchDispatcher::with_cache_config(
            provider,
            CacheConfig::default(),
            &config().with_provider_timeout(Duration::from_millis(200)),
        )
        .unwrap();

        let outcome = completed(dispatcher.search("music", FilterSet::new()).await);

        assert_eq!(outcome.result, Err(SearchError::timed_out("mock", 200)));
        assert!(dispatcher.cache().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_query_without_filters_short_circuits() {
        let provider = Arc::new(MockSearchProvider::new());
        let dispatcher = dispatcher(Arc::clone(&provider));

        let pending = dispatcher.search("music", FilterSet::new());
        let mut blank = tokio_test::task::spawn(dispatcher.search("   ", FilterSet::new()));

        let outcome = completed(assert_ready!(blank.poll()));
        assert_eq!(outcome.source, ResultSource::Skipped);
        assert_eq!(outcome.result, Ok(ResultSet::empty()));
        assert_eq!(outcome.generation, 2);

        assert_eq!(pending.await, Resolution::Superseded { generation: 1 });
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(provider.call_count(), 0);
        assert_eq!(dispatcher.phase(), SearchPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_query_with_filters_reaches_provider() {
        let provider = Arc::new(MockSearchProvider::new());
        let dispatcher = dispatcher(Arc::clone(&provider));

        let filters = FilterSet::new().with("kind", "category");
        let outcome = completed(dispatcher.search("", filters).await);

        assert_eq!(outcome.source, ResultSource::Provider);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_phase_transitions() {
        let provider = Arc::new(
            MockSearchProvider::new().with_response("music", Duration::from_millis(100), results("Ada")),
        );
        let dispatcher = dispatcher(Arc::clone(&provider));
        let phases = dispatcher.subscribe_phase();

        assert_eq!(*phases.borrow(), SearchPhase::Idle);

        let pending = dispatcher.search("music", FilterSet::new());
        assert_eq!(*phases.borrow(), SearchPhase::Scheduled { generation: 1 });

        tokio::time::sleep(Duration::from_millis(350)).await;
        assert_eq!(*phases.borrow(), SearchPhase::InFlight { generation: 1 });

        completed(pending.await);
        assert_eq!(*phases.borrow(), SearchPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shared_cache_separate_generations() {
        let provider = Arc::new(
            MockSearchProvider::new().with_response("music", Duration::ZERO, results("Ada")),
        );
        let cache: Arc<dyn ResultCache> =
            Arc::new(InMemoryResultCache::new(CacheConfig::default()).unwrap());

        let first = SearchDispatcher::new(provider.clone(), Arc::clone(&cache), &config());
        let second = SearchDispatcher::new(provider.clone(), Arc::clone(&cache), &config());

        completed(first.search("music", FilterSet::new()).await);
        first.search("dance", FilterSet::new()).await;

        let outcome = completed(second.search("music", FilterSet::new()).await);
        assert_eq!(outcome.source, ResultSource::Cache);
        assert_eq!(outcome.generation, 1);
        assert_eq!(first.current_generation(), 2);
        assert_eq!(provider.call_count(), 2);
    }
}
