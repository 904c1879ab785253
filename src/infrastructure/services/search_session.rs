//! Consumer-facing search state driven by a dispatcher

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::domain::search::{FilterSet, ResultSet, SearchError};
use crate::infrastructure::observability::record_resolution;

use super::search_dispatcher::{Generation, Resolution, ResultSource, SearchDispatcher};

/// What a search UI renders
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchState {
    pub results: ResultSet,
    pub loading: bool,
    pub error: Option<SearchError>,
    /// Generation of the resolution last applied; 0 before any
    pub generation: Generation,
}

/// Applies dispatcher resolutions to observable state, latest search wins.
///
/// A resolution is applied only while its generation is still current, so a
/// slow response for an older query can never overwrite a newer one.
#[derive(Debug, Clone)]
pub struct SearchSession {
    dispatcher: Arc<SearchDispatcher>,
    state: Arc<watch::Sender<SearchState>>,
}

impl SearchSession {
    pub fn new(dispatcher: Arc<SearchDispatcher>) -> Self {
        let (state, _) = watch::channel(SearchState::default());

        Self {
            dispatcher,
            state: Arc::new(state),
        }
    }

    /// Issues a search and applies its result once it resolves.
    ///
    /// The returned handle completes when the resolution has been applied or
    /// discarded; awaiting it is optional.
    pub fn search(&self, query: impl Into<String>, filters: FilterSet) -> JoinHandle<()> {
        let pending = self.dispatcher.search(query, filters);
        self.state.send_if_modified(|state| {
            let changed = !state.loading;
            state.loading = true;
            changed
        });

        let dispatcher = Arc::clone(&self.dispatcher);
        let state = Arc::clone(&self.state);

        tokio::spawn(async move {
            let outcome = match pending.await {
                Resolution::Completed(outcome) => outcome,
                Resolution::Superseded { generation } => {
                    record_resolution("superseded");
                    debug!(generation, "Search superseded before running");
                    return;
                }
            };

            let generation = outcome.generation;
            let source = outcome.source;
            let applied = state.send_if_modified(|state| {
                if !dispatcher.is_current(generation) {
                    return false;
                }

                match outcome.result {
                    Ok(results) => {
                        state.results = results;
                        state.error = None;
                    }
                    Err(error) => state.error = Some(error),
                }
                state.loading = false;
                state.generation = generation;
                true
            });

            if applied {
                record_resolution(match source {
                    ResultSource::Skipped => "skipped",
                    ResultSource::Cache | ResultSource::Provider => "applied",
                });
            } else {
                record_resolution("discarded");
                debug!(
                    generation,
                    current = dispatcher.current_generation(),
                    "Stale search result discarded"
                );
            }
        })
    }

    /// Cancels pending and in-flight searches; current results stay visible
    pub fn cancel(&self) {
        self.dispatcher.cancel_outstanding();
        self.state.send_if_modified(|state| {
            let changed = state.loading;
            state.loading = false;
            changed
        });
    }

    /// Cancels outstanding work and drops everything this session cached
    pub fn close(&self) {
        self.cancel();
        self.dispatcher.cache().clear();
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn results(&self) -> ResultSet {
        self.state.borrow().results.clone()
    }

    pub fn loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn error(&self) -> Option<SearchError> {
        self.state.borrow().error.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    pub fn dispatcher(&self) -> &Arc<SearchDispatcher> {
        &self.dispatcher
    }
}
