//! Catalog search dispatch.
//!
//! [`SearchState`] is an immutable snapshot moved forward by [`SearchEvent`]s.
//! [`SearchController`] issues request ids, runs catalog fetches and publishes
//! snapshots on a watch channel. Only the most recently dispatched request
//! may complete the state; late responses for older requests are dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::clients::tmdb::{CatalogApi, CatalogError, CatalogQuery};
use crate::domain::RequestId;
use crate::models::Movie;
use crate::services::trending::TrendingHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// How a catalog fetch ended, as far as the UI is concerned.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Loaded(Vec<Movie>),
    Failed(String),
}

impl SearchOutcome {
    #[must_use]
    pub fn from_result(result: Result<Vec<Movie>, CatalogError>) -> Self {
        match result {
            Ok(movies) => Self::Loaded(movies),
            Err(e) => Self::Failed(e.user_message()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    Dispatched { request_id: RequestId, term: String },
    Completed {
        request_id: RequestId,
        outcome: SearchOutcome,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchState {
    pub status: SearchStatus,
    pub term: String,
    pub latest_request: Option<RequestId>,
    pub movies: Vec<Movie>,
    pub error_message: Option<String>,
}

impl SearchState {
    /// Returns the next state, or `None` when `event` is stale and must be
    /// ignored.
    ///
    /// A dispatch is stale if its id is not newer than the latest one seen;
    /// a completion is stale unless it answers the latest in-flight dispatch.
    #[must_use]
    pub fn apply(&self, event: SearchEvent) -> Option<Self> {
        match event {
            SearchEvent::Dispatched { request_id, term } => {
                if self.latest_request.is_some_and(|latest| request_id <= latest) {
                    return None;
                }
                Some(Self {
                    status: SearchStatus::Loading,
                    term,
                    latest_request: Some(request_id),
                    movies: self.movies.clone(),
                    error_message: None,
                })
            }
            SearchEvent::Completed {
                request_id,
                outcome,
            } => {
                if self.latest_request != Some(request_id)
                    || self.status != SearchStatus::Loading
                {
                    return None;
                }
                let next = match outcome {
                    SearchOutcome::Loaded(movies) => Self {
                        status: SearchStatus::Loaded,
                        movies,
                        error_message: None,
                        ..self.clone()
                    },
                    SearchOutcome::Failed(message) => Self {
                        status: SearchStatus::Failed,
                        movies: Vec::new(),
                        error_message: Some(message),
                        ..self.clone()
                    },
                };
                Some(next)
            }
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status == SearchStatus::Loading
    }
}

/// One dispatched term and the id that identifies its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSession {
    pub request_id: RequestId,
    pub term: String,
}

impl SearchSession {
    #[must_use]
    pub fn query(&self) -> CatalogQuery {
        CatalogQuery::from_term(&self.term)
    }
}

pub struct SearchController {
    catalog: Arc<dyn CatalogApi>,
    state: watch::Sender<SearchState>,
    last_issued: AtomicU64,
    trending: Option<TrendingHandle>,
}

impl SearchController {
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogApi>, trending: Option<TrendingHandle>) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            catalog,
            state,
            last_issued: AtomicU64::new(0),
            trending,
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Issues a request id for `term` and moves the state to loading.
    pub fn begin(&self, term: impl Into<String>) -> SearchSession {
        let request_id = RequestId::new(self.last_issued.fetch_add(1, Ordering::SeqCst) + 1);
        let session = SearchSession {
            request_id,
            term: term.into(),
        };

        self.apply(SearchEvent::Dispatched {
            request_id,
            term: session.term.clone(),
        });
        debug!(request = %request_id, term = %session.term, "Search dispatched");
        session
    }

    /// Fetches results for `session` and applies them if still current.
    ///
    /// Returns whether the response was applied.
    pub async fn run(&self, session: SearchSession) -> bool {
        let query = session.query();
        let result = self.catalog.fetch_movies(&query).await;

        if let Err(e) = &result {
            warn!(request = %session.request_id, error = %e, "Catalog fetch failed");
        }

        self.complete(&session, SearchOutcome::from_result(result))
    }

    /// Dispatches `term` and waits for its response.
    pub async fn dispatch(&self, term: impl Into<String>) -> bool {
        let session = self.begin(term);
        self.run(session).await
    }

    /// Dispatches `term` now and fetches in the background.
    ///
    /// The request id is issued before this returns, so dispatch order is the
    /// call order even though fetches may finish in any order.
    pub fn spawn_dispatch(self: &Arc<Self>, term: impl Into<String>) -> JoinHandle<bool> {
        let session = self.begin(term);
        let controller = Arc::clone(self);
        tokio::spawn(async move { controller.run(session).await })
    }

    /// Applies the outcome of `session`. Stale outcomes are discarded.
    pub fn complete(&self, session: &SearchSession, outcome: SearchOutcome) -> bool {
        let representative = match (&outcome, session.query()) {
            (SearchOutcome::Loaded(movies), CatalogQuery::Text(_)) => movies.first().cloned(),
            _ => None,
        };

        let applied = self.apply(SearchEvent::Completed {
            request_id: session.request_id,
            outcome,
        });

        if !applied {
            debug!(request = %session.request_id, "Discarded stale search response");
            return false;
        }

        let snapshot = self.snapshot();
        match snapshot.status {
            SearchStatus::Loaded => info!(
                request = %session.request_id,
                results = snapshot.movies.len(),
                "Search completed"
            ),
            _ => debug!(request = %session.request_id, "Search ended with an error"),
        }

        if let (Some(movie), Some(trending)) = (representative, &self.trending) {
            trending.record_search(session.term.clone(), movie);
        }

        true
    }

    fn apply(&self, event: SearchEvent) -> bool {
        self.state.send_if_modified(|state| match state.apply(event) {
            Some(next) => {
                *state = next;
                true
            }
            None => false,
        })
    }
}
