//! Aggregated search counts and the trending list derived from them.
//!
//! Writes are best-effort: a failure is logged and never reaches the search
//! flow. Reads degrade to an empty list.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info, warn};

use crate::models::{Movie, NewSearchCount, SearchCountRecord, TrendingEntry};
use crate::store::{DocumentStore, StoreError};

#[derive(Debug, Error)]
pub enum TrendingError {
    #[error("Trending store error: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Created(SearchCountRecord),
    Incremented(SearchCountRecord),
}

impl RecordOutcome {
    #[must_use]
    pub const fn record(&self) -> &SearchCountRecord {
        match self {
            Self::Created(record) | Self::Incremented(record) => record,
        }
    }
}

pub struct TrendingService {
    store: Arc<dyn DocumentStore>,
    image_base_url: String,
    fallback_poster: String,
}

impl TrendingService {
    #[must_use]
    pub fn new(
        store: Arc<dyn DocumentStore>,
        image_base_url: impl Into<String>,
        fallback_poster: impl Into<String>,
    ) -> Self {
        Self {
            store,
            image_base_url: image_base_url.into(),
            fallback_poster: fallback_poster.into(),
        }
    }

    /// Increments the counter for `term`, creating it on first use.
    ///
    /// The lookup and the write are separate calls. Two callers recording the
    /// same new term at once can both miss the lookup and both create a
    /// record; that gap is accepted rather than papered over here.
    pub async fn try_record_search(
        &self,
        term: &str,
        movie: &Movie,
    ) -> Result<RecordOutcome, TrendingError> {
        let existing = self.store.find_by_term(term).await?;

        if let Some(record) = existing.into_iter().next() {
            let updated = self.store.update_count(&record.id, record.count + 1).await?;
            debug!(term, id = %updated.id, count = updated.count, "Incremented search count");
            return Ok(RecordOutcome::Incremented(updated));
        }

        let poster_url = movie
            .poster_url(&self.image_base_url)
            .unwrap_or_else(|| self.fallback_poster.clone());
        let created = self
            .store
            .create(NewSearchCount::first_search(term, movie, poster_url))
            .await?;
        debug!(term, id = %created.id, movie_id = movie.id, "Created search count");
        Ok(RecordOutcome::Created(created))
    }

    pub async fn record_search(&self, term: &str, movie: &Movie) {
        if let Err(e) = self.try_record_search(term, movie).await {
            error!(term, error = %e, "Error updating search count");
        }
    }

    /// Top `limit` terms by count, or an empty list if the store fails.
    pub async fn fetch_trending(&self, limit: usize) -> Vec<TrendingEntry> {
        match self.store.top_by_count(limit).await {
            Ok(mut records) => {
                records.truncate(limit);
                debug!(count = records.len(), "Fetched trending searches");
                TrendingEntry::rank_all(records)
            }
            Err(e) => {
                error!(error = %e, "Error fetching trending movies");
                Vec::new()
            }
        }
    }

    /// Starts the background worker and loads the trending list once.
    ///
    /// The worker ends when every [`TrendingHandle`] is dropped, after the
    /// writes it already started have finished.
    pub fn spawn_worker(self: Arc<Self>, limit: usize) -> (TrendingHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (list_tx, list_rx) = watch::channel(Vec::new());

        let handle = TrendingHandle {
            tx,
            list: list_rx,
        };
        handle.refresh();

        let worker = tokio::spawn(self.worker_loop(rx, list_tx, limit));
        (handle, worker)
    }

    async fn worker_loop(
        self: Arc<Self>,
        mut rx: mpsc::UnboundedReceiver<TrendingCommand>,
        list: watch::Sender<Vec<TrendingEntry>>,
        limit: usize,
    ) {
        info!("Trending worker started");
        let mut writes = JoinSet::new();

        loop {
            tokio::select! {
                command = rx.recv() => match command {
                    Some(TrendingCommand::RecordSearch { term, movie }) => {
                        let service = Arc::clone(&self);
                        writes.spawn(async move { service.record_search(&term, &movie).await });
                    }
                    Some(TrendingCommand::Refresh) => {
                        let entries = self.fetch_trending(limit).await;
                        list.send_replace(entries);
                    }
                    None => break,
                },
                Some(joined) = writes.join_next(), if !writes.is_empty() => {
                    if let Err(e) = joined {
                        warn!(error = %e, "Search count task did not finish");
                    }
                }
            }
        }

        while writes.join_next().await.is_some() {}
        info!("Trending worker stopped");
    }
}

#[derive(Debug, Clone)]
pub enum TrendingCommand {
    RecordSearch { term: String, movie: Movie },
    Refresh,
}

/// Cheap handle for queueing work to the trending worker.
#[derive(Debug, Clone)]
pub struct TrendingHandle {
    tx: mpsc::UnboundedSender<TrendingCommand>,
    list: watch::Receiver<Vec<TrendingEntry>>,
}

impl TrendingHandle {
    /// Queues a counter update without waiting for it.
    pub fn record_search(&self, term: String, movie: Movie) {
        if self
            .tx
            .send(TrendingCommand::RecordSearch { term, movie })
            .is_err()
        {
            debug!("Trending worker stopped, dropping search count update");
        }
    }

    /// Queues a reload of the trending list.
    pub fn refresh(&self) {
        if self.tx.send(TrendingCommand::Refresh).is_err() {
            debug!("Trending worker stopped, ignoring refresh");
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<TrendingEntry>> {
        self.list.clone()
    }
}
