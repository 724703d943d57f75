use std::sync::Arc;

use anyhow::Context;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::clients::appwrite::AppwriteStore;
use crate::clients::tmdb::{CatalogApi, TmdbClient};
use crate::config::Config;
use crate::constants::{http, intervals};
use crate::presentation::Renderer;
use crate::services::{SearchController, TrendingHandle, TrendingService};
use crate::store::DocumentStore;

/// Build a shared HTTP client with reasonable defaults for API calls.
/// Both remote services go through this client so connections are pooled.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent(http::USER_AGENT)
        .pool_max_idle_per_host(http::MAX_IDLE_PER_HOST)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

/// Everything a session needs, wired once at startup.
pub struct AppState {
    pub config: Arc<Config>,

    pub controller: Arc<SearchController>,

    pub trending: TrendingHandle,

    pub trending_service: Arc<TrendingService>,

    pub renderer: Renderer,

    worker: JoinHandle<()>,
}

impl AppState {
    /// Builds the HTTP-backed services and starts the trending worker.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let client = build_shared_http_client(config.catalog.request_timeout_seconds)?;

        let catalog: Arc<dyn CatalogApi> = Arc::new(TmdbClient::new(client.clone(), &config.catalog));
        let store: Arc<dyn DocumentStore> = Arc::new(
            AppwriteStore::new(client, &config.store)
                .context("Failed to configure document store")?,
        );

        info!(
            catalog = %config.catalog.base_url,
            store = %config.store.endpoint,
            "Remote services configured"
        );
        Ok(Self::with_backends(config, catalog, store))
    }

    /// Wires the app around the given backends.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn with_backends(
        config: Config,
        catalog: Arc<dyn CatalogApi>,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        let trending_service = Arc::new(TrendingService::new(
            store,
            config.catalog.image_base_url.clone(),
            config.search.fallback_poster.clone(),
        ));
        let (trending, worker) =
            Arc::clone(&trending_service).spawn_worker(config.search.trending_limit);

        let controller = Arc::new(SearchController::new(catalog, Some(trending.clone())));
        let renderer = Renderer::from_config(&config);

        Self {
            config: Arc::new(config),
            controller,
            trending,
            trending_service,
            renderer,
            worker,
        }
    }

    /// Closes the trending queue and waits briefly for queued writes.
    pub async fn shutdown(self) {
        let Self {
            controller,
            trending,
            worker,
            ..
        } = self;
        drop(controller);
        drop(trending);

        if tokio::time::timeout(intervals::SHUTDOWN_GRACE, worker)
            .await
            .is_err()
        {
            warn!("Trending worker did not stop in time");
        }
    }
}
