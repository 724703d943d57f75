//! Terminal session driven with scripted input.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use marquee::clients::{CatalogApi, CatalogError, CatalogQuery};
use marquee::config::Config;
use marquee::domain::DocumentId;
use marquee::models::{Movie, SearchCountRecord};
use marquee::session::{run_interactive, run_search, run_trending};
use marquee::state::AppState;
use marquee::store::MemoryStore;

/// Canned catalog that also remembers every query it served.
#[derive(Default)]
struct RecordingCatalog {
    replies: HashMap<String, Vec<Movie>>,
    seen: Mutex<Vec<CatalogQuery>>,
}

#[async_trait]
impl CatalogApi for RecordingCatalog {
    async fn fetch_movies(&self, query: &CatalogQuery) -> Result<Vec<Movie>, CatalogError> {
        self.seen.lock().unwrap().push(query.clone());
        let key = query.term().unwrap_or_default();
        Ok(self.replies.get(key).cloned().unwrap_or_default())
    }
}

fn movie(id: i64, title: &str) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        poster_path: None,
        vote_average: Some(7.8),
        release_date: Some("2021-09-15".to_string()),
        original_language: "en".to_string(),
    }
}

fn config() -> Config {
    let mut config = Config::default();
    config.search.debounce_ms = 50;
    config
}

fn catalog() -> Arc<RecordingCatalog> {
    Arc::new(RecordingCatalog {
        replies: HashMap::from([
            ("".to_string(), vec![movie(1, "Popular Pick")]),
            ("dune".to_string(), vec![movie(438631, "Dune")]),
        ]),
        ..RecordingCatalog::default()
    })
}

#[tokio::test(start_paused = true)]
async fn typing_burst_dispatches_only_settled_term() {
    let catalog = catalog();
    let store = Arc::new(MemoryStore::new());
    let state = AppState::with_backends(config(), catalog.clone(), store.clone());

    let mut out = Vec::new();
    run_interactive(&state, &b"d\ndu\ndune\n"[..], &mut out)
        .await
        .unwrap();
    state.shutdown().await;

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("== All Movies =="));
    assert!(text.contains("Popular Pick"));
    assert!(text.contains("== Results for \"dune\" =="));
    assert!(!text.contains("Results for \"du\""));
    assert!(text.contains("== Trending Movies =="));

    let seen = catalog.seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![CatalogQuery::Popular, CatalogQuery::Text("dune".to_string())]
    );

    let records = store.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].search_term, "dune");
    assert_eq!(records[0].poster_url, "/no-movie.png");
}

#[tokio::test(start_paused = true)]
async fn quit_command_drops_unsettled_input() {
    let catalog = catalog();
    let state = AppState::with_backends(config(), catalog.clone(), Arc::new(MemoryStore::new()));

    let mut out = Vec::new();
    run_interactive(&state, &b"dune\n:quit\n"[..], &mut out)
        .await
        .unwrap();
    state.shutdown().await;

    let text = String::from_utf8(out).unwrap();
    assert!(!text.contains("Results for \"dune\""));
    assert!(
        !catalog
            .seen
            .lock()
            .unwrap()
            .contains(&CatalogQuery::Text("dune".to_string()))
    );
}

#[tokio::test]
async fn one_shot_commands_print_panels() {
    let store = Arc::new(MemoryStore::with_records(vec![
        SearchCountRecord {
            id: DocumentId::new("a"),
            search_term: "alien".to_string(),
            count: 4,
            movie_id: 348,
            poster_url: "https://image.tmdb.org/t/p/w500/alien.jpg".to_string(),
        },
        SearchCountRecord {
            id: DocumentId::new("b"),
            search_term: "heat".to_string(),
            count: 9,
            movie_id: 949,
            poster_url: String::new(),
        },
    ]));
    let state = AppState::with_backends(config(), catalog(), store);

    let mut out = Vec::new();
    run_search(&state, "dune", &mut out).await.unwrap();
    run_trending(&state, 5, &mut out).await.unwrap();
    state.shutdown().await;

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("== Results for \"dune\" =="));
    assert!(text.contains("Dune  ★ 7.8 • en • 2021"));
    assert!(text.contains(" 1. heat (9 searches)  /no-movie.png"));
    assert!(text.contains(" 2. alien (4 searches)  https://image.tmdb.org/t/p/w500/alien.jpg"));
}
