//! Text rendering of search and trending state.
//!
//! Everything here is a pure function of its inputs.

use std::fmt::Write as _;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::config::Config;
use crate::constants::messages;
use crate::models::{Movie, TrendingEntry};
use crate::services::search::{SearchState, SearchStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieCard {
    pub id: i64,
    pub title: String,
    pub poster: String,
    pub rating: String,
    pub language: String,
    pub year: String,
}

/// What the results panel shows. Exactly one applies at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsView {
    Loading,
    Error(String),
    Empty,
    Movies(Vec<MovieCard>),
}

/// Rating with one decimal, or `N/A`. A zero average counts as unrated.
///
/// Ties round away from zero, so `7.25` shows as `7.3`.
#[must_use]
pub fn format_rating(vote_average: Option<f64>) -> String {
    match vote_average {
        Some(v) if v != 0.0 && v.is_finite() => format!("{:.1}", (v * 10.0).round() / 10.0),
        _ => messages::NOT_AVAILABLE.to_string(),
    }
}

/// Release year from an ISO date, or `N/A`.
///
/// Partial dates such as `2021` or `2021-09` still yield their year.
#[must_use]
pub fn format_year(release_date: Option<&str>) -> String {
    release_date
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .and_then(|d| {
            NaiveDate::parse_from_str(d, "%Y-%m-%d")
                .ok()
                .map(|date| date.year())
                .or_else(|| leading_year(d))
        })
        .map_or_else(|| messages::NOT_AVAILABLE.to_string(), |year| year.to_string())
}

fn leading_year(date: &str) -> Option<i32> {
    let year = date.get(..4)?;
    let rest = &date[4..];
    if !year.bytes().all(|b| b.is_ascii_digit()) || !(rest.is_empty() || rest.starts_with('-')) {
        return None;
    }
    year.parse().ok()
}

#[derive(Debug, Clone)]
pub struct Renderer {
    image_base_url: String,
    fallback_poster: String,
}

impl Renderer {
    #[must_use]
    pub fn new(image_base_url: impl Into<String>, fallback_poster: impl Into<String>) -> Self {
        Self {
            image_base_url: image_base_url.into(),
            fallback_poster: fallback_poster.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.catalog.image_base_url.clone(),
            config.search.fallback_poster.clone(),
        )
    }

    #[must_use]
    pub fn poster_src(&self, movie: &Movie) -> String {
        movie
            .poster_url(&self.image_base_url)
            .unwrap_or_else(|| self.fallback_poster.clone())
    }

    #[must_use]
    pub fn card(&self, movie: &Movie) -> MovieCard {
        MovieCard {
            id: movie.id,
            title: movie.title.clone(),
            poster: self.poster_src(movie),
            rating: format_rating(movie.vote_average),
            language: movie.original_language.clone(),
            year: format_year(movie.release_date.as_deref()),
        }
    }

    #[must_use]
    pub fn results_view(&self, state: &SearchState) -> ResultsView {
        match state.status {
            SearchStatus::Loading => ResultsView::Loading,
            SearchStatus::Failed => ResultsView::Error(
                state
                    .error_message
                    .clone()
                    .unwrap_or_else(|| messages::FETCH_FAILED.to_string()),
            ),
            SearchStatus::Idle | SearchStatus::Loaded if state.movies.is_empty() => {
                ResultsView::Empty
            }
            SearchStatus::Idle | SearchStatus::Loaded => {
                ResultsView::Movies(state.movies.iter().map(|m| self.card(m)).collect())
            }
        }
    }

    #[must_use]
    pub fn render_results(&self, state: &SearchState) -> String {
        let heading = if state.term.trim().is_empty() {
            "All Movies".to_string()
        } else {
            format!("Results for \"{}\"", state.term)
        };

        let mut out = format!("== {heading} ==\n");
        match self.results_view(state) {
            ResultsView::Loading => out.push_str(messages::LOADING),
            ResultsView::Error(message) => out.push_str(&message),
            ResultsView::Empty => out.push_str(messages::NO_RESULTS),
            ResultsView::Movies(cards) => {
                for card in &cards {
                    let _ = writeln!(
                        out,
                        "{}  ★ {} • {} • {}\n    {}",
                        card.title, card.rating, card.language, card.year, card.poster
                    );
                }
            }
        }
        out.truncate(out.trim_end().len());
        out
    }

    #[must_use]
    pub fn render_trending(&self, entries: &[TrendingEntry]) -> String {
        let mut out = String::from("== Trending Movies ==");
        if entries.is_empty() {
            out.push_str("\n(nothing yet)");
        }
        for entry in entries {
            let poster = if entry.poster_url.is_empty() {
                self.fallback_poster.as_str()
            } else {
                entry.poster_url.as_str()
            };
            let _ = write!(
                out,
                "\n{:>2}. {} ({} searches)  {}",
                entry.rank, entry.search_term, entry.count, poster
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RequestId;

    fn renderer() -> Renderer {
        Renderer::new("https://image.tmdb.org/t/p/w500", "/no-movie.png")
    }

    fn movie() -> Movie {
        Movie {
            id: 78,
            title: "Blade Runner".to_string(),
            poster_path: Some("/63N9uy8nd9j7Eog2axPQ8lbr3Wj.jpg".to_string()),
            vote_average: Some(7.94),
            release_date: Some("1982-06-25".to_string()),
            original_language: "en".to_string(),
        }
    }

    #[test]
    fn test_format_rating() {
        assert_eq!(format_rating(Some(7.94)), "7.9");
        assert_eq!(format_rating(Some(8.0)), "8.0");
        assert_eq!(format_rating(Some(7.25)), "7.3");
        assert_eq!(format_rating(Some(6.25)), "6.3");
        assert_eq!(format_rating(Some(6.24)), "6.2");
        assert_eq!(format_rating(Some(0.0)), "N/A");
        assert_eq!(format_rating(None), "N/A");
    }

    #[test]
    fn test_format_year() {
        assert_eq!(format_year(Some("1982-06-25")), "1982");
        assert_eq!(format_year(Some("2021")), "2021");
        assert_eq!(format_year(Some("2021-09")), "2021");
        assert_eq!(format_year(Some("20210")), "N/A");
        assert_eq!(format_year(Some("")), "N/A");
        assert_eq!(format_year(Some("soon")), "N/A");
        assert_eq!(format_year(None), "N/A");
    }

    #[test]
    fn test_card_fields() {
        let card = renderer().card(&movie());
        assert_eq!(card.title, "Blade Runner");
        assert_eq!(
            card.poster,
            "https://image.tmdb.org/t/p/w500/63N9uy8nd9j7Eog2axPQ8lbr3Wj.jpg"
        );
        assert_eq!(card.rating, "7.9");
        assert_eq!(card.language, "en");
        assert_eq!(card.year, "1982");
    }

    #[test]
    fn test_card_without_poster_or_rating() {
        let mut m = movie();
        m.poster_path = None;
        m.vote_average = None;

        let card = renderer().card(&m);
        assert_eq!(card.poster, "/no-movie.png");
        assert_eq!(card.rating, "N/A");
    }

    #[test]
    fn test_results_view_states() {
        let r = renderer();

        let loading = SearchState {
            status: SearchStatus::Loading,
            latest_request: Some(RequestId::new(1)),
            ..SearchState::default()
        };
        assert_eq!(r.results_view(&loading), ResultsView::Loading);

        let failed = SearchState {
            status: SearchStatus::Failed,
            error_message: Some("Failed to fetch movies.".to_string()),
            ..SearchState::default()
        };
        assert_eq!(
            r.results_view(&failed),
            ResultsView::Error("Failed to fetch movies.".to_string())
        );

        let empty = SearchState {
            status: SearchStatus::Loaded,
            term: "xyzzynotreal".to_string(),
            ..SearchState::default()
        };
        assert_eq!(r.results_view(&empty), ResultsView::Empty);
        assert!(r.render_results(&empty).ends_with("No movies found."));

        let loaded = SearchState {
            status: SearchStatus::Loaded,
            movies: vec![movie()],
            ..SearchState::default()
        };
        let ResultsView::Movies(cards) = r.results_view(&loaded) else {
            panic!("expected movie cards");
        };
        assert_eq!(cards.len(), 1);
        assert!(r.render_results(&loaded).starts_with("== All Movies =="));
    }

    #[test]
    fn test_render_trending() {
        let entries = vec![TrendingEntry {
            rank: 1,
            search_term: "dune".to_string(),
            count: 4,
            movie_id: 438631,
            poster_url: String::new(),
        }];

        let text = renderer().render_trending(&entries);
        assert!(text.contains(" 1. dune (4 searches)  /no-movie.png"));
        assert!(renderer().render_trending(&[]).contains("(nothing yet)"));
    }
}
