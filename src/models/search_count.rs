use serde::{Deserialize, Serialize};

use crate::domain::DocumentId;
use crate::models::Movie;

/// One aggregated search counter as stored in the document collection.
///
/// Wire names follow the collection schema (`searchTerm`, `movie_id`,
/// `poster_url`); system attributes other than `$id` are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCountRecord {
    #[serde(rename = "$id")]
    pub id: DocumentId,
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    pub count: i64,
    #[serde(default)]
    pub movie_id: i64,
    #[serde(default)]
    pub poster_url: String,
}

/// Attributes for a counter that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSearchCount {
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    pub count: i64,
    pub movie_id: i64,
    pub poster_url: String,
}

impl NewSearchCount {
    /// Counter for the first successful search of `term`.
    #[must_use]
    pub fn first_search(term: &str, movie: &Movie, poster_url: String) -> Self {
        Self {
            search_term: term.to_string(),
            count: 1,
            movie_id: movie.id,
            poster_url,
        }
    }

    #[must_use]
    pub fn into_record(self, id: DocumentId) -> SearchCountRecord {
        SearchCountRecord {
            id,
            search_term: self.search_term,
            count: self.count,
            movie_id: self.movie_id,
            poster_url: self.poster_url,
        }
    }
}

/// A row of the trending panel. `rank` is positional and starts at 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendingEntry {
    pub rank: usize,
    pub search_term: String,
    pub count: i64,
    pub movie_id: i64,
    pub poster_url: String,
}

impl TrendingEntry {
    /// Ranks records in the order given; callers pass them sorted by count.
    #[must_use]
    pub fn rank_all(records: Vec<SearchCountRecord>) -> Vec<Self> {
        records
            .into_iter()
            .enumerate()
            .map(|(i, record)| Self {
                rank: i + 1,
                search_term: record.search_term,
                count: record.count,
                movie_id: record.movie_id,
                poster_url: record.poster_url,
            })
            .collect()
    }
}
