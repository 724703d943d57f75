use serde::{Deserialize, Serialize};

/// A catalog entry as returned by the movie API.
///
/// Only the fields the app renders are kept; unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub original_language: String,
}

impl Movie {
    /// Full poster URL, or `None` when the catalog has no poster for this movie.
    #[must_use]
    pub fn poster_url(&self, image_base_url: &str) -> Option<String> {
        let path = self.poster_path.as_deref()?.trim();
        if path.is_empty() {
            return None;
        }

        Some(format!(
            "{}/{}",
            image_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        ))
    }
}
