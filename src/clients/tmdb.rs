use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::{CatalogConfig, Secret};
use crate::constants::messages;
use crate::models::Movie;

/// What to ask the catalog for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogQuery {
    /// Default listing, most popular first.
    Popular,
    /// Free-text title search.
    Text(String),
}

impl CatalogQuery {
    /// A blank term means "no filter" and maps to the popular listing.
    #[must_use]
    pub fn from_term(term: &str) -> Self {
        if term.trim().is_empty() {
            Self::Popular
        } else {
            Self::Text(term.to_string())
        }
    }

    #[must_use]
    pub fn term(&self) -> Option<&str> {
        match self {
            Self::Popular => None,
            Self::Text(term) => Some(term),
        }
    }

    /// Path and query string relative to the catalog base URL.
    #[must_use]
    pub fn path_and_query(&self) -> String {
        match self {
            Self::Popular => "/discover/movie?sort_by=popularity.desc".to_string(),
            Self::Text(term) => format!("/search/movie?query={}", urlencoding::encode(term)),
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalog API error: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Invalid catalog response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The catalog answered successfully but flagged the request as failed.
    #[error("Catalog rejected the query: {}", .message.as_deref().unwrap_or("no message"))]
    Api { message: Option<String> },
}

impl CatalogError {
    /// Text shown to the user for this failure.
    ///
    /// Only API-level errors carry a message worth showing; everything else
    /// collapses to a generic retry-later line.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message } => message
                .clone()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| messages::API_FALLBACK_ERROR.to_string()),
            Self::Http(_) | Self::Status { .. } | Self::Decode(_) => {
                messages::FETCH_FAILED.to_string()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    #[serde(default)]
    results: Vec<Movie>,
    #[serde(default)]
    response: Option<String>,
    #[serde(rename = "Error", default)]
    error: Option<String>,
}

impl CatalogResponse {
    fn into_results(self) -> Result<Vec<Movie>, CatalogError> {
        if self.response.as_deref() == Some("False") {
            return Err(CatalogError::Api {
                message: self.error,
            });
        }
        Ok(self.results)
    }
}

/// Parses a successful catalog body into its result list.
pub fn parse_catalog_body(body: &str) -> Result<Vec<Movie>, CatalogError> {
    let response: CatalogResponse = serde_json::from_str(body)?;
    response.into_results()
}

#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn fetch_movies(&self, query: &CatalogQuery) -> Result<Vec<Movie>, CatalogError>;
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: Secret,
}

impl TmdbClient {
    #[must_use]
    pub fn new(client: Client, config: &CatalogConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn url_for(&self, query: &CatalogQuery) -> String {
        format!("{}{}", self.base_url, query.path_and_query())
    }
}

#[async_trait]
impl CatalogApi for TmdbClient {
    async fn fetch_movies(&self, query: &CatalogQuery) -> Result<Vec<Movie>, CatalogError> {
        let url = self.url_for(query);
        debug!(?query, "Fetching movies from catalog");

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.api_key.expose())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Status { status, body });
        }

        let body = response.text().await?;
        parse_catalog_body(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_from_term() {
        assert_eq!(CatalogQuery::from_term(""), CatalogQuery::Popular);
        assert_eq!(CatalogQuery::from_term("   "), CatalogQuery::Popular);
        assert_eq!(
            CatalogQuery::from_term("dune"),
            CatalogQuery::Text("dune".to_string())
        );
    }

    #[test]
    fn test_path_and_query() {
        assert_eq!(
            CatalogQuery::Popular.path_and_query(),
            "/discover/movie?sort_by=popularity.desc"
        );
        assert_eq!(
            CatalogQuery::from_term("the matrix & co").path_and_query(),
            "/search/movie?query=the%20matrix%20%26%20co"
        );
    }

    #[test]
    fn test_parse_results() {
        let movies =
            parse_catalog_body(r#"{"page": 1, "results": [{"id": 1, "title": "Alien"}]}"#).unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "Alien");

        let empty = parse_catalog_body(r#"{"page": 1, "results": []}"#).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_parse_embedded_failure() {
        let err = parse_catalog_body(r#"{"response": "False", "Error": "Too many results."}"#)
            .unwrap_err();
        assert!(matches!(err, CatalogError::Api { .. }));
        assert_eq!(err.user_message(), "Too many results.");

        let err = parse_catalog_body(r#"{"response": "False"}"#).unwrap_err();
        assert_eq!(err.user_message(), messages::API_FALLBACK_ERROR);
    }

    #[test]
    fn test_transport_errors_use_generic_message() {
        let err = CatalogError::Status {
            status: 401,
            body: "invalid token".to_string(),
        };
        assert_eq!(err.user_message(), messages::FETCH_FAILED);

        let err = parse_catalog_body("<html>").unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
        assert_eq!(err.user_message(), messages::FETCH_FAILED);
    }
}
