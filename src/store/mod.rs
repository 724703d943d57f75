//! Access to the collection of search counters.
//!
//! The trait mirrors the primitives the hosted document database offers:
//! equality lookup, ordered listing, create and update. There is no atomic
//! "increment or insert", so a caller that reads then writes can race with
//! another caller doing the same for a new term and produce two documents.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::DocumentId;
use crate::models::{NewSearchCount, SearchCountRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Document store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Document store returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid document store response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid document store endpoint: {0}")]
    Endpoint(String),

    #[error("Document not found: {0}")]
    NotFound(DocumentId),
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns every record whose `searchTerm` equals `term` exactly.
    async fn find_by_term(&self, term: &str) -> Result<Vec<SearchCountRecord>, StoreError>;

    /// Returns at most `limit` records ordered by `count`, highest first.
    async fn top_by_count(&self, limit: usize) -> Result<Vec<SearchCountRecord>, StoreError>;

    /// Creates a record under a freshly generated identity.
    async fn create(&self, record: NewSearchCount) -> Result<SearchCountRecord, StoreError>;

    /// Overwrites the `count` of an existing record.
    async fn update_count(
        &self,
        id: &DocumentId,
        count: i64,
    ) -> Result<SearchCountRecord, StoreError>;
}
