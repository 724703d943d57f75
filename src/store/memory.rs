use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{DocumentStore, StoreError};
use crate::domain::DocumentId;
use crate::models::{NewSearchCount, SearchCountRecord};

/// Process-local collection with the same semantics as the remote one.
///
/// Each operation is individually consistent but, like the remote service,
/// nothing spans a lookup and the write that follows it.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<Vec<SearchCountRecord>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_records(records: Vec<SearchCountRecord>) -> Self {
        Self {
            documents: RwLock::new(records),
        }
    }

    /// Snapshot of all records in insertion order.
    pub async fn records(&self) -> Vec<SearchCountRecord> {
        self.documents.read().await.clone()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_by_term(&self, term: &str) -> Result<Vec<SearchCountRecord>, StoreError> {
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .filter(|d| d.search_term == term)
            .cloned()
            .collect())
    }

    async fn top_by_count(&self, limit: usize) -> Result<Vec<SearchCountRecord>, StoreError> {
        let mut documents = self.documents.read().await.clone();
        documents.sort_by(|a, b| b.count.cmp(&a.count));
        documents.truncate(limit);
        Ok(documents)
    }

    async fn create(&self, record: NewSearchCount) -> Result<SearchCountRecord, StoreError> {
        let id = DocumentId::new(uuid::Uuid::new_v4().simple().to_string());
        let record = record.into_record(id);

        debug!(id = %record.id, term = %record.search_term, "Created search count");
        self.documents.write().await.push(record.clone());
        Ok(record)
    }

    async fn update_count(
        &self,
        id: &DocumentId,
        count: i64,
    ) -> Result<SearchCountRecord, StoreError> {
        let mut documents = self.documents.write().await;
        let record = documents
            .iter_mut()
            .find(|d| &d.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        record.count = count;
        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter(term: &str, count: i64) -> NewSearchCount {
        NewSearchCount {
            search_term: term.to_string(),
            count,
            movie_id: 1,
            poster_url: String::new(),
        }
    }

    #[tokio::test]
    async fn test_find_is_exact_match() {
        let store = MemoryStore::new();
        store.create(counter("dune", 1)).await.unwrap();
        store.create(counter("Dune", 1)).await.unwrap();

        let found = store.find_by_term("dune").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].search_term, "dune");
        assert!(store.find_by_term("dun").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_top_by_count_orders_and_limits() {
        let store = MemoryStore::new();
        for (term, count) in [("a", 2), ("b", 7), ("c", 1), ("d", 5)] {
            store.create(counter(term, count)).await.unwrap();
        }

        let top = store.top_by_count(3).await.unwrap();
        let terms: Vec<_> = top.iter().map(|r| r.search_term.as_str()).collect();
        assert_eq!(terms, vec!["b", "d", "a"]);
    }

    #[tokio::test]
    async fn test_update_count() {
        let store = MemoryStore::new();
        let created = store.create(counter("heat", 1)).await.unwrap();

        let updated = store.update_count(&created.id, 2).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.count, 2);

        let missing = store.update_count(&DocumentId::new("nope"), 3).await;
        assert!(matches!(missing, Err(StoreError::NotFound(_))));
    }
}
