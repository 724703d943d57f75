//! REST client for the hosted document database holding search counters.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;
use url::Url;

use crate::config::{Secret, StoreConfig};
use crate::domain::DocumentId;
use crate::models::{NewSearchCount, SearchCountRecord};
use crate::store::{DocumentStore, StoreError};

const SEARCH_TERM_ATTRIBUTE: &str = "searchTerm";
const COUNT_ATTRIBUTE: &str = "count";

/// Query strings in the JSON form the v1 REST API accepts in `queries[]`.
pub mod query {
    use serde_json::{Value, json};

    #[must_use]
    pub fn equal(attribute: &str, value: &str) -> Value {
        json!({ "method": "equal", "attribute": attribute, "values": [value] })
    }

    #[must_use]
    pub fn order_desc(attribute: &str) -> Value {
        json!({ "method": "orderDesc", "attribute": attribute })
    }

    #[must_use]
    pub fn limit(n: usize) -> Value {
        json!({ "method": "limit", "values": [n] })
    }
}

#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    total: u64,
    #[serde(default)]
    documents: Vec<SearchCountRecord>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct AppwriteStore {
    client: Client,
    documents_url: Url,
    project_id: String,
    api_key: Option<Secret>,
}

impl AppwriteStore {
    pub fn new(client: Client, config: &StoreConfig) -> Result<Self, StoreError> {
        let mut documents_url =
            Url::parse(&config.endpoint).map_err(|e| StoreError::Endpoint(e.to_string()))?;

        documents_url
            .path_segments_mut()
            .map_err(|()| StoreError::Endpoint(config.endpoint.clone()))?
            .pop_if_empty()
            .extend([
                "databases",
                config.database_id.as_str(),
                "collections",
                config.collection_id.as_str(),
                "documents",
            ]);

        Ok(Self {
            client,
            documents_url,
            project_id: config.project_id.clone(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
        })
    }

    #[must_use]
    pub fn documents_url(&self) -> &Url {
        &self.documents_url
    }

    fn document_url(&self, id: &DocumentId) -> Url {
        let mut url = self.documents_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id.as_str());
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header("X-Appwrite-Project", self.project_id.as_str());

        match &self.api_key {
            Some(key) => builder.header("X-Appwrite-Key", key.expose()),
            None => builder,
        }
    }

    async fn read_success(response: Response) -> Result<String, StoreError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(StoreError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }

    async fn list(&self, queries: &[Value]) -> Result<Vec<SearchCountRecord>, StoreError> {
        let mut url = self.documents_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            for q in queries {
                pairs.append_pair("queries[]", &q.to_string());
            }
        }

        let response = self.request(Method::GET, url).send().await?;
        let body = Self::read_success(response).await?;
        let list: DocumentList = serde_json::from_str(&body)?;

        debug!(
            total = list.total,
            returned = list.documents.len(),
            "Listed search counts"
        );
        Ok(list.documents)
    }
}

#[async_trait]
impl DocumentStore for AppwriteStore {
    async fn find_by_term(&self, term: &str) -> Result<Vec<SearchCountRecord>, StoreError> {
        self.list(&[query::equal(SEARCH_TERM_ATTRIBUTE, term)]).await
    }

    async fn top_by_count(&self, limit: usize) -> Result<Vec<SearchCountRecord>, StoreError> {
        self.list(&[query::order_desc(COUNT_ATTRIBUTE), query::limit(limit)])
            .await
    }

    async fn create(&self, record: NewSearchCount) -> Result<SearchCountRecord, StoreError> {
        let body = json!({ "documentId": "unique()", "data": record });

        let response = self
            .request(Method::POST, self.documents_url.clone())
            .json(&body)
            .send()
            .await?;
        let body = Self::read_success(response).await?;

        Ok(serde_json::from_str(&body)?)
    }

    async fn update_count(
        &self,
        id: &DocumentId,
        count: i64,
    ) -> Result<SearchCountRecord, StoreError> {
        let body = json!({ "data": { COUNT_ATTRIBUTE: count } });

        let response = self
            .request(Method::PATCH, self.document_url(id))
            .json(&body)
            .send()
            .await?;
        let body = Self::read_success(response).await?;

        Ok(serde_json::from_str(&body)?)
    }
}
