use crate::models::SearchResponse;
use crate::search::query::SearchRequest;
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for search backends
/// This keeps the views independent of the concrete HTTP client
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run a search and return one page of results
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse>;

    /// Get the name of the backend
    fn backend_name(&self) -> &'static str;
}
