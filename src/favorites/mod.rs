use std::collections::HashSet;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// Common trait for favorites backends
#[async_trait]
pub trait FavoritesBackend: Send + Sync {
    /// Fetch the full set of favorited property ids
    async fn list(&self) -> Result<Vec<String>>;

    async fn add(&self, property_id: &str) -> Result<()>;

    async fn remove(&self, property_id: &str) -> Result<()>;
}

/// Favorites client talking to the remote favorites API
pub struct HttpFavoritesClient {
    client: Client,
    base_url: String,
}

impl HttpFavoritesClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl FavoritesBackend for HttpFavoritesClient {
    async fn list(&self) -> Result<Vec<String>> {
        let url = format!("{}/favorites", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to reach favorites API")?;

        if !response.status().is_success() {
            anyhow::bail!("Favorites request failed: {}", response.status());
        }
        response
            .json()
            .await
            .context("Failed to decode favorites response")
    }

    async fn add(&self, property_id: &str) -> Result<()> {
        let url = format!("{}/favorites/{}", self.base_url, property_id);
        let response = self
            .client
            .post(&url)
            .send()
            .await
            .context("Failed to reach favorites API")?;

        if !response.status().is_success() {
            anyhow::bail!("Adding favorite failed: {}", response.status());
        }
        Ok(())
    }

    async fn remove(&self, property_id: &str) -> Result<()> {
        let url = format!("{}/favorites/{}", self.base_url, property_id);
        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .context("Failed to reach favorites API")?;

        if !response.status().is_success() {
            anyhow::bail!("Removing favorite failed: {}", response.status());
        }
        Ok(())
    }
}

/// Maps property ids to a liked/unliked flag for the card views
///
/// Persistence is delegated to the backend; the local set changes only after
/// the remote call succeeds, so a failed call never leaves a phantom
/// favorite. Toasting on success or failure is the caller's job.
pub struct FavoritesCoordinator<B> {
    backend: B,
    ids: HashSet<String>,
    loading: bool,
}

impl<B: FavoritesBackend> FavoritesCoordinator<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            ids: HashSet::new(),
            loading: false,
        }
    }

    /// Fetch the current favorite set from the backend
    pub async fn load(&mut self) -> Result<()> {
        self.loading = true;
        let result = self.backend.list().await;
        self.loading = false;

        let ids = result.context("Failed to load favorites")?;
        debug!("Loaded {} favorites", ids.len());
        self.ids = ids.into_iter().collect();
        Ok(())
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn is_favorite(&self, property_id: &str) -> bool {
        self.ids.contains(property_id)
    }

    pub async fn add_favorite(&mut self, property_id: &str) -> Result<()> {
        self.backend.add(property_id).await?;
        self.ids.insert(property_id.to_string());
        Ok(())
    }

    pub async fn remove_favorite(&mut self, property_id: &str) -> Result<()> {
        self.backend.remove(property_id).await?;
        self.ids.remove(property_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Backend over an in-memory set, optionally failing every call
    struct MockBackend {
        ids: Mutex<Vec<String>>,
        fail: bool,
    }

    impl MockBackend {
        fn with_ids(ids: &[&str]) -> Self {
            Self {
                ids: Mutex::new(ids.iter().map(|s| s.to_string()).collect()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                ids: Mutex::new(Vec::new()),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl FavoritesBackend for MockBackend {
        async fn list(&self) -> Result<Vec<String>> {
            if self.fail {
                anyhow::bail!("favorites API unavailable");
            }
            Ok(self.ids.lock().unwrap().clone())
        }

        async fn add(&self, property_id: &str) -> Result<()> {
            if self.fail {
                anyhow::bail!("favorites API unavailable");
            }
            self.ids.lock().unwrap().push(property_id.to_string());
            Ok(())
        }

        async fn remove(&self, property_id: &str) -> Result<()> {
            if self.fail {
                anyhow::bail!("favorites API unavailable");
            }
            self.ids.lock().unwrap().retain(|id| id != property_id);
            Ok(())
        }
    }

    #[tokio::test]
    async fn load_exposes_the_remote_set() {
        let mut coordinator = FavoritesCoordinator::new(MockBackend::with_ids(&["a", "b"]));
        coordinator.load().await.unwrap();
        assert!(coordinator.is_favorite("a"));
        assert!(coordinator.is_favorite("b"));
        assert!(!coordinator.is_favorite("c"));
        assert!(!coordinator.loading());
    }

    #[tokio::test]
    async fn add_and_remove_update_both_sides() {
        let mut coordinator = FavoritesCoordinator::new(MockBackend::with_ids(&[]));
        coordinator.add_favorite("x").await.unwrap();
        assert!(coordinator.is_favorite("x"));

        coordinator.remove_favorite("x").await.unwrap();
        assert!(!coordinator.is_favorite("x"));
    }

    #[tokio::test]
    async fn failed_mutation_leaves_the_local_set_untouched() {
        let mut coordinator = FavoritesCoordinator::new(MockBackend::failing());
        assert!(coordinator.add_favorite("x").await.is_err());
        assert!(!coordinator.is_favorite("x"));

        assert!(coordinator.load().await.is_err());
        assert!(!coordinator.loading());
    }
}
