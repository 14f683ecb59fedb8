use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use url::Url;

/// URLs claimed during one scan. Only ever grows.
#[derive(Debug, Clone, Default)]
pub struct VisitedRegistry {
    inner: Arc<RwLock<HashSet<Url>>>,
}

impl VisitedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, url: &Url) -> bool {
        self.inner.read().await.contains(url)
    }

    pub async fn add(&self, url: Url) {
        self.inner.write().await.insert(url);
    }

    /// Inserts `url` under a single write lock. Returns `true` only for the
    /// caller that added it.
    pub async fn claim(&self, url: &Url) -> bool {
        let mut visited = self.inner.write().await;
        if visited.contains(url) {
            false
        } else {
            visited.insert(url.clone())
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
