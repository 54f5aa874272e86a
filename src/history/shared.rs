//! In-memory history set shared by the producer and consumer of a run.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::RwLock;

/// URLs already downloaded, either in earlier runs or during this one.
///
/// The producer reads it to skip known media; only the consumer inserts, after
/// a download has completed.
#[derive(Debug, Clone, Default)]
pub struct SharedHistory {
    urls: Arc<RwLock<HashSet<String>>>,
}

impl SharedHistory {
    pub fn new(urls: HashSet<String>) -> Self {
        Self {
            urls: Arc::new(RwLock::new(urls)),
        }
    }

    pub async fn contains(&self, url: &str) -> bool {
        self.urls.read().await.contains(url)
    }

    /// Record a completed download. Returns `false` if it was already present.
    pub async fn insert(&self, url: String) -> bool {
        self.urls.write().await.insert(url)
    }

    pub async fn len(&self) -> usize {
        self.urls.read().await.len()
    }

    /// Copy of the current set, for persisting.
    pub async fn snapshot(&self) -> HashSet<String> {
        self.urls.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_state() {
        let history = SharedHistory::new(HashSet::from(["https://a".to_string()]));
        let producer_view = history.clone();

        assert!(producer_view.contains("https://a").await);
        assert!(!producer_view.contains("https://b").await);

        assert!(history.insert("https://b".to_string()).await);
        assert!(!history.insert("https://b".to_string()).await);

        assert!(producer_view.contains("https://b").await);
        assert_eq!(producer_view.len().await, 2);
        assert_eq!(history.snapshot().await.len(), 2);
    }
}
