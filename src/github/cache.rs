use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::sync::Mutex;

/// Size- and time-bounded store of GitHub API responses, keyed by request URL.
///
/// Cloning shares the underlying store. A capacity of zero disables caching.
#[derive(Clone)]
pub struct ResponseCache {
    state: Arc<Mutex<CacheState>>,
    capacity: usize,
    ttl: Duration,
}

struct CacheState {
    entries: HashMap<String, CacheEntry>,
    // Insertion order, oldest first
    order: VecDeque<String>,
}

struct CacheEntry {
    value: Value,
    inserted_at: Instant,
}

impl ResponseCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState {
                entries: HashMap::new(),
                order: VecDeque::new(),
            })),
            capacity,
            ttl,
        }
    }

    pub fn disabled() -> Self {
        Self::new(0, Duration::ZERO)
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        if self.capacity == 0 {
            return None;
        }

        let mut state = self.state.lock().await;
        match state.entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                return Some(entry.value.clone());
            }
            Some(_) => {}
            None => return None,
        }

        tracing::debug!("Cache entry expired: {}", key);
        state.entries.remove(key);
        state.order.retain(|k| k != key);
        None
    }

    pub async fn insert(&self, key: impl Into<String>, value: Value) {
        if self.capacity == 0 {
            return;
        }

        let key = key.into();
        let mut state = self.state.lock().await;

        if state.entries.contains_key(&key) {
            state.order.retain(|k| k != &key);
        } else {
            while state.entries.len() >= self.capacity {
                match state.order.pop_front() {
                    Some(oldest) => {
                        tracing::debug!("Evicting cache entry: {}", oldest);
                        state.entries.remove(&oldest);
                    }
                    None => break,
                }
            }
        }

        state.order.push_back(key.clone());
        state.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(256, Duration::from_secs(300))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_returns_inserted_value() {
        let cache = ResponseCache::new(4, Duration::from_secs(60));
        cache.insert("users/octocat", json!({"login": "octocat"})).await;

        assert_eq!(
            cache.get("users/octocat").await,
            Some(json!({"login": "octocat"}))
        );
        assert_eq!(cache.get("users/nobody").await, None);
    }

    #[tokio::test]
    async fn test_evicts_oldest_at_capacity() {
        let cache = ResponseCache::new(2, Duration::from_secs(60));
        cache.insert("a", json!(1)).await;
        cache.insert("b", json!(2)).await;
        // Refreshing "a" makes "b" the oldest
        cache.insert("a", json!(10)).await;
        cache.insert("c", json!(3)).await;

        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.get("a").await, Some(json!(10)));
        assert_eq!(cache.get("b").await, None);
        assert_eq!(cache.get("c").await, Some(json!(3)));
    }

    #[tokio::test]
    async fn test_expired_entries_are_dropped() {
        let cache = ResponseCache::new(2, Duration::ZERO);
        cache.insert("a", json!(1)).await;

        assert_eq!(cache.get("a").await, None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_disabled_cache_stores_nothing() {
        let cache = ResponseCache::disabled();
        cache.insert("a", json!(1)).await;
        assert_eq!(cache.get("a").await, None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let cache = ResponseCache::default();
        let other = cache.clone();
        cache.insert("a", json!(1)).await;
        assert_eq!(other.get("a").await, Some(json!(1)));
    }
}
