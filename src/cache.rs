use lru::LruCache;
use std::num::NonZeroUsize;
use tokio::sync::Mutex;

const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(100) {
    Some(capacity) => capacity,
    None => panic!("default cache capacity must be non-zero"),
};

/// Bounded LRU map from the exact question string to its reply.
pub struct ResponseCache {
    entries: Mutex<LruCache<String, String>>,
    capacity: NonZeroUsize,
}

impl ResponseCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Looks up `question` and marks it most recently used.
    pub async fn get(&self, question: &str) -> Option<String> {
        self.entries.lock().await.get(question).cloned()
    }

    /// Inserts or refreshes `question`, evicting the least recently used
    /// entry when full.
    pub async fn put(&self, question: &str, response: &str) {
        let mut entries = self.entries.lock().await;
        if let Some((evicted, _)) = entries.push(question.to_string(), response.to_string()) {
            if evicted != question {
                tracing::debug!("Cache full, evicted: {}", evicted);
            }
        }
    }

    /// Membership check that leaves recency untouched.
    #[allow(dead_code)]
    pub async fn contains(&self, question: &str) -> bool {
        self.entries.lock().await.contains(question)
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
