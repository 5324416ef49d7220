//! Cache storage.

use std::sync::RwLock;

use lru::LruCache;
use time::OffsetDateTime;

use crate::domain::entities::PostRecord;

use super::config::CacheConfig;
use super::keys::QueryKey;
use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::store";

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    expires_at: OffsetDateTime,
}

/// LRU map of query results with per-entry expiry.
///
/// Expired entries are dropped lazily when looked up.
pub struct ResultStore<T> {
    entries: RwLock<LruCache<QueryKey, Entry<T>>>,
}

impl<T: Clone> ResultStore<T> {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: RwLock::new(LruCache::new(config.max_entries_non_zero())),
        }
    }

    pub fn get(&self, key: &QueryKey, now: OffsetDateTime) -> Option<T> {
        let mut entries = rw_write(&self.entries, SOURCE, "get");
        match entries.get(key) {
            Some(entry) if entry.expires_at > now => Some(entry.value.clone()),
            Some(_) => {
                entries.pop(key);
                None
            }
            None => None,
        }
    }

    /// Stores `value`; returns the key evicted to make room, if any.
    pub fn put(&self, key: QueryKey, value: T, expires_at: OffsetDateTime) -> Option<QueryKey> {
        rw_write(&self.entries, SOURCE, "put")
            .push(key.clone(), Entry { value, expires_at })
            .and_then(|(evicted, _)| (evicted != key).then_some(evicted))
    }

    pub fn clear(&self) {
        rw_write(&self.entries, SOURCE, "clear").clear();
    }

    pub fn len(&self) -> usize {
        rw_read(&self.entries, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result stores for the post query service, one per result shape.
pub struct QueryCache {
    pub posts: ResultStore<Option<PostRecord>>,
    pub lists: ResultStore<Vec<PostRecord>>,
}

impl QueryCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            posts: ResultStore::new(config),
            lists: ResultStore::new(config),
        }
    }

    pub fn clear(&self) {
        self.posts.clear();
        self.lists.clear();
    }

    pub fn len(&self) -> usize {
        self.posts.len() + self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use time::{Duration, macros::datetime};

    use super::*;

    fn store(limit: usize) -> ResultStore<u32> {
        ResultStore::new(&CacheConfig {
            max_entries: limit,
            ..Default::default()
        })
    }

    #[test]
    fn returns_value_until_expiry() {
        let store = store(4);
        let now = datetime!(2024-01-01 0:00 UTC);
        let key = QueryKey::ByTag("rust".to_string());

        store.put(key.clone(), 42, now + Duration::minutes(10));

        assert_eq!(store.get(&key, now), Some(42));
        assert_eq!(store.get(&key, now + Duration::minutes(9)), Some(42));
        assert_eq!(store.get(&key, now + Duration::minutes(10)), None);
        assert!(store.is_empty(), "expired entry should be dropped on lookup");
    }

    #[test]
    fn evicts_least_recently_used() {
        let store = store(2);
        let expires = datetime!(2024-01-01 1:00 UTC);
        let now = datetime!(2024-01-01 0:00 UTC);
        let first = QueryKey::ByTag("a".to_string());
        let second = QueryKey::ByTag("b".to_string());
        let third = QueryKey::ByTag("c".to_string());

        assert_eq!(store.put(first.clone(), 1, expires), None);
        assert_eq!(store.put(second.clone(), 2, expires), None);
        assert_eq!(store.get(&first, now), Some(1));

        assert_eq!(store.put(third.clone(), 3, expires), Some(second.clone()));
        assert_eq!(store.get(&second, now), None);
        assert_eq!(store.get(&first, now), Some(1));
        assert_eq!(store.get(&third, now), Some(3));
    }

    #[test]
    fn overwriting_a_key_is_not_an_eviction() {
        let store = store(1);
        let expires = datetime!(2024-01-01 1:00 UTC);
        let key = QueryKey::Search("x".to_string());

        store.put(key.clone(), 1, expires);
        assert_eq!(store.put(key.clone(), 2, expires), None);
        assert_eq!(store.get(&key, datetime!(2024-01-01 0:00 UTC)), Some(2));
    }

    #[test]
    fn query_cache_clear_empties_both_stores() {
        let cache = QueryCache::new(&CacheConfig::default());
        let expires = datetime!(2024-01-01 1:00 UTC);
        cache
            .posts
            .put(QueryKey::PostBySlug("a".to_string()), None, expires);
        cache.lists.put(
            QueryKey::LatestVerified { limit: 10 },
            Vec::new(),
            expires,
        );
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }
}
