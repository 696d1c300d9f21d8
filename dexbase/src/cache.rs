use bytes::Bytes;

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Response bodies keyed by their exact request URL.
///
/// Entries older than the TTL are evicted on lookup and whenever a new
/// body is stored. Only successful responses are ever stored.
#[derive(Clone)]
pub struct Cache {
    ttl: Duration,
    entries: Arc<Mutex<HashMap<String, Entry>>>,
}

struct Entry {
    stored_at: Instant,
    body: Bytes,
}

impl Cache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn get(&self, url: &str) -> Option<Bytes> {
        let mut entries = self.entries();

        let entry = entries.get(url)?;

        if entry.stored_at.elapsed() >= self.ttl {
            let _ = entries.remove(url);
            return None;
        }

        Some(entry.body.clone())
    }

    pub fn insert(&self, url: impl Into<String>, body: Bytes) {
        let mut entries = self.entries();

        entries.retain(|_, entry| entry.stored_at.elapsed() < self.ttl);

        let _ = entries.insert(
            url.into(),
            Entry {
                stored_at: Instant::now(),
                body,
            },
        );
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("ttl", &self.ttl)
            .field("entries", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_fresh_entries() {
        let cache = Cache::new(Duration::from_secs(60));
        cache.insert("https://dex.test/type/fire", Bytes::from_static(b"{}"));

        assert_eq!(
            cache.get("https://dex.test/type/fire"),
            Some(Bytes::from_static(b"{}"))
        );
        assert_eq!(cache.get("https://dex.test/type/water"), None);
    }

    #[test]
    fn evicts_expired_entries() {
        let cache = Cache::new(Duration::ZERO);
        cache.insert("https://dex.test/type/fire", Bytes::from_static(b"{}"));

        assert_eq!(cache.get("https://dex.test/type/fire"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn expired_entries_do_not_accumulate() {
        let cache = Cache::new(Duration::ZERO);

        for id in 0..1000 {
            cache.insert(format!("https://dex.test/pokemon/{id}"), Bytes::from_static(b"{}"));
        }

        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn fresh_entries_survive_inserts() {
        let cache = Cache::new(Duration::from_secs(60));
        cache.insert("a", Bytes::from_static(b"1"));
        cache.insert("b", Bytes::from_static(b"2"));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), Some(Bytes::from_static(b"1")));
    }

    #[test]
    fn keys_are_exact_urls() {
        let cache = Cache::new(Duration::from_secs(60));
        cache.insert("https://dex.test/ability?limit=1000", Bytes::from_static(b"a"));

        assert_eq!(cache.get("https://dex.test/ability"), None);
        assert_eq!(cache.get("https://dex.test/ability?limit=100"), None);
    }

    #[test]
    fn clear_invalidates_everything() {
        let cache = Cache::new(Duration::from_secs(60));
        cache.insert("a", Bytes::from_static(b"1"));
        cache.insert("b", Bytes::from_static(b"2"));
        cache.clear();

        assert!(cache.is_empty());
    }
}
