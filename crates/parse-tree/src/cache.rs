use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// String-keyed memo table shared between threads.
///
/// The first value published for a key wins; later publishers receive the
/// stored value instead of their own.
pub(crate) struct Cache<T> {
    entries: Mutex<HashMap<String, T>>,
}

impl<T: Clone> Cache<T> {
    pub fn new() -> Self {
        Cache {
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<T> {
        self.lock().get(key).cloned()
    }

    pub fn publish(&self, key: &str, value: T) -> T {
        self.lock().entry(key.to_string()).or_insert(value).clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    // Entries are only ever inserted whole, so a poisoned map is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, T>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_publish_wins() {
        let cache = Cache::new();
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.publish("a", 1), 1);
        assert_eq!(cache.publish("a", 2), 1);
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert_eq!(cache.len(), 0);
    }
}
