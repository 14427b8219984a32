use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Time source for cache expiry. Injected so tests can run against a mock
/// instead of the wall clock.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct Entry<V> {
    stored_at: Instant,
    value: V,
}

/// Memo cache for external service calls, keyed by (operation, argument).
/// Entries expire after the configured TTL; there is no background eviction,
/// stale entries are dropped on access.
#[derive(Clone)]
pub struct TtlCache<V> {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Arc<Mutex<HashMap<(String, String), Entry<V>>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn get(&self, operation: &str, argument: &str) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().expect("ttl cache mutex poisoned");
        let key = (operation.to_string(), argument.to_string());
        match entries.get(&key) {
            Some(entry) if now.duration_since(entry.stored_at) < self.ttl => {
                Some(entry.value.clone())
            }
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    pub fn put(&self, operation: &str, argument: &str, value: V) {
        let now = self.clock.now();
        let mut entries = self.entries.lock().expect("ttl cache mutex poisoned");
        entries.insert(
            (operation.to_string(), argument.to_string()),
            Entry {
                stored_at: now,
                value,
            },
        );
    }

    pub fn invalidate(&self, operation: &str, argument: &str) {
        let mut entries = self.entries.lock().expect("ttl cache mutex poisoned");
        entries.remove(&(operation.to_string(), argument.to_string()));
    }
}
