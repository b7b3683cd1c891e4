//! Opportunistic cache with per-entry expiry.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::error::CacheError;

/// Best-effort cache with time-boxed entries.
///
/// Semantics match the usual remote cache contract: `get` returns `None` for
/// absent or expired entries, `set_with_expiry` replaces any previous entry,
/// and `delete` is a no-op for keys that are not present.
pub trait Cache: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
    fn delete(&self, key: &str) -> Result<(), CacheError>;
}

struct CacheEntry {
    value: String,
    expires_at: Instant,
}

/// In-process cache keyed by string, with per-entry deadlines.
///
/// Expired entries are dropped lazily when read; there is no background
/// sweeper. That is sufficient here because the record service only ever
/// holds a bounded number of keys (one per record plus the invalidation
/// entries).
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        if key.is_empty() {
            return Err(CacheError::InvalidKey("key is empty".into()));
        }

        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}
