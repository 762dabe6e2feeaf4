//! TTL + LRU store for classification results.

use super::key::CacheKey;
use crate::types::ClassificationResult;
use crate::{Error, ErrorContext, Result};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tokio::time::{Duration, Instant};

/// Longest TTL the cache honours; larger values are clamped to this.
pub const MAX_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_entries: 500,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub expirations: u64,
    pub evictions: u64,
}

impl CacheStats {
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Default)]
struct AtomicStats {
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
    expirations: AtomicU64,
    evictions: AtomicU64,
}

impl AtomicStats {
    fn to_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

struct CacheEntry {
    result: ClassificationResult,
    expires_at: Instant,
}

/// In-memory classification cache.
///
/// Every operation takes the one mutex for its whole read-modify-write, so
/// the capacity and expiry guarantees hold under concurrent use. The lock is
/// never held across an `.await`.
pub struct ClassificationCache {
    entries: Mutex<LruCache<CacheKey, CacheEntry>>,
    ttl: Duration,
    stats: AtomicStats,
}

impl ClassificationCache {
    pub fn new(config: CacheConfig) -> Result<Self> {
        let capacity = NonZeroUsize::new(config.max_entries).ok_or_else(|| {
            Error::configuration_with_context(
                "cache capacity must be non-zero",
                ErrorContext::new()
                    .with_field_path("cache.max_entries")
                    .with_source("classification_cache"),
            )
        })?;
        let ttl = if config.ttl > MAX_TTL {
            tracing::warn!(
                ttl_secs = config.ttl.as_secs(),
                max_secs = MAX_TTL.as_secs(),
                "cache TTL too large, clamping"
            );
            MAX_TTL
        } else {
            config.ttl
        };
        Ok(Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
            stats: AtomicStats::default(),
        })
    }

    /// Return a live entry and mark it most recently used. An expired entry
    /// is removed and reported as a miss.
    pub fn get(&self, key: &CacheKey) -> Option<ClassificationResult> {
        let Ok(mut entries) = self.entries.lock() else {
            tracing::warn!("classification cache lock poisoned, treating as miss");
            self.stats.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        };
        let now = Instant::now();
        match entries.peek(key).map(|e| e.expires_at > now) {
            Some(true) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                entries.get(key).map(|e| e.result.clone())
            }
            Some(false) => {
                entries.pop(key);
                self.stats.expirations.fetch_add(1, Ordering::Relaxed);
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            None => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insert or overwrite with a fresh TTL. At capacity the least recently
    /// used entry is evicted.
    pub fn put(&self, key: CacheKey, result: ClassificationResult) {
        let now = Instant::now();
        let expires_at = now
            .checked_add(self.ttl)
            .or_else(|| now.checked_add(MAX_TTL))
            .unwrap_or(now);
        let entry = CacheEntry { result, expires_at };
        let Ok(mut entries) = self.entries.lock() else {
            tracing::warn!("classification cache lock poisoned, dropping insert");
            return;
        };
        let displaced = entries.push(key.clone(), entry);
        self.stats.inserts.fetch_add(1, Ordering::Relaxed);
        if let Some((evicted, _)) = displaced {
            if evicted != key {
                self.stats.evictions.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(key = %evicted, "evicted least recently used classification");
            }
        }
    }

    /// Remove every expired entry, returning how many were dropped.
    pub fn sweep_expired(&self) -> usize {
        let Ok(mut entries) = self.entries.lock() else {
            return 0;
        };
        let now = Instant::now();
        let expired: Vec<CacheKey> = entries
            .iter()
            .filter(|(_, e)| e.expires_at <= now)
            .map(|(k, _)| k.clone())
            .collect();
        for key in &expired {
            entries.pop(key);
        }
        self.stats
            .expirations
            .fetch_add(expired.len() as u64, Ordering::Relaxed);
        expired.len()
    }

    /// Entries physically stored, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock().map(|e| e.cap().get()).unwrap_or(0)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        let now = Instant::now();
        self.entries
            .lock()
            .map(|e| e.peek(key).map(|entry| entry.expires_at > now).unwrap_or(false))
            .unwrap_or(false)
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.to_stats()
    }
}
