//! Classification cache: remembers successful classifications for a while.
//!
//! # Classification Cache Module
//!
//! Results are keyed by a SHA-256 fingerprint of the exact content and held
//! for a fixed TTL. Once the configured capacity is reached, the least
//! recently used entry is evicted on insert.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`ClassificationCache`] | Mutex-guarded TTL + LRU store |
//! | [`CacheConfig`] | TTL and capacity (defaults: 300 s, 500 entries) |
//! | [`CacheKey`] | Content fingerprint |
//! | [`CacheStats`] | Hit, miss, expiry and eviction counters |
//!
//! ## Example
//!
//! ```rust
//! use intentkeeper::cache::{CacheConfig, CacheKey, ClassificationCache};
//! use intentkeeper::ClassificationResult;
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> intentkeeper::Result<()> {
//! let cache = ClassificationCache::new(
//!     CacheConfig::new()
//!         .with_ttl(Duration::from_secs(60))
//!         .with_max_entries(100),
//! )?;
//!
//! let key = CacheKey::from_content("Some post worth classifying");
//! cache.put(key.clone(), ClassificationResult::too_short());
//! assert!(cache.get(&key).is_some());
//! # Ok(())
//! # }
//! ```
//!
//! Expired entries are logically absent: [`ClassificationCache::get`] removes
//! them on sight, and [`ClassificationCache::sweep_expired`] drops the rest.

mod key;
mod store;

pub use key::CacheKey;
pub use store::{CacheConfig, CacheStats, ClassificationCache, MAX_TTL};
