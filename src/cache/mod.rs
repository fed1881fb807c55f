//! 缓存模块：由调用方持有的机场与天气查询缓存。
//!
//! # Lookup Cache Module
//!
//! Caller-owned caches for reference lookups that are expensive to repeat:
//! airport coordinates keyed by IATA code, and weather observations keyed by
//! coordinates with a 30 minute lifetime. There is no process-wide cache; the
//! caller constructs a [`CacheManager`] at startup and passes it by reference.
//!
//! Delay predictions are not cached here.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`CacheManager`] | TTL handling, JSON (de)serialization and statistics |
//! | [`CacheConfig`] | TTL, capacity and on/off switch |
//! | [`CacheBackend`] | Trait for storage backends |
//! | [`MemoryCache`] | In-memory LRU backend |
//! | [`NullCache`] | No-op backend |
//! | [`CacheKey`] | Airport and coordinate keys |
//!
//! ```rust
//! use flightwatch::cache::{CacheConfig, CacheKey, CacheManager};
//!
//! # async fn demo() -> flightwatch::Result<()> {
//! let cache = CacheManager::in_memory(CacheConfig::default());
//! cache.set(&CacheKey::airport("DEL"), &(28.5665, 77.1031)).await?;
//! let coords: Option<(f64, f64)> = cache.get(&CacheKey::airport("del")).await?;
//! assert!(coords.is_some());
//! # Ok(())
//! # }
//! ```

mod backend;
mod key;
mod manager;

pub use backend::{CacheBackend, MemoryCache, NullCache};
pub use key::CacheKey;
pub use manager::{CacheConfig, CacheManager, CacheStats, WEATHER_TTL};
