//! Infrastructure Layer
//!
//! Durable state, caching, configuration and logging. Depends on the
//! domain layer but not on the application layer.

pub mod cache;
pub mod config;
pub mod logging;
pub mod store;

pub use cache::{
    CacheOutcome, CachedPayload, SwrCache, BRIDGE_CACHE_KEY, CURRENCY_CACHE_KEY, GOLD_CACHE_KEY,
};
pub use config::{ConfigError, FeedConfig};
pub use logging::init_tracing;
pub use store::StateStore;
