//! Live gold and currency price feed.
//!
//! Fetches precious-metal and currency quotes from CollectAPI
//! (optionally through the aggregating bridge proxy), normalizes them
//! into canonical instruments, caches the raw payloads with
//! stale-while-revalidate semantics and publishes diffed snapshots on a
//! fixed polling cadence. Alerts, the watchlist and the holdings ledger
//! persist through the same durable state store.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod utils;

// Re-export commonly used items
pub use application::{
    AlertBook, AlertDirection, ConnectionStatus, FeedState, GoldLedger, LedgerEntry,
    NotificationSink, PriceAlert, PriceFeed, Watchlist,
};
pub use domain::{MacroRates, PrevPrice, PriceQuote, Snapshot};
pub use infrastructure::{init_tracing, FeedConfig, StateStore, SwrCache};
pub use utils::{is_market_open, Shutdown};
