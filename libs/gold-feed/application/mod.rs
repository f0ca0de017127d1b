//! Application layer: the polling feed plus the user-facing features
//! built on top of it (alerts, watchlist, holdings ledger).

pub mod alerts;
pub mod feed;
pub mod ledger;
pub mod watchlist;

pub use alerts::{should_notify, AlertBook, AlertDirection, NotificationSink, PriceAlert};
pub use feed::{ConnectionStatus, FeedState, PriceFeed};
pub use ledger::{GoldLedger, LedgerEntry, LedgerValuation};
pub use watchlist::{set_theme_preference, theme_preference, Watchlist};
