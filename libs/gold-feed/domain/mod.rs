//! Domain Layer
//!
//! Pure business entities: the canonical instrument catalog, quotes,
//! snapshots and the change arithmetic between fetch cycles. No I/O.

pub mod catalog;
pub mod quote;

pub use catalog::{canonical_id, display_name, icon};
pub use quote::{
    currency_rates, merge_quotes, previous_prices, quotes_from_bridge, quotes_from_response,
    round2, CurrencyRates, MacroRates, MoveDirection, PrevPrice, PriceQuote, SignificantMove,
    Snapshot,
};
