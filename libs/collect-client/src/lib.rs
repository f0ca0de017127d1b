//! Client for the CollectAPI economy endpoints and the aggregating
//! bridge proxy.
//!
//! Handles the ugly parts of talking to the upstream: per-attempt
//! timeouts, retry with exponential backoff and jitter, rate-limit
//! escalation, and the mixed numeric notation the API ships
//! (`3245.50` one day, `"3.245,50"` the next).

pub mod parse;
pub mod rest;
pub mod transport;
pub mod types;

pub use parse::{parse_price, parse_price_str};
pub use rest::{ApiError, BridgeClient, CollectClient, DEFAULT_BASE_URL};
pub use transport::{retry_delay, send_resilient, TransportError, FETCH_TIMEOUT, MAX_ATTEMPTS};
pub use types::{BridgeMacro, BridgePayload, BridgeQuote, PriceItem, PriceResponse, RawPrice};
