//! Quotes, snapshots and the change arithmetic between fetch cycles.

use chrono::{DateTime, Utc};
use collect_client::{parse_price, BridgePayload, PriceResponse};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::catalog;

/// One instrument's state for a single fetch cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub id: String,
    pub name: String,
    pub name_tr: String,
    pub buy: f64,
    pub sell: f64,
    pub change: f64,
    pub change_percent: f64,
    pub icon: String,
}

/// Buy/sell pair remembered between cycles for change calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrevPrice {
    pub buy: f64,
    pub sell: f64,
}

/// Currency and market-status fields published alongside the quotes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroRates {
    pub usd_try: f64,
    pub eur_try: f64,
    pub btc_usd: f64,
    pub market_open: bool,
}

/// One complete set of quotes plus macro fields as of one fetch cycle.
///
/// Never mutated in place: each cycle derives a new snapshot from the
/// previous one, so concurrent readers only ever see whole values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub prices: Vec<PriceQuote>,
    pub macro_rates: MacroRates,
    pub last_update: DateTime<Utc>,
}

/// Direction of a notable price move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// A gram-gold move large enough to call out in the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct SignificantMove {
    pub asset: String,
    pub direction: MoveDirection,
    pub percent: f64,
}

/// Gram-gold moves at or above this percentage are significant.
const SIGNIFICANT_MOVE_PERCENT: f64 = 0.5;

impl Snapshot {
    /// Snapshot with no quotes, used to bootstrap a feed that has no
    /// server-provided initial payload.
    pub fn empty() -> Self {
        Self {
            prices: Vec::new(),
            macro_rates: MacroRates::default(),
            last_update: Utc::now(),
        }
    }

    pub fn quote(&self, id: &str) -> Option<&PriceQuote> {
        self.prices.iter().find(|quote| quote.id == id)
    }

    /// Gram-gold move of at least 0.5% in either direction, if any.
    pub fn significant_move(&self) -> Option<SignificantMove> {
        let gram = self
            .prices
            .iter()
            .find(|quote| quote.id == "gram" || quote.name == "Gram Altın")?;

        let percent = gram.change_percent.abs();
        if percent < SIGNIFICANT_MOVE_PERCENT {
            return None;
        }

        Some(SignificantMove {
            asset: gram.name_tr.clone(),
            direction: if gram.change_percent > 0.0 {
                MoveDirection::Up
            } else {
                MoveDirection::Down
            },
            percent,
        })
    }
}

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Absolute and percentage change of `buy` versus the previous cycle,
/// both rounded to two decimals. Zero when there is no previous entry
/// or its buy price was zero.
fn delta(buy: f64, previous: Option<&PrevPrice>) -> (f64, f64) {
    match previous {
        Some(prev) => {
            let change = buy - prev.buy;
            let percent = if prev.buy > 0.0 {
                change / prev.buy * 100.0
            } else {
                0.0
            };
            (round2(change), round2(percent))
        }
        None => (0.0, 0.0),
    }
}

/// Maps a raw upstream payload into canonical quotes.
///
/// Rows whose name is not in the catalog are dropped. A missing or zero
/// sell price falls back to the buy price. Deltas are computed against
/// the previous cycle's prices.
pub fn quotes_from_response(
    response: &PriceResponse,
    previous: &HashMap<String, PrevPrice>,
) -> Vec<PriceQuote> {
    response
        .result
        .iter()
        .filter_map(|item| {
            let id = catalog::canonical_id(&item.name)?;

            let buy = parse_price(item.buy_value());
            let sell = match parse_price(item.sell_value()) {
                s if s > 0.0 => s,
                _ => buy,
            };
            let (change, change_percent) = delta(buy, previous.get(id));

            let name = item.name.trim().to_string();
            let name_tr = catalog::display_name(id)
                .map(str::to_string)
                .unwrap_or_else(|| name.clone());

            Some(PriceQuote {
                id: id.to_string(),
                name,
                name_tr,
                buy,
                sell,
                change,
                change_percent,
                icon: catalog::icon(id).to_string(),
            })
        })
        .collect()
}

/// Maps an already-normalized bridge payload into quotes, recomputing
/// deltas against this client's own previous cycle (the bridge has no
/// notion of what this client saw last).
pub fn quotes_from_bridge(
    payload: &BridgePayload,
    previous: &HashMap<String, PrevPrice>,
) -> Vec<PriceQuote> {
    payload
        .prices
        .iter()
        .map(|quote| {
            let sell = if quote.sell > 0.0 {
                quote.sell
            } else {
                quote.buy
            };
            let (change, change_percent) = delta(quote.buy, previous.get(&quote.id));

            PriceQuote {
                id: quote.id.clone(),
                name: quote.name.clone(),
                name_tr: quote.name_tr.clone(),
                buy: quote.buy,
                sell,
                change,
                change_percent,
                icon: quote
                    .icon
                    .clone()
                    .unwrap_or_else(|| catalog::icon(&quote.id).to_string()),
            }
        })
        .collect()
}

/// Carry-forward merge: quotes present in `previous` but absent from
/// `fresh` keep their last known values, quotes only in `fresh` are
/// appended. A transient upstream omission never makes an instrument
/// disappear.
pub fn merge_quotes(previous: &[PriceQuote], fresh: &[PriceQuote]) -> Vec<PriceQuote> {
    let mut merged: Vec<PriceQuote> = previous
        .iter()
        .map(|existing| {
            fresh
                .iter()
                .find(|quote| quote.id == existing.id)
                .unwrap_or(existing)
                .clone()
        })
        .collect();

    for quote in fresh {
        if !merged.iter().any(|q| q.id == quote.id) {
            merged.push(quote.clone());
        }
    }

    merged
}

/// Builds the previous-prices table for the next cycle's differencing.
pub fn previous_prices(quotes: &[PriceQuote]) -> HashMap<String, PrevPrice> {
    quotes
        .iter()
        .map(|quote| {
            (
                quote.id.clone(),
                PrevPrice {
                    buy: quote.buy,
                    sell: quote.sell,
                },
            )
        })
        .collect()
}

/// Currency rates pulled out of the `/economy/allCurrency` payload.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CurrencyRates {
    pub usd: f64,
    pub eur: f64,
    pub btc: f64,
}

/// Extracts USD, EUR and BTC rates, preferring the sell side.
pub fn currency_rates(response: &PriceResponse) -> CurrencyRates {
    let find = |name: &str, code: &str| {
        response
            .result
            .iter()
            .find(|item| item.name == name || item.name == code)
            .map(|item| {
                let sell = parse_price(item.sell_value());
                if sell > 0.0 {
                    sell
                } else {
                    parse_price(item.buy_value())
                }
            })
            .unwrap_or(0.0)
    };

    CurrencyRates {
        usd: find("Amerikan Doları", "USD"),
        eur: find("Euro", "EUR"),
        btc: find("Bitcoin", "BTC"),
    }
}
