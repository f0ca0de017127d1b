//! Price feed orchestrator: the polling loop that ties transport,
//! cache, normalization and differencing together.

use chrono::{DateTime, Duration as ChronoDuration, Local, Utc};
use collect_client::{ApiError, BridgeClient, CollectClient, PriceResponse};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::domain::quote::{
    currency_rates, merge_quotes, previous_prices, quotes_from_bridge, quotes_from_response,
    CurrencyRates, PrevPrice, PriceQuote, Snapshot,
};
use crate::infrastructure::cache::{
    SwrCache, BRIDGE_CACHE_KEY, CURRENCY_CACHE_KEY, GOLD_CACHE_KEY,
};
use crate::infrastructure::config::FeedConfig;
use crate::infrastructure::store::StateStore;
use crate::utils::market_hours;
use crate::utils::shutdown::Shutdown;

/// Connectivity state advertised alongside the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Idle,
    Fetching,
    Connected,
    Disconnected,
}

/// Everything the presentation layer needs, replaced wholesale on
/// every publish so readers never observe a partial update.
#[derive(Debug, Clone)]
pub struct FeedState {
    pub snapshot: Snapshot,
    pub status: ConnectionStatus,
    pub last_update: Option<DateTime<Utc>>,
    pub is_stale: bool,
    pub error: Option<String>,
}

/// Quotes produced by one fetch, plus where they came from.
struct CycleQuotes {
    quotes: Vec<PriceQuote>,
    is_stale: bool,
    fetch_error: Option<String>,
}

/// Periodic price feed.
///
/// Owns the durable cache, the previous-prices table and the published
/// snapshot; everything shared with consumers goes out through a
/// `watch` channel as a full value.
pub struct PriceFeed {
    config: FeedConfig,
    client: CollectClient,
    bridge: Option<BridgeClient>,
    cache: SwrCache,
    previous: HashMap<String, PrevPrice>,
    state_tx: watch::Sender<FeedState>,
}

impl PriceFeed {
    /// `initial` bootstraps the published snapshot before the first
    /// fetch completes (a server-rendered payload, mock data, or
    /// [`Snapshot::empty`]).
    pub fn new(
        config: FeedConfig,
        store: Arc<StateStore>,
        initial: Snapshot,
    ) -> (Self, watch::Receiver<FeedState>) {
        let cache = SwrCache::new(
            Arc::clone(&store),
            ChronoDuration::hours(config.cache_ttl_hours),
        );
        let client = CollectClient::new(&config.api_base_url, &config.api_key);
        let bridge = config.bridge_url.as_deref().map(BridgeClient::new);

        let (state_tx, state_rx) = watch::channel(FeedState {
            snapshot: initial,
            status: ConnectionStatus::Idle,
            last_update: None,
            is_stale: false,
            error: None,
        });

        (
            Self {
                config,
                client,
                bridge,
                cache,
                previous: HashMap::new(),
                state_tx,
            },
            state_rx,
        )
    }

    /// Another receiver for the published state.
    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.state_tx.subscribe()
    }

    /// Runs both polling loops until `stop` triggers: the fetch cycle
    /// and the market-hours recomputation, on the same cadence. Each
    /// fires once immediately on activation.
    pub async fn run(mut self, stop: Shutdown) {
        let period = Duration::from_secs(self.config.poll_interval_secs);
        let mut fetch_tick = interval(period);
        fetch_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut hours_tick = interval(period);
        hours_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut stopped = stop.watch();

        info!(
            "price feed started (poll every {}s)",
            self.config.poll_interval_secs
        );

        loop {
            tokio::select! {
                _ = fetch_tick.tick() => {
                    if let Err(err) = self.refresh().await {
                        error!("refresh cycle failed: {}", err);
                    }
                }
                _ = hours_tick.tick() => self.update_market_hours(),
                _ = stopped.changed() => break,
            }
        }

        info!("price feed stopped");
    }

    /// One fetch cycle.
    ///
    /// An error comes back only when there is nothing cached to show;
    /// any served data, fresh or stale, is published. Callers may also
    /// invoke this directly for an on-demand refresh.
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        self.state_tx.send_modify(|state| {
            state.status = ConnectionStatus::Fetching;
            state.error = None;
        });

        let cycle = match self.fetch_prices().await {
            Ok(cycle) => cycle,
            Err(err) => {
                warn!("no gold price data available: {}", err);
                self.state_tx.send_modify(|state| {
                    state.status = ConnectionStatus::Disconnected;
                    state.error = Some(err.to_string());
                });
                return Err(err);
            }
        };

        // Currency failure keeps the previous macro values.
        let currency = self.fetch_currency().await;

        self.previous = previous_prices(&cycle.quotes);

        let now = Utc::now();
        self.state_tx.send_modify(|state| {
            let merged = merge_quotes(&state.snapshot.prices, &cycle.quotes);
            let mut macro_rates = state.snapshot.macro_rates.clone();
            if let Some(rates) = &currency {
                if rates.usd > 0.0 {
                    macro_rates.usd_try = rates.usd;
                }
                if rates.eur > 0.0 {
                    macro_rates.eur_try = rates.eur;
                }
                if rates.btc > 0.0 {
                    macro_rates.btc_usd = rates.btc;
                }
            }

            state.snapshot = Snapshot {
                prices: merged,
                macro_rates,
                last_update: now,
            };
            state.status = ConnectionStatus::Connected;
            state.last_update = Some(now);
            state.is_stale = cycle.is_stale;
            state.error = cycle.fetch_error.clone();
        });

        info!(
            "prices updated: {} instruments{}",
            cycle.quotes.len(),
            if cycle.is_stale { " (stale cache)" } else { "" }
        );

        if let Some(mv) = self.state_tx.borrow().snapshot.significant_move() {
            info!("notable move: {} {:?} {:.2}%", mv.asset, mv.direction, mv.percent);
        }
        Ok(())
    }

    /// Fetches and normalizes gold quotes, bridge first when
    /// configured, with the direct API as fallback.
    async fn fetch_prices(&self) -> Result<CycleQuotes, ApiError> {
        if let Some(bridge) = &self.bridge {
            match self
                .cache
                .get_with(BRIDGE_CACHE_KEY, || bridge.fetch_market_data())
                .await
            {
                Ok(outcome) => {
                    return Ok(CycleQuotes {
                        quotes: quotes_from_bridge(&outcome.data, &self.previous),
                        is_stale: outcome.is_stale,
                        fetch_error: outcome.error.map(|err| err.to_string()),
                    });
                }
                Err(err) => {
                    debug!("bridge unavailable ({}), falling back to direct api", err);
                }
            }
        }

        let outcome = self
            .cache
            .get_with(GOLD_CACHE_KEY, || self.client.get_gold_prices())
            .await?;

        Ok(CycleQuotes {
            quotes: quotes_from_response(&outcome.data, &self.previous),
            is_stale: outcome.is_stale,
            fetch_error: outcome.error.map(|err| err.to_string()),
        })
    }

    async fn fetch_currency(&self) -> Option<CurrencyRates> {
        let result: Result<PriceResponse, ApiError> = self
            .cache
            .get(CURRENCY_CACHE_KEY, || self.client.get_currency_rates())
            .await;

        match result {
            Ok(response) => Some(currency_rates(&response)),
            Err(err) => {
                warn!("currency rates unavailable: {}", err);
                None
            }
        }
    }

    /// Recomputes the market-open flag from the wall clock. Notifies
    /// watchers only when the flag actually flips.
    fn update_market_hours(&self) {
        let open = market_hours::is_market_open(&Local::now());
        self.state_tx.send_if_modified(|state| {
            if state.snapshot.macro_rates.market_open == open {
                return false;
            }
            let mut snapshot = state.snapshot.clone();
            snapshot.macro_rates.market_open = open;
            state.snapshot = snapshot;
            true
        });
    }
}
