//! Full refresh cycles against a local server serving canned API
//! responses, routed by request path.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{Duration, Utc};
use gold_feed::domain::quote::{PriceQuote, Snapshot};
use gold_feed::infrastructure::cache::{CachedPayload, GOLD_CACHE_KEY};
use gold_feed::{ConnectionStatus, FeedConfig, PriceFeed, StateStore};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const GOLD_BODY: &str = r#"{
    "success": true,
    "result": [
        {"name": "Gram Altın", "buying": "3.245,50", "selling": "3.268,75"},
        {"name": "Çeyrek Altın", "buying": "5.310,00", "selling": "5.420,25"},
        {"name": "Dolar Endeksi", "buying": "104,2", "selling": "104,3"}
    ]
}"#;

const CURRENCY_BODY: &str = r#"{
    "success": true,
    "result": [
        {"name": "Amerikan Doları", "buying": "41,10", "selling": "41,25"},
        {"name": "Euro", "buying": "44,50", "selling": "44,70"},
        {"name": "Bitcoin", "selling": "98.000,00"}
    ]
}"#;

fn json_200(body: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        body.len(),
        body
    )
}

struct ApiCounters {
    gold: AtomicUsize,
    currency: AtomicUsize,
}

/// Serves the canned gold and currency bodies, routed by request path,
/// counting the requests to each.
async fn spawn_api() -> (String, Arc<ApiCounters>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let counters = Arc::new(ApiCounters {
        gold: AtomicUsize::new(0),
        currency: AtomicUsize::new(0),
    });

    let served = Arc::clone(&counters);
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 2048];
            let n = socket.read(&mut buf).await.unwrap_or(0);
            let head = String::from_utf8_lossy(&buf[..n]);

            let body = if head.contains("goldPrice") {
                served.gold.fetch_add(1, Ordering::SeqCst);
                GOLD_BODY
            } else {
                served.currency.fetch_add(1, Ordering::SeqCst);
                CURRENCY_BODY
            };
            let _ = socket.write_all(json_200(body).as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    (format!("http://{addr}"), counters)
}

fn config_for(base_url: &str) -> FeedConfig {
    FeedConfig {
        api_base_url: base_url.to_string(),
        api_key: "apikey test".to_string(),
        ..FeedConfig::default()
    }
}

fn quote(id: &str, sell: f64) -> PriceQuote {
    PriceQuote {
        id: id.to_string(),
        name: id.to_string(),
        name_tr: id.to_string(),
        buy: sell,
        sell,
        change: 0.0,
        change_percent: 0.0,
        icon: "🪙".to_string(),
    }
}

#[tokio::test]
async fn refresh_publishes_connected_snapshot() {
    let (base, _counters) = spawn_api().await;
    let store = Arc::new(StateStore::in_memory());
    let (mut feed, state_rx) = PriceFeed::new(config_for(&base), store, Snapshot::empty());

    feed.refresh().await.unwrap();

    let state = state_rx.borrow();
    assert_eq!(state.status, ConnectionStatus::Connected);
    assert!(state.last_update.is_some());
    assert!(!state.is_stale);
    assert!(state.error.is_none());

    // Unknown instruments are dropped, known ones get canonical ids.
    assert_eq!(state.snapshot.prices.len(), 2);
    let gram = state.snapshot.quote("gram").unwrap();
    assert_eq!(gram.buy, 3245.50);
    assert_eq!(gram.sell, 3268.75);
    assert_eq!(gram.name_tr, "Gram Altın");

    assert_eq!(state.snapshot.macro_rates.usd_try, 41.25);
    assert_eq!(state.snapshot.macro_rates.eur_try, 44.70);
    assert_eq!(state.snapshot.macro_rates.btc_usd, 98_000.0);
}

#[tokio::test]
async fn second_refresh_is_served_from_cache() {
    let (base, counters) = spawn_api().await;
    let store = Arc::new(StateStore::in_memory());
    let (mut feed, _state_rx) = PriceFeed::new(config_for(&base), store, Snapshot::empty());

    feed.refresh().await.unwrap();
    feed.refresh().await.unwrap();

    // The entries written by the first cycle are well inside the TTL.
    assert_eq!(counters.gold.load(Ordering::SeqCst), 1);
    assert_eq!(counters.currency.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unfetched_instruments_carry_forward() {
    let (base, _counters) = spawn_api().await;
    let store = Arc::new(StateStore::in_memory());

    let mut initial = Snapshot::empty();
    initial.prices.push(quote("tam", 21_500.0));

    let (mut feed, state_rx) = PriceFeed::new(config_for(&base), store, initial);
    feed.refresh().await.unwrap();

    let state = state_rx.borrow();
    // Not in the response, but kept at its previous value.
    assert_eq!(state.snapshot.quote("tam").unwrap().sell, 21_500.0);
    assert!(state.snapshot.quote("gram").is_some());
}

#[tokio::test]
async fn unreachable_api_without_cache_disconnects() {
    // Bind then drop so the port is known to refuse connections.
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let store = Arc::new(StateStore::in_memory());
    let (mut feed, state_rx) =
        PriceFeed::new(config_for(&format!("http://{addr}")), store, Snapshot::empty());

    assert!(feed.refresh().await.is_err());

    let state = state_rx.borrow();
    assert_eq!(state.status, ConnectionStatus::Disconnected);
    assert!(state.error.is_some());
    assert!(state.snapshot.prices.is_empty());
}

#[tokio::test]
async fn expired_cache_survives_an_outage_as_stale() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let store = Arc::new(StateStore::in_memory());

    // A gold payload fetched 30 hours ago, past the 24h TTL.
    let old: collect_client::PriceResponse = serde_json::from_str(GOLD_BODY).unwrap();
    store.set_json(
        GOLD_CACHE_KEY,
        &CachedPayload {
            timestamp: Utc::now() - Duration::hours(30),
            data: old,
        },
    );

    let (mut feed, state_rx) =
        PriceFeed::new(config_for(&format!("http://{addr}")), store, Snapshot::empty());
    feed.refresh().await.unwrap();

    let state = state_rx.borrow();
    assert_eq!(state.status, ConnectionStatus::Connected);
    assert!(state.is_stale);
    assert!(state.error.is_some());
    assert!(state.snapshot.quote("gram").is_some());
}
