//! Price alerts with notification delivery and per-asset throttling.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::domain::quote::Snapshot;
use crate::infrastructure::store::StateStore;

pub const ALERTS_KEY: &str = "gold_price_alerts";

/// Minimum gap between two notifications for the same asset.
pub const DEFAULT_COOLDOWN_MINS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertDirection {
    Above,
    Below,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceAlert {
    pub id: String,
    pub asset_id: String,
    pub asset_name: String,
    pub target_price: f64,
    pub direction: AlertDirection,
    pub triggered: bool,
    pub created_at: DateTime<Utc>,
}

/// Delivery capability for alert notifications.
///
/// The throttling logic is independent of whatever mechanism sits
/// behind this trait (system notifications, a webhook, a test
/// recorder).
#[async_trait]
pub trait NotificationSink: Send + Sync {
    fn permission_granted(&self) -> bool;
    async fn request_permission(&self) -> bool;
    async fn notify(&self, title: &str, body: &str, dedupe_key: &str);
}

/// Whether a notification for an asset may fire, given when the last
/// one was sent. Pure so the cooldown window is testable on its own.
pub fn should_notify(
    last_sent: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    cooldown: Duration,
) -> bool {
    match last_sent {
        None => true,
        Some(at) => now - at >= cooldown,
    }
}

/// The user's alert list, persisted across sessions.
pub struct AlertBook {
    store: Arc<StateStore>,
    alerts: Vec<PriceAlert>,
    last_sent: HashMap<String, DateTime<Utc>>,
    cooldown: Duration,
}

impl AlertBook {
    pub fn load(store: Arc<StateStore>) -> Self {
        let alerts = store.get_json(ALERTS_KEY).unwrap_or_default();
        Self {
            store,
            alerts,
            last_sent: HashMap::new(),
            cooldown: Duration::minutes(DEFAULT_COOLDOWN_MINS),
        }
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn alerts(&self) -> &[PriceAlert] {
        &self.alerts
    }

    /// Adds an alert and returns its id.
    pub fn add(
        &mut self,
        asset_id: impl Into<String>,
        asset_name: impl Into<String>,
        target_price: f64,
        direction: AlertDirection,
    ) -> String {
        let now = Utc::now();
        let id = format!("alert_{}_{}", now.timestamp_millis(), self.alerts.len());
        self.alerts.push(PriceAlert {
            id: id.clone(),
            asset_id: asset_id.into(),
            asset_name: asset_name.into(),
            target_price,
            direction,
            triggered: false,
            created_at: now,
        });
        self.persist();
        id
    }

    pub fn remove(&mut self, alert_id: &str) {
        self.alerts.retain(|alert| alert.id != alert_id);
        self.persist();
    }

    pub fn clear_triggered(&mut self) {
        self.alerts.retain(|alert| !alert.triggered);
        self.persist();
    }

    fn persist(&self) {
        self.store.set_json(ALERTS_KEY, &self.alerts);
    }

    /// Evaluates untriggered alerts against the snapshot's sell prices
    /// and delivers notifications through `sink`, honouring the
    /// per-asset cooldown. Returns how many alerts fired.
    pub async fn check(&mut self, snapshot: &Snapshot, sink: &dyn NotificationSink) -> usize {
        if !sink.permission_granted() {
            return 0;
        }

        let now = Utc::now();
        let mut fired = 0;

        for alert in self.alerts.iter_mut().filter(|alert| !alert.triggered) {
            let Some(quote) = snapshot.prices.iter().find(|q| q.id == alert.asset_id) else {
                continue;
            };

            let current = quote.sell;
            let crossed = match alert.direction {
                AlertDirection::Above => current >= alert.target_price,
                AlertDirection::Below => current <= alert.target_price,
            };
            if !crossed {
                continue;
            }

            if !should_notify(
                self.last_sent.get(&alert.asset_id).copied(),
                now,
                self.cooldown,
            ) {
                debug!("alert for {} suppressed by cooldown", alert.asset_id);
                continue;
            }

            sink.notify(
                "Altın Fiyat Alarmı",
                &format!(
                    "{} fiyatı ₺{:.2} oldu (hedef ₺{:.2})",
                    alert.asset_name, current, alert.target_price
                ),
                &alert.id,
            )
            .await;

            alert.triggered = true;
            self.last_sent.insert(alert.asset_id.clone(), now);
            fired += 1;
        }

        if fired > 0 {
            self.persist();
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quote::PriceQuote;
    use std::sync::Mutex;

    struct RecordingSink {
        granted: bool,
        sent: Mutex<Vec<(String, String)>>,
    }

    impl RecordingSink {
        fn new(granted: bool) -> Self {
            Self {
                granted,
                sent: Mutex::new(Vec::new()),
            }
        }

        fn count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl NotificationSink for RecordingSink {
        fn permission_granted(&self) -> bool {
            self.granted
        }

        async fn request_permission(&self) -> bool {
            self.granted
        }

        async fn notify(&self, title: &str, _body: &str, dedupe_key: &str) {
            self.sent
                .lock()
                .unwrap()
                .push((title.to_string(), dedupe_key.to_string()));
        }
    }

    fn snapshot_with(id: &str, sell: f64) -> Snapshot {
        let mut snapshot = Snapshot::empty();
        snapshot.prices.push(PriceQuote {
            id: id.to_string(),
            name: id.to_string(),
            name_tr: id.to_string(),
            buy: sell,
            sell,
            change: 0.0,
            change_percent: 0.0,
            icon: "🪙".to_string(),
        });
        snapshot
    }

    #[tokio::test]
    async fn fires_when_price_crosses_above() {
        let mut book = AlertBook::load(Arc::new(StateStore::in_memory()));
        book.add("gram", "Gram Altın", 3200.0, AlertDirection::Above);

        let sink = RecordingSink::new(true);
        let fired = book.check(&snapshot_with("gram", 3250.0), &sink).await;

        assert_eq!(fired, 1);
        assert_eq!(sink.count(), 1);
        assert!(book.alerts()[0].triggered);
    }

    #[tokio::test]
    async fn does_not_fire_below_target() {
        let mut book = AlertBook::load(Arc::new(StateStore::in_memory()));
        book.add("gram", "Gram Altın", 3200.0, AlertDirection::Above);

        let sink = RecordingSink::new(true);
        let fired = book.check(&snapshot_with("gram", 3100.0), &sink).await;

        assert_eq!(fired, 0);
        assert!(!book.alerts()[0].triggered);
    }

    #[tokio::test]
    async fn below_direction_triggers_on_drop() {
        let mut book = AlertBook::load(Arc::new(StateStore::in_memory()));
        book.add("gram", "Gram Altın", 3000.0, AlertDirection::Below);

        let sink = RecordingSink::new(true);
        assert_eq!(book.check(&snapshot_with("gram", 2990.0), &sink).await, 1);
    }

    #[tokio::test]
    async fn no_permission_means_no_notifications() {
        let mut book = AlertBook::load(Arc::new(StateStore::in_memory()));
        book.add("gram", "Gram Altın", 3200.0, AlertDirection::Above);

        let sink = RecordingSink::new(false);
        assert_eq!(book.check(&snapshot_with("gram", 3250.0), &sink).await, 0);
        assert_eq!(sink.count(), 0);
    }

    #[tokio::test]
    async fn cooldown_suppresses_repeat_notifications() {
        let mut book = AlertBook::load(Arc::new(StateStore::in_memory()))
            .with_cooldown(Duration::minutes(30));
        // Two alerts on the same asset, both crossed.
        book.add("gram", "Gram Altın", 3200.0, AlertDirection::Above);
        book.add("gram", "Gram Altın", 3210.0, AlertDirection::Above);

        let sink = RecordingSink::new(true);
        let fired = book.check(&snapshot_with("gram", 3250.0), &sink).await;

        // The second is held back by the per-asset cooldown.
        assert_eq!(fired, 1);
        assert_eq!(sink.count(), 1);
    }

    #[tokio::test]
    async fn alerts_persist_across_loads() {
        let store = Arc::new(StateStore::in_memory());
        {
            let mut book = AlertBook::load(Arc::clone(&store));
            book.add("gram", "Gram Altın", 3200.0, AlertDirection::Above);
        }
        let book = AlertBook::load(store);
        assert_eq!(book.alerts().len(), 1);
        assert_eq!(book.alerts()[0].asset_id, "gram");
    }

    #[test]
    fn cooldown_window_is_pure() {
        let now = Utc::now();
        let cooldown = Duration::minutes(30);

        assert!(should_notify(None, now, cooldown));
        assert!(!should_notify(
            Some(now - Duration::minutes(10)),
            now,
            cooldown
        ));
        assert!(should_notify(
            Some(now - Duration::minutes(30)),
            now,
            cooldown
        ));
    }
}
