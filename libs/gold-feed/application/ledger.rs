//! The user's holdings ledger and its mark-to-market valuation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::quote::{round2, Snapshot};
use crate::infrastructure::store::StateStore;

pub const LEDGER_KEY: &str = "altin_masasi_safe";

/// One purchase lot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: String,
    pub asset_type: String,
    pub grams: f64,
    pub purchase_price: f64,
    pub purchase_date: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn cost(&self) -> f64 {
        self.grams * self.purchase_price
    }
}

/// Totals across the whole ledger at current prices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerValuation {
    pub cost: f64,
    pub current_value: f64,
    pub profit: f64,
    pub profit_percent: f64,
}

/// Persisted list of holdings.
pub struct GoldLedger {
    store: Arc<StateStore>,
    entries: Vec<LedgerEntry>,
}

impl GoldLedger {
    pub fn load(store: Arc<StateStore>) -> Self {
        let entries = store.get_json(LEDGER_KEY).unwrap_or_default();
        Self { store, entries }
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Records a purchase and returns its id.
    pub fn add(
        &mut self,
        asset_type: impl Into<String>,
        grams: f64,
        purchase_price: f64,
        purchase_date: DateTime<Utc>,
    ) -> String {
        let id = format!("lot_{}_{}", Utc::now().timestamp_millis(), self.entries.len());
        self.entries.push(LedgerEntry {
            id: id.clone(),
            asset_type: asset_type.into(),
            grams,
            purchase_price,
            purchase_date,
        });
        self.persist();
        id
    }

    pub fn remove(&mut self, entry_id: &str) {
        self.entries.retain(|entry| entry.id != entry_id);
        self.persist();
    }

    fn persist(&self) {
        self.store.set_json(LEDGER_KEY, &self.entries);
    }

    /// Marks every lot to the snapshot's sell price. Lots whose asset
    /// has no current quote are valued at cost basis, so an outage
    /// never shows a holding as worthless.
    pub fn valuation(&self, snapshot: &Snapshot) -> LedgerValuation {
        let mut cost = 0.0;
        let mut current_value = 0.0;

        for entry in &self.entries {
            let unit = snapshot
                .quote(&entry.asset_type)
                .map(|quote| quote.sell)
                .filter(|sell| *sell > 0.0)
                .unwrap_or(entry.purchase_price);
            cost += entry.cost();
            current_value += entry.grams * unit;
        }

        let profit = current_value - cost;
        let profit_percent = if cost > 0.0 {
            round2(profit / cost * 100.0)
        } else {
            0.0
        };

        LedgerValuation {
            cost,
            current_value,
            profit,
            profit_percent,
        }
    }
}
