use serde::{Deserialize, Serialize};

/// A price value as the upstream sends it: sometimes a JSON number,
/// sometimes a localized decimal string (`"3.245,50"`), sometimes the
/// placeholder `"-"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Number(f64),
    Text(String),
}

/// One instrument row from `/economy/goldPrice` or `/economy/allCurrency`.
///
/// Different upstream deployments use different field pairs for the same
/// concept (`buy`/`sell`, `buying`/`selling`, bare `price`), so all of
/// them are optional here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buy: Option<RawPrice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sell: Option<RawPrice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buying: Option<RawPrice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selling: Option<RawPrice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<RawPrice>,
}

impl PriceItem {
    /// Preferred buy-side value: `buy`, then `buying`, then bare `price`.
    pub fn buy_value(&self) -> Option<&RawPrice> {
        self.buy
            .as_ref()
            .or(self.buying.as_ref())
            .or(self.price.as_ref())
    }

    /// Preferred sell-side value: `sell`, then `selling`.
    pub fn sell_value(&self) -> Option<&RawPrice> {
        self.sell.as_ref().or(self.selling.as_ref())
    }
}

/// Response envelope used by both economy endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceResponse {
    pub success: bool,
    #[serde(default)]
    pub result: Vec<PriceItem>,
}

/// An already-normalized quote as the bridge proxy serves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeQuote {
    pub id: String,
    pub name: String,
    #[serde(rename = "nameTr")]
    pub name_tr: String,
    pub buy: f64,
    #[serde(default)]
    pub sell: f64,
    #[serde(default)]
    pub change: f64,
    #[serde(default, rename = "changePercent")]
    pub change_percent: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Macro fields of the bridge payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BridgeMacro {
    #[serde(default, rename = "usdTry")]
    pub usd_try: f64,
    #[serde(default, rename = "eurTry")]
    pub eur_try: f64,
    #[serde(default, rename = "btcUsd")]
    pub btc_usd: f64,
    #[serde(default, rename = "marketOpen")]
    pub market_open: bool,
}

/// Aggregated payload served by the bridge proxy. The bridge keeps its
/// own short-lived cache, independent of anything this client caches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgePayload {
    #[serde(default)]
    pub prices: Vec<BridgeQuote>,
    #[serde(default, rename = "macro", skip_serializing_if = "Option::is_none")]
    pub macro_rates: Option<BridgeMacro>,
    #[serde(default, rename = "lastUpdate", skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_mixed_value_shapes() {
        let body = r#"{
            "success": true,
            "result": [
                {"name": "Gram Altın", "buying": "3.245,50", "selling": "3.268,75"},
                {"name": "ONS", "buy": 2655.2, "sell": 2655.9},
                {"name": "Külçe Altın", "price": "104500.00"}
            ]
        }"#;

        let response: PriceResponse = serde_json::from_str(body).unwrap();
        assert!(response.success);
        assert_eq!(response.result.len(), 3);

        let gram = &response.result[0];
        assert_eq!(
            gram.buy_value(),
            Some(&RawPrice::Text("3.245,50".to_string()))
        );
        assert_eq!(
            gram.sell_value(),
            Some(&RawPrice::Text("3.268,75".to_string()))
        );

        let ons = &response.result[1];
        assert_eq!(ons.buy_value(), Some(&RawPrice::Number(2655.2)));

        let kulce = &response.result[2];
        assert_eq!(
            kulce.buy_value(),
            Some(&RawPrice::Text("104500.00".to_string()))
        );
        assert_eq!(kulce.sell_value(), None);
    }

    #[test]
    fn deserializes_bridge_payload() {
        let body = r#"{
            "prices": [
                {"id": "gram", "name": "Gram Altın", "nameTr": "Gram Altın",
                 "buy": 3245.5, "sell": 3268.75, "change": 0, "changePercent": 0, "icon": "🪙"}
            ],
            "macro": {"usdTry": 41.2, "eurTry": 44.8, "btcUsd": 98000.0, "marketOpen": true},
            "lastUpdate": "2025-01-06T10:00:00+03:00",
            "source": "Bosphorus Bridge (Cached)"
        }"#;

        let payload: BridgePayload = serde_json::from_str(body).unwrap();
        assert_eq!(payload.prices.len(), 1);
        assert_eq!(payload.prices[0].id, "gram");
        let rates = payload.macro_rates.unwrap();
        assert_eq!(rates.usd_try, 41.2);
        assert!(rates.market_open);
        assert_eq!(payload.source.as_deref(), Some("Bosphorus Bridge (Cached)"));
    }

    #[test]
    fn missing_result_defaults_to_empty() {
        let response: PriceResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!response.success);
        assert!(response.result.is_empty());
    }
}
