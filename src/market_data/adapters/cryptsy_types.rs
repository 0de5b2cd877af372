// Source: http://pubapi.cryptsy.com/api.php?method=singlemarketdata&marketid=<id>
// Every numeric field comes back as a string; convert through `Normaliser`
// before doing arithmetic on it.
use std::collections::HashMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::error::{TickerError, TickerResult};

#[derive(Debug, Deserialize)]
pub struct MarketSnapshot {
    pub success: i64,
    #[serde(rename = "return", default)]
    pub result: MarketCollection,
    // only present when success != 1
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MarketCollection {
    #[serde(default, deserialize_with = "empty_list_as_map")]
    pub markets: HashMap<String, Market>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Market {
    #[serde(rename = "marketid")]
    pub market_id: String,
    pub label: String,
    #[serde(rename = "lasttradeprice")]
    pub last_trade_price: String,
    pub volume: String,
    #[serde(rename = "lasttradetime")]
    pub last_trade_time: String,
    #[serde(rename = "primaryname")]
    pub primary_name: String,
    #[serde(rename = "primarycode")]
    pub primary_code: String,
    #[serde(rename = "secondaryname")]
    pub secondary_name: String,
    #[serde(rename = "secondarycode")]
    pub secondary_code: String,
    #[serde(rename = "recenttrades", deserialize_with = "null_as_empty")]
    pub recent_trades: Vec<Trade>,
    #[serde(rename = "sellorders", deserialize_with = "null_as_empty")]
    pub sell_orders: Vec<Order>,
    #[serde(rename = "buyorders", deserialize_with = "null_as_empty")]
    pub buy_orders: Vec<Order>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Trade {
    pub id: String,
    pub time: String,
    pub price: String,
    pub quantity: String,
    pub total: String,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Order {
    pub price: String,
    pub quantity: String,
    pub total: String,
}

impl MarketSnapshot {
    /// Look up a market by its code (e.g. "DOGE").
    pub fn market(&self, code: &str) -> TickerResult<&Market> {
        self.result
            .markets
            .get(code)
            .ok_or_else(|| TickerError::MarketNotFound { code: code.to_string() })
    }
}

// Idle markets come back with `null` instead of `[]`.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// PHP encodes an empty associative array as `[]`.
fn empty_list_as_map<'de, D>(deserializer: D) -> Result<HashMap<String, Market>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Markets {
        Map(HashMap<String, Market>),
        List(Vec<serde_json::Value>),
    }

    match Option::<Markets>::deserialize(deserializer)? {
        None => Ok(HashMap::new()),
        Some(Markets::Map(markets)) => Ok(markets),
        Some(Markets::List(list)) if list.is_empty() => Ok(HashMap::new()),
        Some(Markets::List(_)) => Err(D::Error::custom("expected a map of markets keyed by code")),
    }
}
