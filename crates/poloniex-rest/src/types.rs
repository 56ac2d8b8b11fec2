//! Types for Poloniex REST API responses
//!
//! Prices and amounts arrive as JSON strings (`"0.03250000"`) and are decoded
//! into `Decimal`. Identifiers arrive as either strings or numbers depending
//! on the method and are normalized to `String`.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Market Data Types
// ============================================================================

/// Ticker information for a currency pair
///
/// Only `last` is required. The exchange omits or nulls the other fields
/// for freshly listed or frozen pairs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker {
    /// Numeric pair id
    #[serde(default)]
    pub id: Option<u64>,
    /// Last trade price
    pub last: Decimal,
    /// Lowest ask
    #[serde(default)]
    pub lowest_ask: Option<Decimal>,
    /// Highest bid
    #[serde(default)]
    pub highest_bid: Option<Decimal>,
    /// 24h change as a fraction
    #[serde(default)]
    pub percent_change: Option<Decimal>,
    /// 24h volume in the base currency
    #[serde(default)]
    pub base_volume: Option<Decimal>,
    /// 24h volume in the quote currency
    #[serde(default)]
    pub quote_volume: Option<Decimal>,
    /// Trading disabled flag ("0" / "1")
    #[serde(default, deserialize_with = "flag")]
    pub is_frozen: bool,
    /// 24h high
    #[serde(default, rename = "high24hr")]
    pub high_24h: Option<Decimal>,
    /// 24h low
    #[serde(default, rename = "low24hr")]
    pub low_24h: Option<Decimal>,
}

impl Ticker {
    /// Get mid price, if both sides are quoted
    pub fn mid_price(&self) -> Option<Decimal> {
        Some((self.lowest_ask? + self.highest_bid?) / Decimal::TWO)
    }

    /// Get spread in basis points
    pub fn spread_bps(&self) -> Option<Decimal> {
        let mid = self.mid_price()?;
        if mid.is_zero() {
            return None;
        }
        Some((self.lowest_ask? - self.highest_bid?) / mid * Decimal::from(10000))
    }
}

/// One order book level `[price, amount]`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BookLevel(pub Decimal, pub Decimal);

impl BookLevel {
    /// Level price
    pub fn price(&self) -> Decimal {
        self.0
    }

    /// Level amount
    pub fn amount(&self) -> Decimal {
        self.1
    }
}

/// Order book snapshot for one pair
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBook {
    /// Ask levels, best first
    pub asks: Vec<BookLevel>,
    /// Bid levels, best first
    pub bids: Vec<BookLevel>,
    /// Trading disabled flag
    #[serde(default, deserialize_with = "flag")]
    pub is_frozen: bool,
    /// Book sequence number
    #[serde(default)]
    pub seq: Option<u64>,
}

impl OrderBook {
    /// Get the best ask price
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.first().map(BookLevel::price)
    }

    /// Get the best bid price
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.first().map(BookLevel::price)
    }

    /// Get the spread
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()? - self.best_bid()?)
    }
}

/// Public trade from the market trade history
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicTrade {
    /// Exchange-wide trade id
    #[serde(rename = "globalTradeID", default, deserialize_with = "opt_id")]
    pub global_trade_id: Option<String>,
    /// Per-pair trade id
    #[serde(rename = "tradeID", deserialize_with = "id")]
    pub trade_id: String,
    /// UTC timestamp, `YYYY-MM-DD HH:MM:SS`
    pub date: String,
    /// Taker side
    #[serde(rename = "type")]
    pub side: OrderSide,
    /// Price
    pub rate: Decimal,
    /// Amount in the quote currency
    pub amount: Decimal,
    /// Amount in the base currency
    pub total: Decimal,
}

// ============================================================================
// Account Types
// ============================================================================

/// Available balances keyed by currency
pub type Balances = HashMap<String, Decimal>;

/// Open order for one pair
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenOrder {
    /// Order number
    #[serde(deserialize_with = "id")]
    pub order_number: String,
    /// Order side
    #[serde(rename = "type")]
    pub side: OrderSide,
    /// Limit price
    pub rate: Decimal,
    /// Remaining amount
    pub amount: Decimal,
    /// `rate * amount`
    pub total: Decimal,
    /// Placement time
    #[serde(default)]
    pub date: Option<String>,
}

/// Trade from the account's own trade history
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountTrade {
    /// Exchange-wide trade id
    #[serde(rename = "globalTradeID", default, deserialize_with = "opt_id")]
    pub global_trade_id: Option<String>,
    /// Per-pair trade id
    #[serde(rename = "tradeID", deserialize_with = "id")]
    pub trade_id: String,
    /// Order that produced the trade
    #[serde(default, deserialize_with = "opt_id")]
    pub order_number: Option<String>,
    /// UTC timestamp
    pub date: String,
    /// Side
    #[serde(rename = "type")]
    pub side: OrderSide,
    /// Price
    pub rate: Decimal,
    /// Amount
    pub amount: Decimal,
    /// Total
    pub total: Decimal,
    /// Fee fraction
    #[serde(default)]
    pub fee: Option<Decimal>,
}

// ============================================================================
// Trading Types
// ============================================================================

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "buy"),
            OrderSide::Sell => write!(f, "sell"),
        }
    }
}

/// Trade filled immediately when an order was placed
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultingTrade {
    /// Trade id
    #[serde(rename = "tradeID", deserialize_with = "id")]
    pub trade_id: String,
    /// UTC timestamp
    pub date: String,
    /// Side
    #[serde(rename = "type")]
    pub side: OrderSide,
    /// Price
    pub rate: Decimal,
    /// Amount
    pub amount: Decimal,
    /// Total
    pub total: Decimal,
}

/// Response to `buy` / `sell`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    /// Assigned order number
    #[serde(deserialize_with = "id")]
    pub order_number: String,
    /// Immediate fills
    #[serde(default)]
    pub resulting_trades: Vec<ResultingTrade>,
}

/// Response to `cancelOrder`
#[derive(Debug, Clone, Deserialize)]
pub struct CancelOrderResult {
    /// `1` on success
    #[serde(deserialize_with = "flag")]
    pub success: bool,
    /// Human readable message
    #[serde(default)]
    pub message: Option<String>,
}

/// Response to `withdraw`
#[derive(Debug, Clone, Deserialize)]
pub struct WithdrawResult {
    /// Human readable confirmation, e.g. `Withdrew 2398 NXT.`
    pub response: String,
}

// ============================================================================
// Field decoders
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Num(u64),
    Str(String),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Num(n) => n.to_string(),
            RawId::Str(s) => s,
        }
    }
}

fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawId::deserialize(deserializer).map(String::from)
}

fn opt_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Option::<RawId>::deserialize(deserializer).map(|raw| raw.map(String::from))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Null,
    Bool(bool),
    Num(i64),
    Str(String),
}

/// Decode `0`/`1`, `"0"`/`"1"` or `true`/`false`; `null` is false
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match RawFlag::deserialize(deserializer)? {
        RawFlag::Null => false,
        RawFlag::Bool(b) => b,
        RawFlag::Num(n) => n != 0,
        RawFlag::Str(s) => !(s.is_empty() || s == "0"),
    })
}
