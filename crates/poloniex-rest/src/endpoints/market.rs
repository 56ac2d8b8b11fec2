//! Public market data endpoints
//!
//! These endpoints don't require authentication.

use crate::client::{decode, PoloniexClient};
use crate::error::RestResult;
use crate::params::RequestParams;
use crate::transport::Transport;
use crate::types::{OrderBook, PublicTrade, Ticker};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Public market data endpoints
pub struct MarketEndpoints<'a, T: Transport> {
    client: &'a PoloniexClient<T>,
}

impl<'a, T: Transport> MarketEndpoints<'a, T> {
    pub fn new(client: &'a PoloniexClient<T>) -> Self {
        Self { client }
    }

    /// Get tickers for every pair
    ///
    /// Fails if any entry lacks a usable `last` price; use
    /// [`get_ticker`](Self::get_ticker) to read one pair regardless of
    /// its neighbours.
    #[instrument(skip(self))]
    pub async fn get_tickers(&self) -> RestResult<HashMap<String, Ticker>> {
        debug!("Fetching all tickers");
        self.client.public_as("returnTicker", RequestParams::new()).await
    }

    /// Get the ticker for one pair
    ///
    /// Only the requested entry is decoded.
    ///
    /// # Arguments
    /// * `pair` - Currency pair (e.g., "BTC_ETH"), case-insensitive
    ///
    /// # Returns
    /// `None` if the exchange does not list the pair
    #[instrument(skip(self))]
    pub async fn get_ticker(&self, pair: &str) -> RestResult<Option<Ticker>> {
        let mut tickers: HashMap<String, Value> =
            self.client.public_as("returnTicker", RequestParams::new()).await?;

        tickers
            .remove(&pair.to_uppercase())
            .map(|entry| decode("returnTicker", entry))
            .transpose()
    }

    /// Get all listed currency pairs, sorted
    #[instrument(skip(self))]
    pub async fn get_trading_pairs(&self) -> RestResult<Vec<String>> {
        let tickers: HashMap<String, Value> =
            self.client.public_as("returnTicker", RequestParams::new()).await?;

        let mut pairs: Vec<String> = tickers.into_keys().collect();
        pairs.sort();
        Ok(pairs)
    }

    /// Get 24-hour volume
    ///
    /// Per-pair entries map currency to volume; `totalXXX` entries hold
    /// per-currency totals.
    #[instrument(skip(self))]
    pub async fn get_volume(&self) -> RestResult<HashMap<String, Value>> {
        self.client.public_as("return24hVolume", RequestParams::new()).await
    }

    /// Get the order book for one pair
    ///
    /// # Arguments
    /// * `pair` - Currency pair
    /// * `depth` - Number of levels per side (exchange default if `None`)
    #[instrument(skip(self))]
    pub async fn get_order_book(&self, pair: &str, depth: Option<u32>) -> RestResult<OrderBook> {
        let mut params = RequestParams::new().with("currencyPair", pair.to_uppercase());
        if let Some(depth) = depth {
            params.insert("depth", depth);
        }

        debug!("Fetching order book for {}", pair);
        self.client.public_as("returnOrderBook", params).await
    }

    /// Get recent public trades for one pair
    #[instrument(skip(self))]
    pub async fn get_trade_history(&self, pair: &str) -> RestResult<Vec<PublicTrade>> {
        let params = RequestParams::new().with("currencyPair", pair.to_uppercase());
        self.client.public_as("returnTradeHistory", params).await
    }
}
