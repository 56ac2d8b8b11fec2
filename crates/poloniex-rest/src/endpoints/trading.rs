//! Private account and trading endpoints
//!
//! These endpoints require authentication.

use crate::client::PoloniexClient;
use crate::error::{RestError, RestResult};
use crate::params::RequestParams;
use crate::transport::Transport;
use crate::types::{
    AccountTrade, Balances, CancelOrderResult, OpenOrder, OrderResponse, OrderSide,
    WithdrawResult,
};
use rust_decimal::Decimal;
use tracing::{debug, instrument};

/// Private account and trading endpoints
pub struct TradingEndpoints<'a, T: Transport> {
    client: &'a PoloniexClient<T>,
}

impl<'a, T: Transport> TradingEndpoints<'a, T> {
    pub fn new(client: &'a PoloniexClient<T>) -> Self {
        Self { client }
    }

    /// Get available balances for all currencies
    #[instrument(skip(self))]
    pub async fn get_balances(&self) -> RestResult<Balances> {
        self.client.private_as("returnBalances", RequestParams::new()).await
    }

    /// Get open orders for one pair
    ///
    /// # Arguments
    /// * `pair` - Currency pair (e.g., "BTC_ETH")
    #[instrument(skip(self))]
    pub async fn get_open_orders(&self, pair: &str) -> RestResult<Vec<OpenOrder>> {
        let params = RequestParams::new().with("currencyPair", pair.to_uppercase());
        self.client.private_as("returnOpenOrders", params).await
    }

    /// Get the account's own trade history for one pair
    #[instrument(skip(self))]
    pub async fn get_my_trade_history(&self, pair: &str) -> RestResult<Vec<AccountTrade>> {
        let params = RequestParams::new().with("currencyPair", pair.to_uppercase());
        self.client.private_as("returnTradeHistory", params).await
    }

    /// Place a limit buy order
    ///
    /// # Arguments
    /// * `pair` - Currency pair
    /// * `rate` - Limit price
    /// * `amount` - Amount to buy
    #[instrument(skip(self))]
    pub async fn buy(&self, pair: &str, rate: Decimal, amount: Decimal) -> RestResult<OrderResponse> {
        self.place_order(OrderSide::Buy, pair, rate, amount).await
    }

    /// Place a limit sell order
    #[instrument(skip(self))]
    pub async fn sell(&self, pair: &str, rate: Decimal, amount: Decimal) -> RestResult<OrderResponse> {
        self.place_order(OrderSide::Sell, pair, rate, amount).await
    }

    async fn place_order(
        &self,
        side: OrderSide,
        pair: &str,
        rate: Decimal,
        amount: Decimal,
    ) -> RestResult<OrderResponse> {
        if rate <= Decimal::ZERO || amount <= Decimal::ZERO {
            return Err(RestError::InvalidParameter(format!(
                "rate and amount must be positive (rate={}, amount={})",
                rate, amount
            )));
        }

        let params = RequestParams::new()
            .with("currencyPair", pair.to_uppercase())
            .with("rate", rate)
            .with("amount", amount);

        debug!("Placing {} order for {} {} @ {}", side, amount, pair, rate);

        self.client.private_as(&side.to_string(), params).await
    }

    /// Cancel an open order
    ///
    /// # Arguments
    /// * `pair` - Currency pair the order belongs to
    /// * `order_number` - Order number returned when the order was placed
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, pair: &str, order_number: &str) -> RestResult<CancelOrderResult> {
        let params = RequestParams::new()
            .with("currencyPair", pair.to_uppercase())
            .with("orderNumber", order_number);
        self.client.private_as("cancelOrder", params).await
    }

    /// Withdraw funds to an external address
    ///
    /// # Arguments
    /// * `currency` - Currency code (e.g., "BTC")
    /// * `amount` - Amount to withdraw
    /// * `address` - Destination address
    #[instrument(skip(self, address))]
    pub async fn withdraw(
        &self,
        currency: &str,
        amount: Decimal,
        address: &str,
    ) -> RestResult<WithdrawResult> {
        if address.is_empty() {
            return Err(RestError::InvalidParameter("withdrawal address is empty".to_string()));
        }

        let params = RequestParams::new()
            .with("currency", currency.to_uppercase())
            .with("amount", amount)
            .with("address", address);
        self.client.private_as("withdraw", params).await
    }
}
