//! Total account value in a single currency
//!
//! Converts every balance and every open order into one currency using the
//! last traded price of `<CURRENCY>_<COIN>`. Coins without such a pair are
//! skipped. Empty or unexpected balance/ticker/open-order payloads count as
//! empty here; every other failure propagates.

use crate::client::PoloniexClient;
use crate::error::{RestError, RestResult};
use crate::params::RequestParams;
use crate::transport::Transport;
use futures::future::try_join_all;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::{debug, instrument};

/// Open order fields the aggregation needs
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct OrderValue {
    pub side: String,
    pub amount: Decimal,
    pub total: Decimal,
}

impl<T: Transport> PoloniexClient<T> {
    /// Total value of balances and open orders, expressed in `currency`
    ///
    /// Issues `returnBalances` and `returnTicker`, then one
    /// `returnOpenOrders` per listed pair, concurrently.
    #[instrument(skip(self))]
    pub async fn get_total_balance(&self, currency: &str) -> RestResult<Decimal> {
        if currency.trim().is_empty() {
            return Err(RestError::InvalidParameter(
                "get_total_balance called with an empty currency".to_string(),
            ));
        }
        let currency = currency.trim().to_uppercase();

        let balances = parse_balances(&self.call_private("returnBalances", None).await?);
        let prices = parse_prices(&self.call_public("returnTicker", None).await?);

        let pairs: Vec<String> = balances
            .keys()
            .filter(|coin| **coin != currency)
            .map(|coin| format!("{}_{}", currency, coin))
            .filter(|pair| prices.contains_key(pair))
            .collect();

        debug!(coins = balances.len(), pairs = pairs.len(), "Fetching open orders");

        let orders = try_join_all(pairs.iter().map(|pair| {
            let params = RequestParams::new().with("currencyPair", pair.as_str());
            async move {
                let value = self.call_private("returnOpenOrders", Some(params)).await?;
                Ok::<_, RestError>((pair.clone(), parse_orders(&value)))
            }
        }))
        .await?;

        Ok(aggregate(&currency, &balances, &prices, &orders))
    }

    /// Total value in BTC
    pub async fn get_total_btc_balance(&self) -> RestResult<Decimal> {
        self.get_total_balance("BTC").await
    }

    /// Total value in ETH
    pub async fn get_total_eth_balance(&self) -> RestResult<Decimal> {
        self.get_total_balance("ETH").await
    }
}

pub(crate) fn aggregate(
    currency: &str,
    balances: &HashMap<String, Decimal>,
    prices: &HashMap<String, Decimal>,
    orders: &[(String, Vec<OrderValue>)],
) -> Decimal {
    let mut total = Decimal::ZERO;

    for (coin, amount) in balances {
        if *amount <= Decimal::ZERO {
            continue;
        }
        if coin == currency {
            total += *amount;
        } else if let Some(price) = prices.get(&format!("{}_{}", currency, coin)) {
            total += *amount * *price;
        }
    }

    for (pair, pair_orders) in orders {
        for order in pair_orders {
            match order.side.as_str() {
                "buy" => total += order.total,
                "sell" => {
                    if let Some(price) = prices.get(pair) {
                        total += order.amount * *price;
                    }
                }
                _ => {}
            }
        }
    }

    total
}

fn decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => Decimal::from_str(s).ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        _ => None,
    }
}

fn parse_balances(value: &Value) -> HashMap<String, Decimal> {
    value
        .as_object()
        .map(|map| {
            map.iter()
                .filter_map(|(coin, amount)| Some((coin.to_uppercase(), decimal(amount)?)))
                .collect()
        })
        .unwrap_or_default()
}

fn parse_prices(value: &Value) -> HashMap<String, Decimal> {
    value
        .as_object()
        .map(|map| {
            map.iter()
                .filter_map(|(pair, ticker)| Some((pair.to_uppercase(), decimal(ticker.get("last")?)?)))
                .collect()
        })
        .unwrap_or_default()
}

fn parse_orders(value: &Value) -> Vec<OrderValue> {
    value
        .as_array()
        .map(|orders| {
            orders
                .iter()
                .filter_map(|order| {
                    Some(OrderValue {
                        side: order.get("type")?.as_str()?.to_string(),
                        amount: decimal(order.get("amount")?)?,
                        total: decimal(order.get("total")?)?,
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientConfig;
    use crate::transport::MockTransport;
    use poloniex_auth::Credentials;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn order(side: &str, amount: Decimal, total: Decimal) -> OrderValue {
        OrderValue {
            side: side.to_string(),
            amount,
            total,
        }
    }

    #[test]
    fn test_aggregate_balances_and_orders() {
        let balances = HashMap::from([
            ("BTC".to_string(), dec!(1.5)),
            ("ETH".to_string(), dec!(10)),
            ("DOGE".to_string(), dec!(1000)),
            ("LTC".to_string(), dec!(0)),
        ]);
        let prices = HashMap::from([
            ("BTC_ETH".to_string(), dec!(0.03)),
            ("BTC_LTC".to_string(), dec!(0.004)),
        ]);
        let orders = vec![
            ("BTC_ETH".to_string(), vec![order("buy", dec!(5), dec!(0.15)), order("sell", dec!(2), dec!(0.062))]),
            ("BTC_LTC".to_string(), vec![order("sell", dec!(100), dec!(0.41))]),
        ];

        // 1.5 + 10*0.03 + buy 0.15 + sell 2*0.03 + sell 100*0.004 (DOGE unpriced)
        assert_eq!(aggregate("BTC", &balances, &prices, &orders), dec!(2.41));
    }

    #[test]
    fn test_aggregate_empty() {
        assert_eq!(
            aggregate("BTC", &HashMap::new(), &HashMap::new(), &[]),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_lenient_parsers() {
        assert!(parse_balances(&json!([])).is_empty());
        assert!(parse_prices(&json!(null)).is_empty());
        assert!(parse_orders(&json!({})).is_empty());

        let balances = parse_balances(&json!({"btc": "0.5", "ETH": 2, "BAD": "x"}));
        assert_eq!(balances.get("BTC"), Some(&dec!(0.5)));
        assert_eq!(balances.get("ETH"), Some(&dec!(2)));
        assert!(!balances.contains_key("BAD"));
    }

    #[tokio::test]
    async fn test_total_balance_end_to_end() {
        let config = ClientConfig::new().with_credentials(Credentials::new("key", "secret").unwrap());
        let client = PoloniexClient::with_transport(MockTransport::new(), config);
        let transport = client.transport();

        transport.push_response(r#"{"BTC":"1.0","ETH":"10"}"#);
        transport.push_response(r#"{"BTC_ETH":{"last":"0.03"}}"#);
        transport.push_response(r#"[{"orderNumber":"1","type":"buy","rate":"0.03","amount":"1","total":"0.03"}]"#);

        let total = client.get_total_btc_balance().await.unwrap();
        assert_eq!(total, dec!(1.33));

        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        assert!(requests[2]
            .body
            .as_deref()
            .unwrap()
            .contains("currencyPair=BTC_ETH"));
    }

    #[tokio::test]
    async fn test_total_balance_requires_currency() {
        let client = PoloniexClient::with_transport(MockTransport::new(), ClientConfig::new());
        let result = client.get_total_balance(" ").await;
        assert!(matches!(result, Err(RestError::InvalidParameter(_))));
        assert_eq!(client.transport().call_count(), 0);
    }

    #[tokio::test]
    async fn test_total_balance_without_credentials() {
        let client = PoloniexClient::with_transport(MockTransport::new(), ClientConfig::new());
        let result = client.get_total_balance("BTC").await;
        assert!(matches!(result, Err(RestError::Configuration(_))));
    }
}
