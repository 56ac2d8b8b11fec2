//! Integration tests for the HTTP request pipeline
//!
//! Runs the real reqwest transport against a local mock server.

mod common;

use common::*;
use poloniex_auth::sign;
use poloniex_rest::{PoloniexClient, RequestParams, RestError};
use rust_decimal_macros::dec;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, Request, ResponseTemplate};

// =============================================================================
// Public Methods
// =============================================================================

#[tokio::test]
async fn test_public_ticker_end_to_end() {
    init_tracing();
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/public"))
        .and(query_param("command", "returnTicker"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TICKER_RESPONSE))
        .expect(1)
        .mount(&server)
        .await;

    let client = auth_client(&server);
    let result = client.call("returnTicker", None).await.unwrap();
    assert_eq!(result, json!({"BTC_ETH": {"last": "0.03"}}));

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].url.query(), Some("command=returnTicker"));
    assert!(received[0].headers.get("Sign").is_none());
}

#[tokio::test]
async fn test_public_call_without_credentials() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/public"))
        .and(query_param("command", "returnOrderBook"))
        .and(query_param("currencyPair", "BTC_ETH"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"asks":[["0.0301",1.5]],"bids":[["0.0299",2]],"isFrozen":"0","seq":7}"#,
        ))
        .mount(&server)
        .await;

    let client = PoloniexClient::with_config(mock_config(&server)).unwrap();
    let book = client.market().get_order_book("btc_eth", None).await.unwrap();
    assert_eq!(book.best_ask(), Some(dec!(0.0301)));
}

// =============================================================================
// Private Methods
// =============================================================================

#[tokio::test]
async fn test_private_call_is_signed_over_sent_body() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/tradingApi"))
        .and(header("Key", API_KEY))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("command=returnBalances"))
        .and(|req: &Request| {
            let expected = sign(API_SECRET.as_bytes(), &req.body);
            req.headers
                .get("Sign")
                .and_then(|v| v.to_str().ok())
                .map_or(false, |sig| sig == expected)
        })
        .respond_with(ResponseTemplate::new(200).set_body_string(BALANCES_RESPONSE))
        .expect(1)
        .mount(&server)
        .await;

    let client = auth_client(&server);
    let balances = client.trading().unwrap().get_balances().await.unwrap();
    assert_eq!(balances["BTC"], dec!(0.59098578));
}

#[tokio::test]
async fn test_concurrent_private_calls_send_unique_nonces() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/tradingApi"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(20)
        .mount(&server)
        .await;

    let client = auth_client(&server);
    let calls = (0..20).map(|_| client.call("returnBalances", None));
    for result in futures::future::join_all(calls).await {
        result.unwrap();
    }

    let mut nonces: Vec<u64> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|req| {
            let body = String::from_utf8(req.body.clone()).unwrap();
            body.split('&')
                .find_map(|pair| pair.strip_prefix("nonce="))
                .unwrap()
                .parse()
                .unwrap()
        })
        .collect();

    let count = nonces.len();
    nonces.sort_unstable();
    nonces.dedup();
    assert_eq!(nonces.len(), count);
}

#[tokio::test]
async fn test_private_call_without_credentials_sends_nothing() {
    let server = setup_mock_server().await;
    let client = PoloniexClient::with_config(mock_config(&server).with_keys("key", "")).unwrap();

    let result = client.call("returnBalances", None).await;
    assert!(matches!(result, Err(RestError::Configuration(_))));
    assert!(server.received_requests().await.unwrap().is_empty());
}

// =============================================================================
// Classification
// =============================================================================

#[tokio::test]
async fn test_error_field_in_200_rejects() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/tradingApi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(INVALID_ORDER_RESPONSE))
        .mount(&server)
        .await;

    let client = auth_client(&server);
    let params = RequestParams::new()
        .with("currencyPair", "BTC_ETH")
        .with("orderNumber", 123u64);
    let err = client.call("cancelOrder", Some(params)).await.unwrap_err();
    assert_eq!(err.api_message(), Some("Invalid order number."));
}

#[tokio::test]
async fn test_html_body_is_malformed() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/public"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let client = auth_client(&server);
    let err = client.call("returnTicker", None).await.unwrap_err();
    assert!(matches!(err, RestError::MalformedResponse { .. }));
    assert_eq!(err.raw_body(), Some(b"<html>Bad Gateway</html>".as_slice()));
}

// =============================================================================
// Transport Failures
// =============================================================================

#[tokio::test]
async fn test_timeout_surfaces_as_transport_error() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/public"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(TICKER_RESPONSE)
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = mock_config(&server).with_timeout(Duration::from_millis(200));
    let client = PoloniexClient::with_config(config).unwrap();

    let err = client.call("returnTicker", None).await.unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got {:?}", err);
}

#[tokio::test]
async fn test_connection_refused_surfaces_as_transport_error() {
    let server = setup_mock_server().await;
    let config = mock_config(&server).with_public_url("http://127.0.0.1:1/public");
    let client = PoloniexClient::with_config(config).unwrap();

    let err = client.call("returnTicker", None).await.unwrap_err();
    assert!(err.is_transport(), "expected transport error, got {:?}", err);
}

#[tokio::test]
async fn test_unknown_method_sends_nothing() {
    let server = setup_mock_server().await;
    let client = auth_client(&server);

    let err = client.call("notAMethod", None).await.unwrap_err();
    assert!(matches!(err, RestError::UnknownMethod(_)));
    assert!(err.is_local());
    assert!(server.received_requests().await.unwrap().is_empty());
}
