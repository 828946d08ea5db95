//! Integration tests for the Binance kline provider against a mocked exchange

use std::time::Duration;

use crossignal::services::binance::{exchange_symbol, BinanceMarketDataProvider};
use crossignal::services::market_data::{MarketDataError, MarketDataProvider};
use serde_json::{json, Value};
use tokio_test::{assert_err, assert_ok};
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BASE_MS: i64 = 1_704_067_200_000;

fn kline(open_time: i64, close: &str) -> Value {
    json!([
        open_time,
        "100.00",
        "101.50",
        "99.25",
        close,
        "12.5",
        open_time + 899_999,
        "1250.0",
        42,
        "6.0",
        "600.0",
        "0"
    ])
}

fn provider(server: &MockServer) -> BinanceMarketDataProvider {
    let base = Url::parse(&server.uri()).unwrap();
    BinanceMarketDataProvider::with_client(base, reqwest::Client::new())
        .with_retries(2, Duration::from_millis(1))
}

#[test]
fn exchange_symbol_drops_separator() {
    assert_eq!(exchange_symbol("BTC/USDT"), "BTCUSDT");
    assert_eq!(exchange_symbol("eth/btc"), "ETHBTC");
}

#[tokio::test]
async fn fetch_bars_parses_klines() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("symbol", "BTCUSDT"))
        .and(query_param("interval", "15m"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            kline(BASE_MS, "100.75"),
            kline(BASE_MS + 900_000, "101.00"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let series = assert_ok!(provider(&server).fetch_bars("BTC/USDT", "15m", 2).await);

    assert_eq!(series.symbol(), "BTC/USDT");
    assert_eq!(series.timeframe(), "15m");
    assert_eq!(series.closes(), vec![100.75, 101.0]);
    let first = &series.candles()[0];
    assert_eq!(first.high, 101.5);
    assert_eq!(first.low, 99.25);
    assert_eq!(first.volume, 12.5);
    assert_eq!(first.timestamp.timestamp_millis(), BASE_MS);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"code": -1121, "msg": "Invalid symbol."})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = assert_err!(provider(&server).fetch_bars("FOO/BAR", "15m", 10).await);

    match err {
        MarketDataError::Exchange {
            status,
            code,
            message,
        } => {
            assert_eq!(status, 400);
            assert_eq!(code, Some(-1121));
            assert_eq!(message, "Invalid symbol.");
        }
        other => panic!("expected exchange error, got {other:?}"),
    }
}

#[tokio::test]
async fn server_errors_are_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([kline(BASE_MS, "100.75")])))
        .expect(1)
        .mount(&server)
        .await;

    let series = assert_ok!(provider(&server).fetch_bars("BTC/USDT", "4h", 1).await);
    assert_eq!(series.len(), 1);
}

#[tokio::test]
async fn retries_are_bounded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let err = assert_err!(provider(&server).fetch_bars("BTC/USDT", "4h", 1).await);
    assert!(err.is_transient());
}

#[tokio::test]
async fn out_of_order_klines_are_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            kline(BASE_MS + 900_000, "100.75"),
            kline(BASE_MS, "101.00"),
        ])))
        .mount(&server)
        .await;

    let err = assert_err!(provider(&server).fetch_bars("BTC/USDT", "15m", 2).await);
    assert!(matches!(err, MarketDataError::Series(_)));
}

#[tokio::test]
async fn malformed_rows_are_decode_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([[BASE_MS, "1.0", "2.0"]])))
        .expect(1)
        .mount(&server)
        .await;

    let err = assert_err!(provider(&server).fetch_bars("BTC/USDT", "15m", 1).await);
    assert!(matches!(err, MarketDataError::Decode(_)));
}

#[tokio::test]
async fn validate_symbol_requests_single_daily_bar() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("symbol", "ETHUSDT"))
        .and(query_param("interval", "1d"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([kline(BASE_MS, "2500.0")])))
        .expect(1)
        .mount(&server)
        .await;

    assert_ok!(provider(&server).validate_symbol("ETH/USDT").await);
}

#[tokio::test]
async fn unknown_symbol_is_a_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("symbol", "FOOBAR"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"code": -1121, "msg": "Invalid symbol."})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = assert_err!(provider(&server).validate_symbol("FOO/BAR").await);
    assert!(err.is_symbol_rejection());
}

#[tokio::test]
async fn exchange_outage_is_not_a_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let err = assert_err!(provider(&server).validate_symbol("BTC/USDT").await);
    assert!(matches!(err, MarketDataError::Exchange { status: 503, .. }));
    assert!(err.is_transient());
    assert!(!err.is_symbol_rejection());
}

#[tokio::test]
async fn rate_limit_is_not_a_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(json!({"code": -1003, "msg": "Too many requests."})),
        )
        .mount(&server)
        .await;

    let err = assert_err!(provider(&server).validate_symbol("BTC/USDT").await);
    assert!(!err.is_symbol_rejection());
}
