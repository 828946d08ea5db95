//! Binance spot REST market data provider (`GET /api/v3/klines`).

use std::time::Duration;

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::models::{Candle, PriceSeries};
use crate::services::endpoint;
use crate::services::market_data::{MarketDataError, MarketDataProvider};

const KLINES_PATH: &[&str] = &["api", "v3", "klines"];

#[derive(Debug, Deserialize)]
struct BinanceErrorBody {
    code: i64,
    msg: String,
}

pub struct BinanceMarketDataProvider {
    client: Client,
    base_url: Url,
    max_retries: usize,
    min_retry_delay: Duration,
}

impl BinanceMarketDataProvider {
    pub fn new(base_url: Url) -> Result<Self, MarketDataError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| MarketDataError::Network(e.to_string()))?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: Url, client: Client) -> Self {
        Self {
            client,
            base_url,
            max_retries: 2,
            min_retry_delay: Duration::from_millis(500),
        }
    }

    pub fn with_retries(mut self, max_retries: usize, min_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.min_retry_delay = min_delay;
        self
    }

    async fn fetch_once(
        &self,
        pair: &str,
        timeframe: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let url = endpoint(&self.base_url, KLINES_PATH)
            .map_err(MarketDataError::Network)?;
        let limit = limit.to_string();

        let response = self
            .client
            .get(url)
            .query(&[("symbol", pair), ("interval", timeframe), ("limit", limit.as_str())])
            .send()
            .await
            .map_err(|e| MarketDataError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let parsed = serde_json::from_str::<BinanceErrorBody>(&body).ok();
            return Err(MarketDataError::Exchange {
                status: status.as_u16(),
                code: parsed.as_ref().map(|b| b.code),
                message: parsed.map(|b| b.msg).unwrap_or(body),
            });
        }

        let rows: Vec<Vec<Value>> = response
            .json()
            .await
            .map_err(|e| MarketDataError::Decode(e.to_string()))?;

        rows.iter().map(|row| parse_kline(row)).collect()
    }
}

#[async_trait]
impl MarketDataProvider for BinanceMarketDataProvider {
    async fn fetch_bars(
        &self,
        symbol: &str,
        timeframe: &str,
        limit: usize,
    ) -> Result<PriceSeries, MarketDataError> {
        let pair = exchange_symbol(symbol);

        let candles = (|| self.fetch_once(&pair, timeframe, limit))
            .retry(
                ExponentialBuilder::default()
                    .with_min_delay(self.min_retry_delay)
                    .with_max_times(self.max_retries),
            )
            .when(MarketDataError::is_transient)
            .notify(|err, delay| {
                warn!(
                    symbol = %symbol,
                    timeframe = %timeframe,
                    error = %err,
                    "Binance: fetch failed, retrying in {:?}",
                    delay
                );
            })
            .await?;

        debug!(
            symbol = %symbol,
            timeframe = %timeframe,
            count = candles.len(),
            "Binance: fetched {} candles",
            candles.len()
        );

        Ok(PriceSeries::new(symbol, timeframe, candles)?)
    }
}

/// `BTC/USDT` -> `BTCUSDT`.
pub fn exchange_symbol(symbol: &str) -> String {
    symbol.replace('/', "").to_uppercase()
}

fn parse_kline(row: &[Value]) -> Result<Candle, MarketDataError> {
    if row.len() < 6 {
        return Err(MarketDataError::Decode(format!(
            "kline row has {} fields, expected at least 6",
            row.len()
        )));
    }

    let open_time = row[0]
        .as_i64()
        .ok_or_else(|| MarketDataError::Decode(format!("bad open time: {}", row[0])))?;
    let timestamp = DateTime::from_timestamp_millis(open_time)
        .ok_or_else(|| MarketDataError::Decode(format!("open time out of range: {open_time}")))?;

    Ok(Candle::new(
        number(&row[1])?,
        number(&row[2])?,
        number(&row[3])?,
        number(&row[4])?,
        number(&row[5])?,
        timestamp,
    ))
}

/// Binance encodes prices as strings; accept plain numbers too.
fn number(value: &Value) -> Result<f64, MarketDataError> {
    match value {
        Value::String(s) => s
            .parse::<f64>()
            .map_err(|e| MarketDataError::Decode(format!("bad number '{s}': {e}"))),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| MarketDataError::Decode(format!("bad number {n}"))),
        other => Err(MarketDataError::Decode(format!("expected number, got {other}"))),
    }
}
