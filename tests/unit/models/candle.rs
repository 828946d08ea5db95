//! Unit tests for price series construction

use chrono::{Duration, TimeZone, Utc};
use crossignal::models::{Candle, PriceSeries, SeriesError};

fn candle_at(minute: i64, close: f64) -> Candle {
    let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minute);
    Candle::new(close, close + 1.0, close - 1.0, close, 10.0, ts)
}

#[test]
fn test_series_accepts_increasing_timestamps() {
    let candles = vec![candle_at(0, 1.0), candle_at(15, 2.0), candle_at(30, 3.0)];
    let series = PriceSeries::new("BTC/USDT", "15m", candles).unwrap();

    assert_eq!(series.len(), 3);
    assert_eq!(series.symbol(), "BTC/USDT");
    assert_eq!(series.timeframe(), "15m");
    assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
    assert_eq!(series.last().map(|c| c.close), Some(3.0));
}

#[test]
fn test_series_rejects_duplicate_timestamp() {
    let candles = vec![candle_at(0, 1.0), candle_at(15, 2.0), candle_at(15, 3.0)];
    let err = PriceSeries::new("BTC/USDT", "15m", candles).unwrap_err();
    assert!(matches!(err, SeriesError::NotIncreasing { index: 2, .. }));
}

#[test]
fn test_series_rejects_out_of_order() {
    let candles = vec![candle_at(30, 1.0), candle_at(15, 2.0)];
    assert!(PriceSeries::new("BTC/USDT", "15m", candles).is_err());
}

#[test]
fn test_empty_series_is_allowed() {
    let series = PriceSeries::new("BTC/USDT", "15m", Vec::new()).unwrap();
    assert!(series.is_empty());
    assert!(series.last().is_none());
}
