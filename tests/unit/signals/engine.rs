//! Unit tests for the signal engine

use chrono::{Duration, TimeZone, Utc};
use crossignal::config::StrategyConfig;
use crossignal::indicators::IndicatorError;
use crossignal::models::{Candle, CrossoverEvent, PriceSeries, Signal, TrendRegime};
use crossignal::signals::engine::SignalEngine;

/// 49 closes whose SMA(10) crosses above SMA(30) on the last bar, with
/// RSI(14) ~= 44.83 there.
const GOLDEN_CROSS_CLOSES: [f64; 49] = [
    100.0, 101.0, 100.5, 99.5, 100.5, 99.5, 100.0, 100.5, 101.0, 99.5, 98.0, 99.5, 101.0, 102.5,
    101.5, 102.0, 101.0, 102.0, 100.5, 99.5, 98.5, 99.0, 98.5, 100.0, 98.5, 97.0, 96.5, 95.0, 96.5,
    98.0, 98.5, 99.5, 98.5, 98.0, 98.5, 97.5, 97.0, 96.0, 95.0, 96.0, 97.0, 98.0, 99.0, 98.5,
    100.0, 98.5, 97.0, 98.0, 97.0,
];

fn series(timeframe: &str, closes: &[f64]) -> PriceSeries {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let candles = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Candle::new(c, c + 0.5, c - 0.5, c, 100.0, start + Duration::minutes(15 * i as i64)))
        .collect();
    PriceSeries::new("BTC/USDT", timeframe, candles).unwrap()
}

fn rising(n: usize) -> Vec<f64> {
    (0..n).map(|i| 100.0 + i as f64).collect()
}

fn falling(n: usize) -> Vec<f64> {
    (0..n).map(|i| 200.0 - i as f64).collect()
}

fn engine() -> SignalEngine {
    SignalEngine::new(StrategyConfig::default())
}

#[test]
fn test_fetch_limits_follow_strategy_windows() {
    let engine = engine();
    assert_eq!(engine.trend_fetch_limit(), 55);
    assert_eq!(engine.signal_fetch_limit(), 49);
    assert_eq!(engine.min_signal_bars(), 30);
}

#[test]
fn test_golden_cross_in_bullish_trend_is_buy() {
    let engine = engine();
    let trend = engine.classify_trend(&series("4h", &rising(55))).unwrap();
    assert_eq!(trend.regime, TrendRegime::Bullish);

    let evaluation = engine
        .evaluate(&trend, &series("15m", &GOLDEN_CROSS_CLOSES))
        .unwrap();

    assert_eq!(evaluation.crossover, CrossoverEvent::Golden);
    assert_eq!(evaluation.signal, Signal::Buy);
    assert_eq!(evaluation.price, 97.0);
    assert!((evaluation.rsi - 44.827586).abs() < 1e-4);
    assert!(evaluation.short_ma.unwrap() > evaluation.long_ma.unwrap());
    assert!(evaluation.rejection.is_none());
}

#[test]
fn test_death_cross_in_bearish_trend_is_sell() {
    let engine = engine();
    let trend = engine.classify_trend(&series("4h", &falling(55))).unwrap();
    assert_eq!(trend.regime, TrendRegime::Bearish);

    let mirrored: Vec<f64> = GOLDEN_CROSS_CLOSES.iter().map(|c| 200.0 - c).collect();
    let evaluation = engine.evaluate(&trend, &series("15m", &mirrored)).unwrap();

    assert_eq!(evaluation.crossover, CrossoverEvent::Death);
    assert_eq!(evaluation.signal, Signal::Sell);
    assert!((evaluation.rsi - (100.0 - 44.827586)).abs() < 1e-4);
}

#[test]
fn test_golden_cross_against_trend_is_rejected_with_reason() {
    let engine = engine();
    let trend = engine.classify_trend(&series("4h", &falling(55))).unwrap();

    let evaluation = engine
        .evaluate(&trend, &series("15m", &GOLDEN_CROSS_CLOSES))
        .unwrap();

    assert_eq!(evaluation.crossover, CrossoverEvent::Golden);
    assert_eq!(evaluation.signal, Signal::None);
    assert!(evaluation.rejection.unwrap().contains("BEARISH"));
}

#[test]
fn test_steady_trend_without_cross_is_none() {
    let engine = engine();
    let trend = engine.classify_trend(&series("4h", &rising(55))).unwrap();
    let evaluation = engine.evaluate(&trend, &series("15m", &rising(49))).unwrap();

    assert_eq!(evaluation.crossover, CrossoverEvent::None);
    assert_eq!(evaluation.signal, Signal::None);
    assert_eq!(evaluation.rsi, 100.0);
}

#[test]
fn test_short_signal_series_is_rejected() {
    let engine = engine();
    let trend = engine.classify_trend(&series("4h", &rising(55))).unwrap();
    let err = engine.evaluate(&trend, &series("15m", &rising(20))).unwrap_err();

    assert!(matches!(
        err,
        IndicatorError::InsufficientData {
            required: 30,
            available: 20,
            ..
        }
    ));
}

#[test]
fn test_short_trend_series_is_rejected() {
    let engine = engine();
    assert!(engine.classify_trend(&series("4h", &rising(49))).is_err());
}
