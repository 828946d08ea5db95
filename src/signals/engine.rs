//! Pure evaluation of one cycle over the trend and signal series.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::StrategyConfig;
use crate::indicators::momentum::relative_strength_index;
use crate::indicators::trend::simple_moving_average;
use crate::indicators::IndicatorError;
use crate::models::{CrossoverEvent, PriceSeries, Signal, TrendRegime};
use crate::signals::composer::{compose_signal, rejection_reason};
use crate::signals::crossover::detect_crossover;
use crate::signals::trend::{classify_trend, TrendReading};

/// Everything computed for the latest signal-timeframe bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub signal: Signal,
    pub crossover: CrossoverEvent,
    pub trend: TrendRegime,
    pub price: f64,
    pub rsi: f64,
    pub short_ma: Option<f64>,
    pub long_ma: Option<f64>,
    pub bar_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SignalEngine {
    strategy: StrategyConfig,
}

impl SignalEngine {
    pub fn new(strategy: StrategyConfig) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> &StrategyConfig {
        &self.strategy
    }

    /// Bars requested for the trend timeframe.
    pub fn trend_fetch_limit(&self) -> usize {
        self.strategy.trend_fetch_limit()
    }

    /// Bars requested for the signal timeframe.
    pub fn signal_fetch_limit(&self) -> usize {
        self.strategy.signal_fetch_limit()
    }

    /// Shortest signal series that yields a long MA and an RSI at the last bar.
    pub fn min_signal_bars(&self) -> usize {
        self.strategy
            .long_ma
            .max(self.strategy.rsi_period + 1)
            .max(2)
    }

    pub fn classify_trend(&self, series: &PriceSeries) -> Result<TrendReading, IndicatorError> {
        classify_trend(series, self.strategy.trend_ma)
    }

    /// Compute indicators on the signal series and compose the candidate
    /// signal under the given trend.
    pub fn evaluate(
        &self,
        trend: &TrendReading,
        series: &PriceSeries,
    ) -> Result<Evaluation, IndicatorError> {
        IndicatorError::check_len("signal series", self.min_signal_bars(), series.len())?;

        let closes = series.closes();
        let short = simple_moving_average(&closes, self.strategy.short_ma)?;
        let long = simple_moving_average(&closes, self.strategy.long_ma)?;
        let rsi_series = relative_strength_index(&closes, self.strategy.rsi_period)?;

        let last = series.last().ok_or(IndicatorError::InsufficientData {
            indicator: "signal series",
            required: self.min_signal_bars(),
            available: 0,
        })?;
        let rsi = rsi_series.last().ok_or(IndicatorError::InsufficientData {
            indicator: "RSI",
            required: self.strategy.rsi_period + 1,
            available: closes.len(),
        })?;

        let crossover = detect_crossover(&short, &long);
        let thresholds = self.strategy.thresholds();
        let signal = compose_signal(crossover, trend.regime, rsi, thresholds);
        let rejection = if signal.is_none() {
            rejection_reason(crossover, trend.regime, rsi, thresholds)
        } else {
            None
        };

        Ok(Evaluation {
            signal,
            crossover,
            trend: trend.regime,
            price: last.close,
            rsi,
            short_ma: short.last(),
            long_ma: long.last(),
            bar_time: last.timestamp,
            rejection,
        })
    }
}
