//! Gating rules that turn a crossover into a directional signal.

use crate::models::{CrossoverEvent, Signal, TrendRegime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiThresholds {
    pub overbought: f64,
    pub oversold: f64,
}

impl Default for RsiThresholds {
    fn default() -> Self {
        Self {
            overbought: 70.0,
            oversold: 30.0,
        }
    }
}

/// Combine crossover, trend regime and RSI. First matching rule wins:
///
/// 1. golden cross in a bullish regime with RSI below overbought: BUY
/// 2. death cross in a bearish regime with RSI above oversold: SELL
/// 3. anything else: NONE
pub fn compose_signal(
    crossover: CrossoverEvent,
    trend: TrendRegime,
    rsi: f64,
    thresholds: RsiThresholds,
) -> Signal {
    match (crossover, trend) {
        (CrossoverEvent::Golden, TrendRegime::Bullish) if rsi < thresholds.overbought => Signal::Buy,
        (CrossoverEvent::Death, TrendRegime::Bearish) if rsi > thresholds.oversold => Signal::Sell,
        _ => Signal::None,
    }
}

/// Why a crossover did not become a signal, for logging.
pub fn rejection_reason(
    crossover: CrossoverEvent,
    trend: TrendRegime,
    rsi: f64,
    thresholds: RsiThresholds,
) -> Option<String> {
    match crossover {
        CrossoverEvent::None => None,
        CrossoverEvent::Golden if trend != TrendRegime::Bullish => {
            Some(format!("golden cross against {trend} trend"))
        }
        CrossoverEvent::Golden if rsi >= thresholds.overbought => Some(format!(
            "golden cross with RSI {rsi:.2} >= overbought {:.2}",
            thresholds.overbought
        )),
        CrossoverEvent::Death if trend != TrendRegime::Bearish => {
            Some(format!("death cross against {trend} trend"))
        }
        CrossoverEvent::Death if rsi <= thresholds.oversold => Some(format!(
            "death cross with RSI {rsi:.2} <= oversold {:.2}",
            thresholds.oversold
        )),
        _ => None,
    }
}
