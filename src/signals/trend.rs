//! Higher-timeframe trend classification.

use crate::indicators::trend::latest_sma;
use crate::indicators::IndicatorError;
use crate::models::{PriceSeries, TrendRegime};

/// Regime together with the two values it was derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendReading {
    pub regime: TrendRegime,
    pub last_close: f64,
    pub trend_ma: f64,
}

/// Compare the last close to the `window`-bar SMA.
///
/// Strictly greater is bullish; a close equal to the average is bearish.
pub fn classify_trend(series: &PriceSeries, window: usize) -> Result<TrendReading, IndicatorError> {
    let closes = series.closes();
    let trend_ma = latest_sma(&closes, window)?;
    let last_close = *closes.last().ok_or(IndicatorError::InsufficientData {
        indicator: "trend",
        required: window,
        available: 0,
    })?;

    let regime = if last_close > trend_ma {
        TrendRegime::Bullish
    } else {
        TrendRegime::Bearish
    };

    Ok(TrendReading {
        regime,
        last_close,
        trend_ma,
    })
}
