//! SMA (Simple Moving Average) indicator

use crate::indicators::{IndicatorError, IndicatorSeries};

/// Rolling arithmetic mean of `window` closes.
///
/// Entry `i` is defined for `i >= window - 1`. Fails when the series cannot
/// produce a single defined value, so callers never receive an all-`None`
/// series.
pub fn simple_moving_average(
    closes: &[f64],
    window: usize,
) -> Result<IndicatorSeries, IndicatorError> {
    if window == 0 {
        return Err(IndicatorError::ZeroWindow { indicator: "SMA" });
    }
    IndicatorError::check_len("SMA", window, closes.len())?;

    let means = closes
        .windows(window)
        .map(|w| w.iter().sum::<f64>() / window as f64);

    Ok(IndicatorSeries::with_warmup(window - 1, means))
}

/// Most recent SMA value over `window` closes.
pub fn latest_sma(closes: &[f64], window: usize) -> Result<f64, IndicatorError> {
    simple_moving_average(closes, window)?
        .last()
        .ok_or(IndicatorError::InsufficientData {
            indicator: "SMA",
            required: window,
            available: closes.len(),
        })
}
