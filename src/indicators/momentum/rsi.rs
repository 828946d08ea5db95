//! RSI (Relative Strength Index) indicator

use crate::indicators::{IndicatorError, IndicatorSeries};

/// Calculate RSI over a rolling window of close-to-close changes.
///
/// RSI = 100 - (100 / (1 + RS))
/// RS = Average Gain / Average Loss
///
/// Both averages are plain rolling means over `period` deltas, not Wilder
/// smoothing. The first `period` entries are undefined. A window with no
/// losses has an infinite RS and yields exactly 100.
pub fn relative_strength_index(
    closes: &[f64],
    period: usize,
) -> Result<IndicatorSeries, IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::ZeroWindow { indicator: "RSI" });
    }
    IndicatorError::check_len("RSI", period + 1, closes.len())?;

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    let values = deltas.windows(period).map(|window| {
        let avg_gain = window.iter().filter(|d| **d > 0.0).sum::<f64>() / period as f64;
        let avg_loss = window.iter().filter(|d| **d < 0.0).map(|d| -d).sum::<f64>() / period as f64;

        if avg_loss == 0.0 {
            return 100.0;
        }

        let rs = avg_gain / avg_loss;
        100.0 - (100.0 / (1.0 + rs))
    });

    Ok(IndicatorSeries::with_warmup(period, values))
}

/// Calculate RSI with default period (14)
pub fn relative_strength_index_default(closes: &[f64]) -> Result<IndicatorSeries, IndicatorError> {
    relative_strength_index(closes, 14)
}
