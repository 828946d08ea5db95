//! Golden cross / death cross detection on the last two bars.

use crate::indicators::IndicatorSeries;
use crate::models::CrossoverEvent;

/// Compare the short/long moving-average pair at the previous and current
/// bar.
///
/// Series of different lengths, shorter than two, or with an undefined value
/// at either position report no crossover.
pub fn detect_crossover(short: &IndicatorSeries, long: &IndicatorSeries) -> CrossoverEvent {
    if short.len() != long.len() {
        return CrossoverEvent::None;
    }

    let (Some((Some(prev_short), Some(curr_short))), Some((Some(prev_long), Some(curr_long)))) =
        (short.last_two(), long.last_two())
    else {
        return CrossoverEvent::None;
    };

    if prev_short < prev_long && curr_short > curr_long {
        CrossoverEvent::Golden
    } else if prev_short > prev_long && curr_short < curr_long {
        CrossoverEvent::Death
    } else {
        CrossoverEvent::None
    }
}
