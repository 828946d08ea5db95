//! Directional decisions produced by the signal engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Composed decision for one evaluation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    #[default]
    None,
    Buy,
    Sell,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::None => "NONE",
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Signal::None)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse directional bias of the higher timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrendRegime {
    Bullish,
    Bearish,
}

impl fmt::Display for TrendRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendRegime::Bullish => f.write_str("BULLISH"),
            TrendRegime::Bearish => f.write_str("BEARISH"),
        }
    }
}

/// Moving-average crossover observed between the last two bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CrossoverEvent {
    /// Short MA moved from below to above the long MA.
    Golden,
    /// Short MA moved from above to below the long MA.
    Death,
    None,
}

impl fmt::Display for CrossoverEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrossoverEvent::Golden => f.write_str("Golden Cross"),
            CrossoverEvent::Death => f.write_str("Death Cross"),
            CrossoverEvent::None => f.write_str("none"),
        }
    }
}
