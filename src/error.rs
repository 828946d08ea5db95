//! Failures of a single evaluation cycle.

use thiserror::Error;

use crate::indicators::IndicatorError;
use crate::services::market_data::MarketDataError;

#[derive(Debug, Error)]
pub enum CycleError {
    #[error("failed to fetch {timeframe} data: {source}")]
    MarketData {
        timeframe: String,
        #[source]
        source: MarketDataError,
    },
    #[error("not enough {timeframe} data: {source}")]
    InsufficientData {
        timeframe: String,
        #[source]
        source: IndicatorError,
    },
    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

impl CycleError {
    /// Recoverable failures wait for the next regular tick; everything else
    /// goes through the error backoff.
    pub fn is_recoverable(&self) -> bool {
        match self {
            CycleError::MarketData { source, .. } => {
                !matches!(source, MarketDataError::Series(_))
            }
            CycleError::InsufficientData { .. } => true,
            CycleError::Unexpected(_) => false,
        }
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            CycleError::MarketData { source, .. } => match source {
                _ if source.is_transient() => "network",
                MarketDataError::Series(_) => "invalid_series",
                MarketDataError::Decode(_) => "decode",
                MarketDataError::Exchange { .. } | MarketDataError::Network(_) => "exchange",
            },
            CycleError::InsufficientData { .. } => "insufficient_data",
            CycleError::Unexpected(_) => "unexpected",
        }
    }
}
