//! Market data provider interface.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{PriceSeries, SeriesError};

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("network error: {0}")]
    Network(String),
    #[error("exchange error (HTTP {status}): {message}")]
    Exchange {
        status: u16,
        code: Option<i64>,
        message: String,
    },
    #[error("malformed market data: {0}")]
    Decode(String),
    #[error(transparent)]
    Series(#[from] SeriesError),
}

impl MarketDataError {
    /// Worth retrying within the same fetch: transport failures, rate
    /// limiting and exchange-side 5xx.
    pub fn is_transient(&self) -> bool {
        match self {
            MarketDataError::Network(_) => true,
            MarketDataError::Exchange { status, .. } => *status == 429 || *status >= 500,
            MarketDataError::Decode(_) | MarketDataError::Series(_) => false,
        }
    }

    /// The exchange answered and refused the request itself (4xx other than
    /// rate limiting), e.g. `-1121 Invalid symbol`. Outages and throttling
    /// are not rejections.
    pub fn is_symbol_rejection(&self) -> bool {
        match self {
            MarketDataError::Exchange { status, .. } => {
                (400..500).contains(status) && !self.is_transient()
            }
            _ => false,
        }
    }
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch at most `limit` of the most recent bars, oldest first.
    async fn fetch_bars(
        &self,
        symbol: &str,
        timeframe: &str,
        limit: usize,
    ) -> Result<PriceSeries, MarketDataError>;

    /// Confirm the exchange knows `symbol`.
    async fn validate_symbol(&self, symbol: &str) -> Result<(), MarketDataError> {
        self.fetch_bars(symbol, "1d", 1).await.map(|_| ())
    }
}
