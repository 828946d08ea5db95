//! External collaborators: market data in, notifications out.

pub mod binance;
pub mod market_data;
pub mod notifier;
pub mod telegram;

pub use binance::BinanceMarketDataProvider;
pub use market_data::{MarketDataError, MarketDataProvider};
pub use notifier::{Notifier, NotifierError};
pub use telegram::TelegramNotifier;

use url::Url;

/// Append path segments to `base`, keeping any path prefix it already has.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, String> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| format!("{base} cannot be used as a base URL"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
