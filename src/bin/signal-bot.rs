//! Signal bot
//!
//! Polls market data on a fixed cadence and sends a Telegram message once
//! per new trend-confirmed crossover signal.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use crossignal::config::{get_environment, Config};
use crossignal::core::http::{start_server, AppState};
use crossignal::core::runtime::{RuntimeConfig, SignalRuntime};
use crossignal::core::scheduler::PollingScheduler;
use crossignal::logging;
use crossignal::metrics::Metrics;
use crossignal::services::binance::BinanceMarketDataProvider;
use crossignal::services::market_data::MarketDataProvider;
use crossignal::services::notifier::NotifierError;
use crossignal::services::telegram::TelegramNotifier;
use crossignal::signals::message::startup_message;
use crossignal::signals::state::EngineState;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Reads .env first, so APP_ENV and RUST_LOG from it reach the logger.
    let config = Config::from_env();

    logging::init_logging();

    info!(environment = %get_environment(), "Starting signal bot");

    let config = config.map_err(|e| {
        error!(error = %e, "Invalid configuration");
        e
    })?;
    info!(
        symbol = %config.symbol,
        signal_timeframe = %config.signal_timeframe,
        trend_timeframe = %config.trend_timeframe,
        interval_secs = config.schedule.check_interval.as_secs(),
        "Configuration loaded"
    );

    let metrics = Arc::new(Metrics::new().context("failed to initialize metrics")?);

    let provider = BinanceMarketDataProvider::new(config.exchange.rest_url.clone())
        .context("failed to build market data client")?
        .with_retries(config.exchange.max_retries, std::time::Duration::from_millis(500));
    match provider.validate_symbol(&config.symbol).await {
        Ok(()) => info!(symbol = %config.symbol, "Symbol accepted by exchange"),
        Err(e) if e.is_symbol_rejection() => {
            error!(symbol = %config.symbol, error = %e, "Exchange rejected symbol");
            bail!("invalid symbol {}: {}", config.symbol, e);
        }
        Err(e) => warn!(error = %e, "Could not validate symbol, continuing"),
    }

    let notifier = TelegramNotifier::new(&config.telegram).context("failed to build notifier")?;
    match notifier.verify_credentials().await {
        Ok(()) => {}
        Err(e @ NotifierError::Auth(_)) => {
            error!(error = %e, "Telegram rejected bot token");
            bail!("invalid notifier credentials: {}", e);
        }
        Err(e) => warn!(error = %e, "Could not verify Telegram credentials, continuing"),
    }

    let app_state = AppState::new(metrics.clone());
    if let Some(port) = config.http_port {
        let state = app_state.clone();
        tokio::spawn(async move {
            if let Err(e) = start_server(port, state).await {
                error!(error = %e, "HTTP server stopped");
            }
        });
    }

    let runtime = SignalRuntime::new(
        RuntimeConfig::from(&config),
        Arc::new(provider),
        Arc::new(notifier),
    )
    .with_metrics(metrics);

    if config.notify_on_startup {
        runtime.deliver(&startup_message(&config.symbol)).await;
    }

    let scheduler = PollingScheduler::new(runtime, config.schedule)
        .with_error_notifications(config.notify_on_error)
        .with_health(app_state.health);

    let final_state = scheduler
        .run(EngineState::new(), async {
            if let Err(e) = signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            info!("Shutdown signal received");
        })
        .await;

    info!(last_emitted = %final_state.last_emitted, "Signal bot stopped");
    Ok(())
}
