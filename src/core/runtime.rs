//! One evaluation cycle wired to its external collaborators.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{error, info};

use crate::config::{Config, StrategyConfig};
use crate::error::CycleError;
use crate::metrics::Metrics;
use crate::services::market_data::MarketDataProvider;
use crate::services::notifier::Notifier;
use crate::signals::engine::{Evaluation, SignalEngine};
use crate::signals::message::{signal_message, AlertContext};
use crate::signals::state::{self, EngineState};

/// What the runtime needs to know about the market it watches.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub symbol: String,
    pub signal_timeframe: String,
    pub trend_timeframe: String,
    pub strategy: StrategyConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            symbol: "BTC/USDT".to_string(),
            signal_timeframe: "15m".to_string(),
            trend_timeframe: "4h".to_string(),
            strategy: StrategyConfig::default(),
        }
    }
}

impl From<&Config> for RuntimeConfig {
    fn from(config: &Config) -> Self {
        Self {
            symbol: config.symbol.clone(),
            signal_timeframe: config.signal_timeframe.clone(),
            trend_timeframe: config.trend_timeframe.clone(),
            strategy: config.strategy.clone(),
        }
    }
}

/// Result of a completed cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub evaluation: Evaluation,
    pub notified: bool,
    pub state: EngineState,
}

pub struct SignalRuntime {
    config: RuntimeConfig,
    engine: SignalEngine,
    provider: Arc<dyn MarketDataProvider>,
    notifier: Arc<dyn Notifier>,
    metrics: Option<Arc<Metrics>>,
}

impl SignalRuntime {
    pub fn new(
        config: RuntimeConfig,
        provider: Arc<dyn MarketDataProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let engine = SignalEngine::new(config.strategy.clone());
        Self {
            config,
            engine,
            provider,
            notifier,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn metrics(&self) -> Option<&Arc<Metrics>> {
        self.metrics.as_ref()
    }

    /// Fetch both timeframes, evaluate, and notify if the signal is new.
    ///
    /// On error the caller keeps its previous state. Once a novel signal is
    /// composed the returned state records it even if delivery failed.
    pub async fn run_cycle(&self, state: EngineState) -> Result<CycleReport, CycleError> {
        let start = Instant::now();
        let symbol = self.config.symbol.as_str();
        if let Some(metrics) = &self.metrics {
            metrics.cycles_total.inc();
        }
        info!(symbol = %symbol, "SignalRuntime: starting signal check for {}", symbol);

        let trend_tf = self.config.trend_timeframe.as_str();
        let trend_series = self
            .provider
            .fetch_bars(symbol, trend_tf, self.engine.trend_fetch_limit())
            .await
            .map_err(|source| CycleError::MarketData {
                timeframe: trend_tf.to_string(),
                source,
            })?;
        let trend = self
            .engine
            .classify_trend(&trend_series)
            .map_err(|source| CycleError::InsufficientData {
                timeframe: trend_tf.to_string(),
                source,
            })?;
        info!(
            symbol = %symbol,
            timeframe = %trend_tf,
            regime = %trend.regime,
            price = trend.last_close,
            trend_ma = trend.trend_ma,
            "SignalRuntime: main trend ({}) {} (price {:.2}, MA{} {:.2})",
            trend_tf,
            trend.regime,
            trend.last_close,
            self.config.strategy.trend_ma,
            trend.trend_ma
        );

        let signal_tf = self.config.signal_timeframe.as_str();
        let signal_series = self
            .provider
            .fetch_bars(symbol, signal_tf, self.engine.signal_fetch_limit())
            .await
            .map_err(|source| CycleError::MarketData {
                timeframe: signal_tf.to_string(),
                source,
            })?;
        let evaluation = self
            .engine
            .evaluate(&trend, &signal_series)
            .map_err(|source| CycleError::InsufficientData {
                timeframe: signal_tf.to_string(),
                source,
            })?;

        if let Some(metrics) = &self.metrics {
            metrics
                .signals_total
                .with_label_values(&[evaluation.signal.as_str()])
                .inc();
        }
        if let Some(reason) = &evaluation.rejection {
            info!(
                symbol = %symbol,
                crossover = ?evaluation.crossover,
                rsi = evaluation.rsi,
                "SignalRuntime: crossover rejected: {}",
                reason
            );
        }

        let (should_notify, next_state) = state::evaluate(evaluation.signal, state);
        if should_notify {
            info!(
                symbol = %symbol,
                signal = %evaluation.signal,
                price = evaluation.price,
                rsi = evaluation.rsi,
                "SignalRuntime: new {} signal for {} (RSI {:.2})",
                evaluation.signal,
                symbol,
                evaluation.rsi
            );
            let ctx = AlertContext {
                symbol,
                signal_timeframe: signal_tf,
                trend_timeframe: trend_tf,
                rsi_period: self.config.strategy.rsi_period,
            };
            self.deliver(&signal_message(&ctx, &evaluation, Utc::now()))
                .await;
            if let Some(metrics) = &self.metrics {
                metrics.record_emitted(next_state.last_emitted);
            }
        } else if !evaluation.signal.is_none() {
            info!(
                symbol = %symbol,
                signal = %evaluation.signal,
                "SignalRuntime: {} signal detected again, already announced",
                evaluation.signal
            );
        } else {
            info!(symbol = %symbol, "SignalRuntime: no signal met all criteria");
        }

        if let Some(metrics) = &self.metrics {
            metrics
                .cycle_duration_seconds
                .observe(start.elapsed().as_secs_f64());
            metrics
                .last_success_timestamp_seconds
                .set(Utc::now().timestamp());
        }

        Ok(CycleReport {
            evaluation,
            notified: should_notify,
            state: next_state,
        })
    }

    /// Send a message, logging (never propagating) delivery failures.
    pub async fn deliver(&self, message: &str) -> bool {
        match self.notifier.send(message).await {
            Ok(()) => {
                info!("SignalRuntime: notification sent");
                if let Some(metrics) = &self.metrics {
                    metrics.notifications_sent_total.inc();
                }
                true
            }
            Err(e) => {
                error!(error = %e, "SignalRuntime: failed to send notification");
                if let Some(metrics) = &self.metrics {
                    metrics.notifications_failed_total.inc();
                }
                false
            }
        }
    }
}
