//! Prometheus metrics for the polling loop.

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

use crate::models::Signal;

pub struct Metrics {
    registry: Registry,
    pub cycles_total: IntCounter,
    pub cycle_failures_total: IntCounterVec,
    pub cycle_duration_seconds: Histogram,
    pub signals_total: IntCounterVec,
    pub notifications_sent_total: IntCounter,
    pub notifications_failed_total: IntCounter,
    pub last_emitted_signal: IntGauge,
    pub last_success_timestamp_seconds: IntGauge,
    pub http_requests_total: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let cycles_total = IntCounter::new("signal_cycles_total", "Evaluation cycles started")?;
        let cycle_failures_total = IntCounterVec::new(
            Opts::new("signal_cycle_failures_total", "Evaluation cycles that failed"),
            &["kind"],
        )?;
        let cycle_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "signal_cycle_duration_seconds",
            "Wall time of one evaluation cycle",
        ))?;
        let signals_total = IntCounterVec::new(
            Opts::new("signals_composed_total", "Composed signals by value"),
            &["signal"],
        )?;
        let notifications_sent_total =
            IntCounter::new("notifications_sent_total", "Notifications delivered")?;
        let notifications_failed_total =
            IntCounter::new("notifications_failed_total", "Notifications that failed to deliver")?;
        let last_emitted_signal = IntGauge::new(
            "last_emitted_signal",
            "Last announced signal (1 = BUY, -1 = SELL, 0 = none yet)",
        )?;
        let last_success_timestamp_seconds = IntGauge::new(
            "last_successful_cycle_timestamp_seconds",
            "Unix time of the last completed cycle",
        )?;
        let http_requests_total = IntCounter::new("http_requests_total", "HTTP requests served")?;

        registry.register(Box::new(cycles_total.clone()))?;
        registry.register(Box::new(cycle_failures_total.clone()))?;
        registry.register(Box::new(cycle_duration_seconds.clone()))?;
        registry.register(Box::new(signals_total.clone()))?;
        registry.register(Box::new(notifications_sent_total.clone()))?;
        registry.register(Box::new(notifications_failed_total.clone()))?;
        registry.register(Box::new(last_emitted_signal.clone()))?;
        registry.register(Box::new(last_success_timestamp_seconds.clone()))?;
        registry.register(Box::new(http_requests_total.clone()))?;

        Ok(Self {
            registry,
            cycles_total,
            cycle_failures_total,
            cycle_duration_seconds,
            signals_total,
            notifications_sent_total,
            notifications_failed_total,
            last_emitted_signal,
            last_success_timestamp_seconds,
            http_requests_total,
        })
    }

    pub fn record_emitted(&self, signal: Signal) {
        let value = match signal {
            Signal::Buy => 1,
            Signal::Sell => -1,
            Signal::None => 0,
        };
        self.last_emitted_signal.set(value);
    }

    /// Render the registry in the Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
