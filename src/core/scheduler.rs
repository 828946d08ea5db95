//! Fixed-cadence polling loop around `SignalRuntime::run_cycle`.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures_util::FutureExt;
use tracing::{error, info, warn};

use crate::config::ScheduleConfig;
use crate::core::http::SharedHealth;
use crate::core::runtime::SignalRuntime;
use crate::signals::message::error_message;
use crate::signals::state::EngineState;

/// Which delay follows a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextTick {
    /// Regular check interval.
    Cadence,
    /// Short pause after an unexpected failure.
    Backoff,
}

/// Runs one cycle at a time; the next starts only after the previous one
/// finished and its delay elapsed. Owns the `EngineState` between cycles.
pub struct PollingScheduler {
    runtime: SignalRuntime,
    schedule: ScheduleConfig,
    notify_on_error: bool,
    health: Option<SharedHealth>,
}

impl PollingScheduler {
    pub fn new(runtime: SignalRuntime, schedule: ScheduleConfig) -> Self {
        Self {
            runtime,
            schedule,
            notify_on_error: false,
            health: None,
        }
    }

    /// Report every cycle outcome to the `/health` endpoint state.
    pub fn with_health(mut self, health: SharedHealth) -> Self {
        self.health = Some(health);
        self
    }

    /// Also send a best-effort message when a cycle fails unexpectedly.
    pub fn with_error_notifications(mut self, enabled: bool) -> Self {
        self.notify_on_error = enabled;
        self
    }

    pub fn runtime(&self) -> &SignalRuntime {
        &self.runtime
    }

    pub fn delay_for(&self, next: NextTick) -> Duration {
        match next {
            NextTick::Cadence => self.schedule.check_interval,
            NextTick::Backoff => self.schedule.error_backoff,
        }
    }

    /// Run a single guarded cycle. Errors and panics never escape; the
    /// previous state is kept whenever the cycle did not complete.
    pub async fn tick(&self, state: EngineState) -> (EngineState, NextTick) {
        let outcome = AssertUnwindSafe(self.runtime.run_cycle(state))
            .catch_unwind()
            .await;

        let failure = match outcome {
            Ok(Ok(report)) => {
                if let Some(health) = &self.health {
                    health.write().await.record_success();
                }
                return (report.state, NextTick::Cadence);
            }
            Ok(Err(e)) if e.is_recoverable() => {
                warn!(error = %e, "PollingScheduler: cycle aborted, waiting for next tick");
                self.record_failure(e.kind()).await;
                return (state, NextTick::Cadence);
            }
            Ok(Err(e)) => {
                self.record_failure(e.kind()).await;
                e.to_string()
            }
            Err(panic) => {
                self.record_failure("panic").await;
                format!("panic: {}", panic_message(panic.as_ref()))
            }
        };

        error!(
            error = %failure,
            backoff_secs = self.schedule.error_backoff.as_secs(),
            "PollingScheduler: unexpected error in cycle"
        );
        if self.notify_on_error {
            let symbol = self.runtime.config().symbol.as_str();
            self.runtime
                .deliver(&error_message(symbol, &failure))
                .await;
        }
        (state, NextTick::Backoff)
    }

    /// Loop until `shutdown` resolves; returns the last state.
    ///
    /// The first cycle runs immediately. Shutdown abandons an in-flight
    /// cycle; its only side effect is a notification.
    pub async fn run<F>(&self, initial: EngineState, shutdown: F) -> EngineState
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut state = initial;

        info!(
            interval_secs = self.schedule.check_interval.as_secs(),
            backoff_secs = self.schedule.error_backoff.as_secs(),
            "PollingScheduler: started"
        );

        loop {
            let next = tokio::select! {
                (next_state, next) = self.tick(state) => {
                    state = next_state;
                    next
                }
                _ = &mut shutdown => break,
            };

            let delay = self.delay_for(next);
            info!(
                delay_secs = delay.as_secs(),
                "PollingScheduler: check finished, waiting {}s for next cycle",
                delay.as_secs()
            );

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = &mut shutdown => break,
            }
        }

        info!(last_emitted = %state.last_emitted, "PollingScheduler: stopped");
        state
    }

    async fn record_failure(&self, kind: &str) {
        if let Some(metrics) = self.runtime.metrics() {
            metrics
                .cycle_failures_total
                .with_label_values(&[kind])
                .inc();
        }
        if let Some(health) = &self.health {
            let mut health = health.write().await;
            health.record_failure();
            if !health.is_healthy() {
                warn!(
                    consecutive_failures = health.consecutive_failures,
                    "PollingScheduler: reporting unhealthy"
                );
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
