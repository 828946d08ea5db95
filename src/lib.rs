//! Trend-filtered moving-average crossover alerts.
//!
//! Polls an exchange on a fixed cadence, classifies the higher-timeframe
//! trend, looks for SMA crossovers gated by RSI on the signal timeframe, and
//! notifies once per signal change.

pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;
