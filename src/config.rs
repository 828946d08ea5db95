//! Runtime configuration loaded once at startup from the environment.
//!
//! `.env` is read first when present. Missing notifier credentials and any
//! invalid value are startup errors; nothing here is re-read per cycle.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::signals::composer::RsiThresholds;

/// Kline intervals accepted by the exchange.
pub const SUPPORTED_TIMEFRAMES: &[&str] = &[
    "1m", "3m", "5m", "15m", "30m", "1h", "2h", "4h", "6h", "8h", "12h", "1d", "3d", "1w", "1M",
];

pub const DEFAULT_BINANCE_REST_URL: &str = "https://api.binance.com";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Largest `limit` Binance accepts on `/api/v3/klines`.
pub const MAX_KLINES_LIMIT: usize = 1000;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

fn invalid(key: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key,
        reason: reason.into(),
    }
}

/// Current deployment environment (`APP_ENV`), defaults to `sandbox`.
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

/// Strategy constants for the crossover/trend/RSI rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub short_ma: usize,
    pub long_ma: usize,
    pub trend_ma: usize,
    pub rsi_period: usize,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            short_ma: 10,
            long_ma: 30,
            trend_ma: 50,
            rsi_period: 14,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
        }
    }
}

impl StrategyConfig {
    pub fn thresholds(&self) -> RsiThresholds {
        RsiThresholds {
            overbought: self.rsi_overbought,
            oversold: self.rsi_oversold,
        }
    }

    /// Bars requested for the trend timeframe.
    pub fn trend_fetch_limit(&self) -> usize {
        self.trend_ma.saturating_add(5)
    }

    /// Bars requested for the signal timeframe.
    pub fn signal_fetch_limit(&self) -> usize {
        self.long_ma.saturating_add(self.rsi_period).saturating_add(5)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("SHORT_MA", self.short_ma),
            ("LONG_MA", self.long_ma),
            ("TREND_MA", self.trend_ma),
            ("RSI_PERIOD", self.rsi_period),
        ] {
            if value == 0 {
                return Err(invalid(key, "window must be at least 1"));
            }
        }
        if self.short_ma >= self.long_ma {
            return Err(invalid(
                "SHORT_MA",
                format!("{} must be below LONG_MA {}", self.short_ma, self.long_ma),
            ));
        }
        if self.trend_fetch_limit() > MAX_KLINES_LIMIT {
            return Err(invalid(
                "TREND_MA",
                format!(
                    "needs {} bars, exchange serves at most {MAX_KLINES_LIMIT}",
                    self.trend_fetch_limit()
                ),
            ));
        }
        if self.signal_fetch_limit() > MAX_KLINES_LIMIT {
            return Err(invalid(
                "LONG_MA",
                format!(
                    "LONG_MA + RSI_PERIOD needs {} bars, exchange serves at most {MAX_KLINES_LIMIT}",
                    self.signal_fetch_limit()
                ),
            ));
        }
        let (lo, hi) = (self.rsi_oversold, self.rsi_overbought);
        if !(0.0..=100.0).contains(&lo) || !(0.0..=100.0).contains(&hi) || lo >= hi {
            return Err(invalid(
                "RSI_OVERSOLD",
                format!("thresholds must satisfy 0 <= oversold ({lo}) < overbought ({hi}) <= 100"),
            ));
        }
        Ok(())
    }
}

/// Cadence of the polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleConfig {
    pub check_interval: Duration,
    pub error_backoff: Duration,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(900),
            error_backoff: Duration::from_secs(60),
        }
    }
}

#[derive(Clone, PartialEq)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub api_url: Url,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("api_url", &self.api_url.as_str())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeConfig {
    pub rest_url: Url,
    pub max_retries: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub symbol: String,
    pub signal_timeframe: String,
    pub trend_timeframe: String,
    pub schedule: ScheduleConfig,
    pub strategy: StrategyConfig,
    pub telegram: TelegramConfig,
    pub exchange: ExchangeConfig,
    pub notify_on_startup: bool,
    pub notify_on_error: bool,
    pub http_port: Option<u16>,
}

impl Config {
    /// Load `.env` (if any) and read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bot_token = get("TELEGRAM_BOT_TOKEN").ok_or(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))?;
        let chat_id = get("TELEGRAM_CHAT_ID").ok_or(ConfigError::Missing("TELEGRAM_CHAT_ID"))?;

        let symbol = get("SYMBOL").unwrap_or_else(|| "BTC/USDT".to_string()).to_uppercase();
        validate_symbol(&symbol)?;

        let signal_timeframe = timeframe(&get, "SIGNAL_TIMEFRAME", "15m")?;
        let trend_timeframe = timeframe(&get, "TREND_TIMEFRAME", "4h")?;

        let strategy = StrategyConfig {
            short_ma: parse_or(&get, "SHORT_MA", 10usize)?,
            long_ma: parse_or(&get, "LONG_MA", 30usize)?,
            trend_ma: parse_or(&get, "TREND_MA", 50usize)?,
            rsi_period: parse_or(&get, "RSI_PERIOD", 14usize)?,
            rsi_overbought: parse_or(&get, "RSI_OVERBOUGHT", 70.0)?,
            rsi_oversold: parse_or(&get, "RSI_OVERSOLD", 30.0)?,
        };
        strategy.validate()?;

        let check_interval = parse_or(&get, "CHECK_INTERVAL_SECONDS", 900u64)?;
        if check_interval == 0 {
            return Err(invalid("CHECK_INTERVAL_SECONDS", "must be > 0"));
        }
        let error_backoff = parse_or(&get, "ERROR_BACKOFF_SECONDS", 60u64)?;
        if error_backoff == 0 {
            return Err(invalid("ERROR_BACKOFF_SECONDS", "must be > 0"));
        }

        let http_port = get("HTTP_PORT")
            .map(|v| {
                v.parse::<u16>()
                    .map_err(|e| invalid("HTTP_PORT", e.to_string()))
            })
            .transpose()?;

        Ok(Self {
            symbol,
            signal_timeframe,
            trend_timeframe,
            schedule: ScheduleConfig {
                check_interval: Duration::from_secs(check_interval),
                error_backoff: Duration::from_secs(error_backoff),
            },
            strategy,
            telegram: TelegramConfig {
                bot_token,
                chat_id,
                api_url: parse_url(&get, "TELEGRAM_API_URL", DEFAULT_TELEGRAM_API_URL)?,
            },
            exchange: ExchangeConfig {
                rest_url: parse_url(&get, "BINANCE_REST_URL", DEFAULT_BINANCE_REST_URL)?,
                max_retries: parse_or(&get, "FETCH_MAX_RETRIES", 2usize)?,
            },
            notify_on_startup: parse_bool(&get, "NOTIFY_ON_STARTUP", true)?,
            notify_on_error: parse_bool(&get, "NOTIFY_ON_ERROR", false)?,
            http_port,
        })
    }
}

fn validate_symbol(symbol: &str) -> Result<(), ConfigError> {
    let parts: Vec<&str> = symbol.split('/').collect();
    let well_formed = match parts.as_slice() {
        [pair] => !pair.is_empty(),
        [base, quote] => !base.is_empty() && !quote.is_empty(),
        _ => false,
    };
    if !well_formed || !symbol.chars().all(|c| c.is_ascii_alphanumeric() || c == '/') {
        return Err(invalid("SYMBOL", format!("'{symbol}' is not a BASE/QUOTE pair")));
    }
    Ok(())
}

fn timeframe<G>(get: &G, key: &'static str, default: &str) -> Result<String, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let value = get(key).unwrap_or_else(|| default.to_string());
    if !SUPPORTED_TIMEFRAMES.contains(&value.as_str()) {
        return Err(invalid(key, format!("unsupported timeframe '{value}'")));
    }
    Ok(value)
}

fn parse_or<G, T>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        Some(v) => v.parse::<T>().map_err(|e| invalid(key, e.to_string())),
        None => Ok(default),
    }
}

fn parse_bool<G>(get: &G, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key).map(|v| v.to_lowercase()) {
        None => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(invalid(key, format!("expected a boolean, got '{other}'"))),
        },
    }
}

fn parse_url<G>(get: &G, key: &'static str, default: &str) -> Result<Url, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let raw = get(key).unwrap_or_else(|| default.to_string());
    let url = Url::parse(&raw).map_err(|e| invalid(key, e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(key, format!("unsupported scheme '{}'", url.scheme())));
    }
    Ok(url)
}
