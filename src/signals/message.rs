//! Notification text, rendered in Telegram Markdown.

use chrono::{DateTime, Local, Utc};

use crate::signals::engine::Evaluation;

/// Static context needed to describe a signal to a human.
#[derive(Debug, Clone)]
pub struct AlertContext<'a> {
    pub symbol: &'a str,
    pub signal_timeframe: &'a str,
    pub trend_timeframe: &'a str,
    pub rsi_period: usize,
}

pub fn signal_message(
    ctx: &AlertContext<'_>,
    evaluation: &Evaluation,
    generated_at: DateTime<Utc>,
) -> String {
    format!(
        "🚨 *NEW SIGNAL: {signal} FOR {symbol}* 🚨\n\n\
         *Current Price:* `${price}`\n\
         *Signal Timeframe:* `{signal_tf}`\n\n\
         *Conditions Met:*\n\
         ✅ *Crossover:* `{crossover}`\n\
         ✅ *Main Trend ({trend_tf}):* `{trend}`\n\
         ✅ *RSI ({period}):* `{rsi:.2}` (within safe range)\n\n\
         _{at} - Please do your own research._",
        signal = evaluation.signal,
        symbol = ctx.symbol,
        price = format_price(evaluation.price),
        signal_tf = ctx.signal_timeframe,
        crossover = evaluation.crossover,
        trend_tf = ctx.trend_timeframe,
        trend = evaluation.trend,
        period = ctx.rsi_period,
        rsi = evaluation.rsi,
        at = generated_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S"),
    )
}

pub fn startup_message(symbol: &str) -> String {
    format!("✅ *Signal bot for {symbol} is active!*")
}

pub fn error_message(symbol: &str, error: &str) -> String {
    format!(
        "⚠️ *Signal bot for {symbol} hit an unexpected error:* `{}`",
        error.replace('`', "'")
    )
}

/// Two decimals with comma thousands separators, e.g. `65,432.10`.
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return price.to_string();
    }

    let fixed = format!("{:.2}", price.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if price < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}
