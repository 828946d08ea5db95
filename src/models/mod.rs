//! Shared data models spanning the engine layers.

pub mod candle;
pub mod signal;

pub use candle::{Candle, PriceSeries, SeriesError};
pub use signal::{CrossoverEvent, Signal, TrendRegime};
