//! Signal detection: trend filter, crossover detection, composition and
//! deduplication.

pub mod composer;
pub mod crossover;
pub mod engine;
pub mod message;
pub mod state;
pub mod trend;

pub use composer::*;
pub use crossover::*;
pub use engine::{Evaluation, SignalEngine};
pub use state::EngineState;
pub use trend::*;
