//! Deduplication of emitted signals.

use crate::models::Signal;
use serde::Serialize;

/// Last signal announced during this process lifetime. Starts at `NONE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EngineState {
    pub last_emitted: Signal,
}

impl EngineState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Decide whether `candidate` should be announced.
///
/// A `NONE` candidate never notifies and never clears the last emitted
/// signal, so `BUY, NONE, BUY` notifies once. Only a different non-`NONE`
/// value re-arms notification.
pub fn evaluate(candidate: Signal, state: EngineState) -> (bool, EngineState) {
    if candidate.is_none() || candidate == state.last_emitted {
        return (false, state);
    }

    (
        true,
        EngineState {
            last_emitted: candidate,
        },
    )
}
