//! Unit tests for signal deduplication

use crossignal::models::Signal;
use crossignal::signals::state::{evaluate, EngineState};

fn feed(signals: &[Signal]) -> (Vec<bool>, EngineState) {
    let mut state = EngineState::new();
    let mut notified = Vec::new();
    for &signal in signals {
        let (notify, next) = evaluate(signal, state);
        notified.push(notify);
        state = next;
    }
    (notified, state)
}

#[test]
fn test_initial_state_has_nothing_emitted() {
    assert_eq!(EngineState::new().last_emitted, Signal::None);
}

#[test]
fn test_none_candidate_never_notifies() {
    let (notified, state) = feed(&[Signal::None, Signal::None]);
    assert_eq!(notified, vec![false, false]);
    assert_eq!(state.last_emitted, Signal::None);
}

#[test]
fn test_repeated_buy_notifies_once() {
    let (notified, state) = feed(&[Signal::Buy, Signal::Buy, Signal::Buy]);
    assert_eq!(notified, vec![true, false, false]);
    assert_eq!(state.last_emitted, Signal::Buy);
}

#[test]
fn test_neutral_cycle_does_not_rearm_notification() {
    // Debounce: a NONE cycle leaves last_emitted untouched, so the second
    // BUY is still considered already announced.
    let (notified, state) = feed(&[Signal::Buy, Signal::None, Signal::Buy]);
    assert_eq!(notified, vec![true, false, false]);
    assert_eq!(state.last_emitted, Signal::Buy);
}

#[test]
fn test_alternating_signals_each_notify() {
    let (notified, state) = feed(&[Signal::Buy, Signal::Sell, Signal::None, Signal::Buy]);
    assert_eq!(notified, vec![true, true, false, true]);
    assert_eq!(state.last_emitted, Signal::Buy);
}

#[test]
fn test_suppressed_candidate_leaves_state_unchanged() {
    let state = EngineState {
        last_emitted: Signal::Sell,
    };
    let (notify, next) = evaluate(Signal::Sell, state);
    assert!(!notify);
    assert_eq!(next, state);
}
