//! Rising-edge analysis trigger with at most one request in flight.

use crate::gesture::Gesture;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerState {
    #[default]
    Idle,
    Pending,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AnalysisTrigger {
    state: TriggerState,
}

impl AnalysisTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TriggerState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == TriggerState::Pending
    }

    /// Moves to Pending and returns `true` when `current` is the rising edge
    /// of Analyzing and nothing is in flight.
    pub fn fire(&mut self, previous: Gesture, current: Gesture) -> bool {
        let rising = current == Gesture::Analyzing && previous != Gesture::Analyzing;
        if !rising {
            return false;
        }
        if self.is_pending() {
            log::debug!("Analysis already pending, ignoring trigger");
            return false;
        }
        self.state = TriggerState::Pending;
        true
    }

    /// The in-flight request resolved (either way).
    pub fn resolve(&mut self) {
        self.state = TriggerState::Idle;
    }
}
