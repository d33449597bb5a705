//! Change notifications for a UI layer.

use crate::gesture::Gesture;
use std::fmt;

/// Caller-visible analysis result slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnalysisState {
    /// No result yet
    #[default]
    Empty,
    Pending,
    Ready(String),
    Failed(String),
}

impl fmt::Display for AnalysisState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisState::Empty => write!(f, "empty"),
            AnalysisState::Pending => write!(f, "pending"),
            AnalysisState::Ready(text) => write!(f, "ready: {}", text),
            AnalysisState::Failed(message) => write!(f, "failed: {}", message),
        }
    }
}

/// Receives gesture and analysis updates, only when the value changes.
pub trait GestureObserver {
    fn gesture_changed(&self, gesture: Gesture);
    fn analysis_changed(&self, state: &AnalysisState);
}

/// Observer that writes every change to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl GestureObserver for LogObserver {
    fn gesture_changed(&self, gesture: Gesture) {
        log::info!("Gesture: {}", gesture);
    }

    fn analysis_changed(&self, state: &AnalysisState) {
        match state {
            AnalysisState::Failed(message) => log::warn!("Analysis failed: {}", message),
            other => log::info!("Analysis: {}", other),
        }
    }
}
