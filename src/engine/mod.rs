//! The draw-in-air interaction engine.
//!
//! Frames flow from a [`LandmarkSource`](crate::source::LandmarkSource) into
//! [`GestureEngine::on_frame`], which classifies each hand, optionally
//! stabilizes the gesture, mutates the drawing surface through the
//! [`StrokeRenderer`] and fires the [`AnalysisTrigger`] on the rising edge of
//! Analyzing. [`Session`] owns the source and heartbeat; [`run_session`] ties
//! the two together on one task.

mod controller;
pub mod observer;
pub mod renderer;
pub mod runner;
pub mod session;
pub mod trigger;


pub use controller::{
    AnalysisCompletion, EngineDependencies, EngineSettings, FrameOutcome, GestureEngine,
};
pub use observer::{AnalysisState, GestureObserver, LogObserver};
pub use renderer::{Mutation, StrokeRenderer, StrokeState};
pub use runner::{RunOptions, RunSummary, run_session};
pub use session::{KeepAlive, LogKeepAlive, Session, SessionError, SessionToken};
pub use trigger::{AnalysisTrigger, TriggerState};
