//! Hand landmark model and gesture recognition.
//!
//! - [`HandFrame`]: 21 normalized landmarks for one detected hand
//! - [`GestureClassifier`]: finger extension tests and gesture mapping
//! - [`GestureStabilizer`]: optional lock/unlock debouncing across frames
//! - [`QuizGestureDetector`]: thumbs-down hint and finger-count answers

pub mod classifier;
pub mod landmarks;
pub mod quiz;
pub mod stabilizer;

#[cfg(test)]
pub(crate) mod testing;

pub use classifier::{
    Classification, ClassifierSettings, FingerExtension, Gesture, GestureClassifier,
};
pub use landmarks::{HandFrame, Handedness, Landmark};
pub use quiz::{QuizGestureDetector, QuizPose, QuizSignal};
pub use stabilizer::{GestureStabilizer, StabilizerSettings};
