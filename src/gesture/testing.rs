//! Synthetic hand poses for tests.
//!
//! The hand is upright with the palm towards the camera, knuckles running
//! from index (x = 0.45) to pinky (x = 0.60), so the thumb side is -x.

use super::landmarks::{HandFrame, Landmark};

const FINGER_COLUMNS: [f64; 4] = [0.45, 0.50, 0.55, 0.60];

/// Builds a complete hand with the given (thumb, index, middle, ring, pinky)
/// extension pattern.
pub(crate) fn hand_pose(fingers: [bool; 5]) -> HandFrame {
    let mut lm = Vec::with_capacity(21);
    lm.push(Landmark::new(0.50, 0.80)); // wrist
    lm.push(Landmark::new(0.44, 0.76));
    lm.push(Landmark::new(0.40, 0.70));
    lm.push(Landmark::new(0.36, 0.66));
    lm.push(if fingers[0] {
        Landmark::new(0.30, 0.62)
    } else {
        Landmark::new(0.44, 0.64)
    });

    for (slot, x) in FINGER_COLUMNS.iter().enumerate() {
        let extended = fingers[slot + 1];
        lm.push(Landmark::new(*x, 0.62)); // mcp
        lm.push(Landmark::new(*x, 0.55)); // pip
        lm.push(Landmark::new(*x, if extended { 0.48 } else { 0.58 }));
        lm.push(Landmark::new(*x, if extended { 0.40 } else { 0.62 }));
    }
    HandFrame::new(lm)
}

/// Same pose with one landmark moved.
pub(crate) fn with_landmark(mut hand: HandFrame, index: usize, x: f64, y: f64) -> HandFrame {
    hand.landmarks[index] = Landmark::new(x, y);
    hand
}

/// Mirror image of a hand (as seen by a camera flipped left/right).
pub(crate) fn mirrored(mut hand: HandFrame) -> HandFrame {
    for lm in &mut hand.landmarks {
        lm.x = 1.0 - lm.x;
    }
    hand
}

pub(crate) const DRAWING: [bool; 5] = [true, true, false, false, false];
pub(crate) const ERASING: [bool; 5] = [true, false, true, false, false];
pub(crate) const MOVING: [bool; 5] = [true, true, true, false, false];
pub(crate) const CLEARING: [bool; 5] = [true, false, false, false, true];
pub(crate) const ANALYZING: [bool; 5] = [false, true, true, false, false];
pub(crate) const FIST: [bool; 5] = [false; 5];
