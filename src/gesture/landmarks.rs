//! Hand landmark data as delivered by a landmark source.

use serde::{Deserialize, Serialize};

// ============================================================================
// Hand landmark indices
// ============================================================================

pub const WRIST: usize = 0;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_TIP: usize = 12;
pub const RING_PIP: usize = 14;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_TIP: usize = 20;

/// Number of landmarks in a complete hand.
pub const LANDMARK_COUNT: usize = 21;

/// (tip, pip) pairs for index, middle, ring and pinky.
pub const FINGER_JOINTS: [(usize, usize); 4] = [
    (INDEX_TIP, INDEX_PIP),
    (MIDDLE_TIP, MIDDLE_PIP),
    (RING_TIP, RING_PIP),
    (PINKY_TIP, PINKY_PIP),
];

/// One tracked point, normalized to the source frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Which of the user's hands a frame belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    Left,
    Right,
}

/// Landmarks of one detected hand at one instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandFrame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handedness: Option<Handedness>,
    pub landmarks: Vec<Landmark>,
}

impl HandFrame {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self {
            handedness: None,
            landmarks,
        }
    }

    pub fn with_handedness(mut self, handedness: Handedness) -> Self {
        self.handedness = Some(handedness);
        self
    }

    /// Returns the landmarks only when the hand is complete and every
    /// coordinate is finite. Partial or corrupt detections yield `None`.
    pub fn complete_landmarks(&self) -> Option<&[Landmark]> {
        if self.landmarks.len() < LANDMARK_COUNT {
            return None;
        }
        let landmarks = &self.landmarks[..LANDMARK_COUNT];
        landmarks.iter().all(Landmark::is_finite).then_some(landmarks)
    }
}
