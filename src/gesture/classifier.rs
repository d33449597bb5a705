//! Per-frame hand pose classification.
//!
//! Each finger is tested for extension from the landmark geometry and the
//! resulting extension pattern is mapped onto a [`Gesture`]. Classification
//! is a pure function of one [`HandFrame`] plus the surface dimensions.

use super::landmarks::{
    FINGER_JOINTS, HandFrame, Handedness, INDEX_MCP, INDEX_TIP, Landmark, MIDDLE_MCP, MIDDLE_TIP,
    PINKY_MCP, THUMB_IP, THUMB_MCP, THUMB_TIP, WRIST,
};
use crate::config::ThumbRule;
use crate::draw::Point;
use std::fmt;

/// Discrete action derived from a hand pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gesture {
    #[default]
    None,
    /// Thumb + index: paint with the index fingertip
    Drawing,
    /// Thumb + middle: erase around the middle fingertip
    Erasing,
    /// Thumb + index + middle: reposition without painting
    Moving,
    /// Thumb + pinky: wipe the surface
    Clearing,
    /// Index + middle: request analysis of the drawing
    Analyzing,
}

impl Gesture {
    pub fn name(self) -> &'static str {
        match self {
            Gesture::None => "None",
            Gesture::Drawing => "Drawing",
            Gesture::Erasing => "Erasing",
            Gesture::Moving => "Moving",
            Gesture::Clearing => "Clearing",
            Gesture::Analyzing => "Analyzing",
        }
    }

    /// Landmark whose position drives this gesture, if any.
    pub fn active_fingertip(self) -> Option<usize> {
        match self {
            Gesture::Drawing => Some(INDEX_TIP),
            Gesture::Erasing => Some(MIDDLE_TIP),
            _ => None,
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Extension state of (thumb, index, middle, ring, pinky).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FingerExtension(pub [bool; 5]);

impl FingerExtension {
    pub fn thumb(&self) -> bool {
        self.0[0]
    }

    /// Maps the extension pattern to a gesture; first match wins.
    pub fn gesture(&self) -> Gesture {
        match self.0 {
            [false, true, true, false, false] => Gesture::Analyzing,
            [true, true, false, false, false] => Gesture::Drawing,
            [true, false, true, false, false] => Gesture::Erasing,
            [true, true, true, false, false] => Gesture::Moving,
            [true, false, false, false, true] => Gesture::Clearing,
            _ => Gesture::None,
        }
    }
}

/// Tunables for finger extension tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierSettings {
    pub thumb_rule: ThumbRule,
    /// Required thumb travel as a fraction of |thumb MCP.x - wrist.x|
    pub thumb_clearance: f64,
    /// Required fingertip lift as a fraction of |wrist.y - middle MCP.y|
    pub finger_clearance: f64,
    /// Map x as `1 - x` so on-screen motion follows the hand like a mirror
    pub mirror: bool,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            thumb_rule: ThumbRule::Anatomical,
            thumb_clearance: 0.0,
            finger_clearance: 0.0,
            mirror: true,
        }
    }
}

/// Result of classifying one hand.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Classification {
    pub gesture: Gesture,
    /// `None` when the frame was incomplete
    pub fingers: Option<FingerExtension>,
    /// Surface coordinate of the active fingertip for Drawing/Erasing
    pub point: Option<Point>,
}

/// Stateless hand pose classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct GestureClassifier {
    settings: ClassifierSettings,
}

impl GestureClassifier {
    pub fn new(settings: ClassifierSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ClassifierSettings {
        &self.settings
    }

    /// Classifies a hand against a `width` x `height` pixel surface.
    pub fn classify(&self, hand: &HandFrame, width: u32, height: u32) -> Classification {
        let Some(fingers) = self.finger_extension(hand) else {
            log::trace!("Discarding incomplete hand frame");
            return Classification::default();
        };
        let gesture = fingers.gesture();
        Classification {
            gesture,
            fingers: Some(fingers),
            point: self.fingertip_point(hand, gesture, width, height),
        }
    }

    /// Computes which fingers are extended, or `None` for unusable frames.
    pub fn finger_extension(&self, hand: &HandFrame) -> Option<FingerExtension> {
        let lm = hand.complete_landmarks()?;
        let mut fingers = [false; 5];
        fingers[0] = self.thumb_extended(lm, hand.handedness);

        let hand_size = (lm[WRIST].y - lm[MIDDLE_MCP].y).abs();
        let clearance = self.settings.finger_clearance * hand_size;
        for (slot, (tip, pip)) in FINGER_JOINTS.iter().enumerate() {
            fingers[slot + 1] = lm[*pip].y - lm[*tip].y > clearance;
        }
        Some(FingerExtension(fingers))
    }

    /// Pixel position of the fingertip that drives `gesture`.
    pub fn fingertip_point(
        &self,
        hand: &HandFrame,
        gesture: Gesture,
        width: u32,
        height: u32,
    ) -> Option<Point> {
        let tip = gesture.active_fingertip()?;
        let landmark = hand.complete_landmarks()?[tip];
        let x = if self.settings.mirror {
            1.0 - landmark.x
        } else {
            landmark.x
        };
        Some(Point::new(x * width as f64, landmark.y * height as f64))
    }

    fn thumb_extended(&self, lm: &[Landmark], handedness: Option<Handedness>) -> bool {
        let outward = match (self.settings.thumb_rule, handedness) {
            // Unmirrored source coordinates, palm facing the camera
            (ThumbRule::Handedness, Some(Handedness::Right)) => 1.0,
            (ThumbRule::Handedness, Some(Handedness::Left)) => -1.0,
            _ => anatomical_outward(lm),
        };
        if outward == 0.0 {
            return false;
        }
        let clearance = self.settings.thumb_clearance * (lm[THUMB_MCP].x - lm[WRIST].x).abs();
        (lm[THUMB_TIP].x - lm[THUMB_IP].x) * outward > clearance
    }
}

/// Thumb side of the palm as laid out in this frame: the direction from the
/// pinky knuckle towards the index knuckle.
fn anatomical_outward(lm: &[Landmark]) -> f64 {
    let span = lm[INDEX_MCP].x - lm[PINKY_MCP].x;
    if span > 0.0 {
        1.0
    } else if span < 0.0 {
        -1.0
    } else {
        0.0
    }
}
