//! Quiz hand signals: thumbs-down asks for a hint, raised fingers pick an
//! answer option.

use super::landmarks::{FINGER_JOINTS, HandFrame, THUMB_IP, THUMB_TIP, WRIST};

/// Minimum normalized lift of a fingertip above its PIP joint.
const RAISED_MARGIN: f64 = 0.02;

/// One-shot signal emitted by [`QuizGestureDetector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizSignal {
    Hint,
    /// Answer option 1..=4, chosen by the number of raised fingers
    SelectOption(u8),
}

/// Pose reading for one hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuizPose {
    pub thumbs_down: bool,
    pub raised_fingers: u8,
}

impl QuizPose {
    /// Reads a hand; incomplete frames read as a neutral pose.
    pub fn read(hand: &HandFrame) -> Self {
        let Some(lm) = hand.complete_landmarks() else {
            return Self::default();
        };
        let tip = lm[THUMB_TIP];
        let thumbs_down = tip.y > lm[THUMB_IP].y && tip.y > lm[WRIST].y;
        let raised_fingers = FINGER_JOINTS
            .iter()
            .filter(|(tip, pip)| lm[*tip].y < lm[*pip].y - RAISED_MARGIN)
            .count() as u8;
        Self {
            thumbs_down,
            raised_fingers,
        }
    }
}

/// Edge-triggered quiz signal detector.
#[derive(Debug, Clone)]
pub struct QuizGestureDetector {
    options_enabled: bool,
    last: QuizPose,
}

impl QuizGestureDetector {
    pub fn new(options_enabled: bool) -> Self {
        Self {
            options_enabled,
            last: QuizPose::default(),
        }
    }

    /// Feeds one frame of detected hands and returns the signals it fires.
    pub fn observe(&mut self, hands: &[HandFrame]) -> Vec<QuizSignal> {
        let mut signals = Vec::new();
        if hands.is_empty() {
            self.last = QuizPose::default();
            return signals;
        }

        for hand in hands {
            let pose = QuizPose::read(hand);
            if pose.thumbs_down && !self.last.thumbs_down {
                signals.push(QuizSignal::Hint);
            }
            if self.options_enabled
                && pose.raised_fingers > 0
                && pose.raised_fingers != self.last.raised_fingers
            {
                signals.push(QuizSignal::SelectOption(pose.raised_fingers));
            }
            self.last = pose;
        }
        signals
    }
}
