//! Frame-to-frame gesture locking.
//!
//! Landmark jitter makes the raw classification flicker between neighbouring
//! gestures, which breaks strokes apart. Once a stroke-type gesture
//! (Drawing, Moving, Erasing) has been held for a few frames it becomes
//! *locked*: brief dropouts keep reporting the locked gesture and switching
//! to another stroke gesture needs a short confirmation run. Clearing and
//! Analyzing always pass straight through.

use super::classifier::Gesture;

/// Frame thresholds for locking and unlocking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StabilizerSettings {
    /// Consecutive frames needed to lock onto a stroke gesture
    pub lock_frames: u32,
    /// Consecutive `None` frames needed to drop a lock
    pub unlock_frames: u32,
    /// Consecutive frames needed to switch between stroke gestures
    pub switch_frames: u32,
}

impl Default for StabilizerSettings {
    fn default() -> Self {
        Self {
            lock_frames: 3,
            unlock_frames: 3,
            switch_frames: 2,
        }
    }
}

fn is_stroke_gesture(gesture: Gesture) -> bool {
    matches!(gesture, Gesture::Drawing | Gesture::Moving | Gesture::Erasing)
}

/// Debounces raw gestures into the gesture the engine acts on.
#[derive(Debug, Clone)]
pub struct GestureStabilizer {
    settings: StabilizerSettings,
    locked: Option<Gesture>,
    counter: u32,
}

impl GestureStabilizer {
    pub fn new(settings: StabilizerSettings) -> Self {
        Self {
            settings,
            locked: None,
            counter: 0,
        }
    }

    pub fn locked(&self) -> Option<Gesture> {
        self.locked
    }

    pub fn reset(&mut self) {
        self.locked = None;
        self.counter = 0;
    }

    /// Feeds one raw classification and returns the effective gesture.
    pub fn update(&mut self, detected: Gesture) -> Gesture {
        let Some(locked) = self.locked else {
            if is_stroke_gesture(detected) {
                self.counter += 1;
                if self.counter >= self.settings.lock_frames {
                    log::debug!("Locked onto {}", detected);
                    self.locked = Some(detected);
                    self.counter = 0;
                }
            } else {
                self.counter = 0;
            }
            return detected;
        };

        if detected == locked {
            self.counter = 0;
            return locked;
        }

        match detected {
            Gesture::Clearing | Gesture::Analyzing => {
                self.reset();
                detected
            }
            Gesture::None => {
                self.counter += 1;
                if self.counter >= self.settings.unlock_frames {
                    log::debug!("Released {} lock", locked);
                    self.reset();
                    Gesture::None
                } else {
                    locked
                }
            }
            _ => {
                // Another stroke gesture: shown right away, locked once confirmed
                self.counter += 1;
                if self.counter >= self.settings.switch_frames {
                    log::debug!("Switched lock {} -> {}", locked, detected);
                    self.locked = Some(detected);
                    self.counter = 0;
                }
                detected
            }
        }
    }
}
