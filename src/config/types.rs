//! Configuration type definitions.

use super::enums::{ColorSpec, ExportBackground, ThumbRule};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Drawing surface geometry.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CanvasConfig {
    /// Surface width in pixels (valid range: 16 - 8192)
    #[serde(default = "default_width")]
    pub width: u32,

    /// Surface height in pixels (valid range: 16 - 8192)
    #[serde(default = "default_height")]
    pub height: u32,

    /// Mirror horizontally so the drawing follows the hand like a selfie view
    #[serde(default = "default_mirror")]
    pub mirror: bool,

    /// Background placed behind strokes on export (transparent, white, black)
    #[serde(default = "default_export_background")]
    pub export_background: ExportBackground,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            mirror: default_mirror(),
            export_background: default_export_background(),
        }
    }
}

/// Stroke and eraser appearance.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DrawingConfig {
    /// Ink color - a named color or an RGB array like `[255, 0, 255]`
    #[serde(default = "default_stroke_color")]
    pub stroke_color: ColorSpec,

    /// Stroke width in pixels (valid range: 1.0 - 50.0)
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,

    /// Eraser disc radius in pixels (valid range: 2.0 - 200.0)
    #[serde(default = "default_eraser_radius")]
    pub eraser_radius: f64,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            stroke_color: default_stroke_color(),
            stroke_width: default_stroke_width(),
            eraser_radius: default_eraser_radius(),
        }
    }
}

/// Gesture recognition tuning.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GestureConfig {
    /// How the thumb direction is decided (anatomical, handedness)
    #[serde(default = "default_thumb_rule")]
    pub thumb_rule: ThumbRule,

    /// Thumb travel past its IP joint, as a fraction of the thumb-wrist span (0.0 - 0.5)
    #[serde(default)]
    pub thumb_clearance: f64,

    /// Fingertip lift above the PIP joint, as a fraction of hand height (0.0 - 0.5)
    #[serde(default)]
    pub finger_clearance: f64,

    /// Maximum hands tracked per frame; extra hands are ignored (1 - 4)
    #[serde(default = "default_max_hands")]
    pub max_hands: usize,

    /// Debounce gestures by locking onto Drawing/Moving/Erasing
    #[serde(default)]
    pub stabilize: bool,

    /// Frames to lock onto a stroke gesture (1 - 30)
    #[serde(default = "default_lock_frames")]
    pub lock_frames: u32,

    /// Frames without a gesture before a lock is released (1 - 30)
    #[serde(default = "default_unlock_frames")]
    pub unlock_frames: u32,

    /// Frames to confirm a switch between stroke gestures (1 - 30)
    #[serde(default = "default_switch_frames")]
    pub switch_frames: u32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            thumb_rule: default_thumb_rule(),
            thumb_clearance: 0.0,
            finger_clearance: 0.0,
            max_hands: default_max_hands(),
            stabilize: false,
            lock_frames: default_lock_frames(),
            unlock_frames: default_unlock_frames(),
            switch_frames: default_switch_frames(),
        }
    }
}

/// Landmark source pacing.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SourceConfig {
    /// Frames delivered per second (valid range: 1 - 120)
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,

    /// Frames buffered before new ones are dropped (valid range: 1 - 64)
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

/// Where drawings go when the Analyzing gesture fires.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisConfig {
    /// Program and arguments receiving the PNG on stdin; stdout is the result
    #[serde(default)]
    pub command: Option<Vec<String>>,

    /// Directory where each analyzed drawing is saved when no command is set
    #[serde(default)]
    pub snapshot_dir: Option<PathBuf>,

    /// Seconds to wait for an outstanding analysis once the source ends (0 - 600)
    #[serde(default = "default_completion_grace_secs")]
    pub completion_grace_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            command: None,
            snapshot_dir: None,
            completion_grace_secs: default_completion_grace_secs(),
        }
    }
}

/// Session lifecycle settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SessionConfig {
    /// Seconds between keep-alive beats while a session runs (1 - 300)
    #[serde(default = "default_heartbeat_secs")]
    pub heartbeat_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            heartbeat_secs: default_heartbeat_secs(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_width() -> u32 {
    950
}

fn default_height() -> u32 {
    550
}

fn default_mirror() -> bool {
    true
}

fn default_export_background() -> ExportBackground {
    ExportBackground::Black
}

fn default_stroke_color() -> ColorSpec {
    ColorSpec::Name("pink".to_string())
}

fn default_stroke_width() -> f64 {
    5.0
}

fn default_eraser_radius() -> f64 {
    15.0
}

fn default_thumb_rule() -> ThumbRule {
    ThumbRule::Anatomical
}

fn default_max_hands() -> usize {
    1
}

fn default_lock_frames() -> u32 {
    3
}

fn default_unlock_frames() -> u32 {
    3
}

fn default_switch_frames() -> u32 {
    2
}

fn default_frame_rate() -> u32 {
    30
}

fn default_channel_capacity() -> usize {
    4
}

fn default_completion_grace_secs() -> u64 {
    10
}

fn default_heartbeat_secs() -> u64 {
    5
}
