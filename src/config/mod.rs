//! Configuration file support for airscribe.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/airscribe/config.toml`. Settings cover the canvas, stroke
//! appearance, gesture recognition tuning, source pacing, and where analyzed drawings go.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

pub use enums::{ColorSpec, ExportBackground, ThumbRule};
pub use types::{
    AnalysisConfig, CanvasConfig, DrawingConfig, GestureConfig, SessionConfig, SourceConfig,
};

use crate::draw::StrokeStyle;
use crate::gesture::{ClassifierSettings, StabilizerSettings};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure containing all user settings.
///
/// # Example TOML
/// ```toml
/// [canvas]
/// width = 950
/// height = 550
/// mirror = true
///
/// [drawing]
/// stroke_color = "pink"
/// stroke_width = 5.0
/// eraser_radius = 15.0
///
/// [gesture]
/// thumb_rule = "anatomical"
/// stabilize = true
///
/// [analysis]
/// command = ["tesseract", "stdin", "stdout"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Config {
    /// Drawing surface geometry and export background
    #[serde(default)]
    pub canvas: CanvasConfig,

    /// Stroke color, stroke width and eraser size
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Gesture recognition tuning
    #[serde(default)]
    pub gesture: GestureConfig,

    /// Landmark source pacing
    #[serde(default)]
    pub source: SourceConfig,

    /// Analysis destination
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Session heartbeat
    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is logged.
    fn validate_and_clamp(&mut self) {
        if !(16..=8192).contains(&self.canvas.width) {
            warn!(
                "Invalid canvas width {}, clamping to 16-8192 range",
                self.canvas.width
            );
            self.canvas.width = self.canvas.width.clamp(16, 8192);
        }

        if !(16..=8192).contains(&self.canvas.height) {
            warn!(
                "Invalid canvas height {}, clamping to 16-8192 range",
                self.canvas.height
            );
            self.canvas.height = self.canvas.height.clamp(16, 8192);
        }

        if !(1.0..=50.0).contains(&self.drawing.stroke_width) {
            warn!(
                "Invalid stroke_width {:.1}, clamping to 1.0-50.0 range",
                self.drawing.stroke_width
            );
            self.drawing.stroke_width = clamp_f64(self.drawing.stroke_width, 1.0, 50.0);
        }

        if !(2.0..=200.0).contains(&self.drawing.eraser_radius) {
            warn!(
                "Invalid eraser_radius {:.1}, clamping to 2.0-200.0 range",
                self.drawing.eraser_radius
            );
            self.drawing.eraser_radius = clamp_f64(self.drawing.eraser_radius, 2.0, 200.0);
        }

        if !(0.0..=0.5).contains(&self.gesture.thumb_clearance) {
            warn!(
                "Invalid thumb_clearance {:.3}, clamping to 0.0-0.5 range",
                self.gesture.thumb_clearance
            );
            self.gesture.thumb_clearance = clamp_f64(self.gesture.thumb_clearance, 0.0, 0.5);
        }

        if !(0.0..=0.5).contains(&self.gesture.finger_clearance) {
            warn!(
                "Invalid finger_clearance {:.3}, clamping to 0.0-0.5 range",
                self.gesture.finger_clearance
            );
            self.gesture.finger_clearance = clamp_f64(self.gesture.finger_clearance, 0.0, 0.5);
        }

        if !(1..=4).contains(&self.gesture.max_hands) {
            warn!(
                "Invalid max_hands {}, clamping to 1-4 range",
                self.gesture.max_hands
            );
            self.gesture.max_hands = self.gesture.max_hands.clamp(1, 4);
        }

        for (name, value) in [
            ("lock_frames", &mut self.gesture.lock_frames),
            ("unlock_frames", &mut self.gesture.unlock_frames),
            ("switch_frames", &mut self.gesture.switch_frames),
        ] {
            if !(1..=30).contains(value) {
                warn!("Invalid {} {}, clamping to 1-30 range", name, value);
                *value = (*value).clamp(1, 30);
            }
        }

        if !(1..=120).contains(&self.source.frame_rate) {
            warn!(
                "Invalid frame_rate {}, clamping to 1-120 range",
                self.source.frame_rate
            );
            self.source.frame_rate = self.source.frame_rate.clamp(1, 120);
        }

        if !(1..=64).contains(&self.source.channel_capacity) {
            warn!(
                "Invalid channel_capacity {}, clamping to 1-64 range",
                self.source.channel_capacity
            );
            self.source.channel_capacity = self.source.channel_capacity.clamp(1, 64);
        }

        if self.analysis.completion_grace_secs > 600 {
            warn!(
                "Invalid completion_grace_secs {}, clamping to 0-600 range",
                self.analysis.completion_grace_secs
            );
            self.analysis.completion_grace_secs = 600;
        }

        if self
            .analysis
            .command
            .as_ref()
            .is_some_and(|command| command.is_empty())
        {
            warn!("Empty analysis command, ignoring it");
            self.analysis.command = None;
        }

        if !(1..=300).contains(&self.session.heartbeat_secs) {
            warn!(
                "Invalid heartbeat_secs {}, clamping to 1-300 range",
                self.session.heartbeat_secs
            );
            self.session.heartbeat_secs = self.session.heartbeat_secs.clamp(1, 300);
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/airscribe/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("airscribe");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Loads and validates configuration from an explicit path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// JSON schema describing the config file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }

    pub fn classifier_settings(&self) -> ClassifierSettings {
        ClassifierSettings {
            thumb_rule: self.gesture.thumb_rule,
            thumb_clearance: self.gesture.thumb_clearance,
            finger_clearance: self.gesture.finger_clearance,
            mirror: self.canvas.mirror,
        }
    }

    /// Stabilizer thresholds, or `None` when stabilizing is switched off.
    pub fn stabilizer_settings(&self) -> Option<StabilizerSettings> {
        self.gesture.stabilize.then_some(StabilizerSettings {
            lock_frames: self.gesture.lock_frames,
            unlock_frames: self.gesture.unlock_frames,
            switch_frames: self.gesture.switch_frames,
        })
    }

    pub fn stroke_style(&self) -> StrokeStyle {
        StrokeStyle {
            color: self.drawing.stroke_color.to_color(),
            width: self.drawing.stroke_width,
        }
    }

    pub fn heartbeat_period(&self) -> Duration {
        Duration::from_secs(self.session.heartbeat_secs)
    }

    pub fn completion_grace(&self) -> Duration {
        Duration::from_secs(self.analysis.completion_grace_secs)
    }
}

// NaN fails every range check above; send it to the lower bound
fn clamp_f64(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::style;
    use std::io::Write;

    fn load_str(contents: &str) -> Config {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        Config::load_from(file.path()).unwrap()
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = load_str("");
        assert_eq!(config.canvas.width, 950);
        assert_eq!(config.canvas.height, 550);
        assert!(config.canvas.mirror);
        assert_eq!(config.drawing.stroke_width, 5.0);
        assert_eq!(config.drawing.eraser_radius, 15.0);
        assert_eq!(config.gesture.thumb_rule, ThumbRule::Anatomical);
        assert_eq!(config.gesture.max_hands, 1);
        assert!(config.stabilizer_settings().is_none());
        assert_eq!(config.source.frame_rate, 30);
        assert_eq!(config.analysis.completion_grace_secs, 10);
        assert_eq!(config.session.heartbeat_secs, 5);
        assert_eq!(config.stroke_style().color, style::PINK);
    }

    #[test]
    fn parses_every_section() {
        let config = load_str(
            r#"
            [canvas]
            width = 640
            height = 480
            mirror = false
            export_background = "white"

            [drawing]
            stroke_color = [0, 255, 0]
            stroke_width = 8.0

            [gesture]
            thumb_rule = "handedness"
            finger_clearance = 0.15
            stabilize = true
            lock_frames = 4

            [source]
            frame_rate = 15

            [analysis]
            command = ["cat"]
            completion_grace_secs = 0

            [session]
            heartbeat_secs = 2
            "#,
        );

        assert_eq!(config.canvas.width, 640);
        assert_eq!(config.canvas.export_background, ExportBackground::White);
        assert_eq!(config.stroke_style().color, style::GREEN);
        assert_eq!(config.stroke_style().width, 8.0);
        assert_eq!(config.classifier_settings().thumb_rule, ThumbRule::Handedness);
        assert!(!config.classifier_settings().mirror);
        assert_eq!(config.classifier_settings().finger_clearance, 0.15);
        let stabilizer = config.stabilizer_settings().unwrap();
        assert_eq!(stabilizer.lock_frames, 4);
        assert_eq!(stabilizer.switch_frames, 2);
        assert_eq!(config.source.frame_rate, 15);
        assert_eq!(config.analysis.command, Some(vec!["cat".to_string()]));
        assert_eq!(config.completion_grace(), Duration::ZERO);
        assert_eq!(config.heartbeat_period(), Duration::from_secs(2));
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = load_str(
            r#"
            [canvas]
            width = 1

            [drawing]
            stroke_width = 500.0
            eraser_radius = 0.5

            [gesture]
            thumb_clearance = 2.0
            max_hands = 9
            unlock_frames = 0

            [source]
            frame_rate = 1000
            channel_capacity = 0

            [analysis]
            command = []
            completion_grace_secs = 9999

            [session]
            heartbeat_secs = 0
            "#,
        );

        assert_eq!(config.canvas.width, 16);
        assert_eq!(config.drawing.stroke_width, 50.0);
        assert_eq!(config.drawing.eraser_radius, 2.0);
        assert_eq!(config.gesture.thumb_clearance, 0.5);
        assert_eq!(config.gesture.max_hands, 4);
        assert_eq!(config.gesture.unlock_frames, 1);
        assert_eq!(config.source.frame_rate, 120);
        assert_eq!(config.source.channel_capacity, 1);
        assert!(config.analysis.command.is_none());
        assert_eq!(config.analysis.completion_grace_secs, 600);
        assert_eq!(config.session.heartbeat_secs, 1);
    }

    #[test]
    fn unknown_color_name_falls_back_to_pink() {
        let config = load_str("[drawing]\nstroke_color = \"chartreuse\"\n");
        assert_eq!(config.stroke_style().color, style::PINK);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[canvas\nwidth = ").unwrap();
        let err = Config::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn schema_lists_sections() {
        let schema = serde_json::to_value(Config::json_schema()).unwrap();
        let properties = schema.get("properties").unwrap();
        for section in ["canvas", "drawing", "gesture", "source", "analysis", "session"] {
            assert!(properties.get(section).is_some(), "missing {section}");
        }
    }
}
