//! Configuration enum types.

use crate::draw::{Color, style};
use log::warn;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How the thumb's outward direction is decided.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ThumbRule {
    /// From the hand's own layout: the side of the index knuckle relative to
    /// the pinky knuckle. Works for either hand and any mirroring.
    Anatomical,
    /// From the source's Left/Right label (unmirrored coordinates, palm
    /// towards the camera); unlabelled hands fall back to `anatomical`.
    Handedness,
}

/// Fill placed behind the strokes when the drawing is exported.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ExportBackground {
    Transparent,
    White,
    Black,
}

impl ExportBackground {
    pub fn color(self) -> Option<Color> {
        match self {
            ExportBackground::Transparent => None,
            ExportBackground::White => Some(style::WHITE),
            ExportBackground::Black => Some(style::BLACK),
        }
    }
}

/// Color specification - either a named color or RGB values.
///
/// # Examples
/// ```toml
/// stroke_color = "pink"
/// stroke_color = [255, 128, 0]
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Named color: red, green, blue, yellow, pink/magenta, white, black
    Name(String),
    /// RGB color as [red, green, blue] where each component is 0-255
    Rgb([u8; 3]),
}

impl ColorSpec {
    /// Resolves to a color; unknown names fall back to the default ink.
    pub fn to_color(&self) -> Color {
        match self {
            ColorSpec::Name(name) => Color::from_name(name).unwrap_or_else(|| {
                warn!("Unknown color '{}', using pink", name);
                style::PINK
            }),
            ColorSpec::Rgb([r, g, b]) => Color::rgb(
                *r as f64 / 255.0,
                *g as f64 / 255.0,
                *b as f64 / 255.0,
            ),
        }
    }
}
