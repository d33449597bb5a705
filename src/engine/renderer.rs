//! Turns gestures into surface mutations.

use crate::draw::{DrawingSurface, Point, StrokeStyle};
use crate::gesture::Gesture;

/// Per-hand stroke continuity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StrokeState {
    /// Last fingertip position of the current Drawing/Erasing run
    pub previous_point: Option<Point>,
    /// Gesture acted on in the previous frame
    pub last_gesture: Gesture,
}

/// What a renderer call did to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    None,
    Line,
    Erase,
    Clear,
}

/// Applies one hand's gesture to the surface.
#[derive(Debug, Clone, Copy)]
pub struct StrokeRenderer {
    style: StrokeStyle,
    eraser_radius: f64,
}

impl StrokeRenderer {
    pub fn new(style: StrokeStyle, eraser_radius: f64) -> Self {
        Self {
            style,
            eraser_radius,
        }
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    /// Mutates `surface` for `gesture` at `point` and updates `state`.
    ///
    /// Drawing connects to the previous point of the same run, so a fresh run
    /// never paints its first segment. Drawing/Erasing without a point (the
    /// hand was lost while a stabilized gesture held) breaks the run.
    pub fn apply<S: DrawingSurface + ?Sized>(
        &self,
        surface: &mut S,
        state: &mut StrokeState,
        gesture: Gesture,
        point: Option<Point>,
    ) -> Mutation {
        match (gesture, point) {
            (Gesture::Drawing, Some(current)) => {
                let mutation = match state.previous_point {
                    Some(previous) => {
                        surface.draw_line(previous, current, &self.style);
                        Mutation::Line
                    }
                    None => Mutation::None,
                };
                state.previous_point = Some(current);
                mutation
            }
            (Gesture::Erasing, Some(current)) => {
                surface.erase_disc(current, self.eraser_radius);
                state.previous_point = Some(current);
                Mutation::Erase
            }
            (Gesture::Clearing, _) => {
                surface.clear();
                state.previous_point = None;
                Mutation::Clear
            }
            _ => {
                state.previous_point = None;
                Mutation::None
            }
        }
    }
}
