//! Per-frame input and output surfaces.
//!
//! The host owns the pointer, the clock and the screen. Each frame it hands
//! the controller a [`FrameInput`] and afterwards lets it draw through a
//! [`PolylineRenderer`].

use serde::{Deserialize, Serialize};

use crate::events::{PointId, StringId};
use crate::geometry::Vec2;

/// Pointer state in world coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PointerSample {
    /// World position.
    pub position: Vec2,
    /// Button went down this frame.
    pub pressed: bool,
    /// Button is down.
    pub held: bool,
    /// Button went up this frame.
    pub released: bool,
}

impl PointerSample {
    /// Pointer hovering at `position`.
    pub fn hover(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Button pressed at `position`.
    pub fn press(position: Vec2) -> Self {
        Self {
            position,
            pressed: true,
            held: true,
            released: false,
        }
    }

    /// Dragging at `position`.
    pub fn drag(position: Vec2) -> Self {
        Self {
            position,
            held: true,
            ..Self::default()
        }
    }

    /// Button released at `position`.
    pub fn release(position: Vec2) -> Self {
        Self {
            position,
            released: true,
            ..Self::default()
        }
    }
}

/// Everything the controller needs for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Seconds since the previous frame.
    pub delta_time: f32,
    /// Seconds since the session started.
    pub elapsed_time: f32,
    /// Pointer this frame.
    pub pointer: PointerSample,
}

/// Draws instrument shapes.
pub trait PolylineRenderer {
    /// Draws a string as a polyline.
    fn draw_polyline(&mut self, string: StringId, points: &[Vec2]);

    /// Draws a point at a scale (1 at rest).
    fn draw_point(&mut self, _point: PointId, _position: Vec2, _scale: f32) {}
}

/// Renderer that keeps the last frame in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameCapture {
    /// Polylines in draw order.
    pub polylines: Vec<(StringId, Vec<Vec2>)>,
    /// Points in draw order with their scale.
    pub points: Vec<(PointId, Vec2, f32)>,
}

impl FrameCapture {
    /// Forgets the previous frame.
    pub fn clear(&mut self) {
        self.polylines.clear();
        self.points.clear();
    }

    /// Polyline drawn for `string`, if any.
    pub fn polyline(&self, string: StringId) -> Option<&[Vec2]> {
        self.polylines
            .iter()
            .find(|(id, _)| *id == string)
            .map(|(_, points)| points.as_slice())
    }
}

impl PolylineRenderer for FrameCapture {
    fn draw_polyline(&mut self, string: StringId, points: &[Vec2]) {
        self.polylines.push((string, points.to_vec()));
    }

    fn draw_point(&mut self, point: PointId, position: Vec2, scale: f32) {
        self.points.push((point, position, scale));
    }
}
