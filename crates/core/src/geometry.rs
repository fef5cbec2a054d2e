//! Axis-aligned rectangle geometry for `TRIANGLES` draws.
//!
//! A rectangle is emitted as two triangles sharing the top-left /
//! bottom-right diagonal. The corner order is fixed:
//! bottom-left, bottom-right, top-left, top-left, top-right, bottom-right.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Number of vertices emitted per rectangle.
pub const RECT_VERTEX_COUNT: usize = 6;

/// An axis-aligned rectangle in pixel (or texture) space.
///
/// `width` extends along +x from `x`, `height` along +y from `y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The unit square `[0, 1] x [0, 1]`, used for texture coordinates.
    pub fn unit() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    /// The six corners of the two triangles covering this rectangle.
    pub fn triangles(&self) -> [Vec2; RECT_VERTEX_COUNT] {
        let bl = Vec2::new(self.x, self.y);
        let br = Vec2::new(self.x + self.width, self.y);
        let tl = Vec2::new(self.x, self.y + self.height);
        let tr = Vec2::new(self.x + self.width, self.y + self.height);
        [bl, br, tl, tl, tr, br]
    }

    /// Flattened `[x0, y0, x1, y1, ...]` coordinates, ready for upload.
    pub fn vertices(&self) -> [f32; RECT_VERTEX_COUNT * 2] {
        rectangle(self.x, self.y, self.width, self.height)
    }
}

/// Builds the six 2D points covering `[x, x + length] x [y, y + breadth]`.
pub fn rectangle(x: f32, y: f32, length: f32, breadth: f32) -> [f32; RECT_VERTEX_COUNT * 2] {
    [
        x,
        y,
        x + length,
        y,
        x,
        y + breadth,
        x,
        y + breadth,
        x + length,
        y + breadth,
        x + length,
        y,
    ]
}
