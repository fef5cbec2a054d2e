//! Drawing-surface size, viewport mapping and clear.

use serde::{Deserialize, Serialize};

use super::gl::GlContext;

/// Current pixel dimensions of the canvas being drawn to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True if either dimension is zero, e.g. a hidden canvas. Nothing can
    /// be drawn to an empty surface.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The value written to the `u_resolution` uniform.
    pub fn resolution(&self) -> [f32; 2] {
        [self.width as f32, self.height as f32]
    }
}

/// Maps clip space onto the whole surface and clears the color buffer.
pub fn configure_viewport<G: GlContext>(gl: &G, size: SurfaceSize, clear_color: [f32; 4]) {
    let width = i32::try_from(size.width).unwrap_or(i32::MAX);
    let height = i32::try_from(size.height).unwrap_or(i32::MAX);
    gl.viewport(0, 0, width, height);

    let [r, g, b, a] = clear_color;
    gl.clear_color(r, g, b, a);
    gl.clear(glow::COLOR_BUFFER_BIT);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::trace::{GlCall, TraceContext};

    #[test]
    fn resolution_is_width_then_height() {
        assert_eq!(SurfaceSize::new(640, 480).resolution(), [640.0, 480.0]);
    }

    #[test]
    fn zero_in_either_dimension_is_empty() {
        assert!(SurfaceSize::new(0, 0).is_empty());
        assert!(SurfaceSize::new(0, 10).is_empty());
        assert!(SurfaceSize::new(10, 0).is_empty());
        assert!(!SurfaceSize::new(1, 1).is_empty());
    }

    #[test]
    fn viewport_covers_surface_then_clears() {
        let gl = TraceContext::new();
        configure_viewport(&gl, SurfaceSize::new(300, 200), [0.0, 0.0, 0.0, 0.0]);
        assert_eq!(
            gl.calls(),
            vec![
                GlCall::Viewport {
                    x: 0,
                    y: 0,
                    width: 300,
                    height: 200
                },
                GlCall::ClearColor {
                    r: 0.0,
                    g: 0.0,
                    b: 0.0,
                    a: 0.0
                },
                GlCall::Clear {
                    mask: glow::COLOR_BUFFER_BIT
                },
            ]
        );
    }

    #[test]
    fn oversized_surface_saturates_instead_of_wrapping() {
        let gl = TraceContext::new();
        configure_viewport(&gl, SurfaceSize::new(u32::MAX, 1), [0.0; 4]);
        assert_eq!(gl.viewport_rect(), Some([0, 0, i32::MAX, 1]));
    }
}
