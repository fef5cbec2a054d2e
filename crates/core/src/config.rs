//! Frame configuration.
//!
//! Parsed leniently from a JSON object (unknown keys ignored, wrong types
//! fall back to defaults) and then validated.

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::RenderError;
use crate::geometry::Rect;
use crate::params::{param_bool, param_f32, param_rgba};

pub const DEFAULT_RECT_X: f32 = 50.0;
pub const DEFAULT_RECT_Y: f32 = 50.0;
pub const DEFAULT_RECT_WIDTH: f32 = 700.0;
pub const DEFAULT_RECT_HEIGHT: f32 = 700.0;
pub const DEFAULT_CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 0.0];

/// What one frame draws.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameConfig {
    /// Position geometry, in canvas pixels.
    pub rect: Rect,
    /// Sample an image onto the quad; otherwise draw the position gradient.
    pub textured: bool,
    pub clear_color: [f32; 4],
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            rect: Rect::new(
                DEFAULT_RECT_X,
                DEFAULT_RECT_Y,
                DEFAULT_RECT_WIDTH,
                DEFAULT_RECT_HEIGHT,
            ),
            textured: true,
            clear_color: DEFAULT_CLEAR_COLOR,
        }
    }
}

impl FrameConfig {
    /// Builds a config from a JSON object such as
    /// `{"x": 0, "width": 256, "textured": false}`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidConfig`] if the result fails [`validate`](Self::validate).
    pub fn from_json(params: &Value) -> Result<Self, RenderError> {
        let config = Self {
            rect: Rect::new(
                param_f32(params, "x", DEFAULT_RECT_X),
                param_f32(params, "y", DEFAULT_RECT_Y),
                param_f32(params, "width", DEFAULT_RECT_WIDTH),
                param_f32(params, "height", DEFAULT_RECT_HEIGHT),
            ),
            textured: param_bool(params, "textured", true),
            clear_color: param_rgba(params, "clear_color", DEFAULT_CLEAR_COLOR),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parses [`from_json`](Self::from_json) input from a string.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidConfig`] for malformed JSON or invalid values.
    pub fn from_json_str(text: &str) -> Result<Self, RenderError> {
        let params: Value = serde_json::from_str(text)
            .map_err(|e| RenderError::InvalidConfig(format!("malformed JSON: {e}")))?;
        Self::from_json(&params)
    }

    /// Checks that the rectangle is finite with positive extents and the
    /// clear color is within `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> Result<(), RenderError> {
        let Rect {
            x,
            y,
            width,
            height,
        } = self.rect;
        for (name, value) in [("x", x), ("y", y), ("width", width), ("height", height)] {
            if !value.is_finite() {
                return Err(RenderError::InvalidConfig(format!("{name} must be finite")));
            }
        }
        if width <= 0.0 || height <= 0.0 {
            return Err(RenderError::InvalidConfig(
                "width and height must be positive".to_string(),
            ));
        }
        if !self.clear_color.iter().all(|c| (0.0..=1.0).contains(c)) {
            return Err(RenderError::InvalidConfig(
                "clear_color channels must lie in [0, 1]".to_string(),
            ));
        }
        Ok(())
    }

    /// Current values as a flat JSON object, the inverse of [`from_json`](Self::from_json).
    pub fn params(&self) -> Value {
        json!({
            "x": self.rect.x,
            "y": self.rect.y,
            "width": self.rect.width,
            "height": self.rect.height,
            "textured": self.textured,
            "clear_color": self.clear_color,
        })
    }

    /// Schema describing every accepted key, its type and default.
    pub fn param_schema() -> Value {
        json!({
            "x": {
                "type": "number",
                "default": DEFAULT_RECT_X,
                "description": "Left edge of the quad in canvas pixels"
            },
            "y": {
                "type": "number",
                "default": DEFAULT_RECT_Y,
                "description": "Top edge of the quad in canvas pixels"
            },
            "width": {
                "type": "number",
                "default": DEFAULT_RECT_WIDTH,
                "min": 0.0,
                "description": "Quad width in pixels (must be positive)"
            },
            "height": {
                "type": "number",
                "default": DEFAULT_RECT_HEIGHT,
                "min": 0.0,
                "description": "Quad height in pixels (must be positive)"
            },
            "textured": {
                "type": "boolean",
                "default": true,
                "description": "Sample the loaded image; false draws a position gradient"
            },
            "clear_color": {
                "type": "array",
                "default": DEFAULT_CLEAR_COLOR,
                "description": "RGBA clear color, each channel in [0, 1]"
            }
        })
    }
}
