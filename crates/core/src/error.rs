//! Error types for the texquad core.

use crate::render::shader::ShaderStage;
use thiserror::Error;

/// Errors produced while preparing or drawing a frame.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    /// A shader stage failed to compile. `log` holds the numbered source
    /// followed by the driver's info log.
    #[error("shader compile error ({stage}):\n{log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    /// The program failed to link. Carries the driver's info log.
    #[error("program link error:\n{0}")]
    ProgramLink(String),

    /// A shader of the wrong stage was passed to the linker.
    #[error("expected a {expected} shader, got a {got} shader")]
    StageMismatch {
        expected: ShaderStage,
        got: ShaderStage,
    },

    /// The linked program has no active attribute with this name.
    #[error("unknown vertex attribute: {0}")]
    UnknownAttribute(String),

    /// The linked program has no active uniform with this name.
    #[error("unknown uniform: {0}")]
    UnknownUniform(String),

    /// The GL context refused to create an object (shader, program, buffer, texture).
    #[error("GL resource creation failed: {0}")]
    Resource(String),

    /// Width or height was zero.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// An RGBA pixel buffer did not match `width * height * 4`.
    #[error("pixel data mismatch: expected {expected} bytes, got {got}")]
    PixelDataMismatch { expected: usize, got: usize },

    /// Encoded image bytes could not be decoded.
    #[error("image decode error: {0}")]
    ImageDecode(String),

    /// Texturing is enabled but no decoded image was supplied.
    #[error("texturing is enabled but no image was supplied")]
    MissingImage,

    /// A render was requested while another one is still waiting on its image.
    #[error("a render is already in flight for this canvas")]
    RenderInFlight,

    /// The frame configuration holds a value outside its valid range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
