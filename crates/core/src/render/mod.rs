//! WebGL1 rendering for the textured quad.
//!
//! Every function takes the rendering context explicitly as a
//! [`GlContext`]; nothing holds GL state globally.
//!
//! # Module overview
//!
//! - [`gl`] -- The `GlContext` trait and its `glow::Context` implementation.
//! - [`shader`] -- Shader compilation, program linking, error formatting.
//! - [`shaders`] -- Embedded GLSL sources (textured and gradient pairs).
//! - [`buffer`] -- Vertex buffer upload and attribute binding.
//! - [`uniform`] -- Uniform writes.
//! - [`texture`] -- Texture creation with fixed sampling parameters.
//! - [`viewport`] -- Surface size, viewport and clear.
//! - [`frame`] -- The one-shot frame renderer and redraw-on-resize.
//! - [`trace`] -- Headless recording context for dry runs and tests.

pub mod buffer;
pub mod frame;
pub mod gl;
mod glsl;
pub mod shader;
pub mod shaders;
pub mod texture;
pub mod trace;
pub mod uniform;
pub mod viewport;

// Re-export key types at the render module level for convenience.
pub use buffer::{bind_attribute, set_geometry, upload_f32, AttributeLayout};
pub use frame::{FrameRenderer, PreparedFrame};
pub use gl::GlContext;
pub use shader::{
    compile_program, compile_shader, format_shader_error, link_program, CompiledShader,
    LinkedProgram, ShaderStage,
};
pub use texture::{load_texture, SamplerConfig};
pub use trace::{GlCall, TraceContext};
pub use uniform::set_vec2;
pub use viewport::{configure_viewport, SurfaceSize};
