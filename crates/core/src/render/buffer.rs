//! Vertex buffer upload and attribute binding.

use super::gl::GlContext;
use super::shader::LinkedProgram;
use crate::error::RenderError;

/// How an attribute reads its values out of the bound `ARRAY_BUFFER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeLayout {
    /// Components per vertex (1..=4).
    pub size: i32,
    /// GL component type, e.g. `glow::FLOAT`.
    pub data_type: u32,
    pub normalized: bool,
    /// Bytes between consecutive vertices; 0 means tightly packed.
    pub stride: i32,
    /// Byte offset of the first component.
    pub offset: i32,
}

impl AttributeLayout {
    /// Tightly packed `vec2` of 32-bit floats, starting at byte 0.
    pub fn vec2_f32() -> Self {
        Self {
            size: 2,
            data_type: glow::FLOAT,
            normalized: false,
            stride: 0,
            offset: 0,
        }
    }
}

/// Creates a new `ARRAY_BUFFER`, leaves it bound, and uploads `data` as
/// 32-bit floats with a `STATIC_DRAW` hint.
///
/// # Errors
///
/// Returns [`RenderError::Resource`] if the buffer cannot be created.
pub fn upload_f32<G: GlContext>(gl: &G, data: &[f32]) -> Result<G::Buffer, RenderError> {
    let buffer = gl.create_buffer().map_err(RenderError::Resource)?;
    gl.bind_array_buffer(Some(buffer));
    gl.array_buffer_data_f32(data, glow::STATIC_DRAW);
    Ok(buffer)
}

/// Points the named attribute of `program` at the currently bound
/// `ARRAY_BUFFER` and enables it. Returns the attribute location.
///
/// # Errors
///
/// Returns [`RenderError::UnknownAttribute`] if the program has no active
/// attribute called `name`. Nothing is enabled in that case.
pub fn bind_attribute<G: GlContext>(
    gl: &G,
    program: &LinkedProgram<G::Program>,
    name: &str,
    layout: &AttributeLayout,
) -> Result<u32, RenderError> {
    let location = gl
        .attrib_location(program.handle(), name)
        .ok_or_else(|| RenderError::UnknownAttribute(name.to_string()))?;

    gl.enable_vertex_attrib_array(location);
    gl.vertex_attrib_pointer_f32(
        location,
        layout.size,
        layout.data_type,
        layout.normalized,
        layout.stride,
        layout.offset,
    );
    log::debug!("bound attribute {name} at location {location}");
    Ok(location)
}

/// Uploads `data` into a fresh buffer and binds it to the named attribute.
///
/// The buffer is deleted again if the attribute cannot be resolved.
///
/// # Errors
///
/// Propagates failures from [`upload_f32`] and [`bind_attribute`].
pub fn set_geometry<G: GlContext>(
    gl: &G,
    program: &LinkedProgram<G::Program>,
    name: &str,
    data: &[f32],
    layout: &AttributeLayout,
) -> Result<G::Buffer, RenderError> {
    let buffer = upload_f32(gl, data)?;
    if let Err(e) = bind_attribute(gl, program, name, layout) {
        gl.bind_array_buffer(None);
        gl.delete_buffer(buffer);
        return Err(e);
    }
    Ok(buffer)
}
