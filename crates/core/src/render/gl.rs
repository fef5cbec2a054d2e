//! The rendering-context seam.
//!
//! [`GlContext`] is the subset of the WebGL1 / GLES2 API the demo touches.
//! Every component receives the context explicitly; there is no global GL
//! state. It is implemented for `glow::Context` (browser WebGL and native GL)
//! and by the headless [`TraceContext`](super::trace::TraceContext).
//!
//! Handle-creating calls return `Result<_, String>` like `glow` does; name
//! lookups return `Option` and leave the policy to the caller.

use std::fmt;

use super::shader::ShaderStage;

/// A GL context capable of drawing one textured quad.
///
/// Methods take `&self`, mirroring `glow::HasContext`. Targets are fixed
/// where the demo only ever uses one (`ARRAY_BUFFER`, `TEXTURE_2D`).
pub trait GlContext {
    type Shader: Copy + fmt::Debug;
    type Program: Copy + fmt::Debug;
    type Buffer: Copy + fmt::Debug;
    type Texture: Copy + fmt::Debug;
    type UniformLocation: Clone + fmt::Debug;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn use_program(&self, program: Option<Self::Program>);
    fn delete_program(&self, program: Self::Program);

    fn create_buffer(&self) -> Result<Self::Buffer, String>;
    fn bind_array_buffer(&self, buffer: Option<Self::Buffer>);
    /// Uploads `data` as 32-bit floats into the bound `ARRAY_BUFFER`.
    fn array_buffer_data_f32(&self, data: &[f32], usage: u32);
    fn delete_buffer(&self, buffer: Self::Buffer);

    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32>;
    fn enable_vertex_attrib_array(&self, index: u32);
    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    );

    fn uniform_location(&self, program: Self::Program, name: &str) -> Option<Self::UniformLocation>;
    fn uniform_2_f32(&self, location: &Self::UniformLocation, x: f32, y: f32);

    fn create_texture(&self) -> Result<Self::Texture, String>;
    fn bind_texture_2d(&self, texture: Option<Self::Texture>);
    fn tex_parameter_i32(&self, parameter: u32, value: i32);
    /// Uploads tightly packed RGBA8 pixels to mip level 0 of the bound `TEXTURE_2D`.
    fn tex_image_2d_rgba8(&self, width: u32, height: u32, pixels: &[u8]);
    fn delete_texture(&self, texture: Self::Texture);

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    fn clear(&self, mask: u32);
    fn draw_arrays(&self, mode: u32, first: i32, count: i32);
}

// SAFETY (whole impl): glow marks raw GL entry points unsafe. Every handle
// passed through here was produced by this same context, and every enum
// comes from glow's constants or the fixed targets above.
#[allow(unsafe_code)]
impl GlContext for glow::Context {
    type Shader = glow::Shader;
    type Program = glow::Program;
    type Buffer = glow::Buffer;
    type Texture = glow::Texture;
    type UniformLocation = glow::UniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String> {
        unsafe { glow::HasContext::create_shader(self, stage.gl_enum()) }
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe { glow::HasContext::shader_source(self, shader, source) }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        unsafe { glow::HasContext::compile_shader(self, shader) }
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { glow::HasContext::get_shader_compile_status(self, shader) }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { glow::HasContext::get_shader_info_log(self, shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { glow::HasContext::delete_shader(self, shader) }
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { glow::HasContext::create_program(self) }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { glow::HasContext::attach_shader(self, program, shader) }
    }

    fn detach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { glow::HasContext::detach_shader(self, program, shader) }
    }

    fn link_program(&self, program: Self::Program) {
        unsafe { glow::HasContext::link_program(self, program) }
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        unsafe { glow::HasContext::get_program_link_status(self, program) }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { glow::HasContext::get_program_info_log(self, program) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { glow::HasContext::use_program(self, program) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { glow::HasContext::delete_program(self, program) }
    }

    fn create_buffer(&self) -> Result<Self::Buffer, String> {
        unsafe { glow::HasContext::create_buffer(self) }
    }

    fn bind_array_buffer(&self, buffer: Option<Self::Buffer>) {
        unsafe { glow::HasContext::bind_buffer(self, glow::ARRAY_BUFFER, buffer) }
    }

    fn array_buffer_data_f32(&self, data: &[f32], usage: u32) {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        unsafe { glow::HasContext::buffer_data_u8_slice(self, glow::ARRAY_BUFFER, bytes, usage) }
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        unsafe { glow::HasContext::delete_buffer(self, buffer) }
    }

    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32> {
        unsafe { glow::HasContext::get_attrib_location(self, program, name) }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { glow::HasContext::enable_vertex_attrib_array(self, index) }
    }

    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        unsafe {
            glow::HasContext::vertex_attrib_pointer_f32(
                self, index, size, data_type, normalized, stride, offset,
            )
        }
    }

    fn uniform_location(&self, program: Self::Program, name: &str) -> Option<Self::UniformLocation> {
        unsafe { glow::HasContext::get_uniform_location(self, program, name) }
    }

    fn uniform_2_f32(&self, location: &Self::UniformLocation, x: f32, y: f32) {
        unsafe { glow::HasContext::uniform_2_f32(self, Some(location), x, y) }
    }

    fn create_texture(&self) -> Result<Self::Texture, String> {
        unsafe { glow::HasContext::create_texture(self) }
    }

    fn bind_texture_2d(&self, texture: Option<Self::Texture>) {
        unsafe { glow::HasContext::bind_texture(self, glow::TEXTURE_2D, texture) }
    }

    fn tex_parameter_i32(&self, parameter: u32, value: i32) {
        unsafe { glow::HasContext::tex_parameter_i32(self, glow::TEXTURE_2D, parameter, value) }
    }

    fn tex_image_2d_rgba8(&self, width: u32, height: u32, pixels: &[u8]) {
        unsafe {
            glow::HasContext::tex_image_2d(
                self,
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                width as i32,
                height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(pixels)),
            )
        }
    }

    fn delete_texture(&self, texture: Self::Texture) {
        unsafe { glow::HasContext::delete_texture(self, texture) }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { glow::HasContext::viewport(self, x, y, width, height) }
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { glow::HasContext::clear_color(self, r, g, b, a) }
    }

    fn clear(&self, mask: u32) {
        unsafe { glow::HasContext::clear(self, mask) }
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        unsafe { glow::HasContext::draw_arrays(self, mode, first, count) }
    }
}
