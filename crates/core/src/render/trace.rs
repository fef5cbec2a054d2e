//! Headless GL context that records every call.
//!
//! `TraceContext` implements [`GlContext`] without a GPU. It keeps enough
//! object state to answer the queries the demo makes (compile/link status,
//! attribute and uniform locations, texture parameters) and appends each
//! state-changing call to a trace. Used by the CLI's dry run and by tests.
//!
//! Compile and link outcomes come from the lexical checks in
//! [`glsl`](super::glsl): structurally broken sources fail to compile, and a
//! fragment stage that reads an undeclared varying, or declares one with a
//! different type than the vertex stage, fails to link. Misuse that a real driver would flag with `glGetError`
//! (using an unlinked program, sampling with no texture bound, ...) is
//! collected in [`TraceContext::gl_errors`].

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::gl::GlContext;
use super::glsl::{self, Declaration, Qualifier};
use super::shader::ShaderStage;

/// Object handle used by the tracing context.
pub type TraceId = u32;

/// One recorded GL call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum GlCall {
    CreateShader { shader: TraceId, stage: ShaderStage },
    ShaderSource { shader: TraceId, bytes: usize },
    CompileShader { shader: TraceId, ok: bool },
    DeleteShader { shader: TraceId },
    CreateProgram { program: TraceId },
    AttachShader { program: TraceId, shader: TraceId },
    DetachShader { program: TraceId, shader: TraceId },
    LinkProgram { program: TraceId, ok: bool },
    UseProgram { program: Option<TraceId> },
    DeleteProgram { program: TraceId },
    CreateBuffer { buffer: TraceId },
    BindArrayBuffer { buffer: Option<TraceId> },
    BufferData { floats: usize, usage: u32 },
    DeleteBuffer { buffer: TraceId },
    EnableVertexAttribArray { index: u32 },
    VertexAttribPointer {
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    },
    Uniform2f { name: String, x: f32, y: f32 },
    CreateTexture { texture: TraceId },
    BindTexture2d { texture: Option<TraceId> },
    TexParameter { parameter: u32, value: i32 },
    TexImage2d { width: u32, height: u32 },
    DeleteTexture { texture: TraceId },
    Viewport { x: i32, y: i32, width: i32, height: i32 },
    ClearColor { r: f32, g: f32, b: f32, a: f32 },
    Clear { mask: u32 },
    DrawArrays { mode: u32, first: i32, count: i32 },
}

/// A uniform location handed out by the tracing context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceUniform {
    program: TraceId,
    name: String,
}

/// Snapshot of a texture's sampling parameters and storage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextureState {
    pub parameters: BTreeMap<u32, i32>,
    pub size: Option<(u32, u32)>,
}

impl TextureState {
    pub fn parameter(&self, parameter: u32) -> Option<i32> {
        self.parameters.get(&parameter).copied()
    }
}

struct ShaderObject {
    stage: ShaderStage,
    source: String,
    compiled: bool,
    info_log: String,
}

#[derive(Default)]
struct ProgramObject {
    attached: Vec<TraceId>,
    linked: bool,
    info_log: String,
    attributes: Vec<String>,
    uniforms: Vec<String>,
}

#[derive(Default)]
struct TraceState {
    next_id: TraceId,
    shaders: HashMap<TraceId, ShaderObject>,
    programs: HashMap<TraceId, ProgramObject>,
    buffers: HashMap<TraceId, usize>,
    textures: HashMap<TraceId, TextureState>,
    current_program: Option<TraceId>,
    array_buffer: Option<TraceId>,
    texture_2d: Option<TraceId>,
    uniforms: BTreeMap<String, [f32; 2]>,
    viewport: Option<[i32; 4]>,
    calls: Vec<GlCall>,
    errors: Vec<String>,
}

impl TraceState {
    fn alloc(&mut self) -> TraceId {
        self.next_id += 1;
        self.next_id
    }

    fn record(&mut self, call: GlCall) {
        log::trace!("{call:?}");
        self.calls.push(call);
    }

    fn linked_program(&self, program: TraceId) -> Option<&ProgramObject> {
        self.programs.get(&program).filter(|p| p.linked)
    }

    fn bound_texture(&mut self) -> Option<&mut TextureState> {
        let id = self.texture_2d?;
        self.textures.get_mut(&id)
    }

    fn error(&mut self, message: String) {
        log::warn!("GL error: {message}");
        self.errors.push(message);
    }
}

/// A [`GlContext`] that records calls instead of drawing.
#[derive(Default)]
pub struct TraceContext {
    state: RefCell<TraceState>,
}

impl TraceContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<GlCall> {
        self.state.borrow().calls.clone()
    }

    /// Recorded `draw_arrays` calls as `(mode, first, count)`.
    pub fn draw_calls(&self) -> Vec<(u32, i32, i32)> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter_map(|c| match c {
                GlCall::DrawArrays { mode, first, count } => Some((*mode, *first, *count)),
                _ => None,
            })
            .collect()
    }

    /// Errors a real driver would have reported through `glGetError`.
    pub fn gl_errors(&self) -> Vec<String> {
        self.state.borrow().errors.clone()
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    pub fn live_textures(&self) -> usize {
        self.state.borrow().textures.len()
    }

    pub fn is_linked(&self, program: TraceId) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .is_some_and(|p| p.linked)
    }

    pub fn current_program(&self) -> Option<TraceId> {
        self.state.borrow().current_program
    }

    /// Last value written to the named `vec2` uniform.
    pub fn uniform_vec2(&self, name: &str) -> Option<[f32; 2]> {
        self.state.borrow().uniforms.get(name).copied()
    }

    /// Last viewport as `[x, y, width, height]`.
    pub fn viewport_rect(&self) -> Option<[i32; 4]> {
        self.state.borrow().viewport
    }

    pub fn texture_state(&self, texture: TraceId) -> Option<TextureState> {
        self.state.borrow().textures.get(&texture).cloned()
    }

    /// Forgets recorded calls and errors; object state is kept.
    pub fn clear_trace(&self) {
        let mut st = self.state.borrow_mut();
        st.calls.clear();
        st.errors.clear();
    }
}

fn link(
    shaders: &HashMap<TraceId, ShaderObject>,
    attached: &[TraceId],
) -> Result<(Vec<Declaration>, Vec<Declaration>), String> {
    let find = |stage: ShaderStage| {
        attached
            .iter()
            .filter_map(|id| shaders.get(id))
            .find(|s| s.stage == stage)
    };
    let vertex = find(ShaderStage::Vertex).ok_or("error: no vertex shader attached")?;
    let fragment = find(ShaderStage::Fragment).ok_or("error: no fragment shader attached")?;
    if !vertex.compiled || !fragment.compiled {
        return Err("error: attached shaders must be compiled before linking".to_string());
    }

    let vertex_decls = glsl::declarations(&vertex.source);
    let fragment_decls = glsl::declarations(&fragment.source);
    glsl::check_varyings(&vertex_decls, &fragment_decls, &fragment.source)?;
    Ok((vertex_decls, fragment_decls))
}

impl GlContext for TraceContext {
    type Shader = TraceId;
    type Program = TraceId;
    type Buffer = TraceId;
    type Texture = TraceId;
    type UniformLocation = TraceUniform;

    fn create_shader(&self, stage: ShaderStage) -> Result<TraceId, String> {
        let mut st = self.state.borrow_mut();
        let shader = st.alloc();
        st.shaders.insert(
            shader,
            ShaderObject {
                stage,
                source: String::new(),
                compiled: false,
                info_log: String::new(),
            },
        );
        st.record(GlCall::CreateShader { shader, stage });
        Ok(shader)
    }

    fn shader_source(&self, shader: TraceId, source: &str) {
        let mut st = self.state.borrow_mut();
        let known = match st.shaders.get_mut(&shader) {
            Some(obj) => {
                obj.source = source.to_string();
                true
            }
            None => false,
        };
        if !known {
            st.error(format!("shader_source on unknown shader {shader}"));
        }
        st.record(GlCall::ShaderSource {
            shader,
            bytes: source.len(),
        });
    }

    fn compile_shader(&self, shader: TraceId) {
        let mut st = self.state.borrow_mut();
        let result = st
            .shaders
            .get(&shader)
            .map(|obj| glsl::check_structure(&obj.source));
        let ok = match (result, st.shaders.get_mut(&shader)) {
            (Some(result), Some(obj)) => {
                obj.compiled = result.is_ok();
                obj.info_log = result.err().unwrap_or_default();
                obj.compiled
            }
            _ => false,
        };
        if !st.shaders.contains_key(&shader) {
            st.error(format!("compile_shader on unknown shader {shader}"));
        }
        st.record(GlCall::CompileShader { shader, ok });
    }

    fn shader_compile_status(&self, shader: TraceId) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .is_some_and(|s| s.compiled)
    }

    fn shader_info_log(&self, shader: TraceId) -> String {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map(|s| s.info_log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: TraceId) {
        let mut st = self.state.borrow_mut();
        st.shaders.remove(&shader);
        st.record(GlCall::DeleteShader { shader });
    }

    fn create_program(&self) -> Result<TraceId, String> {
        let mut st = self.state.borrow_mut();
        let program = st.alloc();
        st.programs.insert(program, ProgramObject::default());
        st.record(GlCall::CreateProgram { program });
        Ok(program)
    }

    fn attach_shader(&self, program: TraceId, shader: TraceId) {
        let mut st = self.state.borrow_mut();
        if !st.shaders.contains_key(&shader) {
            st.error(format!("attach_shader with unknown shader {shader}"));
        }
        let known = match st.programs.get_mut(&program) {
            Some(p) => {
                p.attached.push(shader);
                true
            }
            None => false,
        };
        if !known {
            st.error(format!("attach_shader on unknown program {program}"));
        }
        st.record(GlCall::AttachShader { program, shader });
    }

    fn detach_shader(&self, program: TraceId, shader: TraceId) {
        let mut st = self.state.borrow_mut();
        if let Some(p) = st.programs.get_mut(&program) {
            p.attached.retain(|s| *s != shader);
        }
        st.record(GlCall::DetachShader { program, shader });
    }

    fn link_program(&self, program: TraceId) {
        let mut st = self.state.borrow_mut();
        let attached = st.programs.get(&program).map(|p| p.attached.clone());
        let Some(attached) = attached else {
            st.error(format!("link_program on unknown program {program}"));
            st.record(GlCall::LinkProgram { program, ok: false });
            return;
        };
        let outcome = link(&st.shaders, &attached);
        let ok = outcome.is_ok();
        if let Some(p) = st.programs.get_mut(&program) {
            match outcome {
                Ok((vertex, fragment)) => {
                    p.linked = true;
                    p.info_log.clear();
                    p.attributes = glsl::names_with(&vertex, Qualifier::Attribute);
                    let mut uniforms = glsl::names_with(&vertex, Qualifier::Uniform);
                    for name in glsl::names_with(&fragment, Qualifier::Uniform) {
                        if !uniforms.contains(&name) {
                            uniforms.push(name);
                        }
                    }
                    p.uniforms = uniforms;
                }
                Err(log) => {
                    p.linked = false;
                    p.info_log = log;
                    p.attributes.clear();
                    p.uniforms.clear();
                }
            }
        }
        st.record(GlCall::LinkProgram { program, ok });
    }

    fn program_link_status(&self, program: TraceId) -> bool {
        self.is_linked(program)
    }

    fn program_info_log(&self, program: TraceId) -> String {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.info_log.clone())
            .unwrap_or_default()
    }

    fn use_program(&self, program: Option<TraceId>) {
        let mut st = self.state.borrow_mut();
        if let Some(id) = program {
            if !st.programs.get(&id).is_some_and(|p| p.linked) {
                st.error(format!("use_program with unlinked program {id}"));
            }
        }
        st.current_program = program;
        st.record(GlCall::UseProgram { program });
    }

    fn delete_program(&self, program: TraceId) {
        let mut st = self.state.borrow_mut();
        st.programs.remove(&program);
        if st.current_program == Some(program) {
            st.current_program = None;
        }
        st.record(GlCall::DeleteProgram { program });
    }

    fn create_buffer(&self) -> Result<TraceId, String> {
        let mut st = self.state.borrow_mut();
        let buffer = st.alloc();
        st.buffers.insert(buffer, 0);
        st.record(GlCall::CreateBuffer { buffer });
        Ok(buffer)
    }

    fn bind_array_buffer(&self, buffer: Option<TraceId>) {
        let mut st = self.state.borrow_mut();
        st.array_buffer = buffer;
        st.record(GlCall::BindArrayBuffer { buffer });
    }

    fn array_buffer_data_f32(&self, data: &[f32], usage: u32) {
        let mut st = self.state.borrow_mut();
        match st.array_buffer {
            Some(id) => {
                st.buffers.insert(id, data.len());
            }
            None => st.error("buffer_data with no ARRAY_BUFFER bound".to_string()),
        }
        st.record(GlCall::BufferData {
            floats: data.len(),
            usage,
        });
    }

    fn delete_buffer(&self, buffer: TraceId) {
        let mut st = self.state.borrow_mut();
        st.buffers.remove(&buffer);
        if st.array_buffer == Some(buffer) {
            st.array_buffer = None;
        }
        st.record(GlCall::DeleteBuffer { buffer });
    }

    fn attrib_location(&self, program: TraceId, name: &str) -> Option<u32> {
        let mut st = self.state.borrow_mut();
        let attributes = st.linked_program(program).map(|p| p.attributes.clone());
        let Some(attributes) = attributes else {
            st.error(format!("attrib_location on unlinked program {program}"));
            return None;
        };
        attributes
            .iter()
            .position(|a| a == name)
            .and_then(|i| u32::try_from(i).ok())
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.state
            .borrow_mut()
            .record(GlCall::EnableVertexAttribArray { index });
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
        let mut st = self.state.borrow_mut();
        if st.array_buffer.is_none() {
            st.error("vertex_attrib_pointer with no ARRAY_BUFFER bound".to_string());
        }
        st.record(GlCall::VertexAttribPointer {
            index,
            size,
            data_type,
            normalized,
            stride,
            offset,
        });
    }

    fn uniform_location(&self, program: TraceId, name: &str) -> Option<TraceUniform> {
        let mut st = self.state.borrow_mut();
        let declared = st
            .linked_program(program)
            .map(|p| p.uniforms.iter().any(|u| u == name));
        let Some(declared) = declared else {
            st.error(format!("uniform_location on unlinked program {program}"));
            return None;
        };
        declared.then(|| TraceUniform {
            program,
            name: name.to_string(),
        })
    }

    fn uniform_2_f32(&self, location: &TraceUniform, x: f32, y: f32) {
        let mut st = self.state.borrow_mut();
        if st.current_program != Some(location.program) {
            st.error(format!(
                "uniform '{}' set while its program is not current",
                location.name
            ));
        }
        st.uniforms.insert(location.name.clone(), [x, y]);
        st.record(GlCall::Uniform2f {
            name: location.name.clone(),
            x,
            y,
        });
    }

    fn create_texture(&self) -> Result<TraceId, String> {
        let mut st = self.state.borrow_mut();
        let texture = st.alloc();
        st.textures.insert(texture, TextureState::default());
        st.record(GlCall::CreateTexture { texture });
        Ok(texture)
    }

    fn bind_texture_2d(&self, texture: Option<TraceId>) {
        let mut st = self.state.borrow_mut();
        st.texture_2d = texture;
        st.record(GlCall::BindTexture2d { texture });
    }

    fn tex_parameter_i32(&self, parameter: u32, value: i32) {
        let mut st = self.state.borrow_mut();
        let applied = match st.bound_texture() {
            Some(tex) => {
                tex.parameters.insert(parameter, value);
                true
            }
            None => false,
        };
        if !applied {
            st.error("tex_parameter with no TEXTURE_2D bound".to_string());
        }
        st.record(GlCall::TexParameter { parameter, value });
    }

    fn tex_image_2d_rgba8(&self, width: u32, height: u32, pixels: &[u8]) {
        let mut st = self.state.borrow_mut();
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            st.error(format!(
                "tex_image_2d expected {expected} bytes, got {}",
                pixels.len()
            ));
        }
        let stored = match st.bound_texture() {
            Some(tex) => {
                tex.size = Some((width, height));
                true
            }
            None => false,
        };
        if !stored {
            st.error("tex_image_2d with no TEXTURE_2D bound".to_string());
        }
        st.record(GlCall::TexImage2d { width, height });
    }

    fn delete_texture(&self, texture: TraceId) {
        let mut st = self.state.borrow_mut();
        st.textures.remove(&texture);
        if st.texture_2d == Some(texture) {
            st.texture_2d = None;
        }
        st.record(GlCall::DeleteTexture { texture });
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        let mut st = self.state.borrow_mut();
        st.viewport = Some([x, y, width, height]);
        st.record(GlCall::Viewport {
            x,
            y,
            width,
            height,
        });
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.state
            .borrow_mut()
            .record(GlCall::ClearColor { r, g, b, a });
    }

    fn clear(&self, mask: u32) {
        self.state.borrow_mut().record(GlCall::Clear { mask });
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        let mut st = self.state.borrow_mut();
        let linked = st
            .current_program
            .is_some_and(|id| st.linked_program(id).is_some());
        if !linked {
            st.error("draw_arrays with no linked program current".to_string());
        }
        st.record(GlCall::DrawArrays { mode, first, count });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VS: &str = "attribute vec2 a_position;\nuniform vec2 u_resolution;\nvoid main() { gl_Position = vec4(a_position / u_resolution, 0, 1); }";
    const FS: &str = "precision mediump float;\nvoid main() { gl_FragColor = vec4(1.0); }";

    fn linked(gl: &TraceContext) -> TraceId {
        let vs = gl.create_shader(ShaderStage::Vertex).unwrap();
        gl.shader_source(vs, VS);
        gl.compile_shader(vs);
        let fs = gl.create_shader(ShaderStage::Fragment).unwrap();
        gl.shader_source(fs, FS);
        gl.compile_shader(fs);
        let program = gl.create_program().unwrap();
        gl.attach_shader(program, vs);
        gl.attach_shader(program, fs);
        gl.link_program(program);
        program
    }

    #[test]
    fn handles_are_unique_across_object_kinds() {
        let gl = TraceContext::new();
        let shader = gl.create_shader(ShaderStage::Vertex).unwrap();
        let buffer = gl.create_buffer().unwrap();
        let texture = gl.create_texture().unwrap();
        assert_ne!(shader, buffer);
        assert_ne!(buffer, texture);
    }

    #[test]
    fn linked_program_resolves_declared_names_only() {
        let gl = TraceContext::new();
        let program = linked(&gl);
        assert!(gl.program_link_status(program));
        assert_eq!(gl.attrib_location(program, "a_position"), Some(0));
        assert_eq!(gl.attrib_location(program, "a_missing"), None);
        assert!(gl.uniform_location(program, "u_resolution").is_some());
        assert!(gl.uniform_location(program, "u_missing").is_none());
        assert!(gl.gl_errors().is_empty(), "{:?}", gl.gl_errors());
    }

    #[test]
    fn link_without_fragment_stage_fails_with_log() {
        let gl = TraceContext::new();
        let vs = gl.create_shader(ShaderStage::Vertex).unwrap();
        gl.shader_source(vs, VS);
        gl.compile_shader(vs);
        let program = gl.create_program().unwrap();
        gl.attach_shader(program, vs);
        gl.link_program(program);
        assert!(!gl.program_link_status(program));
        assert!(gl.program_info_log(program).contains("fragment"));
    }

    #[test]
    fn using_unlinked_program_is_flagged() {
        let gl = TraceContext::new();
        let program = gl.create_program().unwrap();
        gl.use_program(Some(program));
        gl.draw_arrays(glow::TRIANGLES, 0, 3);
        assert_eq!(gl.gl_errors().len(), 2, "{:?}", gl.gl_errors());
    }

    #[test]
    fn uniform_write_is_recorded_by_name() {
        let gl = TraceContext::new();
        let program = linked(&gl);
        gl.use_program(Some(program));
        let loc = gl.uniform_location(program, "u_resolution").unwrap();
        gl.uniform_2_f32(&loc, 640.0, 480.0);
        assert_eq!(gl.uniform_vec2("u_resolution"), Some([640.0, 480.0]));
        assert!(gl.gl_errors().is_empty());
    }

    #[test]
    fn tex_parameters_apply_to_bound_texture() {
        let gl = TraceContext::new();
        let texture = gl.create_texture().unwrap();
        gl.bind_texture_2d(Some(texture));
        gl.tex_parameter_i32(glow::TEXTURE_MIN_FILTER, glow::NEAREST as i32);
        gl.tex_image_2d_rgba8(2, 2, &[0; 16]);
        let state = gl.texture_state(texture).unwrap();
        assert_eq!(
            state.parameter(glow::TEXTURE_MIN_FILTER),
            Some(glow::NEAREST as i32)
        );
        assert_eq!(state.size, Some((2, 2)));
    }

    #[test]
    fn short_pixel_upload_is_flagged() {
        let gl = TraceContext::new();
        let texture = gl.create_texture().unwrap();
        gl.bind_texture_2d(Some(texture));
        gl.tex_image_2d_rgba8(2, 2, &[0; 15]);
        assert_eq!(gl.gl_errors().len(), 1);
    }

    #[test]
    fn calls_serialize_with_call_tag() {
        let json = serde_json::to_value(GlCall::DrawArrays {
            mode: glow::TRIANGLES,
            first: 0,
            count: 6,
        })
        .unwrap();
        assert_eq!(json["call"], "draw_arrays");
        assert_eq!(json["count"], 6);
    }

    #[test]
    fn clear_trace_keeps_objects() {
        let gl = TraceContext::new();
        linked(&gl);
        gl.clear_trace();
        assert!(gl.calls().is_empty());
        assert_eq!(gl.live_programs(), 1);
        assert_eq!(gl.live_shaders(), 2);
    }
}
