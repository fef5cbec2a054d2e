//! Shader compilation and program linking.
//!
//! Both steps go through a [`GlContext`] passed in by the caller. A failed
//! compile or link logs the driver diagnostic, releases the half-built GL
//! object, and returns a [`RenderError`]; a success returns a typed handle
//! ([`CompiledShader`], [`LinkedProgram`]) that can only exist for objects
//! the driver accepted.

use std::fmt;

use serde::Serialize;

use super::gl::GlContext;
use crate::error::RenderError;

/// The pipeline stage a shader runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// The GL enum passed to `createShader`.
    pub fn gl_enum(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A shader object that compiled successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompiledShader<S> {
    handle: S,
    stage: ShaderStage,
}

impl<S: Copy> CompiledShader<S> {
    pub fn handle(&self) -> S {
        self.handle
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }
}

/// A program object that linked successfully and may be made current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkedProgram<P> {
    handle: P,
}

impl<P: Copy> LinkedProgram<P> {
    pub fn handle(&self) -> P {
        self.handle
    }
}

/// Formats a shader compilation error for human-readable debugging.
///
/// Prepends right-aligned line numbers to each line of `source`, then
/// appends the driver's `log`, so line references in the log can be
/// matched against the GLSL. Either input may be empty.
pub fn format_shader_error(source: &str, log: &str) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let width = lines.len().max(1).to_string().len();

    let numbered = lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>width$}: {line}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    match (numbered.is_empty(), log.is_empty()) {
        (true, _) => log.to_string(),
        (false, true) => numbered,
        (false, false) => format!("{numbered}\n\n{log}"),
    }
}

/// Compiles a single shader stage.
///
/// # Errors
///
/// Returns [`RenderError::Resource`] if the context cannot allocate a shader
/// object, or [`RenderError::ShaderCompile`] if the source fails to compile.
/// In the latter case the shader object has already been deleted.
pub fn compile_shader<G: GlContext>(
    gl: &G,
    stage: ShaderStage,
    source: &str,
) -> Result<CompiledShader<G::Shader>, RenderError> {
    let shader = gl.create_shader(stage).map_err(RenderError::Resource)?;
    gl.shader_source(shader, source);
    gl.compile_shader(shader);

    if gl.shader_compile_status(shader) {
        log::debug!("compiled {stage} shader");
        return Ok(CompiledShader {
            handle: shader,
            stage,
        });
    }

    let info_log = gl.shader_info_log(shader);
    gl.delete_shader(shader);
    let log = format_shader_error(source, &info_log);
    log::error!("{stage} shader failed to compile:\n{log}");
    Err(RenderError::ShaderCompile { stage, log })
}

/// Links a vertex and fragment shader into a program.
///
/// The shaders are detached again after linking; the caller still owns
/// them and should delete them once no further links are needed.
///
/// # Errors
///
/// Returns [`RenderError::StageMismatch`] before any GL call if either
/// shader sits in the wrong slot, and [`RenderError::ProgramLink`] if the
/// driver rejects the pair. A rejected program object is deleted.
pub fn link_program<G: GlContext>(
    gl: &G,
    vertex: &CompiledShader<G::Shader>,
    fragment: &CompiledShader<G::Shader>,
) -> Result<LinkedProgram<G::Program>, RenderError> {
    expect_stage(vertex, ShaderStage::Vertex)?;
    expect_stage(fragment, ShaderStage::Fragment)?;

    let program = gl.create_program().map_err(RenderError::Resource)?;
    gl.attach_shader(program, vertex.handle);
    gl.attach_shader(program, fragment.handle);
    gl.link_program(program);
    gl.detach_shader(program, vertex.handle);
    gl.detach_shader(program, fragment.handle);

    if gl.program_link_status(program) {
        log::debug!("linked program");
        return Ok(LinkedProgram { handle: program });
    }

    let info_log = gl.program_info_log(program);
    gl.delete_program(program);
    log::error!("program failed to link:\n{info_log}");
    Err(RenderError::ProgramLink(info_log))
}

fn expect_stage<S>(shader: &CompiledShader<S>, expected: ShaderStage) -> Result<(), RenderError> {
    if shader.stage == expected {
        Ok(())
    } else {
        Err(RenderError::StageMismatch {
            expected,
            got: shader.stage,
        })
    }
}

/// Compiles both stages and links them into a program.
///
/// Shader objects are deleted before returning on every path; a linked
/// program keeps what it needs.
///
/// # Errors
///
/// Propagates the first failure from [`compile_shader`] or [`link_program`].
pub fn compile_program<G: GlContext>(
    gl: &G,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<LinkedProgram<G::Program>, RenderError> {
    let vert = compile_shader(gl, ShaderStage::Vertex, vertex_src)?;
    let frag = match compile_shader(gl, ShaderStage::Fragment, fragment_src) {
        Ok(f) => f,
        Err(e) => {
            gl.delete_shader(vert.handle);
            return Err(e);
        }
    };

    let result = link_program(gl, &vert, &frag);

    gl.delete_shader(vert.handle);
    gl.delete_shader(frag.handle);

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::shaders::{GRADIENT_FRAGMENT_SHADER, GRADIENT_VERTEX_SHADER};
    use crate::render::trace::TraceContext;

    const BROKEN_SOURCE: &str = "attribute vec2 a_position;\nvoid main() {\n  gl_Position = vec4(a_position, 0, 1);\n";

    const MISMATCHED_FRAGMENT: &str = r#"
precision mediump float;
varying vec2 v_texCoord;
void main() {
    gl_FragColor = vec4(v_texCoord, 0.0, 1.0);
}
"#;

    // --- format_shader_error ---

    #[test]
    fn format_shader_error_prepends_line_numbers() {
        let formatted = format_shader_error("void main() {\n}\n", "ERROR: 0:2: syntax error");
        assert!(formatted.contains("1: void main() {"), "got:\n{formatted}");
        assert!(formatted.contains("2: }"), "got:\n{formatted}");
        assert!(
            formatted.ends_with("ERROR: 0:2: syntax error"),
            "expected log at the end, got:\n{formatted}"
        );
    }

    #[test]
    fn format_shader_error_handles_empty_inputs() {
        assert_eq!(format_shader_error("", "only log"), "only log");
        assert_eq!(format_shader_error("void main() {}", ""), "1: void main() {}");
        assert!(format_shader_error("", "").is_empty());
    }

    #[test]
    fn format_shader_error_right_aligns_line_numbers() {
        let source = (1..=12)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let formatted = format_shader_error(&source, "err");
        let lines: Vec<&str> = formatted.lines().collect();
        assert!(lines[0].starts_with(" 1: "), "got: '{}'", lines[0]);
        assert!(lines[9].starts_with("10: "), "got: '{}'", lines[9]);
    }

    // --- compile_shader ---

    #[test]
    fn valid_source_compiles_to_stage_tagged_handle() {
        let gl = TraceContext::new();
        let shader = compile_shader(&gl, ShaderStage::Vertex, GRADIENT_VERTEX_SHADER).unwrap();
        assert_eq!(shader.stage(), ShaderStage::Vertex);
        assert_eq!(gl.live_shaders(), 1);
    }

    #[test]
    fn void_parameter_list_on_main_compiles() {
        let gl = TraceContext::new();
        let source = "attribute vec2 a_position;\nvoid main(void) {\n  gl_Position = vec4(a_position, 0, 1);\n}\n";
        let shader = compile_shader(&gl, ShaderStage::Vertex, source).unwrap();
        assert_eq!(shader.stage(), ShaderStage::Vertex);
        assert_eq!(gl.live_shaders(), 1);
    }

    #[test]
    fn invalid_source_returns_error_and_leaks_no_shader() {
        let gl = TraceContext::new();
        let err = compile_shader(&gl, ShaderStage::Vertex, BROKEN_SOURCE).unwrap_err();
        match err {
            RenderError::ShaderCompile { stage, log } => {
                assert_eq!(stage, ShaderStage::Vertex);
                assert!(log.contains("1: attribute vec2 a_position;"), "got:\n{log}");
                assert!(log.contains("ERROR"), "missing driver log in:\n{log}");
            }
            other => panic!("expected ShaderCompile, got {other:?}"),
        }
        assert_eq!(gl.live_shaders(), 0, "failed shader must be deleted");
    }

    // --- link_program ---

    #[test]
    fn matching_stages_link_into_usable_program() {
        let gl = TraceContext::new();
        let vs = compile_shader(&gl, ShaderStage::Vertex, GRADIENT_VERTEX_SHADER).unwrap();
        let fs = compile_shader(&gl, ShaderStage::Fragment, GRADIENT_FRAGMENT_SHADER).unwrap();
        let program = link_program(&gl, &vs, &fs).unwrap();
        assert!(gl.is_linked(program.handle()));
        assert_eq!(gl.live_programs(), 1);
    }

    #[test]
    fn swapped_stages_are_rejected_before_any_gl_call() {
        let gl = TraceContext::new();
        let vs = compile_shader(&gl, ShaderStage::Vertex, GRADIENT_VERTEX_SHADER).unwrap();
        let fs = compile_shader(&gl, ShaderStage::Fragment, GRADIENT_FRAGMENT_SHADER).unwrap();
        let calls_before = gl.calls().len();

        let err = link_program(&gl, &fs, &vs).unwrap_err();
        assert!(
            matches!(
                err,
                RenderError::StageMismatch {
                    expected: ShaderStage::Vertex,
                    got: ShaderStage::Fragment
                }
            ),
            "got {err:?}"
        );
        assert_eq!(gl.calls().len(), calls_before);
        assert_eq!(gl.live_programs(), 0);
    }

    #[test]
    fn mismatched_varyings_fail_to_link_and_release_program() {
        let gl = TraceContext::new();
        let vs = compile_shader(&gl, ShaderStage::Vertex, GRADIENT_VERTEX_SHADER).unwrap();
        let fs = compile_shader(&gl, ShaderStage::Fragment, MISMATCHED_FRAGMENT).unwrap();

        let err = link_program(&gl, &vs, &fs).unwrap_err();
        match err {
            RenderError::ProgramLink(log) => assert!(log.contains("v_texCoord"), "got: {log}"),
            other => panic!("expected ProgramLink, got {other:?}"),
        }
        assert_eq!(gl.live_programs(), 0, "failed program must be deleted");
    }

    // --- compile_program ---

    #[test]
    fn compile_program_deletes_shaders_after_linking() {
        let gl = TraceContext::new();
        compile_program(&gl, GRADIENT_VERTEX_SHADER, GRADIENT_FRAGMENT_SHADER).unwrap();
        assert_eq!(gl.live_shaders(), 0);
        assert_eq!(gl.live_programs(), 1);
    }

    #[test]
    fn compile_program_cleans_up_vertex_shader_when_fragment_fails() {
        let gl = TraceContext::new();
        let err = compile_program(&gl, GRADIENT_VERTEX_SHADER, BROKEN_SOURCE).unwrap_err();
        assert!(matches!(
            err,
            RenderError::ShaderCompile {
                stage: ShaderStage::Fragment,
                ..
            }
        ));
        assert_eq!(gl.live_shaders(), 0);
        assert_eq!(gl.live_programs(), 0);
    }

    #[test]
    fn compile_program_cleans_up_shaders_when_link_fails() {
        let gl = TraceContext::new();
        let err = compile_program(&gl, GRADIENT_VERTEX_SHADER, MISMATCHED_FRAGMENT).unwrap_err();
        assert!(matches!(err, RenderError::ProgramLink(_)));
        assert_eq!(gl.live_shaders(), 0);
        assert_eq!(gl.live_programs(), 0);
    }

    #[test]
    fn stage_gl_enums_match_glow_constants() {
        assert_eq!(ShaderStage::Vertex.gl_enum(), glow::VERTEX_SHADER);
        assert_eq!(ShaderStage::Fragment.gl_enum(), glow::FRAGMENT_SHADER);
    }
}
