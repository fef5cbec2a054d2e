//! Uniform writes.

use super::gl::GlContext;
use super::shader::LinkedProgram;
use crate::error::RenderError;

/// Writes a `vec2` uniform on `program`, which must be the current program.
///
/// # Errors
///
/// Returns [`RenderError::UnknownUniform`] if the program has no active
/// uniform called `name`.
pub fn set_vec2<G: GlContext>(
    gl: &G,
    program: &LinkedProgram<G::Program>,
    name: &str,
    value: [f32; 2],
) -> Result<(), RenderError> {
    let location = gl
        .uniform_location(program.handle(), name)
        .ok_or_else(|| RenderError::UnknownUniform(name.to_string()))?;
    gl.uniform_2_f32(&location, value[0], value[1]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::shader::compile_program;
    use crate::render::shaders::{GRADIENT_FRAGMENT_SHADER, GRADIENT_VERTEX_SHADER};
    use crate::render::trace::TraceContext;

    #[test]
    fn writes_value_under_uniform_name() {
        let gl = TraceContext::new();
        let program = compile_program(&gl, GRADIENT_VERTEX_SHADER, GRADIENT_FRAGMENT_SHADER).unwrap();
        gl.use_program(Some(program.handle()));

        set_vec2(&gl, &program, "u_resolution", [300.0, 150.0]).unwrap();
        assert_eq!(gl.uniform_vec2("u_resolution"), Some([300.0, 150.0]));
        assert!(gl.gl_errors().is_empty(), "{:?}", gl.gl_errors());
    }

    #[test]
    fn unknown_uniform_is_an_error() {
        let gl = TraceContext::new();
        let program = compile_program(&gl, GRADIENT_VERTEX_SHADER, GRADIENT_FRAGMENT_SHADER).unwrap();
        gl.use_program(Some(program.handle()));

        let err = set_vec2(&gl, &program, "u_scale", [1.0, 1.0]).unwrap_err();
        assert!(matches!(err, RenderError::UnknownUniform(ref n) if n == "u_scale"));
        assert_eq!(gl.uniform_vec2("u_scale"), None);
    }
}
