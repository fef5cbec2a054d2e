//! Embedded GLSL ES 1.00 shader sources.
//!
//! Both vertex stages take `a_position` in pixels and map it to clip space
//! with `u_resolution`, flipping y so (0, 0) is the top-left corner.

/// Vertex stage for the textured quad.
pub const TEXTURED_VERTEX_SHADER: &str = r#"
attribute vec2 a_position;
attribute vec2 a_texCoord;
uniform   vec2 u_resolution;
varying   vec2 v_texCoord;

void main() {
    vec2 zeroToOne = a_position / u_resolution;
    vec2 clipSpace = zeroToOne * 2.0 - 1.0;
    gl_Position = vec4(clipSpace * vec2(1, -1), 0, 1);
    v_texCoord = a_texCoord;
}
"#;

/// Fragment stage for the textured quad. Samples texture unit 0.
pub const TEXTURED_FRAGMENT_SHADER: &str = r#"
precision mediump float;
uniform sampler2D u_image;
varying vec2 v_texCoord;

void main() {
    gl_FragColor = texture2D(u_image, v_texCoord);
}
"#;

/// Vertex stage for the untextured quad; colors by clip-space position.
pub const GRADIENT_VERTEX_SHADER: &str = r#"
attribute vec2 a_position;
uniform   vec2 u_resolution;
varying   vec4 v_color;

void main() {
    vec2 zeroToOne = a_position / u_resolution;
    vec2 clipSpace = zeroToOne * 2.0 - 1.0;
    gl_Position = vec4(clipSpace * vec2(1, -1), 0, 1);
    v_color = gl_Position * 0.5 + 0.5;
}
"#;

pub const GRADIENT_FRAGMENT_SHADER: &str = r#"
precision mediump float;
varying vec4 v_color;

void main() {
    gl_FragColor = v_color;
}
"#;

/// Returns the `(vertex, fragment)` pair for the given mode.
pub fn sources(textured: bool) -> (&'static str, &'static str) {
    if textured {
        (TEXTURED_VERTEX_SHADER, TEXTURED_FRAGMENT_SHADER)
    } else {
        (GRADIENT_VERTEX_SHADER, GRADIENT_FRAGMENT_SHADER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn textured_pair_declares_expected_interface() {
        assert!(TEXTURED_VERTEX_SHADER.contains("attribute vec2 a_position"));
        assert!(TEXTURED_VERTEX_SHADER.contains("attribute vec2 a_texCoord"));
        assert!(TEXTURED_VERTEX_SHADER.contains("u_resolution"));
        assert!(TEXTURED_FRAGMENT_SHADER.contains("sampler2D u_image"));
    }

    #[test]
    fn varyings_agree_between_stages() {
        assert!(TEXTURED_VERTEX_SHADER.contains("varying   vec2 v_texCoord"));
        assert!(TEXTURED_FRAGMENT_SHADER.contains("varying vec2 v_texCoord"));
        assert!(GRADIENT_VERTEX_SHADER.contains("varying   vec4 v_color"));
        assert!(GRADIENT_FRAGMENT_SHADER.contains("varying vec4 v_color"));
    }

    #[test]
    fn fragment_stages_declare_precision() {
        for src in [TEXTURED_FRAGMENT_SHADER, GRADIENT_FRAGMENT_SHADER] {
            assert!(src.contains("precision mediump float;"), "missing precision in:\n{src}");
        }
    }

    #[test]
    fn sources_selects_pair_by_mode() {
        assert_eq!(sources(true).0, TEXTURED_VERTEX_SHADER);
        assert_eq!(sources(false).1, GRADIENT_FRAGMENT_SHADER);
    }
}
