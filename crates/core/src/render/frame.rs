//! One-shot frame rendering.
//!
//! [`FrameRenderer::render`] runs the whole setup in a fixed order and issues
//! a single `TRIANGLES` draw of six vertices:
//!
//! 1. compile vertex + fragment, link, make the program current
//! 2. (textured) upload unit-square texture coordinates to `a_texCoord`,
//!    then create and fill the texture
//! 3. upload the quad's pixel-space corners to `a_position`
//! 4. viewport + clear, write `u_resolution`, draw
//!
//! Any failure aborts the attempt before later steps run and releases the
//! GL objects created so far. The returned [`PreparedFrame`] keeps the
//! program and buffers so a resize can redraw with a fresh viewport and
//! resolution without re-uploading geometry.

use std::fmt;

use super::buffer::{set_geometry, AttributeLayout};
use super::gl::GlContext;
use super::shader::{compile_program, LinkedProgram};
use super::shaders;
use super::texture::{load_texture, SamplerConfig};
use super::uniform::set_vec2;
use super::viewport::{configure_viewport, SurfaceSize};
use crate::config::FrameConfig;
use crate::decoded::DecodedImage;
use crate::error::RenderError;
use crate::geometry::{Rect, RECT_VERTEX_COUNT};

pub const POSITION_ATTRIBUTE: &str = "a_position";
pub const TEX_COORD_ATTRIBUTE: &str = "a_texCoord";
pub const RESOLUTION_UNIFORM: &str = "u_resolution";

/// Draws the configured quad.
#[derive(Debug, Clone)]
pub struct FrameRenderer {
    config: FrameConfig,
    sampler: SamplerConfig,
    vertex_src: String,
    fragment_src: String,
}

impl FrameRenderer {
    /// Uses the built-in shader pair for the configured mode.
    pub fn new(config: FrameConfig) -> Self {
        let (vertex, fragment) = shaders::sources(config.textured);
        Self::with_shaders(config, vertex, fragment)
    }

    /// Uses caller-supplied GLSL. The program must expose `a_position` and
    /// `u_resolution`, plus `a_texCoord` when texturing is enabled.
    pub fn with_shaders(
        config: FrameConfig,
        vertex_src: impl Into<String>,
        fragment_src: impl Into<String>,
    ) -> Self {
        Self {
            config,
            sampler: SamplerConfig::pixel_art(),
            vertex_src: vertex_src.into(),
            fragment_src: fragment_src.into(),
        }
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// Runs the full setup and draws once.
    ///
    /// `image` is required when texturing is enabled and ignored otherwise.
    ///
    /// # Errors
    ///
    /// - [`RenderError::MissingImage`] before any GL call if texturing is on
    ///   and `image` is `None`.
    /// - [`RenderError::InvalidDimensions`] before any GL call if `size` is
    ///   empty, since `u_resolution` would divide by zero.
    /// - Compile/link errors from [`compile_program`]; nothing is bound.
    /// - [`RenderError::UnknownAttribute`] / [`RenderError::UnknownUniform`]
    ///   if the shaders don't expose the expected names.
    pub fn render<G: GlContext>(
        &self,
        gl: &G,
        size: SurfaceSize,
        image: Option<&DecodedImage>,
    ) -> Result<PreparedFrame<G>, RenderError> {
        let image = match (self.config.textured, image) {
            (true, None) => return Err(RenderError::MissingImage),
            (true, Some(image)) => Some(image),
            (false, _) => None,
        };
        if size.is_empty() {
            return Err(RenderError::InvalidDimensions);
        }

        let program = compile_program(gl, &self.vertex_src, &self.fragment_src)?;
        gl.use_program(Some(program.handle()));

        let mut frame = PreparedFrame {
            program,
            tex_coords: None,
            texture: None,
            positions: None,
            clear_color: self.config.clear_color,
            size,
            draws: 0,
        };

        let result = self
            .upload(gl, &mut frame, image)
            .and_then(|()| frame.draw(gl, size));
        if let Err(e) = result {
            log::error!("render aborted: {e}");
            frame.destroy(gl);
            return Err(e);
        }
        Ok(frame)
    }

    fn upload<G: GlContext>(
        &self,
        gl: &G,
        frame: &mut PreparedFrame<G>,
        image: Option<&DecodedImage>,
    ) -> Result<(), RenderError> {
        let layout = AttributeLayout::vec2_f32();

        if let Some(image) = image {
            frame.tex_coords = Some(set_geometry(
                gl,
                &frame.program,
                TEX_COORD_ATTRIBUTE,
                &Rect::unit().vertices(),
                &layout,
            )?);
            frame.texture = Some(load_texture(gl, image, &self.sampler)?);
        }

        frame.positions = Some(set_geometry(
            gl,
            &frame.program,
            POSITION_ATTRIBUTE,
            &self.config.rect.vertices(),
            &layout,
        )?);
        Ok(())
    }
}

/// GL objects of a rendered frame, kept for redraws.
pub struct PreparedFrame<G: GlContext> {
    program: LinkedProgram<G::Program>,
    tex_coords: Option<G::Buffer>,
    texture: Option<G::Texture>,
    positions: Option<G::Buffer>,
    clear_color: [f32; 4],
    size: SurfaceSize,
    draws: usize,
}

impl<G: GlContext> fmt::Debug for PreparedFrame<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedFrame")
            .field("program", &self.program)
            .field("texture", &self.texture)
            .field("size", &self.size)
            .field("draws", &self.draws)
            .finish_non_exhaustive()
    }
}

impl<G: GlContext> PreparedFrame<G> {
    /// Draws again at a (possibly new) surface size.
    ///
    /// Viewport and `u_resolution` are always re-derived from `size`, so a
    /// resized canvas never draws with the previous dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidDimensions`] without touching GL if
    /// `size` is empty; the frame keeps its previous size. Returns
    /// [`RenderError::UnknownUniform`] if the program lost its resolution
    /// uniform (only possible with custom shaders).
    pub fn redraw(&mut self, gl: &G, size: SurfaceSize) -> Result<(), RenderError> {
        if size.is_empty() {
            log::warn!("skipping redraw on empty {}x{} surface", size.width, size.height);
            return Err(RenderError::InvalidDimensions);
        }
        gl.use_program(Some(self.program.handle()));
        if let Some(texture) = self.texture {
            gl.bind_texture_2d(Some(texture));
        }
        self.draw(gl, size)
    }

    fn draw(&mut self, gl: &G, size: SurfaceSize) -> Result<(), RenderError> {
        configure_viewport(gl, size, self.clear_color);
        set_vec2(gl, &self.program, RESOLUTION_UNIFORM, size.resolution())?;
        gl.draw_arrays(glow::TRIANGLES, 0, RECT_VERTEX_COUNT as i32);

        self.size = size;
        self.draws += 1;
        log::debug!(
            "drew frame {} at {}x{}",
            self.draws,
            size.width,
            size.height
        );
        Ok(())
    }

    pub fn program(&self) -> &LinkedProgram<G::Program> {
        &self.program
    }

    pub fn texture(&self) -> Option<G::Texture> {
        self.texture
    }

    /// Surface size used by the most recent draw.
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn draw_count(&self) -> usize {
        self.draws
    }

    /// Deletes the program, buffers and texture.
    pub fn destroy(self, gl: &G) {
        gl.use_program(None);
        gl.delete_program(self.program.handle());
        for buffer in [self.tex_coords, self.positions].into_iter().flatten() {
            gl.delete_buffer(buffer);
        }
        if let Some(texture) = self.texture {
            gl.delete_texture(texture);
        }
    }
}
