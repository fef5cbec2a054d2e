//! 2D texture creation from a decoded image.
//!
//! Sampling is fixed at creation: clamp-to-edge on both axes and
//! nearest-neighbour filtering for minification and magnification. No
//! mipmaps are generated, so non-power-of-two images are valid in WebGL1.

use super::gl::GlContext;
use crate::decoded::DecodedImage;
use crate::error::RenderError;

/// Wrap and filter modes applied to a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerConfig {
    /// GL wrap mode for both S and T (e.g. `glow::CLAMP_TO_EDGE`).
    pub wrap: u32,
    /// GL filter for both MIN and MAG (e.g. `glow::NEAREST`).
    pub filter: u32,
}

impl SamplerConfig {
    /// Clamp-to-edge, nearest filtering. The only configuration the demo uses.
    pub fn pixel_art() -> Self {
        Self {
            wrap: glow::CLAMP_TO_EDGE,
            filter: glow::NEAREST,
        }
    }

    /// `(parameter, value)` pairs in the order they are applied.
    pub fn parameters(&self) -> [(u32, i32); 4] {
        [
            (glow::TEXTURE_WRAP_S, self.wrap as i32),
            (glow::TEXTURE_WRAP_T, self.wrap as i32),
            (glow::TEXTURE_MIN_FILTER, self.filter as i32),
            (glow::TEXTURE_MAG_FILTER, self.filter as i32),
        ]
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self::pixel_art()
    }
}

/// Creates a texture, leaves it bound to `TEXTURE_2D`, applies the sampler
/// parameters, and uploads the image's RGBA8 pixels.
///
/// The texture lives until [`GlContext::delete_texture`] or context loss.
///
/// # Errors
///
/// Returns [`RenderError::Resource`] if the texture cannot be created.
pub fn load_texture<G: GlContext>(
    gl: &G,
    image: &DecodedImage,
    sampler: &SamplerConfig,
) -> Result<G::Texture, RenderError> {
    let texture = gl.create_texture().map_err(RenderError::Resource)?;
    gl.bind_texture_2d(Some(texture));

    for (parameter, value) in sampler.parameters() {
        gl.tex_parameter_i32(parameter, value);
    }

    gl.tex_image_2d_rgba8(image.width(), image.height(), image.pixels());
    log::debug!("uploaded {}x{} texture", image.width(), image.height());
    Ok(texture)
}
