//! CLI error type and process exit codes.
//!
//! | code | meaning |
//! |------|---------|
//! | 0    | success |
//! | 2    | argument parse error (reported by clap) |
//! | 10   | GL pipeline failure (compile, link, missing attribute or uniform) |
//! | 11   | the image file could not be read |
//! | 12   | bad input: undecodable image, invalid `--config`, malformed `--resize` |
//! | 13   | JSON output could not be produced |

use texquad_core::RenderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Render(RenderError),

    #[error("{0}")]
    Io(String),

    #[error("{0}")]
    Input(String),

    #[error("cannot write JSON: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Render(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Output(_) => 13,
        }
    }
}

impl From<RenderError> for CliError {
    /// Problems with what the user handed us are input errors; everything
    /// else happened inside the GL pipeline.
    fn from(e: RenderError) -> Self {
        match e {
            RenderError::ImageDecode(_)
            | RenderError::InvalidConfig(_)
            | RenderError::InvalidDimensions
            | RenderError::PixelDataMismatch { .. } => CliError::Input(e.to_string()),
            other => CliError::Render(other),
        }
    }
}
