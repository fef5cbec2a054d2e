#![deny(unsafe_code)]
//! CLI for the texquad demo.
//!
//! Subcommands:
//! - `trace` -- run the frame renderer against the headless GL context and
//!   print every GL call it makes
//! - `inspect <image>` -- decode an image and print its dimensions
//! - `config` -- print the default frame config and its schema

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process;
use texquad_core::render::GlCall;
use texquad_core::{DecodedImage, FrameConfig, FrameRenderer, SurfaceSize, TraceContext};

#[derive(Parser)]
#[command(name = "texquad", about = "Textured-quad WebGL demo tools")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Log each pipeline step (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render one frame against a headless GL context and print the call trace.
    Trace {
        /// PNG or JPEG to texture the quad with (a 1x1 white pixel if omitted).
        #[arg(short, long)]
        image: Option<PathBuf>,

        /// Canvas width in pixels.
        #[arg(short = 'W', long, default_value_t = 300)]
        width: u32,

        /// Canvas height in pixels.
        #[arg(short = 'H', long, default_value_t = 300)]
        height: u32,

        /// Frame config as a JSON object (see `texquad config`).
        #[arg(long, default_value = "{}")]
        config: String,

        /// Draw the position gradient instead of an image.
        #[arg(long)]
        no_texture: bool,

        /// Redraw after resizing the canvas to WIDTHxHEIGHT.
        #[arg(long, value_name = "WIDTHxHEIGHT")]
        resize: Option<String>,
    },
    /// Decode an image and print its dimensions.
    Inspect {
        /// Image file path.
        path: PathBuf,
    },
    /// Print the default frame config and its schema.
    Config,
}

/// Outcome of a traced render.
#[derive(Debug)]
struct TraceReport {
    calls: Vec<GlCall>,
    draws: usize,
    gl_errors: Vec<String>,
    resolution: Option<[f32; 2]>,
}

fn parse_size(text: &str) -> Result<SurfaceSize, CliError> {
    let invalid = || CliError::Input(format!("invalid size '{text}', expected WIDTHxHEIGHT"));
    let (w, h) = text.split_once(['x', 'X']).ok_or_else(invalid)?;
    let width = w.trim().parse().map_err(|_| invalid())?;
    let height = h.trim().parse().map_err(|_| invalid())?;
    Ok(SurfaceSize::new(width, height))
}

fn read_image(path: &Path) -> Result<DecodedImage, CliError> {
    let bytes = std::fs::read(path)
        .map_err(|e| CliError::Io(format!("cannot read {}: {e}", path.display())))?;
    Ok(DecodedImage::from_encoded(&bytes)?)
}

fn trace_frame(
    config: FrameConfig,
    size: SurfaceSize,
    image: Option<&DecodedImage>,
    resize: Option<SurfaceSize>,
) -> Result<TraceReport, CliError> {
    let gl = TraceContext::new();
    let renderer = FrameRenderer::new(config);
    let mut frame = renderer.render(&gl, size, image)?;
    if let Some(new_size) = resize {
        frame.redraw(&gl, new_size)?;
    }

    Ok(TraceReport {
        calls: gl.calls(),
        draws: gl.draw_calls().len(),
        gl_errors: gl.gl_errors(),
        resolution: gl.uniform_vec2(texquad_core::render::frame::RESOLUTION_UNIFORM),
    })
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Trace {
            image,
            width,
            height,
            config,
            no_texture,
            resize,
        } => {
            let mut config = FrameConfig::from_json_str(&config)?;
            if no_texture {
                config.textured = false;
            }
            let resize = resize.as_deref().map(parse_size).transpose()?;

            let image = match (&image, config.textured) {
                (Some(path), true) => Some(read_image(path)?),
                (None, true) => {
                    log::warn!("no --image given, texturing with a 1x1 white pixel");
                    Some(DecodedImage::placeholder())
                }
                (_, false) => None,
            };

            let report = trace_frame(
                config,
                SurfaceSize::new(width, height),
                image.as_ref(),
                resize,
            )?;

            if cli.json {
                let info = json!({
                    "calls": report.calls,
                    "draws": report.draws,
                    "gl_errors": report.gl_errors,
                    "resolution": report.resolution,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                for (i, call) in report.calls.iter().enumerate() {
                    println!("{:>4}  {call:?}", i + 1);
                }
                for err in &report.gl_errors {
                    eprintln!("GL error: {err}");
                }
                eprintln!(
                    "traced {} calls, {} draw(s), u_resolution = {:?}",
                    report.calls.len(),
                    report.draws,
                    report.resolution
                );
            }
        }
        Command::Inspect { path } => {
            let image = read_image(&path)?;
            if cli.json {
                let info = json!({
                    "path": path.display().to_string(),
                    "width": image.width(),
                    "height": image.height(),
                    "bytes": image.pixels().len(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!(
                    "{}: {}x{} RGBA8 ({} bytes)",
                    path.display(),
                    image.width(),
                    image.height(),
                    image.pixels().len()
                );
            }
        }
        Command::Config => {
            let info = json!({
                "defaults": FrameConfig::default().params(),
                "schema": FrameConfig::param_schema(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::new();
    if let Ok(filter) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filter);
    } else if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    } else {
        builder.filter_level(log::LevelFilter::Warn);
    }
    builder.init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_size_accepts_lower_and_upper_x() {
        assert_eq!(parse_size("800x600").unwrap(), SurfaceSize::new(800, 600));
        assert_eq!(parse_size("64X32").unwrap(), SurfaceSize::new(64, 32));
    }

    #[test]
    fn parse_size_rejects_garbage() {
        for bad in ["800", "x600", "800x", "axb", "-1x2"] {
            let err = parse_size(bad).unwrap_err();
            assert_eq!(err.exit_code(), 12, "{bad} should be an input error");
        }
    }

    #[test]
    fn trace_frame_reports_single_draw_at_canvas_resolution() {
        let image = DecodedImage::new(100, 100, vec![0; 100 * 100 * 4]).unwrap();
        let report = trace_frame(
            FrameConfig::default(),
            SurfaceSize::new(300, 300),
            Some(&image),
            None,
        )
        .unwrap();
        assert_eq!(report.draws, 1);
        assert_eq!(report.resolution, Some([300.0, 300.0]));
        assert!(report.gl_errors.is_empty(), "{:?}", report.gl_errors);
    }

    #[test]
    fn trace_frame_with_resize_uses_new_resolution() {
        let config = FrameConfig {
            textured: false,
            ..FrameConfig::default()
        };
        let report = trace_frame(
            config,
            SurfaceSize::new(300, 300),
            None,
            Some(SurfaceSize::new(1024, 768)),
        )
        .unwrap();
        assert_eq!(report.draws, 2);
        assert_eq!(report.resolution, Some([1024.0, 768.0]));
    }

    #[test]
    fn trace_frame_without_image_is_a_render_error() {
        let err = trace_frame(FrameConfig::default(), SurfaceSize::new(10, 10), None, None)
            .unwrap_err();
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn zero_sized_canvas_is_an_input_error() {
        let image = DecodedImage::placeholder();
        let err = trace_frame(
            FrameConfig::default(),
            SurfaceSize::new(0, 300),
            Some(&image),
            None,
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn read_image_decodes_png_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tile.png");
        image::RgbaImage::from_pixel(12, 9, image::Rgba([1, 2, 3, 255]))
            .save(&path)
            .unwrap();

        let decoded = read_image(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (12, 9));
    }

    #[test]
    fn read_image_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_image(&dir.path().join("nope.png")).unwrap_err();
        assert_eq!(err.exit_code(), 11);
    }

    #[test]
    fn read_image_non_image_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();
        let err = read_image(&path).unwrap_err();
        assert_eq!(err.exit_code(), 12);
    }
}
