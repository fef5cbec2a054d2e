#![deny(unsafe_code)]
//! Core of the texquad WebGL demo.
//!
//! Compiles a shader pair, uploads a static quad and one RGBA texture, and
//! draws it through an explicitly passed [`GlContext`]. Provides the
//! `Rect` geometry builder, `FrameConfig`, `DecodedImage`, the
//! `SingleFlight` render guard, and the headless `TraceContext`.

pub mod config;
pub mod decoded;
pub mod error;
pub mod flight;
pub mod geometry;
pub mod params;
pub mod render;

pub use config::FrameConfig;
pub use decoded::DecodedImage;
pub use error::RenderError;
pub use flight::{render_after_load, FlightToken, SingleFlight};
pub use geometry::{rectangle, Rect};
pub use render::{FrameRenderer, GlContext, PreparedFrame, SurfaceSize, TraceContext};
