#![deny(unsafe_code)]
//! WASM bindings for the texquad demo.
//!
//! JavaScript creates a [`Demo`] for a canvas, calls `load(url)` once the
//! page is ready, and forwards window resizes to `resize(w, h)`. The image
//! is fetched and decoded before any GL call is made; at most one load is
//! in flight per `Demo`.

use texquad_core::{FrameConfig, RenderError};
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod demo;

#[cfg(target_arch = "wasm32")]
pub use demo::Demo;

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub(crate) fn js_error(e: RenderError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// JSON schema of the options accepted by the `Demo` constructor.
#[wasm_bindgen]
pub fn config_schema() -> String {
    FrameConfig::param_schema().to_string()
}

/// Default options as a JSON object string.
#[wasm_bindgen]
pub fn default_config() -> String {
    FrameConfig::default().params().to_string()
}
