//! The browser-facing demo handle.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use texquad_core::render::{FrameRenderer, PreparedFrame, SurfaceSize};
use texquad_core::{render_after_load, DecodedImage, FrameConfig, RenderError, SingleFlight};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::{HtmlCanvasElement, Response, WebGlRenderingContext};

use crate::js_error;

static INIT_LOGGING: Once = Once::new();

fn init_logging() {
    INIT_LOGGING.call_once(|| {
        console_error_panic_hook::set_once();
        // Fails only if the host page already installed a logger.
        if console_log::init_with_level(log::Level::Debug).is_err() {
            log::warn!("logger already initialized");
        }
    });
}

struct Stage {
    gl: glow::Context,
    canvas: HtmlCanvasElement,
    renderer: FrameRenderer,
    frame: Option<PreparedFrame<glow::Context>>,
}

impl Stage {
    fn surface(&self) -> SurfaceSize {
        SurfaceSize::new(self.canvas.width(), self.canvas.height())
    }

    fn render(&mut self, image: Option<&DecodedImage>) -> Result<(), RenderError> {
        if let Some(previous) = self.frame.take() {
            previous.destroy(&self.gl);
        }
        let frame = self.renderer.render(&self.gl, self.surface(), image)?;
        self.frame = Some(frame);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        let size = self.surface();
        match self.frame.as_mut() {
            Some(frame) => frame.redraw(&self.gl, size),
            None => Ok(()),
        }
    }
}

/// One canvas running the textured-quad demo.
#[wasm_bindgen]
pub struct Demo {
    stage: Rc<RefCell<Stage>>,
    flight: SingleFlight,
}

#[wasm_bindgen]
impl Demo {
    /// Acquires a WebGL1 context on `canvas`.
    ///
    /// `config` is an optional JSON object; see `config_schema()`.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, config: Option<String>) -> Result<Demo, JsValue> {
        init_logging();

        let config = match config {
            Some(text) => FrameConfig::from_json_str(&text).map_err(js_error)?,
            None => FrameConfig::default(),
        };

        let webgl = canvas
            .get_context("webgl")?
            .ok_or_else(|| JsValue::from_str("WebGL is not available on this canvas"))?
            .dyn_into::<WebGlRenderingContext>()?;
        let gl = glow::Context::from_webgl1_context(webgl);
        log::info!(
            "demo ready on {}x{} canvas (textured: {})",
            canvas.width(),
            canvas.height(),
            config.textured
        );

        Ok(Demo {
            stage: Rc::new(RefCell::new(Stage {
                gl,
                canvas,
                renderer: FrameRenderer::new(config),
                frame: None,
            })),
            flight: SingleFlight::new(),
        })
    }

    /// Fetches and decodes the image at `url`, then renders once.
    ///
    /// The promise rejects if another load is still pending, if the fetch
    /// or decode fails, or if shader setup fails. With texturing disabled
    /// nothing is fetched.
    pub fn load(&self, url: String) -> js_sys::Promise {
        let token = match self.flight.try_begin() {
            Ok(token) => token,
            Err(e) => return js_sys::Promise::reject(&js_error(e)),
        };
        let stage = Rc::clone(&self.stage);

        future_to_promise(async move {
            let textured = stage.borrow().renderer.config().textured;
            render_after_load(
                token,
                textured,
                || fetch_image(&url),
                |image| stage.borrow_mut().render(image).map_err(js_error),
            )
            .await?;
            Ok(JsValue::UNDEFINED)
        })
    }

    /// Resizes the canvas backing store and redraws with the new viewport
    /// and resolution. A no-op until the first render has completed.
    pub fn resize(&self, width: u32, height: u32) -> Result<(), JsValue> {
        self.stage
            .borrow_mut()
            .resize(width, height)
            .map_err(js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn loading(&self) -> bool {
        self.flight.is_busy()
    }

    #[wasm_bindgen(getter)]
    pub fn draws(&self) -> usize {
        self.stage
            .borrow()
            .frame
            .as_ref()
            .map_or(0, PreparedFrame::draw_count)
    }
}

async fn fetch_image(url: &str) -> Result<DecodedImage, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let response: Response = JsFuture::from(window.fetch_with_str(url))
        .await?
        .dyn_into()?;
    if !response.ok() {
        return Err(JsValue::from_str(&format!(
            "fetching {url} failed: HTTP {}",
            response.status()
        )));
    }
    let buffer = JsFuture::from(response.array_buffer()?).await?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    log::debug!("fetched {} bytes from {url}", bytes.len());
    DecodedImage::from_encoded(&bytes).map_err(js_error)
}
