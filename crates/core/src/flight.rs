//! At-most-one in-flight render per canvas.
//!
//! The browser loads the image asynchronously and renders on completion.
//! `SingleFlight` hands out one [`FlightToken`] at a time; the slot frees
//! itself when the token is dropped, on success and error paths alike.
//! Single-threaded by construction (`Rc`), matching the browser main thread.
//! [`render_after_load`] sequences one load: image first, then GL.

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

use crate::decoded::DecodedImage;
use crate::error::RenderError;

/// Tracks whether a render is currently waiting on its input.
#[derive(Debug, Clone, Default)]
pub struct SingleFlight {
    busy: Rc<Cell<bool>>,
}

/// Proof that the holder owns the single render slot.
#[derive(Debug)]
pub struct FlightToken {
    busy: Rc<Cell<bool>>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the slot.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::RenderInFlight`] if a token is still alive.
    pub fn try_begin(&self) -> Result<FlightToken, RenderError> {
        if self.busy.replace(true) {
            return Err(RenderError::RenderInFlight);
        }
        Ok(FlightToken {
            busy: Rc::clone(&self.busy),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }
}

impl Drop for FlightToken {
    fn drop(&mut self) {
        self.busy.set(false);
    }
}

/// Runs one load: awaits the image (only when `textured`), then renders.
///
/// `render` is called exactly once, after `fetch` has resolved, so no GL
/// work happens while the image is still in flight. `token` is held until
/// the render returns and frees the slot on every path, including a failed
/// fetch. With texturing off, `fetch` is never called.
///
/// # Errors
///
/// Propagates the first error from `fetch` or `render`.
pub async fn render_after_load<T, E, Fut>(
    token: FlightToken,
    textured: bool,
    fetch: impl FnOnce() -> Fut,
    render: impl FnOnce(Option<&DecodedImage>) -> Result<T, E>,
) -> Result<T, E>
where
    Fut: Future<Output = Result<DecodedImage, E>>,
{
    let _token = token;
    let image = if textured { Some(fetch().await?) } else { None };
    render(image.as_ref())
}
