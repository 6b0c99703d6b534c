//! Snapshot export through a JS handler.

use std::cell::RefCell;
use std::rc::Rc;

use nebula_renderer::{FrameExporter, RenderError, RenderResult};
use wasm_bindgen::JsValue;

use crate::surface::CanvasSurface;

/// Shared slot for the page's save handler.
pub type ExportHandler = Rc<RefCell<Option<js_sys::Function>>>;

/// Encodes the canvas as a PNG data URL and hands it to the page.
///
/// The handler receives the data URL and may return a string naming where
/// the image went.
pub struct CanvasExporter {
    handler: ExportHandler,
}

impl CanvasExporter {
    /// Create an exporter reading its handler from `handler`.
    #[must_use]
    pub fn new(handler: ExportHandler) -> Self {
        Self { handler }
    }
}

impl FrameExporter<CanvasSurface> for CanvasExporter {
    fn export(&mut self, surface: &CanvasSurface) -> RenderResult<String> {
        let handler = self.handler.borrow();
        let Some(handler) = handler.as_ref() else {
            return Err(RenderError::Export("no export handler registered".into()));
        };

        let data_url = surface
            .canvas()
            .to_data_url_with_type("image/png")
            .map_err(|e| RenderError::Export(format!("toDataURL failed: {e:?}")))?;

        let location = handler
            .call1(&JsValue::NULL, &JsValue::from_str(&data_url))
            .map_err(|e| RenderError::Export(format!("export handler threw: {e:?}")))?;

        Ok(location
            .as_string()
            .unwrap_or_else(|| "photo album".to_string()))
    }
}
