//! # Nebula WASM Application
//!
//! Runs the Nebula particle canvas in a browser.
//!
//! ## Usage
//!
//! Build for WASM:
//! ```bash
//! wasm-pack build --target web nebula-app
//! ```
//!
//! Then import in JavaScript:
//! ```javascript
//! import init, { NebulaApp } from './pkg/nebula_app.js';
//!
//! await init();
//! const app = new NebulaApp('nebula-canvas');
//! app.setNotifyCallback((json) => showToast(JSON.parse(json)));
//! app.start();
//!
//! canvas.addEventListener('touchstart', (e) => app.handleTouchEvent(e));
//! canvas.addEventListener('touchmove', (e) => app.handleTouchEvent(e));
//! canvas.addEventListener('touchend', (e) => app.handleTouchEvent(e));
//! ```
//!
//! Frames and text spawning are scheduled by the app itself; the page only
//! forwards input and lays out [`NebulaApp::text_nodes_json`] above the canvas.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod export;
pub mod platform;
pub mod surface;

use std::{cell::RefCell, rc::Rc};

use nebula_core::{Simulation, SimulationConfig, TouchEvent, TouchPhase, TouchPoint};
use nebula_renderer::{text_nodes, FrameLoop, RenderError, Renderer, RendererConfig};
use wasm_bindgen::{closure::Closure, prelude::*};
use web_sys::{HtmlCanvasElement, Window};

pub use export::{CanvasExporter, ExportHandler};
pub use platform::{WebCallbacks, WebPlatform};
pub use surface::CanvasSurface;

type AppLoop = FrameLoop<CanvasSurface, WebPlatform>;

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init_wasm() {
    console_error_panic_hook::set_once();
    tracing::info!("Nebula WASM initialized");
}

fn js_error(err: &impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Browser timestamps are fractional milliseconds since page load.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_millis(timestamp: f64) -> u64 {
    if timestamp.is_finite() && timestamp > 0.0 {
        timestamp as u64
    } else {
        0
    }
}

fn phase_for_event_type(event_type: &str) -> Option<TouchPhase> {
    match event_type {
        "touchstart" => Some(TouchPhase::Start),
        "touchmove" => Some(TouchPhase::Move),
        "touchend" => Some(TouchPhase::End),
        "touchcancel" => Some(TouchPhase::Cancel),
        _ => None,
    }
}

fn install_callbacks(frames: &Rc<RefCell<AppLoop>>, callbacks: &WebCallbacks) {
    let weak = Rc::downgrade(frames);
    let frame = Closure::wrap(Box::new(move |timestamp: f64| {
        let Some(handle) = weak.upgrade() else {
            return;
        };
        let Ok(mut frames) = handle.try_borrow_mut() else {
            tracing::warn!("Frame loop busy, frame dropped");
            return;
        };
        if let Err(e) = frames.on_frame(to_millis(timestamp)) {
            tracing::error!("Frame failed: {e}");
        }
    }) as Box<dyn FnMut(f64)>);

    let weak = Rc::downgrade(frames);
    let spawn = Closure::wrap(Box::new(move || {
        let Some(handle) = weak.upgrade() else {
            return;
        };
        if let Ok(mut frames) = handle.try_borrow_mut() {
            frames.on_spawn_timer();
        };
    }) as Box<dyn FnMut()>);

    *callbacks.frame.borrow_mut() = Some(frame);
    *callbacks.spawn.borrow_mut() = Some(spawn);
}

/// The Nebula canvas application for WASM.
#[wasm_bindgen]
pub struct NebulaApp {
    frames: Rc<RefCell<AppLoop>>,
    window: Window,
    canvas: HtmlCanvasElement,
    export_handler: ExportHandler,
    // Owns the JS closures; the frame loop only holds scheduling ids.
    _callbacks: Rc<WebCallbacks>,
}

#[wasm_bindgen]
impl NebulaApp {
    /// Create an app bound to the canvas with the given element ID.
    ///
    /// `config_json` optionally overrides simulation parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the canvas is missing or the config is invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, config_json: Option<String>) -> Result<NebulaApp, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window object"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("No document object"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("Canvas element '{canvas_id}' not found")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str("Element is not a canvas"))?;

        let config = match config_json.as_deref() {
            Some(json) => SimulationConfig::from_json(json).map_err(|e| js_error(&e))?,
            None => SimulationConfig::default(),
        };

        let callbacks = Rc::new(WebCallbacks::default());
        let export_handler: ExportHandler = Rc::new(RefCell::new(None));
        let platform = WebPlatform::new(window.clone(), Rc::clone(&callbacks));
        let frames = FrameLoop::new(
            Simulation::new(config),
            Renderer::new(RendererConfig::default()),
            platform,
        )
        .with_exporter(CanvasExporter::new(Rc::clone(&export_handler)));

        let frames = Rc::new(RefCell::new(frames));
        install_callbacks(&frames, &callbacks);

        Ok(Self {
            frames,
            window,
            canvas,
            export_handler,
            _callbacks: callbacks,
        })
    }

    /// Measure the canvas and start animating.
    ///
    /// # Errors
    ///
    /// Returns an error if the 2D context or the scheduler is unavailable.
    pub fn start(&self) -> Result<(), JsValue> {
        let surface = CanvasSurface::new(self.canvas.clone()).map_err(|e| js_error(&e))?;
        let size = CanvasSurface::measure(&self.canvas, self.window.device_pixel_ratio());
        self.with_loop(|frames| frames.attach(surface, size))?
            .map_err(|e: RenderError| js_error(&e))
    }

    /// Stop animating and cancel all scheduled callbacks.
    ///
    /// # Errors
    ///
    /// Returns an error if called from inside a callback.
    pub fn stop(&self) -> Result<(), JsValue> {
        self.with_loop(|frames| {
            frames.detach();
        })
    }

    /// New palette, fresh particles, clean canvas.
    ///
    /// # Errors
    ///
    /// Returns an error if called from inside a callback.
    pub fn reset(&self) -> Result<(), JsValue> {
        self.with_loop(AppLoop::reset)
    }

    /// Re-measure the canvas after a layout change.
    ///
    /// # Errors
    ///
    /// Returns an error if the context rejects the new scale.
    pub fn resize(&self) -> Result<(), JsValue> {
        let size = CanvasSurface::measure(&self.canvas, self.window.device_pixel_ratio());
        self.with_loop(|frames| frames.resize(size))?
            .map_err(|e| js_error(&e))
    }

    /// Handle a single touch in canvas coordinates.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown phase.
    #[wasm_bindgen(js_name = handleTouch)]
    pub fn handle_touch(&self, x: f32, y: f32, phase: &str) -> Result<(), JsValue> {
        let phase: TouchPhase = phase.parse().map_err(|e: String| JsValue::from_str(&e))?;
        let event = TouchEvent::single(phase, x, y, self.now());
        self.with_loop(|frames| frames.handle_touch(&event))
    }

    /// Handle a DOM touch event targeting the canvas.
    ///
    /// # Errors
    ///
    /// Returns an error if called from inside a callback.
    #[wasm_bindgen(js_name = handleTouchEvent)]
    #[allow(clippy::cast_possible_truncation)]
    pub fn handle_touch_event(&self, event: &web_sys::TouchEvent) -> Result<(), JsValue> {
        let Some(phase) = phase_for_event_type(&event.type_()) else {
            return Ok(());
        };
        event.prevent_default();

        let rect = self.canvas.get_bounding_client_rect();
        let list = event.touches();
        let touches = (0..list.length())
            .filter_map(|i| list.get(i))
            .map(|touch| TouchPoint {
                id: touch.identifier().unsigned_abs(),
                x: (f64::from(touch.client_x()) - rect.left()) as f32,
                y: (f64::from(touch.client_y()) - rect.top()) as f32,
            })
            .collect();

        let event = TouchEvent::new(phase, touches, self.now());
        self.with_loop(|frames| frames.handle_touch(&event))
    }

    /// Overlay text nodes as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    #[wasm_bindgen(js_name = textNodesJson)]
    pub fn text_nodes_json(&self) -> Result<String, JsValue> {
        let nodes = self.with_loop(|frames| text_nodes(frames.simulation()))?;
        serde_json::to_string(&nodes).map_err(|e| js_error(&e))
    }

    /// Number of live shape particles.
    #[wasm_bindgen(js_name = particleCount)]
    #[must_use]
    pub fn particle_count(&self) -> usize {
        self.frames
            .try_borrow()
            .map(|frames| frames.simulation().particles().len())
            .unwrap_or_default()
    }

    /// Whether the app is animating.
    #[wasm_bindgen(js_name = isRunning)]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.frames
            .try_borrow()
            .is_ok_and(|frames| frames.is_attached())
    }

    /// Receive notices as JSON strings, e.g. `{"kind":"saved","detail":"..."}`.
    ///
    /// # Errors
    ///
    /// Returns an error if called from inside a callback.
    #[wasm_bindgen(js_name = setNotifyCallback)]
    pub fn set_notify_callback(&self, callback: Option<js_sys::Function>) -> Result<(), JsValue> {
        self.with_loop(|frames| frames.platform_mut().set_notify(callback))
    }

    /// Handle long-press saves. The callback gets a PNG data URL and may
    /// return a string describing where it was stored.
    #[wasm_bindgen(js_name = setExportCallback)]
    pub fn set_export_callback(&self, callback: Option<js_sys::Function>) {
        if let Ok(mut handler) = self.export_handler.try_borrow_mut() {
            *handler = callback;
        }
    }

    /// Library version.
    #[must_use]
    pub fn version() -> String {
        nebula_core::VERSION.to_string()
    }
}

impl NebulaApp {
    fn with_loop<R>(&self, f: impl FnOnce(&mut AppLoop) -> R) -> Result<R, JsValue> {
        let mut frames = self
            .frames
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("Nebula is busy"))?;
        Ok(f(&mut frames))
    }

    fn now(&self) -> u64 {
        self.window
            .performance()
            .map_or(0, |performance| to_millis(performance.now()))
    }
}
