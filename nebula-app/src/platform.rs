//! Browser implementation of the host platform.
//!
//! Frames come from `requestAnimationFrame`, text spawning from
//! `setInterval`, haptics from `navigator.vibrate`. The JS closures live in
//! [`WebCallbacks`] and are installed once the frame loop exists.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use nebula_core::{
    CallbackId, HapticIntensity, Haptics, NebulaError, NebulaResult, Notice, Platform,
};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::Window;

fn platform_error(context: &str, err: &JsValue) -> NebulaError {
    NebulaError::Platform(format!("{context}: {err:?}"))
}

/// JS closures handed to the browser scheduler.
#[derive(Default)]
pub struct WebCallbacks {
    /// Animation frame callback, receives the frame timestamp in ms.
    pub frame: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    /// Text spawn interval callback.
    pub spawn: RefCell<Option<Closure<dyn FnMut()>>>,
}

/// The browser as a [`Platform`].
pub struct WebPlatform {
    window: Window,
    callbacks: Rc<WebCallbacks>,
    notify: Option<js_sys::Function>,
}

impl WebPlatform {
    /// Create a platform that schedules through `callbacks`.
    #[must_use]
    pub fn new(window: Window, callbacks: Rc<WebCallbacks>) -> Self {
        Self {
            window,
            callbacks,
            notify: None,
        }
    }

    /// Route notices to a JS function taking one JSON string.
    pub fn set_notify(&mut self, callback: Option<js_sys::Function>) {
        self.notify = callback;
    }
}

impl Haptics for WebPlatform {
    fn vibrate(&mut self, intensity: HapticIntensity) -> NebulaResult<()> {
        if self
            .window
            .navigator()
            .vibrate_with_duration(intensity.pulse_ms())
        {
            Ok(())
        } else {
            Err(NebulaError::Haptics("vibration rejected".into()))
        }
    }
}

impl Platform for WebPlatform {
    fn request_frame(&mut self) -> NebulaResult<CallbackId> {
        let frame = self.callbacks.frame.borrow();
        let callback = frame
            .as_ref()
            .ok_or_else(|| NebulaError::Platform("frame callback not installed".into()))?;
        self.window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map(CallbackId)
            .map_err(|e| platform_error("requestAnimationFrame", &e))
    }

    fn cancel_frame(&mut self, id: CallbackId) {
        if let Err(e) = self.window.cancel_animation_frame(id.0) {
            tracing::warn!("Failed to cancel frame {id}: {e:?}");
        }
    }

    fn start_interval(&mut self, period: Duration) -> NebulaResult<CallbackId> {
        let timeout = i32::try_from(period.as_millis())
            .map_err(|_| NebulaError::Platform(format!("interval too long: {period:?}")))?;
        let spawn = self.callbacks.spawn.borrow();
        let callback = spawn
            .as_ref()
            .ok_or_else(|| NebulaError::Platform("spawn callback not installed".into()))?;
        self.window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                timeout,
            )
            .map(CallbackId)
            .map_err(|e| platform_error("setInterval", &e))
    }

    fn cancel_interval(&mut self, id: CallbackId) {
        self.window.clear_interval_with_handle(id.0);
    }

    fn notify(&mut self, notice: Notice) {
        let Some(callback) = &self.notify else {
            tracing::info!("{notice}");
            return;
        };
        let json = match serde_json::to_string(&notice) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to serialize notice: {e}");
                return;
            }
        };
        if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
            tracing::warn!("Notice callback threw: {e:?}");
        }
    }
}
