//! The frame loop: ties a [`Simulation`], a [`Renderer`], a drawing surface
//! and the host [`Platform`] together.
//!
//! The host calls [`FrameLoop::on_frame`] from its display-refresh callback
//! and [`FrameLoop::on_spawn_timer`] from its interval callback. The loop
//! re-requests frames itself for as long as a surface is attached.

use nebula_core::{
    platform::pulse, CallbackId, HapticIntensity, LongPress, Notice, Platform, Simulation,
    SurfaceSize, TouchEvent,
};

use crate::{DrawSurface, FrameExporter, RenderResult, Renderer};

/// Drives one canvas session.
pub struct FrameLoop<S: DrawSurface, P: Platform> {
    simulation: Simulation,
    renderer: Renderer,
    platform: P,
    surface: Option<S>,
    exporter: Option<Box<dyn FrameExporter<S>>>,
    pending_frame: Option<CallbackId>,
    spawn_timer: Option<CallbackId>,
}

impl<S: DrawSurface, P: Platform> FrameLoop<S, P> {
    /// Create a detached loop.
    #[must_use]
    pub fn new(simulation: Simulation, renderer: Renderer, platform: P) -> Self {
        Self {
            simulation,
            renderer,
            platform,
            surface: None,
            exporter: None,
            pending_frame: None,
            spawn_timer: None,
        }
    }

    /// Attach an exporter used when a long press fires.
    #[must_use]
    pub fn with_exporter(mut self, exporter: impl FrameExporter<S> + 'static) -> Self {
        self.exporter = Some(Box::new(exporter));
        self
    }

    /// Bind a surface and start producing frames.
    ///
    /// Scales the surface by the device pixel ratio, populates the
    /// simulation, starts the text spawn timer and requests the first frame.
    /// Attaching while already attached is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface rejects the scale or the host cannot
    /// schedule frames. The loop is left detached in that case.
    pub fn attach(&mut self, mut surface: S, size: SurfaceSize) -> RenderResult<()> {
        if self.surface.is_some() {
            tracing::debug!("Surface already attached");
            return Ok(());
        }

        surface.resize(size)?;
        self.simulation.start(size);
        self.surface = Some(surface);

        match self
            .platform
            .start_interval(self.simulation.config().text_spawn_interval())
        {
            Ok(id) => self.spawn_timer = Some(id),
            Err(e) => tracing::warn!("Text spawning disabled: {e}"),
        }

        if let Err(e) = self.schedule_frame() {
            self.detach();
            return Err(e);
        }
        Ok(())
    }

    /// Display-refresh callback.
    ///
    /// Steps the simulation, checks for a long press, renders, then
    /// requests the next frame. Returns `Ok(false)` when detached.
    ///
    /// # Errors
    ///
    /// Returns a render error after the next frame has been requested, or
    /// an error if the next frame cannot be requested.
    pub fn on_frame(&mut self, now_ms: u64) -> RenderResult<bool> {
        self.pending_frame = None;
        if self.surface.is_none() || !self.simulation.step() {
            return Ok(false);
        }

        if let Some(press) = self.simulation.poll_long_press(now_ms) {
            self.save_snapshot(press);
        }

        let rendered = match self.surface.as_mut() {
            Some(surface) => self.renderer.render(&self.simulation, surface),
            None => Ok(false),
        };

        self.schedule_frame()?;
        rendered
    }

    /// Interval callback: spawn one text particle.
    ///
    /// Returns the new particle's id, or `None` when detached or at the cap.
    pub fn on_spawn_timer(&mut self) -> Option<u64> {
        if self.spawn_timer.is_none() {
            tracing::trace!("Spawn timer fired after cancellation");
            return None;
        }
        self.simulation.spawn_text()
    }

    /// Route a touch event to the simulation.
    pub fn handle_touch(&mut self, event: &TouchEvent) {
        self.simulation.handle_touch(event, &mut self.platform);
    }

    /// New palette, fresh population, clean canvas.
    pub fn reset(&mut self) {
        if !self.simulation.is_running() {
            return;
        }
        self.simulation.reset();
        if let (Some(surface), Some(size)) = (self.surface.as_mut(), self.simulation.surface()) {
            self.renderer.clear(surface, size.bounds());
        }
        pulse(&mut self.platform, HapticIntensity::Medium);
        self.platform.notify(Notice::Reset);
    }

    /// Adopt new surface dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot adopt the new size.
    pub fn resize(&mut self, size: SurfaceSize) -> RenderResult<()> {
        let Some(surface) = self.surface.as_mut() else {
            return Ok(());
        };
        surface.resize(size)?;
        self.simulation.resize(size);
        Ok(())
    }

    /// Stop producing frames and hand back the surface.
    pub fn detach(&mut self) -> Option<S> {
        if let Some(id) = self.pending_frame.take() {
            self.platform.cancel_frame(id);
        }
        if let Some(id) = self.spawn_timer.take() {
            self.platform.cancel_interval(id);
        }
        self.simulation.stop();
        self.surface.take()
    }

    fn schedule_frame(&mut self) -> RenderResult<()> {
        let id = self.platform.request_frame()?;
        self.pending_frame = Some(id);
        Ok(())
    }

    fn save_snapshot(&mut self, press: LongPress) {
        tracing::info!("Saving snapshot after {}ms hold", press.held_ms);
        pulse(&mut self.platform, HapticIntensity::Heavy);

        let (Some(exporter), Some(surface)) = (self.exporter.as_mut(), self.surface.as_ref())
        else {
            tracing::debug!("No exporter configured, snapshot skipped");
            return;
        };

        let notice = match exporter.export(surface) {
            Ok(location) => Notice::Saved(location),
            Err(e) => {
                tracing::warn!("Snapshot export failed: {e}");
                Notice::ExportFailed(e.to_string())
            }
        };
        self.platform.notify(notice);
    }

    /// Whether a surface is attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    /// Whether a frame request is outstanding.
    #[must_use]
    pub fn frame_pending(&self) -> bool {
        self.pending_frame.is_some()
    }

    /// The simulation.
    #[must_use]
    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Mutable access to the simulation.
    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.simulation
    }

    /// The renderer.
    #[must_use]
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// The attached surface, if any.
    #[must_use]
    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// The host platform.
    #[must_use]
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Mutable access to the host platform.
    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }
}

impl<S: DrawSurface, P: Platform> Drop for FrameLoop<S, P> {
    fn drop(&mut self) {
        if self.surface.is_some() {
            self.detach();
        }
    }
}
