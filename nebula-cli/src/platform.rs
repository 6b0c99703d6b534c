//! A platform driven by the headless runner's virtual clock.

use std::time::Duration;

use nebula_core::{CallbackId, HapticIntensity, Haptics, NebulaResult, Notice, Platform};

/// Records scheduling requests instead of talking to a display.
///
/// The runner polls [`VirtualPlatform::take_frame_request`] once per virtual
/// frame and fires the interval itself.
#[derive(Debug, Default)]
pub struct VirtualPlatform {
    next_id: i32,
    pending_frame: Option<CallbackId>,
    interval: Option<(CallbackId, Duration)>,
    pulses: Vec<HapticIntensity>,
    notices: Vec<Notice>,
}

impl VirtualPlatform {
    /// Create an idle platform.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the outstanding frame request, if any.
    pub fn take_frame_request(&mut self) -> bool {
        self.pending_frame.take().is_some()
    }

    /// Period of the running interval.
    #[must_use]
    pub fn interval(&self) -> Option<Duration> {
        self.interval.map(|(_, period)| period)
    }

    /// Haptic pulses fired so far.
    #[must_use]
    pub fn pulses(&self) -> &[HapticIntensity] {
        &self.pulses
    }

    /// Notices raised so far.
    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    fn allocate(&mut self) -> CallbackId {
        self.next_id += 1;
        CallbackId(self.next_id)
    }
}

impl Haptics for VirtualPlatform {
    fn vibrate(&mut self, intensity: HapticIntensity) -> NebulaResult<()> {
        tracing::debug!("Haptic pulse {intensity:?} ({}ms)", intensity.pulse_ms());
        self.pulses.push(intensity);
        Ok(())
    }
}

impl Platform for VirtualPlatform {
    fn request_frame(&mut self) -> NebulaResult<CallbackId> {
        let id = self.allocate();
        self.pending_frame = Some(id);
        Ok(id)
    }

    fn cancel_frame(&mut self, id: CallbackId) {
        if self.pending_frame == Some(id) {
            self.pending_frame = None;
        }
    }

    fn start_interval(&mut self, period: Duration) -> NebulaResult<CallbackId> {
        let id = self.allocate();
        self.interval = Some((id, period));
        Ok(id)
    }

    fn cancel_interval(&mut self, id: CallbackId) {
        if self.interval.is_some_and(|(current, _)| current == id) {
            self.interval = None;
        }
    }

    fn notify(&mut self, notice: Notice) {
        tracing::info!("{notice}");
        self.notices.push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_request_is_single_shot() {
        let mut platform = VirtualPlatform::new();
        platform.request_frame().expect("frame");
        assert!(platform.take_frame_request());
        assert!(!platform.take_frame_request());
    }

    #[test]
    fn cancel_ignores_stale_ids() {
        let mut platform = VirtualPlatform::new();
        let old = platform.request_frame().expect("frame");
        let _new = platform.request_frame().expect("frame");
        platform.cancel_frame(old);
        assert!(platform.take_frame_request());
    }

    #[test]
    fn interval_lifecycle() {
        let mut platform = VirtualPlatform::new();
        let id = platform
            .start_interval(Duration::from_millis(3000))
            .expect("interval");
        assert_eq!(platform.interval(), Some(Duration::from_millis(3000)));
        platform.cancel_interval(id);
        assert_eq!(platform.interval(), None);
    }

    #[test]
    fn records_feedback() {
        let mut platform = VirtualPlatform::new();
        platform.vibrate(HapticIntensity::Medium).expect("pulse");
        platform.notify(Notice::Reset);
        assert_eq!(platform.pulses(), &[HapticIntensity::Medium]);
        assert_eq!(platform.notices(), &[Notice::Reset]);
    }
}
