//! Frame loop behavior against a scripted host.

use std::time::Duration;

use nebula_core::{
    CallbackId, HapticIntensity, Haptics, NebulaError, NebulaResult, Notice, Platform, Simulation,
    SimulationConfig, SurfaceSize, TouchEvent, TouchPhase,
};
use nebula_renderer::{
    DrawCommand, DrawSurface, FrameExporter, FrameLoop, PngExporter, RasterSurface,
    RecordingSurface, RenderError, RenderResult, Renderer,
};

#[derive(Debug, Default)]
struct MockPlatform {
    next_id: i32,
    frames_requested: usize,
    frames_cancelled: Vec<CallbackId>,
    intervals: Vec<Duration>,
    intervals_cancelled: Vec<CallbackId>,
    pulses: Vec<HapticIntensity>,
    notices: Vec<Notice>,
    refuse_frames: bool,
}

impl MockPlatform {
    fn id(&mut self) -> CallbackId {
        self.next_id += 1;
        CallbackId(self.next_id)
    }
}

impl Haptics for MockPlatform {
    fn vibrate(&mut self, intensity: HapticIntensity) -> NebulaResult<()> {
        self.pulses.push(intensity);
        Ok(())
    }
}

impl Platform for MockPlatform {
    fn request_frame(&mut self) -> NebulaResult<CallbackId> {
        if self.refuse_frames {
            return Err(NebulaError::Platform("no display".into()));
        }
        self.frames_requested += 1;
        Ok(self.id())
    }

    fn cancel_frame(&mut self, id: CallbackId) {
        self.frames_cancelled.push(id);
    }

    fn start_interval(&mut self, period: Duration) -> NebulaResult<CallbackId> {
        self.intervals.push(period);
        Ok(self.id())
    }

    fn cancel_interval(&mut self, id: CallbackId) {
        self.intervals_cancelled.push(id);
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

struct FailingExporter;

impl<S> FrameExporter<S> for FailingExporter {
    fn export(&mut self, _surface: &S) -> RenderResult<String> {
        Err(RenderError::Export("album permission denied".into()))
    }
}

fn size() -> SurfaceSize {
    SurfaceSize::new(320.0, 480.0).with_device_pixel_ratio(2.0)
}

fn recording_loop() -> FrameLoop<RecordingSurface, MockPlatform> {
    FrameLoop::new(
        Simulation::with_seed(SimulationConfig::default(), 99),
        Renderer::default(),
        MockPlatform::default(),
    )
}

#[test]
fn attach_scales_surface_and_schedules_work() {
    let mut frames = recording_loop();
    frames
        .attach(RecordingSurface::new(320.0, 480.0), size())
        .expect("attach");

    assert!(frames.is_attached());
    assert!(frames.frame_pending());
    assert_eq!(frames.simulation().particles().len(), 50);
    assert_eq!(
        frames.surface().expect("surface").commands()[0],
        DrawCommand::Resize(size())
    );
    assert_eq!(frames.platform().intervals, vec![Duration::from_millis(3000)]);
}

#[test]
fn every_frame_requests_the_next() {
    let mut frames = recording_loop();
    frames
        .attach(RecordingSurface::new(320.0, 480.0), size())
        .expect("attach");

    for t in 0..10 {
        assert!(frames.on_frame(t * 16).expect("frame"));
    }
    assert_eq!(frames.platform().frames_requested, 11);
    assert_eq!(frames.renderer().frame_count(), 10);
    assert_eq!(frames.simulation().tick_count(), 10);
}

#[test]
fn detached_loop_does_nothing() {
    let mut frames = recording_loop();
    assert!(!frames.on_frame(0).expect("frame"));
    assert_eq!(frames.on_spawn_timer(), None);
    assert_eq!(frames.platform().frames_requested, 0);
}

#[test]
fn detach_cancels_callbacks_and_returns_surface() {
    let mut frames = recording_loop();
    frames
        .attach(RecordingSurface::new(320.0, 480.0), size())
        .expect("attach");

    let surface = frames.detach();
    assert!(surface.is_some());
    assert!(!frames.is_attached());
    assert!(!frames.simulation().is_running());
    assert_eq!(frames.platform().frames_cancelled.len(), 1);
    assert_eq!(frames.platform().intervals_cancelled.len(), 1);

    // A stale callback arriving after detach is harmless.
    assert!(!frames.on_frame(100).expect("frame"));
    assert_eq!(frames.on_spawn_timer(), None);
}

#[test]
fn failed_frame_request_leaves_loop_detached() {
    let mut frames = FrameLoop::<RecordingSurface, _>::new(
        Simulation::with_seed(SimulationConfig::default(), 1),
        Renderer::default(),
        MockPlatform {
            refuse_frames: true,
            ..MockPlatform::default()
        },
    );
    let err = frames
        .attach(RecordingSurface::new(10.0, 10.0), SurfaceSize::new(10.0, 10.0))
        .expect_err("refused");
    assert!(matches!(err, RenderError::Core(NebulaError::Platform(_))));
    assert!(!frames.is_attached());
    assert!(!frames.simulation().is_running());
}

#[test]
fn spawn_timer_adds_text_up_to_cap() {
    let mut frames = recording_loop();
    frames
        .attach(RecordingSurface::new(320.0, 480.0), size())
        .expect("attach");

    let ids: Vec<_> = (0..12).filter_map(|_| frames.on_spawn_timer()).collect();
    assert_eq!(ids, (0..8).collect::<Vec<u64>>());
    assert_eq!(frames.simulation().text_particles().len(), 8);
}

#[test]
fn touch_start_bursts_with_light_pulse() {
    let mut frames = recording_loop();
    frames
        .attach(RecordingSurface::new(320.0, 480.0), size())
        .expect("attach");

    frames.handle_touch(&TouchEvent::single(TouchPhase::Start, 100.0, 100.0, 0));
    assert_eq!(frames.simulation().particles().len(), 58);
    assert_eq!(frames.platform().pulses, vec![HapticIntensity::Light]);
}

#[test]
fn reset_clears_canvas_and_notifies() {
    let mut frames = recording_loop();
    frames
        .attach(RecordingSurface::new(320.0, 480.0), size())
        .expect("attach");
    frames.on_spawn_timer();

    frames.reset();

    assert!(frames.simulation().text_particles().is_empty());
    assert_eq!(frames.simulation().particles().len(), 50);
    assert_eq!(frames.platform().pulses, vec![HapticIntensity::Medium]);
    assert_eq!(frames.platform().notices, vec![Notice::Reset]);
    let commands = frames.surface().expect("surface").commands();
    assert!(commands.contains(&DrawCommand::GlobalAlpha(1.0)));
}

#[test]
fn long_press_without_exporter_only_pulses() {
    let mut frames = recording_loop();
    frames
        .attach(RecordingSurface::new(320.0, 480.0), size())
        .expect("attach");

    frames.handle_touch(&TouchEvent::single(TouchPhase::Start, 50.0, 50.0, 1000));
    frames.on_frame(1500).expect("frame");
    assert_eq!(frames.platform().pulses, vec![HapticIntensity::Light]);

    frames.on_frame(1800).expect("frame");
    assert_eq!(
        frames.platform().pulses,
        vec![HapticIntensity::Light, HapticIntensity::Heavy]
    );
    assert!(frames.platform().notices.is_empty());
}

#[test]
fn released_touch_never_long_presses() {
    let mut frames = recording_loop();
    frames
        .attach(RecordingSurface::new(320.0, 480.0), size())
        .expect("attach");

    frames.handle_touch(&TouchEvent::single(TouchPhase::Start, 50.0, 50.0, 0));
    frames.handle_touch(&TouchEvent::single(TouchPhase::End, 50.0, 50.0, 400));
    frames.on_frame(5000).expect("frame");
    assert_eq!(frames.platform().pulses, vec![HapticIntensity::Light]);
}

#[test]
fn failed_export_is_reported() {
    let mut frames = recording_loop().with_exporter(FailingExporter);
    frames
        .attach(RecordingSurface::new(320.0, 480.0), size())
        .expect("attach");

    frames.handle_touch(&TouchEvent::single(TouchPhase::Start, 10.0, 10.0, 0));
    frames.on_frame(800).expect("frame");

    assert_eq!(
        frames.platform().notices,
        vec![Notice::ExportFailed(
            "Export failed: album permission denied".into()
        )]
    );
}

#[test]
fn long_press_saves_png() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut frames = FrameLoop::new(
        Simulation::with_seed(SimulationConfig::default(), 5),
        Renderer::default(),
        MockPlatform::default(),
    )
    .with_exporter(PngExporter::new(dir.path()));

    let size = SurfaceSize::new(64.0, 48.0);
    frames
        .attach(RasterSurface::new(size).expect("raster"), size)
        .expect("attach");

    frames.handle_touch(&TouchEvent::single(TouchPhase::Start, 32.0, 24.0, 0));
    frames.on_frame(16).expect("frame");
    frames.on_frame(900).expect("frame");

    let saved = dir.path().join("nebula-0001.png");
    assert!(saved.exists());
    assert_eq!(
        frames.platform().notices,
        vec![Notice::Saved(saved.display().to_string())]
    );
    assert_eq!(
        frames.platform().pulses.last(),
        Some(&HapticIntensity::Heavy)
    );
}

#[test]
fn resize_rescales_surface() {
    let mut frames = recording_loop();
    frames
        .attach(RecordingSurface::new(320.0, 480.0), size())
        .expect("attach");

    frames
        .resize(SurfaceSize::new(640.0, 480.0).with_device_pixel_ratio(3.0))
        .expect("resize");
    let resized = SurfaceSize::new(640.0, 480.0).with_device_pixel_ratio(3.0);
    let surface = frames.surface().expect("surface");
    assert!(surface.commands().contains(&DrawCommand::Resize(resized)));
    assert_eq!(surface.size(), (640.0, 480.0));
    let bounds = frames.simulation().pool().bounds();
    assert_eq!(bounds.width, 640.0);
}

#[test]
fn resize_reallocates_raster_surface() {
    let mut frames = FrameLoop::new(
        Simulation::with_seed(SimulationConfig::default(), 5),
        Renderer::default(),
        MockPlatform::default(),
    );
    let small = SurfaceSize::new(100.0, 100.0);
    frames
        .attach(RasterSurface::new(small).expect("surface"), small)
        .expect("attach");

    frames.resize(SurfaceSize::new(400.0, 300.0)).expect("resize");
    for frame in 0..5 {
        frames.on_frame(frame * 16).expect("frame");
    }

    let surface = frames.surface().expect("surface");
    assert_eq!(surface.size(), (400.0, 300.0));
    assert_eq!(
        (surface.pixmap().width(), surface.pixmap().height()),
        (400, 300)
    );
    let bounds = frames.simulation().pool().bounds();
    assert_eq!((bounds.width, bounds.height), (400.0, 300.0));
}
