//! Headless frame loop on a virtual clock.

use std::path::PathBuf;

use anyhow::Context;
use nebula_core::{Notice, Simulation, SimulationConfig, SurfaceSize, TouchEvent};
use nebula_renderer::{FrameLoop, PngExporter, RasterSurface, Renderer, RendererConfig};

use crate::script::{ScriptAction, TouchScript};
use crate::{CliConfig, VirtualPlatform};

type HeadlessLoop = FrameLoop<RasterSurface, VirtualPlatform>;

/// What a headless run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Frames actually rendered.
    pub frames_rendered: u64,
    /// Virtual time elapsed, in milliseconds.
    pub elapsed_ms: u64,
    /// Text particles spawned by the interval.
    pub texts_spawned: usize,
    /// Live shape particles at the end.
    pub particles: usize,
    /// Notices raised during the run.
    pub notices: Vec<Notice>,
    /// Final frame written to disk, if requested.
    pub output: Option<PathBuf>,
}

/// Virtual timestamp of a frame, in milliseconds.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn frame_time_ms(frame: u32, fps: f32) -> u64 {
    (f64::from(frame) * 1000.0 / f64::from(fps)) as u64
}

fn load_simulation_config(config: &CliConfig) -> anyhow::Result<SimulationConfig> {
    let Some(path) = &config.config_path else {
        return Ok(SimulationConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    SimulationConfig::from_json(&json)
        .with_context(|| format!("Invalid config {}", path.display()))
}

fn apply(
    frames: &mut HeadlessLoop,
    action: &ScriptAction,
    now_ms: u64,
    dpr: f32,
) -> anyhow::Result<()> {
    match action {
        ScriptAction::Touch { phase, x, y } => {
            frames.handle_touch(&TouchEvent::single(*phase, *x, *y, now_ms));
        }
        ScriptAction::Reset => frames.reset(),
        ScriptAction::Resize { width, height } => {
            tracing::debug!("Scripted resize to {width}x{height}");
            frames
                .resize(SurfaceSize::new(*width, *height).with_device_pixel_ratio(dpr))
                .context("Resize failed")?;
        }
    }
    Ok(())
}

/// Run the frame loop for `config.frames` virtual frames.
///
/// # Errors
///
/// Returns an error if configuration, script or surface setup fails, or if
/// a frame cannot be rendered or written.
pub fn run(config: &CliConfig) -> anyhow::Result<RunSummary> {
    if !(config.fps.is_finite() && config.fps > 0.0) {
        anyhow::bail!("fps must be positive, got {}", config.fps);
    }

    let sim_config = load_simulation_config(config)?;
    let mut script = match &config.script {
        Some(path) => TouchScript::load(path)?,
        None => TouchScript::default(),
    };

    let simulation = match config.seed {
        Some(seed) => Simulation::with_seed(sim_config, seed),
        None => Simulation::new(sim_config),
    };
    let size = SurfaceSize::new(config.width, config.height).with_device_pixel_ratio(config.dpr);
    let surface = RasterSurface::new(size).context("Failed to allocate raster surface")?;

    let mut frames = FrameLoop::new(
        simulation,
        Renderer::new(RendererConfig::default()),
        VirtualPlatform::new(),
    )
    .with_exporter(PngExporter::new(&config.export_dir));
    frames.attach(surface, size).context("Failed to start frame loop")?;

    tracing::info!(
        "Running {} frames at {} fps on {}x{} @{}x ({} scripted steps)",
        config.frames,
        config.fps,
        size.width,
        size.height,
        size.device_pixel_ratio,
        script.len()
    );

    let interval_ms = u64::try_from(sim_config.text_spawn_interval().as_millis())
        .context("Spawn interval out of range")?;
    let mut next_spawn_ms = interval_ms;
    let mut texts_spawned = 0;
    let mut elapsed_ms = 0;

    for frame in 0..config.frames {
        let now_ms = frame_time_ms(frame, config.fps);
        elapsed_ms = now_ms;

        while frames.platform().interval().is_some() && next_spawn_ms <= now_ms {
            if frames.on_spawn_timer().is_some() {
                texts_spawned += 1;
            }
            next_spawn_ms += interval_ms.max(1);
        }

        for step in script.due(frame) {
            apply(&mut frames, &step.action, now_ms, config.dpr)?;
        }

        if frames.platform_mut().take_frame_request() {
            frames
                .on_frame(now_ms)
                .with_context(|| format!("Frame {frame} failed"))?;
        }
    }

    let output = match (&config.output, frames.surface()) {
        (Some(path), Some(surface)) => {
            surface
                .save_png(path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Final frame written to {}", path.display());
            Some(path.clone())
        }
        _ => None,
    };

    let summary = RunSummary {
        frames_rendered: frames.renderer().frame_count(),
        elapsed_ms,
        texts_spawned,
        particles: frames.simulation().particles().len(),
        notices: frames.platform().notices().to_vec(),
        output,
    };
    frames.detach();
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_times_follow_fps() {
        assert_eq!(frame_time_ms(0, 60.0), 0);
        assert_eq!(frame_time_ms(60, 60.0), 1000);
        assert_eq!(frame_time_ms(3, 30.0), 100);
    }

    #[test]
    fn zero_fps_is_rejected() {
        let config = CliConfig {
            fps: 0.0,
            ..CliConfig::default()
        };
        assert!(run(&config).is_err());
    }
}
