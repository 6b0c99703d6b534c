//! # Nebula CLI
//!
//! Headless host for the Nebula particle canvas.
//!
//! Runs the same frame loop the browser uses, but on a virtual clock and a
//! tiny-skia raster surface. Useful for previews, reproducible captures and
//! replaying touch scripts.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p nebula-cli -- --frames 600 --seed 7 --output nebula.png
//! cargo run -p nebula-cli -- --script touches.json --export-dir shots
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `CliConfig` - Resolved run configuration
//! - `VirtualPlatform` - Frame and interval scheduling on a virtual clock
//! - `TouchScript` - Frame-indexed touch, reset and resize steps
//! - `run` - Drives the frame loop and writes PNGs

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod platform;
mod runner;
mod script;

pub use platform::VirtualPlatform;
pub use runner::{run, RunSummary};
pub use script::{ScriptAction, ScriptStep, TouchScript};

use std::path::PathBuf;

use clap::Parser;

/// Command-line arguments for nebula.
#[derive(Debug, Clone, Parser)]
#[command(name = "nebula")]
#[command(about = "Render the Nebula particle canvas headlessly")]
#[command(version)]
pub struct CliArgs {
    /// Logical canvas width
    #[arg(long, default_value = "375")]
    pub width: f32,

    /// Logical canvas height
    #[arg(long, default_value = "667")]
    pub height: f32,

    /// Device pixel ratio
    #[arg(long, default_value = "2")]
    pub dpr: f32,

    /// Number of frames to run
    #[arg(long, default_value = "600")]
    pub frames: u32,

    /// Virtual frames per second
    #[arg(long, default_value = "60")]
    pub fps: f32,

    /// Random seed for a reproducible run
    #[arg(long, env = "NEBULA_SEED")]
    pub seed: Option<u64>,

    /// JSON touch script to replay
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Write the final frame to this PNG
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Directory for long-press snapshots
    #[arg(long, env = "NEBULA_EXPORT_DIR", default_value = "snapshots")]
    pub export_dir: PathBuf,

    /// Simulation config JSON
    #[arg(long, env = "NEBULA_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Resolved configuration for one headless run.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Logical canvas width.
    pub width: f32,
    /// Logical canvas height.
    pub height: f32,
    /// Device pixel ratio.
    pub dpr: f32,
    /// Frames to run.
    pub frames: u32,
    /// Virtual frames per second.
    pub fps: f32,
    /// Fixed seed, or entropy when absent.
    pub seed: Option<u64>,
    /// Touch script path.
    pub script: Option<PathBuf>,
    /// Final frame PNG path.
    pub output: Option<PathBuf>,
    /// Long-press snapshot directory.
    pub export_dir: PathBuf,
    /// Simulation config path.
    pub config_path: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            width: 375.0,
            height: 667.0,
            dpr: 2.0,
            frames: 600,
            fps: 60.0,
            seed: None,
            script: None,
            output: None,
            export_dir: PathBuf::from("snapshots"),
            config_path: None,
        }
    }
}

impl From<CliArgs> for CliConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            width: args.width,
            height: args.height,
            dpr: args.dpr,
            frames: args.frames,
            fps: args.fps,
            seed: args.seed,
            script: args.script,
            output: args.output,
            export_dir: args.export_dir,
            config_path: args.config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_cli_defaults() {
        let args = CliArgs::parse_from(["nebula"]);
        let config = CliConfig::from(args);
        let defaults = CliConfig::default();
        assert_eq!(config.width, defaults.width);
        assert_eq!(config.height, defaults.height);
        assert_eq!(config.frames, defaults.frames);
        assert_eq!(config.fps, defaults.fps);
    }

    #[test]
    fn parses_all_flags() {
        let args = CliArgs::parse_from([
            "nebula",
            "--width",
            "200",
            "--height",
            "100",
            "--dpr",
            "1.5",
            "--frames",
            "30",
            "--seed",
            "42",
            "--output",
            "out.png",
            "--export-dir",
            "shots",
        ]);
        let config = CliConfig::from(args);
        assert_eq!(config.width, 200.0);
        assert_eq!(config.dpr, 1.5);
        assert_eq!(config.frames, 30);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.output, Some(PathBuf::from("out.png")));
        assert_eq!(config.export_dir, PathBuf::from("shots"));
    }
}
