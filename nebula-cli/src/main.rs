//! # Nebula CLI
//!
//! Headless renderer for the Nebula particle canvas.

use clap::Parser;
use nebula_cli::{run, CliArgs, CliConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nebula_cli=info,nebula_renderer=info,nebula_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();
    let config = CliConfig::from(args);

    tracing::info!("Starting Nebula {}", nebula_core::VERSION);

    let summary = run(&config)?;

    tracing::info!(
        "Rendered {} frames over {}ms: {} particles, {} texts spawned",
        summary.frames_rendered,
        summary.elapsed_ms,
        summary.particles,
        summary.texts_spawned
    );
    for notice in &summary.notices {
        tracing::debug!("Notice: {notice}");
    }
    if let Some(path) = &summary.output {
        println!("{}", path.display());
    }
    Ok(())
}
