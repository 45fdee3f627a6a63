use anyhow::Result;
use renderer::{Renderer, RendererConfig};
use shading::ColorCycle;
use tracing_subscriber::EnvFilter;

use crate::cli::RunArgs;

pub fn run(args: RunArgs) -> Result<()> {
    let config = RendererConfig {
        surface_size: args.size,
        title: "Color Cycle".to_string(),
        threads: args.threads,
        policy: args.policy(),
    };
    tracing::info!(
        width = config.surface_size.0,
        height = config.surface_size.1,
        policy = ?config.policy,
        "starting color cycle"
    );

    Renderer::new(config).run(ColorCycle)
}

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
