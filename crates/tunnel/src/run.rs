use anyhow::{Context, Result};
use renderer::{Renderer, RendererConfig};
use shading::{Texture, Tunnel};
use tracing_subscriber::EnvFilter;

use crate::cli::RunArgs;

pub fn run(args: RunArgs) -> Result<()> {
    let texture = Texture::load(&args.texture)
        .with_context(|| format!("failed to load tunnel texture {}", args.texture.display()))?;
    let shader = Tunnel::new(texture);
    tracing::info!(
        path = %args.texture.display(),
        size = shader.texture().size(),
        "loaded tunnel texture"
    );

    let config = RendererConfig {
        surface_size: args.size,
        title: "Tunnel".to_string(),
        threads: args.threads,
        policy: args.policy(),
    };
    tracing::info!(
        width = config.surface_size.0,
        height = config.surface_size.1,
        policy = ?config.policy,
        "starting tunnel"
    );

    Renderer::new(config).run(shader)
}

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
