use std::path::PathBuf;

use clap::Parser;
use renderer::{parse_surface_size, RenderPolicy, DEFAULT_TARGET_FPS};

/// Texture used when `--texture` is not given, relative to the working directory.
pub const DEFAULT_TEXTURE: &str = "img/lava.png";

#[derive(Parser, Debug)]
#[command(name = "tunnel", version, about = "Textured tunnel shader demo")]
pub struct RunArgs {
    /// Square texture mapped onto the tunnel walls.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_TEXTURE)]
    pub texture: PathBuf,

    /// Canvas and window size (e.g. `1280x720`).
    #[arg(
        long,
        value_name = "WIDTHxHEIGHT",
        default_value = "1280x720",
        value_parser = parse_surface_size
    )]
    pub size: (u32, u32),

    /// Frame rate cap (0=uncapped).
    #[arg(long, value_name = "FPS", default_value_t = DEFAULT_TARGET_FPS)]
    pub fps: f32,

    /// Worker threads for pixel evaluation (defaults to one per core).
    #[arg(long, value_name = "N", env = "SHADERDEMOS_THREADS")]
    pub threads: Option<usize>,

    /// Render a single frame to the given PNG path instead of opening a window.
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Shader time in seconds used by `--export`.
    #[arg(long, value_name = "SECONDS", default_value_t = 0.0, requires = "export")]
    pub time: f32,
}

impl RunArgs {
    pub fn policy(&self) -> RenderPolicy {
        match &self.export {
            Some(path) => RenderPolicy::Export {
                time: self.time,
                path: path.clone(),
            },
            None => RenderPolicy::Animate {
                target_fps: (self.fps > 0.0).then_some(self.fps),
            },
        }
    }
}

pub fn parse() -> RunArgs {
    RunArgs::parse()
}
