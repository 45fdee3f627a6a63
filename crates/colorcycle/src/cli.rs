use std::path::PathBuf;

use clap::Parser;
use renderer::{parse_surface_size, RenderPolicy, DEFAULT_TARGET_FPS};

#[derive(Parser, Debug)]
#[command(
    name = "colorcycle",
    version,
    about = "Animated color gradient shader demo"
)]
pub struct RunArgs {
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
