//! Frame loop and presentation for the shader demos.
//!
//! ```text
//!   demo binary
//!        │ RendererConfig + Shader
//!        ▼
//!   Renderer::run ──▶ ComputeContext (rayon pool)
//!        │
//!        ├─ Animate ─▶ FrameDriver::run ──▶ tick ─▶ WindowSurface (winit + wgpu)
//!        │                  ▲                          │
//!        │                  └── FrameClock (60 fps) ◀──┘ poll close / set title
//!        │
//!        └─ Export ──▶ export_still ──▶ PNG
//! ```
//!
//! `FrameDriver` is generic over [`PresentationSurface`], so the loop can be
//! exercised without a display.

pub mod driver;
pub mod export;
pub mod runtime;
pub mod types;
pub mod window;

mod compile;
mod gpu;

use anyhow::{Context, Result};
use shading::{Canvas, ComputeContext, Shader};

pub use driver::{format_fps_title, FrameDriver, PresentationSurface};
pub use export::export_still;
pub use runtime::{
    time_source_for_policy, BoxedTimeSource, FixedTimeSource, FpsCounter, FrameClock,
    SystemTimeSource, TimeSample, TimeSource,
};
pub use types::{
    parse_surface_size, RenderPolicy, RendererConfig, DEFAULT_SURFACE_SIZE, DEFAULT_TARGET_FPS,
};
pub use window::WindowSurface;

/// High-level entry point that owns the chosen configuration.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Evaluates `shader` according to the configured policy.
    ///
    /// Animation returns once the window is closed; export returns after the
    /// PNG has been written.
    pub fn run<S: Shader>(&self, shader: S) -> Result<()> {
        let compute = ComputeContext::new(self.config.threads)
            .context("failed to start pixel worker pool")?;
        match &self.config.policy {
            RenderPolicy::Animate { .. } => self.run_window(compute, shader),
            RenderPolicy::Export { time, path } => {
                export_still(compute, shader, self.config.surface_size, *time, path)
            }
        }
    }

    fn run_window<S: Shader>(&self, compute: ComputeContext, shader: S) -> Result<()> {
        let (width, height) = self.config.surface_size;
        let mut surface = WindowSurface::new(&self.config.title, width, height)?;
        let canvas = Canvas::new(width, height).context("failed to allocate canvas")?;

        let target_fps = match self.config.policy {
            RenderPolicy::Animate { target_fps } => target_fps,
            RenderPolicy::Export { .. } => None,
        };
        // The clock starts here so the first frame sees t ≈ 0.
        let time_source = time_source_for_policy(&self.config.policy);
        let mut driver = FrameDriver::new(
            compute,
            shader,
            canvas,
            time_source,
            FrameClock::new(target_fps),
        );

        let frames = driver.run(&mut surface)?;
        tracing::info!(frames, "renderer stopped");
        Ok(())
    }
}
