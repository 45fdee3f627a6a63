use std::path::Path;

use anyhow::{Context, Result};
use shading::{Canvas, ComputeContext, Shader};

use crate::driver::FrameDriver;
use crate::runtime::{FixedTimeSource, FrameClock};

/// Renders one frame of `shader` at `time` and writes it to `path` as PNG.
///
/// No window or GPU is involved; the frame is evaluated on `compute`.
pub fn export_still<S: Shader>(
    compute: ComputeContext,
    shader: S,
    size: (u32, u32),
    time: f32,
    path: &Path,
) -> Result<()> {
    let (width, height) = size;
    let canvas = Canvas::new(width, height).context("failed to allocate export canvas")?;
    let mut driver = FrameDriver::new(
        compute,
        shader,
        canvas,
        Box::new(FixedTimeSource::new(time)),
        FrameClock::new(None),
    );

    let sample = driver.tick();
    driver
        .canvas()
        .save_png(path)
        .with_context(|| format!("failed to export still to {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        width,
        height,
        time = sample.seconds,
        "exported still frame"
    );
    Ok(())
}
