use std::path::PathBuf;

use shading::canvas::MAX_DIMENSION;

/// Frame cap used when the caller does not override it.
pub const DEFAULT_TARGET_FPS: f32 = 60.0;

/// Canvas and window size used by both demos.
pub const DEFAULT_SURFACE_SIZE: (u32, u32) = (1280, 720);

/// High-level behaviour requested by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderPolicy {
    /// Open a window and animate until it is closed.
    Animate {
        /// Upper bound on frames per second; `None` renders as fast as possible.
        target_fps: Option<f32>,
    },
    /// Render one frame at a fixed timestamp and write it to disk as PNG.
    Export {
        /// Timestamp (seconds) handed to the shader.
        time: f32,
        /// Destination PNG path.
        path: PathBuf,
    },
}

impl Default for RenderPolicy {
    fn default() -> Self {
        Self::Animate {
            target_fps: Some(DEFAULT_TARGET_FPS),
        }
    }
}

/// Immutable configuration passed to the renderer at start-up.
///
/// Mirrors the CLI flags of the demo binaries; the defaults reproduce a
/// zero-argument run.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// Canvas and window size in physical pixels.
    pub surface_size: (u32, u32),
    /// Initial window title; replaced by the FPS readout after the first frame.
    pub title: String,
    /// Worker threads for pixel evaluation; `None` uses one per core.
    pub threads: Option<usize>,
    /// Animate in a window or export a still.
    pub policy: RenderPolicy,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            surface_size: DEFAULT_SURFACE_SIZE,
            title: "shaderdemos".to_string(),
            threads: None,
            policy: RenderPolicy::default(),
        }
    }
}

/// Parses a `WIDTHxHEIGHT` size such as `1280x720`.
///
/// Returns a message suitable for a CLI value parser on failure.
pub fn parse_surface_size(value: &str) -> Result<(u32, u32), String> {
    let trimmed = value.trim();
    let (width, height) = trimmed
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("invalid size '{trimmed}'; expected WIDTHxHEIGHT"))?;
    let parse = |part: &str| -> Result<u32, String> {
        part.trim()
            .parse::<u32>()
            .map_err(|_| format!("invalid size '{trimmed}'; expected WIDTHxHEIGHT"))
    };
    let size = (parse(width)?, parse(height)?);
    if size.0 == 0 || size.1 == 0 {
        return Err(format!("size '{trimmed}' must be non-zero in both dimensions"));
    }
    if size.0 > MAX_DIMENSION || size.1 > MAX_DIMENSION {
        return Err(format!("size '{trimmed}' exceeds the {MAX_DIMENSION}x{MAX_DIMENSION} limit"));
    }
    Ok(size)
}
