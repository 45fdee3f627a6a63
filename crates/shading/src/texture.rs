use std::path::{Path, PathBuf};

use glam::{Vec2, Vec3};

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to open texture at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("texture must be square, got {width}x{height}")]
    NotSquare { width: u32, height: u32 },
    #[error("texture has no pixels")]
    Empty,
    #[error("expected {expected} texels for a {size}x{size} texture, got {actual}")]
    TexelCount {
        size: u32,
        expected: usize,
        actual: usize,
    },
}

/// Immutable square RGB texture with channels normalized to `[0, 1]`.
///
/// Texels are stored row-major with row 0 at the top of the source image.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    size: u32,
    texels: Vec<Vec3>,
}

impl Texture {
    /// Decodes an image file into a normalized texture.
    pub fn load(path: &Path) -> Result<Self, TextureError> {
        let image = image::open(path).map_err(|source| TextureError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::Empty);
        }
        if width != height {
            return Err(TextureError::NotSquare { width, height });
        }

        let texels = rgb
            .pixels()
            .map(|pixel| {
                let [r, g, b] = pixel.0;
                Vec3::new(r as f32, g as f32, b as f32) / 255.0
            })
            .collect();
        tracing::debug!(path = %path.display(), size = width, "loaded texture");
        Ok(Self {
            size: width,
            texels,
        })
    }

    /// Wraps in-memory texels (row-major, top row first).
    pub fn from_texels(size: u32, texels: Vec<Vec3>) -> Result<Self, TextureError> {
        if size == 0 {
            return Err(TextureError::Empty);
        }
        let expected = size as usize * size as usize;
        if texels.len() != expected {
            return Err(TextureError::TexelCount {
                size,
                expected,
                actual: texels.len(),
            });
        }
        Ok(Self { size, texels })
    }

    /// Side length in texels.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Texel at column `x`, row `y`. Panics when out of bounds.
    pub fn texel(&self, x: u32, y: u32) -> Vec3 {
        assert!(x < self.size && y < self.size, "texel ({x}, {y}) out of bounds");
        self.texels[y as usize * self.size as usize + x as usize]
    }

    /// Nearest-texel lookup at `floor(st * size)` with both indices wrapped
    /// into `[0, size)`.
    ///
    /// `st.x` selects the column and `st.y` the row. Non-finite coordinates
    /// resolve to index 0.
    pub fn sample_wrapped(&self, st: Vec2) -> Vec3 {
        let x = wrap_index(st.x, self.size);
        let y = wrap_index(st.y, self.size);
        self.texels[y * self.size as usize + x]
    }
}

fn wrap_index(coord: f32, size: u32) -> usize {
    let scaled = (coord * size as f32).floor();
    if !scaled.is_finite() {
        return 0;
    }
    (scaled as i64).rem_euclid(size as i64) as usize
}
