use std::path::Path;

use image::RgbImage;

/// Largest accepted side length, matching the default wgpu 2D texture limit.
pub const MAX_DIMENSION: u32 = 8192;

/// Errors raised while creating or exporting a [`Canvas`].
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    #[error("canvas dimensions must be non-zero, got {width}x{height}")]
    EmptyDimensions { width: u32, height: u32 },
    #[error("canvas dimensions {width}x{height} exceed the limit of {}", MAX_DIMENSION)]
    TooLarge { width: u32, height: u32 },
    #[error("failed to write canvas to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

/// Dense RGB8 frame buffer with a top-left origin.
///
/// Dimensions are fixed at construction; every frame overwrites all pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
}

impl Canvas {
    /// Allocates a black canvas.
    pub fn new(width: u32, height: u32) -> Result<Self, CanvasError> {
        if width == 0 || height == 0 {
            return Err(CanvasError::EmptyDimensions { width, height });
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(CanvasError::TooLarge { width, height });
        }
        let len = width as usize * height as usize;
        Ok(Self {
            width,
            height,
            pixels: vec![[0; 3]; len],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the pixel at column `x`, row `y` (row 0 is the top row).
    ///
    /// Panics when the coordinate lies outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} canvas",
            self.width,
            self.height
        );
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Row-major pixel storage, top row first.
    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [[u8; 3]] {
        &mut self.pixels
    }

    /// Tightly packed RGB bytes, top row first.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Expands the canvas into an RGBA8 buffer with opaque alpha.
    ///
    /// `out` is cleared and reused so callers can keep one staging buffer
    /// alive across frames.
    pub fn write_rgba(&self, out: &mut Vec<u8>) {
        out.clear();
        out.reserve(self.pixels.len() * 4);
        for [r, g, b] in &self.pixels {
            out.extend_from_slice(&[*r, *g, *b, u8::MAX]);
        }
    }

    /// Copies the canvas into an owned `image` buffer.
    pub fn to_image(&self) -> RgbImage {
        RgbImage::from_raw(self.width, self.height, self.as_bytes().to_vec())
            .unwrap_or_else(|| RgbImage::new(self.width, self.height))
    }

    /// Encodes the canvas as a PNG file.
    pub fn save_png(&self, path: &Path) -> Result<(), CanvasError> {
        self.to_image()
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|source| CanvasError::Write {
                path: path.display().to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_dimensions() {
        assert!(matches!(
            Canvas::new(0, 10),
            Err(CanvasError::EmptyDimensions {
                width: 0,
                height: 10
            })
        ));
        assert!(Canvas::new(10, 0).is_err());
    }

    #[test]
    fn rejects_oversized_dimensions_before_allocating() {
        assert!(matches!(
            Canvas::new(65_535, 65_535),
            Err(CanvasError::TooLarge {
                width: 65_535,
                height: 65_535
            })
        ));
        assert!(Canvas::new(MAX_DIMENSION + 1, 1).is_err());
        assert_eq!(
            Canvas::new(MAX_DIMENSION, 1).unwrap().dimensions(),
            (MAX_DIMENSION, 1)
        );
    }

    #[test]
    fn allocates_black_pixels() {
        let canvas = Canvas::new(3, 2).unwrap();
        assert_eq!(canvas.dimensions(), (3, 2));
        assert_eq!(canvas.pixels().len(), 6);
        assert!(canvas.as_bytes().iter().all(|&byte| byte == 0));
        assert_eq!(canvas.as_bytes().len(), 18);
    }

    #[test]
    fn rgba_expansion_adds_opaque_alpha() {
        let mut canvas = Canvas::new(2, 1).unwrap();
        canvas.pixels_mut()[0] = [1, 2, 3];
        canvas.pixels_mut()[1] = [4, 5, 6];

        let mut staging = vec![9; 32];
        canvas.write_rgba(&mut staging);
        assert_eq!(staging, vec![1, 2, 3, 255, 4, 5, 6, 255]);
    }

    #[test]
    fn save_png_round_trips_through_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let mut canvas = Canvas::new(2, 2).unwrap();
        canvas.pixels_mut()[3] = [10, 20, 30];
        canvas.save_png(&path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (2, 2));
        assert_eq!(decoded.get_pixel(1, 1).0, [10, 20, 30]);
        assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 0]);
    }
}
