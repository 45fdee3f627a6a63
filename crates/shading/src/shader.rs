use glam::{Vec2, Vec3};

/// Pure per-pixel color function.
///
/// `frag_coord` uses a bottom-left origin with integer pixel positions, so
/// `(0, 0)` is the bottom-left pixel and `resolution - 1` the top-right one.
/// Implementations must not carry mutable state: the compute context calls
/// `shade` from many threads at once and in no particular order.
pub trait Shader: Sync {
    /// Returns the linear RGB color for a single pixel, each channel in `[0, 1]`.
    fn shade(&self, frag_coord: Vec2, resolution: Vec2, time: f32) -> Vec3;
}

/// Converts a shader color into an RGB8 texel.
///
/// Channels are clamped to `[0, 1]` and scaled by 255 with truncation, so
/// only an exact `1.0` maps to 255. NaN channels become 0.
pub fn to_rgb8(color: Vec3) -> [u8; 3] {
    let scaled = color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0;
    [scaled.x as u8, scaled.y as u8, scaled.z as u8]
}
