use std::f32::consts::PI;
use std::sync::Arc;

use glam::{Vec2, Vec3};

use crate::shader::Shader;
use crate::texture::Texture;

/// Smallest radius fed into the polar mapping.
///
/// Applied before both `0.25 / rho` and the glow reciprocal so the exact
/// center pixel stays finite.
pub const MIN_RHO: f32 = 1e-3;

/// Emissive tint added near the tunnel core, scaled by `0.1 / rho`.
pub const GLOW_TINT: Vec3 = Vec3::new(0.3, 0.1, 0.0);

/// Texture-mapped tunnel seen through a polar warp with a wandering camera.
#[derive(Debug, Clone)]
pub struct Tunnel {
    texture: Arc<Texture>,
}

impl Tunnel {
    pub fn new(texture: impl Into<Arc<Texture>>) -> Self {
        Self {
            texture: texture.into(),
        }
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    /// Camera drift applied to the centered coordinates.
    pub fn drift(time: f32) -> Vec2 {
        Vec2::new(0.2 * (time / 2.0).sin(), 0.3 * (time / 3.0).cos())
    }

    /// Colors a point already centered, aspect-corrected and drifted.
    pub fn polar_color(&self, uv: Vec2, time: f32) -> Vec3 {
        let phi = uv.y.atan2(uv.x);
        let rho = uv.length().max(MIN_RHO);

        let mut st = Vec2::new(phi / PI, 0.25 / rho);
        st.x += time / 14.0;
        st.y += time / 2.0;

        let mut color = self.texture.sample_wrapped(st);
        color *= rho + 0.2;
        color += (0.1 / rho) * GLOW_TINT;
        color.clamp(Vec3::ZERO, Vec3::ONE)
    }
}

impl Shader for Tunnel {
    fn shade(&self, frag_coord: Vec2, resolution: Vec2, time: f32) -> Vec3 {
        let uv = (frag_coord - 0.5 * resolution) / resolution.y + Self::drift(time);
        self.polar_color(uv, time)
    }
}
