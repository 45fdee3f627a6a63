use glam::{Vec2, Vec3};

use crate::shader::Shader;

/// Per-channel phase offsets (radians) that stagger R, G and B.
pub const PHASE_OFFSETS: Vec3 = Vec3::new(0.0, 2.0, 4.0);

/// Hue-cycling gradient: `0.5 + 0.5 * cos(t + uv.xyx + (0, 2, 4))`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorCycle;

impl Shader for ColorCycle {
    fn shade(&self, frag_coord: Vec2, resolution: Vec2, time: f32) -> Vec3 {
        let uv = frag_coord / resolution;
        let phase = Vec3::splat(time) + Vec3::new(uv.x, uv.y, uv.x) + PHASE_OFFSETS;
        Vec3::splat(0.5) + 0.5 * Vec3::from_array(phase.to_array().map(f32::cos))
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::TAU;

    use super::*;
    use crate::canvas::Canvas;
    use crate::compute::ComputeContext;
    use crate::shader::to_rgb8;

    fn closed_form(uv: Vec2, time: f32) -> Vec3 {
        Vec3::new(
            0.5 + 0.5 * (time + uv.x).cos(),
            0.5 + 0.5 * (time + uv.y + 2.0).cos(),
            0.5 + 0.5 * (time + uv.x + 4.0).cos(),
        )
    }

    #[test]
    fn channels_stay_in_unit_range() {
        let resolution = Vec2::new(64.0, 48.0);
        for time in [0.0, 0.3, 1.0, 3.3, 17.0, 1_000.5, -42.0] {
            for y in (0..48).step_by(5) {
                for x in (0..64).step_by(7) {
                    let color = ColorCycle.shade(Vec2::new(x as f32, y as f32), resolution, time);
                    for channel in color.to_array() {
                        assert!((0.0..=1.0).contains(&channel), "{channel} at t={time}");
                    }
                }
            }
        }
    }

    #[test]
    fn periodic_over_two_pi() {
        let resolution = Vec2::new(32.0, 32.0);
        for time in [0.0, 0.7, 2.5, 5.0] {
            for coord in [Vec2::ZERO, Vec2::new(5.0, 9.0), Vec2::new(31.0, 31.0)] {
                let base = ColorCycle.shade(coord, resolution, time);
                let shifted = ColorCycle.shade(coord, resolution, time + TAU);
                assert!((base - shifted).abs().max_element() < 1e-4);
            }
        }
    }

    #[test]
    fn origin_follows_phase_offsets() {
        let color = ColorCycle.shade(Vec2::ZERO, Vec2::new(4.0, 4.0), 0.0);
        assert!((color.x - (0.5 + 0.5 * 0.0f32.cos())).abs() < 1e-6);
        assert!((color.y - (0.5 + 0.5 * 2.0f32.cos())).abs() < 1e-6);
        assert!((color.z - (0.5 + 0.5 * 4.0f32.cos())).abs() < 1e-6);
        assert!((color.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn four_by_four_frame_matches_closed_form() {
        let compute = ComputeContext::new(Some(2)).unwrap();
        let mut canvas = Canvas::new(4, 4).unwrap();
        compute.evaluate(&ColorCycle, 0.0, &mut canvas);

        // (shader x, shader y) pairs; canvas row is 3 - y.
        for (x, y) in [(0u32, 0u32), (3, 0), (1, 2), (2, 3), (3, 3)] {
            let uv = Vec2::new(x as f32 / 4.0, y as f32 / 4.0);
            assert_eq!(
                canvas.pixel(x, 3 - y),
                to_rgb8(closed_form(uv, 0.0)),
                "shader pixel ({x}, {y})"
            );
        }

        // Pixels sharing uv.x but not uv.y agree on red and blue only.
        let bottom_left = canvas.pixel(0, 3);
        let top_left = canvas.pixel(0, 0);
        assert_eq!(bottom_left[0], top_left[0]);
        assert_eq!(bottom_left[2], top_left[2]);
        assert_ne!(bottom_left[1], top_left[1]);
    }
}
