use glam::Vec2;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

use crate::canvas::Canvas;
use crate::shader::{to_rgb8, Shader};

#[derive(Debug, thiserror::Error)]
pub enum ComputeError {
    #[error("failed to build shading thread pool: {0}")]
    ThreadPool(#[from] ThreadPoolBuildError),
    #[error("worker count must be at least 1")]
    NoWorkers,
}

/// Caller-owned parallel evaluation backend.
///
/// Owns a dedicated rayon pool instead of relying on the global one, so the
/// worker count is explicit and the threads go away when the context drops.
pub struct ComputeContext {
    pool: ThreadPool,
}

impl ComputeContext {
    /// Builds a pool with `threads` workers, or one per core when `None`.
    pub fn new(threads: Option<usize>) -> Result<Self, ComputeError> {
        if threads == Some(0) {
            return Err(ComputeError::NoWorkers);
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads.unwrap_or(0))
            .thread_name(|index| format!("shade-worker-{index}"))
            .build()?;
        tracing::debug!(workers = pool.current_num_threads(), "compute context ready");
        Ok(Self { pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Evaluates `shader` for every pixel of `canvas` at `time`.
    ///
    /// Canvas row `r` receives shader row `height - 1 - r`. Returns once every
    /// row has been written.
    pub fn evaluate<S>(&self, shader: &S, time: f32, canvas: &mut Canvas)
    where
        S: Shader + ?Sized,
    {
        let (width, height) = canvas.dimensions();
        let resolution = Vec2::new(width as f32, height as f32);
        let last_row = height as usize - 1;
        let pixels = canvas.pixels_mut();

        self.pool.install(|| {
            pixels
                .par_chunks_mut(width as usize)
                .enumerate()
                .for_each(|(row, texels)| {
                    let y = (last_row - row) as f32;
                    for (x, texel) in texels.iter_mut().enumerate() {
                        let frag_coord = Vec2::new(x as f32, y);
                        *texel = to_rgb8(shader.shade(frag_coord, resolution, time));
                    }
                });
        });
    }
}

impl Drop for ComputeContext {
    fn drop(&mut self) {
        tracing::debug!(
            workers = self.pool.current_num_threads(),
            "releasing compute context"
        );
    }
}

impl std::fmt::Debug for ComputeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComputeContext")
            .field("threads", &self.threads())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::shaders::ColorCycle;

    /// Encodes the shader row into the red channel so the flip is observable.
    struct RowProbe;

    impl Shader for RowProbe {
        fn shade(&self, frag_coord: Vec2, _resolution: Vec2, _time: f32) -> Vec3 {
            Vec3::new((frag_coord.y + 0.5) / 255.0, 0.0, 0.0)
        }
    }

    struct ColumnProbe;

    impl Shader for ColumnProbe {
        fn shade(&self, frag_coord: Vec2, _resolution: Vec2, _time: f32) -> Vec3 {
            Vec3::new(0.0, (frag_coord.x + 0.5) / 255.0, 0.0)
        }
    }

    #[test]
    fn rejects_zero_workers() {
        assert!(matches!(
            ComputeContext::new(Some(0)),
            Err(ComputeError::NoWorkers)
        ));
    }

    #[test]
    fn honours_requested_worker_count() {
        let compute = ComputeContext::new(Some(3)).unwrap();
        assert_eq!(compute.threads(), 3);
    }

    #[test]
    fn rows_are_flipped_vertically() {
        let compute = ComputeContext::new(Some(2)).unwrap();
        let mut canvas = Canvas::new(5, 7).unwrap();
        compute.evaluate(&RowProbe, 0.0, &mut canvas);

        for row in 0..7u32 {
            for x in 0..5u32 {
                assert_eq!(canvas.pixel(x, row)[0] as u32, 6 - row, "row {row}");
            }
        }
        assert_eq!(canvas.pixel(0, 6)[0], 0);
        assert_eq!(canvas.pixel(0, 0)[0], 6);
    }

    #[test]
    fn columns_are_not_mirrored() {
        let compute = ComputeContext::new(Some(2)).unwrap();
        let mut canvas = Canvas::new(9, 3).unwrap();
        compute.evaluate(&ColumnProbe, 0.0, &mut canvas);

        for x in 0..9u32 {
            assert_eq!(canvas.pixel(x, 1)[1] as u32, x);
        }
    }

    #[test]
    fn evaluation_is_deterministic_across_runs_and_pools() {
        let single = ComputeContext::new(Some(1)).unwrap();
        let many = ComputeContext::new(Some(4)).unwrap();
        let mut first = Canvas::new(64, 36).unwrap();
        let mut second = Canvas::new(64, 36).unwrap();
        let mut third = Canvas::new(64, 36).unwrap();

        single.evaluate(&ColorCycle, 1.25, &mut first);
        many.evaluate(&ColorCycle, 1.25, &mut second);
        many.evaluate(&ColorCycle, 1.25, &mut third);

        assert_eq!(first.as_bytes(), second.as_bytes());
        assert_eq!(second.as_bytes(), third.as_bytes());
    }

    #[test]
    fn every_pixel_is_rewritten() {
        struct Constant(Vec3);
        impl Shader for Constant {
            fn shade(&self, _: Vec2, _: Vec2, _: f32) -> Vec3 {
                self.0
            }
        }

        let compute = ComputeContext::new(Some(2)).unwrap();
        let mut canvas = Canvas::new(8, 8).unwrap();
        compute.evaluate(&Constant(Vec3::ONE), 0.0, &mut canvas);
        assert!(canvas.as_bytes().iter().all(|&byte| byte == 255));

        compute.evaluate(&Constant(Vec3::ZERO), 0.0, &mut canvas);
        assert!(canvas.as_bytes().iter().all(|&byte| byte == 0));
    }
}
