use anyhow::Result;
use shading::{Canvas, ComputeContext, Shader};

use crate::runtime::{BoxedTimeSource, FrameClock, TimeSample};

/// Display side of the frame loop.
///
/// The window implementation lives in [`crate::window`]; tests drive the loop
/// with in-memory stubs.
pub trait PresentationSurface {
    /// Shows the canvas. Errors are fatal to the loop.
    fn display_frame(&mut self, canvas: &Canvas) -> Result<()>;
    /// Drains pending window events and reports whether the user asked to close.
    fn poll_close_requested(&mut self) -> bool;
    /// Replaces the window title.
    fn set_title(&mut self, title: &str);
}

/// Owns the canvas, the compute context and the animation clock.
pub struct FrameDriver<S> {
    compute: ComputeContext,
    shader: S,
    canvas: Canvas,
    time_source: BoxedTimeSource,
    clock: FrameClock,
    frames: u64,
}

impl<S: Shader> FrameDriver<S> {
    pub fn new(
        compute: ComputeContext,
        shader: S,
        canvas: Canvas,
        time_source: BoxedTimeSource,
        clock: FrameClock,
    ) -> Self {
        Self {
            compute,
            shader,
            canvas,
            time_source,
            clock,
            frames: 0,
        }
    }

    /// Samples the clock and re-renders every pixel of the canvas.
    pub fn tick(&mut self) -> TimeSample {
        let sample = self.time_source.sample();
        self.compute.evaluate(&self.shader, sample.seconds, &mut self.canvas);
        sample
    }

    /// Hands the current canvas to the presentation surface.
    pub fn present_frame<P>(&mut self, surface: &mut P) -> Result<()>
    where
        P: PresentationSurface + ?Sized,
    {
        surface.display_frame(&self.canvas)?;
        self.frames += 1;
        Ok(())
    }

    /// Runs tick → present → poll → pace until the surface reports a close
    /// request. Returns the number of frames presented.
    pub fn run<P>(&mut self, surface: &mut P) -> Result<u64>
    where
        P: PresentationSurface + ?Sized,
    {
        let (width, height) = self.canvas.dimensions();
        tracing::info!(
            width,
            height,
            workers = self.compute.threads(),
            frame_interval = ?self.clock.frame_interval(),
            "starting frame loop"
        );

        loop {
            let sample = self.tick();
            self.present_frame(surface)?;

            if surface.poll_close_requested() {
                tracing::info!(frames = self.frames, "close requested; leaving frame loop");
                return Ok(self.frames);
            }

            self.clock.tick();
            let fps = self.clock.fps();
            surface.set_title(&format_fps_title(fps));

            if sample.frame_index % 300 == 0 {
                tracing::debug!(
                    frame = sample.frame_index,
                    time = sample.seconds,
                    fps,
                    "frame stats"
                );
            }
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Frames handed to the presentation surface so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Window title showing the measured frame rate, e.g. `FPS: 59.87`.
pub fn format_fps_title(fps: f32) -> String {
    format!("FPS: {fps:.2}")
}

#[cfg(test)]
mod tests {
    use shading::{ColorCycle, Vec2, Vec3};

    use super::*;
    use crate::runtime::FixedTimeSource;

    /// Records every interaction and asks to close after `close_after` polls.
    #[derive(Default)]
    struct StubSurface {
        close_after: usize,
        polls: usize,
        frames: Vec<Vec<u8>>,
        titles: Vec<String>,
    }

    impl StubSurface {
        fn closing_after(polls: usize) -> Self {
            Self {
                close_after: polls,
                ..Self::default()
            }
        }
    }

    impl PresentationSurface for StubSurface {
        fn display_frame(&mut self, canvas: &Canvas) -> Result<()> {
            self.frames.push(canvas.as_bytes().to_vec());
            Ok(())
        }

        fn poll_close_requested(&mut self) -> bool {
            self.polls += 1;
            self.polls >= self.close_after
        }

        fn set_title(&mut self, title: &str) {
            self.titles.push(title.to_string());
        }
    }

    struct FailingSurface;

    impl PresentationSurface for FailingSurface {
        fn display_frame(&mut self, _canvas: &Canvas) -> Result<()> {
            anyhow::bail!("surface lost")
        }

        fn poll_close_requested(&mut self) -> bool {
            false
        }

        fn set_title(&mut self, _title: &str) {}
    }

    /// Paints the frame time into every channel so ticks are observable.
    struct TimeProbe;

    impl Shader for TimeProbe {
        fn shade(&self, _: Vec2, _: Vec2, time: f32) -> Vec3 {
            Vec3::splat(time)
        }
    }

    fn driver<S: Shader>(shader: S, time: f32) -> FrameDriver<S> {
        FrameDriver::new(
            ComputeContext::new(Some(2)).unwrap(),
            shader,
            Canvas::new(8, 6).unwrap(),
            Box::new(FixedTimeSource::new(time)),
            FrameClock::new(None),
        )
    }

    #[test]
    fn close_on_first_poll_runs_exactly_one_frame() {
        let mut driver = driver(ColorCycle, 0.0);
        let mut surface = StubSurface::closing_after(1);

        let frames = driver.run(&mut surface).unwrap();

        assert_eq!(frames, 1);
        assert_eq!(surface.polls, 1);
        assert_eq!(surface.frames.len(), 1);
        assert_eq!(driver.tick().frame_index, 1);
        assert!(surface.titles.is_empty());
    }

    #[test]
    fn loop_presents_once_per_iteration_and_updates_title() {
        let mut driver = driver(ColorCycle, 0.25);
        let mut surface = StubSurface::closing_after(3);

        let frames = driver.run(&mut surface).unwrap();

        assert_eq!(frames, 3);
        assert_eq!(surface.frames.len(), 3);
        assert_eq!(surface.titles.len(), 2);
        assert!(surface.titles.iter().all(|title| title.starts_with("FPS: ")));
        assert_eq!(driver.tick().frame_index, 3);
    }

    #[test]
    fn presented_frame_is_the_evaluated_canvas() {
        let mut driver = driver(TimeProbe, 1.0);
        let mut surface = StubSurface::closing_after(1);
        driver.run(&mut surface).unwrap();

        assert!(surface.frames[0].iter().all(|&byte| byte == 255));
        assert_eq!(surface.frames[0], driver.canvas().as_bytes());
    }

    #[test]
    fn tick_without_present_does_not_count_frames() {
        let mut driver = driver(TimeProbe, 0.0);
        let sample = driver.tick();
        assert_eq!(sample.seconds, 0.0);
        assert_eq!(driver.frames(), 0);
        assert!(driver.canvas().as_bytes().iter().all(|&byte| byte == 0));
    }

    #[test]
    fn surface_errors_abort_the_loop() {
        let mut driver = driver(ColorCycle, 0.0);
        let err = driver.run(&mut FailingSurface).unwrap_err();
        assert!(err.to_string().contains("surface lost"));
        assert_eq!(driver.frames(), 0);
    }

    #[test]
    fn fps_title_uses_two_decimals() {
        assert_eq!(format_fps_title(59.866), "FPS: 59.87");
        assert_eq!(format_fps_title(0.0), "FPS: 0.00");
    }
}
