use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::types::RenderPolicy;

/// Number of recent frame times averaged by [`FpsCounter`].
const FPS_WINDOW: usize = 10;

/// Snapshot of the time state handed to the shader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSample {
    /// Elapsed wall-clock or simulated time in seconds.
    pub seconds: f32,
    /// Monotonic frame counter for the running session.
    pub frame_index: u64,
}

impl TimeSample {
    pub fn new(seconds: f32, frame_index: u64) -> Self {
        Self {
            seconds,
            frame_index,
        }
    }
}

/// Abstraction over where time values originate from.
pub trait TimeSource: Send {
    /// Resets the source to its initial state.
    fn reset(&mut self);
    /// Produces a time sample for the next frame.
    fn sample(&mut self) -> TimeSample;
}

/// Time source backed by the system monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: Instant,
    frame: u64,
}

impl SystemTimeSource {
    /// Starts counting from `Instant::now()`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
            frame: 0,
        }
    }
}

impl TimeSource for SystemTimeSource {
    fn reset(&mut self) {
        self.origin = Instant::now();
        self.frame = 0;
    }

    fn sample(&mut self) -> TimeSample {
        let sample = TimeSample::new(self.origin.elapsed().as_secs_f32(), self.frame);
        self.frame = self.frame.saturating_add(1);
        sample
    }
}

/// Time source that always reports the same timestamp.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeSource {
    time: f32,
    frame: u64,
}

impl FixedTimeSource {
    pub fn new(time: f32) -> Self {
        Self { time, frame: 0 }
    }

    pub fn time(&self) -> f32 {
        self.time
    }
}

impl TimeSource for FixedTimeSource {
    fn reset(&mut self) {
        self.frame = 0;
    }

    fn sample(&mut self) -> TimeSample {
        let sample = TimeSample::new(self.time, self.frame);
        self.frame = self.frame.saturating_add(1);
        sample
    }
}

/// Convenient alias for owning time sources behind trait objects.
pub type BoxedTimeSource = Box<dyn TimeSource + Send>;

/// Builds a time source suited to the requested render policy.
pub fn time_source_for_policy(policy: &RenderPolicy) -> BoxedTimeSource {
    match policy {
        RenderPolicy::Animate { .. } => Box::new(SystemTimeSource::new()),
        RenderPolicy::Export { time, .. } => Box::new(FixedTimeSource::new(*time)),
    }
}

/// Rolling average of the most recent frame times.
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    samples: VecDeque<Duration>,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, frame_time: Duration) {
        if self.samples.len() == FPS_WINDOW {
            self.samples.pop_front();
        }
        self.samples.push_back(frame_time);
    }

    /// Average frames per second over the window; `0.0` until a non-zero
    /// frame time has been recorded.
    pub fn fps(&self) -> f32 {
        let total: Duration = self.samples.iter().sum();
        if total.is_zero() {
            return 0.0;
        }
        self.samples.len() as f32 / total.as_secs_f32()
    }
}

/// Cooperative frame limiter.
///
/// Each [`tick`](FrameClock::tick) sleeps until at least one frame interval
/// has passed since the previous tick, then feeds the measured frame time into
/// an [`FpsCounter`]. It bounds the rate from above only; slow frames are never
/// compensated.
#[derive(Debug, Clone)]
pub struct FrameClock {
    frame_interval: Option<Duration>,
    last_tick: Option<Instant>,
    counter: FpsCounter,
}

impl FrameClock {
    /// `None`, zero, negative or non-finite targets disable the cap.
    pub fn new(target_fps: Option<f32>) -> Self {
        let frame_interval = target_fps
            .filter(|fps| fps.is_finite() && *fps > 0.0)
            .map(|fps| Duration::from_secs_f64(1.0 / f64::from(fps)));
        Self {
            frame_interval,
            last_tick: None,
            counter: FpsCounter::new(),
        }
    }

    pub fn frame_interval(&self) -> Option<Duration> {
        self.frame_interval
    }

    /// Time left before the next tick may return.
    pub fn delay_until_next(&self, now: Instant) -> Duration {
        match (self.frame_interval, self.last_tick) {
            (Some(interval), Some(last)) => {
                interval.saturating_sub(now.saturating_duration_since(last))
            }
            _ => Duration::ZERO,
        }
    }

    /// Records a tick at `now` without sleeping.
    pub fn record_tick(&mut self, now: Instant) {
        if let Some(last) = self.last_tick {
            self.counter.record(now.saturating_duration_since(last));
        }
        self.last_tick = Some(now);
    }

    /// Sleeps to honour the frame cap, then records the tick.
    pub fn tick(&mut self) {
        let delay = self.delay_until_next(Instant::now());
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        self.record_tick(Instant::now());
    }

    /// Measured frames per second over the last few ticks.
    pub fn fps(&self) -> f32 {
        self.counter.fps()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_source_repeats_time_and_counts_frames() {
        let mut source = FixedTimeSource::new(2.5);
        assert_eq!(source.sample(), TimeSample::new(2.5, 0));
        assert_eq!(source.sample(), TimeSample::new(2.5, 1));
        source.reset();
        assert_eq!(source.sample().frame_index, 0);
    }

    #[test]
    fn system_source_is_monotonic() {
        let mut source = SystemTimeSource::new();
        let first = source.sample();
        std::thread::sleep(Duration::from_millis(2));
        let second = source.sample();
        assert!(second.seconds >= first.seconds);
        assert!(second.seconds > 0.0);
        assert_eq!(second.frame_index, first.frame_index + 1);
    }

    #[test]
    fn policy_selects_time_source() {
        let mut still = time_source_for_policy(&RenderPolicy::Export {
            time: 4.0,
            path: "out.png".into(),
        });
        assert_eq!(still.sample().seconds, 4.0);

        let mut live = time_source_for_policy(&RenderPolicy::default());
        assert!(live.sample().seconds < 1.0);
    }

    #[test]
    fn fps_counter_averages_recent_frames() {
        let mut counter = FpsCounter::new();
        assert_eq!(counter.fps(), 0.0);

        for _ in 0..4 {
            counter.record(Duration::from_millis(20));
        }
        assert!((counter.fps() - 50.0).abs() < 1e-3);

        // Older samples fall out of the window.
        for _ in 0..FPS_WINDOW {
            counter.record(Duration::from_millis(10));
        }
        assert!((counter.fps() - 100.0).abs() < 1e-3);
    }

    #[test]
    fn clock_delays_until_interval_has_elapsed() {
        let mut clock = FrameClock::new(Some(50.0));
        let start = Instant::now();
        assert_eq!(clock.delay_until_next(start), Duration::ZERO);

        clock.record_tick(start);
        assert_eq!(clock.delay_until_next(start), Duration::from_millis(20));
        assert_eq!(
            clock.delay_until_next(start + Duration::from_millis(5)),
            Duration::from_millis(15)
        );
        assert_eq!(
            clock.delay_until_next(start + Duration::from_millis(35)),
            Duration::ZERO
        );
    }

    #[test]
    fn clock_reports_measured_rate() {
        let mut clock = FrameClock::new(Some(60.0));
        let start = Instant::now();
        for frame in 0..=5u64 {
            clock.record_tick(start + Duration::from_millis(25 * frame));
        }
        assert!((clock.fps() - 40.0).abs() < 1e-3);
    }

    #[test]
    fn non_positive_targets_disable_the_cap() {
        for target in [None, Some(0.0), Some(-5.0), Some(f32::NAN)] {
            let mut clock = FrameClock::new(target);
            let now = Instant::now();
            clock.record_tick(now);
            assert_eq!(clock.frame_interval(), None);
            assert_eq!(clock.delay_until_next(now), Duration::ZERO);
        }
    }

    #[test]
    fn tick_enforces_minimum_spacing() {
        let mut clock = FrameClock::new(Some(100.0));
        let start = Instant::now();
        clock.tick();
        clock.tick();
        clock.tick();
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
