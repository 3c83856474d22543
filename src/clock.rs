//! Time sources and per-tick time sampling.
//!
//! A [`Clock`] only reports seconds since it was created. [`FrameTimer`] turns
//! successive clock samples into a [`FrameTime`] with a non-negative delta.
//!
//! ```
//! use vignette::{Clock, FrameTimer, FirstTick, ManualClock};
//!
//! let clock = ManualClock::new();
//! let mut timer = FrameTimer::new(FirstTick::Zero);
//!
//! clock.set(0.5);
//! let first = timer.sample(clock.elapsed());
//! assert_eq!(first.delta, 0.0);
//!
//! clock.set(0.75);
//! let second = timer.sample(clock.elapsed());
//! assert_eq!(second.delta, 0.25);
//! ```

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Reports seconds elapsed since the clock was created.
pub trait Clock {
    fn elapsed(&self) -> f32;
}

/// Wall clock backed by [`Instant`].
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

/// A clock whose time is set by hand.
///
/// Clones share the same time, so a test can keep one handle while the
/// frame loop owns another.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<f32>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the absolute elapsed time in seconds.
    pub fn set(&self, seconds: f32) {
        self.now.set(seconds);
    }

    /// Move time forward by `seconds`.
    pub fn advance(&self, seconds: f32) {
        self.now.set(self.now.get() + seconds);
    }
}

impl Clock for ManualClock {
    fn elapsed(&self) -> f32 {
        self.now.get()
    }
}

/// How the very first tick computes its delta.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FirstTick {
    /// The first delta is zero, regardless of how long the clock ran before
    /// the first tick.
    #[default]
    Zero,
    /// The first delta is measured against an elapsed time of zero, so a clock
    /// started well before the loop yields one large delta.
    SinceStart,
}

/// Time information for a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTime {
    /// Zero-based index of the tick.
    pub frame: u64,
    /// Seconds since the clock started.
    pub elapsed: f32,
    /// Seconds since the previous tick's sample. Never negative.
    pub delta: f32,
}

impl FrameTime {
    /// Frames per second implied by this tick's delta.
    pub fn fps(&self) -> f32 {
        if self.delta > 0.0 { 1.0 / self.delta } else { 0.0 }
    }
}

/// Tracks the previous elapsed sample and derives deltas from it.
#[derive(Clone, Debug, Default)]
pub struct FrameTimer {
    first_tick: FirstTick,
    previous_elapsed: f32,
    frames: u64,
}

impl FrameTimer {
    pub fn new(first_tick: FirstTick) -> Self {
        Self {
            first_tick,
            previous_elapsed: 0.0,
            frames: 0,
        }
    }

    /// Record a new elapsed sample and return this tick's time.
    pub fn sample(&mut self, elapsed: f32) -> FrameTime {
        let previous = match (self.frames, self.first_tick) {
            (0, FirstTick::Zero) => elapsed,
            _ => self.previous_elapsed,
        };

        // A clock that steps backwards yields a zero delta rather than a negative one.
        let delta = (elapsed - previous).max(0.0);
        self.previous_elapsed = elapsed;

        let time = FrameTime {
            frame: self.frames,
            elapsed,
            delta,
        };
        self.frames += 1;
        time
    }

    /// Elapsed time recorded by the last sample.
    pub fn previous_elapsed(&self) -> f32 {
        self.previous_elapsed
    }

    /// Number of samples taken so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deltas_follow_consecutive_samples() {
        let mut timer = FrameTimer::new(FirstTick::Zero);
        let deltas: Vec<f32> = [0.0, 1.0, 2.0]
            .into_iter()
            .map(|t| timer.sample(t).delta)
            .collect();

        assert_eq!(deltas, vec![0.0, 1.0, 1.0]);
        assert_eq!(timer.previous_elapsed(), 2.0);
        assert_eq!(timer.frames(), 3);
    }

    #[test]
    fn first_tick_policies_differ_for_late_start() {
        let mut zero = FrameTimer::new(FirstTick::Zero);
        let mut since_start = FrameTimer::new(FirstTick::SinceStart);

        assert_eq!(zero.sample(3.0).delta, 0.0);
        assert_eq!(since_start.sample(3.0).delta, 3.0);
    }

    #[test]
    fn backwards_clock_never_produces_negative_delta() {
        let mut timer = FrameTimer::new(FirstTick::Zero);
        timer.sample(5.0);
        let time = timer.sample(4.0);

        assert_eq!(time.delta, 0.0);
        assert_eq!(timer.previous_elapsed(), 4.0);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let handle = clock.clone();

        handle.set(1.5);
        handle.advance(0.5);

        assert_eq!(clock.elapsed(), 2.0);
    }

    #[test]
    fn fps_is_zero_without_delta() {
        let time = FrameTime::default();
        assert_eq!(time.fps(), 0.0);
    }
}
