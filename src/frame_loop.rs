//! The frame update loop.
//!
//! One [`FrameLoop::tick`] is one frame:
//!
//! 1. sample the [`Clock`] into a [`FrameTime`]
//! 2. run the [`Demo`] update
//! 3. step the scene's physics and copy body poses onto entities
//! 4. render through the [`Renderer`]
//! 5. ask the [`FrameScheduler`] for the next frame
//!
//! The loop is a small state machine, `Idle -> Running -> Stopped`. A stop
//! requested through a [`StopHandle`] takes effect at the start of the next
//! tick, which then neither renders nor re-arms. A render failure stops the
//! loop immediately.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::clock::{Clock, FirstTick, FrameTime, FrameTimer};
use crate::error::LoopError;
use crate::render::Renderer;
use crate::scene::Scene;

/// Per-frame behaviour of one demo scene.
pub trait Demo {
    fn name(&self) -> &str;

    /// Advance the demo's own state. Runs before physics.
    fn update(&mut self, scene: &mut Scene, time: FrameTime);

    /// Current debug binding values, one line each.
    fn describe(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Requests that another tick be delivered, typically on the next display
/// refresh.
pub trait FrameScheduler {
    fn request_next_frame(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Stopped,
}

/// What a single [`FrameLoop::tick`] did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    /// The frame was drawn and the next one requested.
    Rendered(FrameTime),
    /// The loop was not running; nothing happened.
    Skipped,
}

/// Cloneable handle that asks a [`FrameLoop`] to stop.
#[derive(Clone, Debug, Default)]
pub struct StopHandle {
    requested: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.requested.store(true, Ordering::Release);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }
}

pub struct FrameLoop<C: Clock> {
    clock: C,
    timer: FrameTimer,
    state: LoopState,
    stop: StopHandle,
}

impl<C: Clock> FrameLoop<C> {
    pub fn new(clock: C, first_tick: FirstTick) -> Self {
        Self {
            clock,
            timer: FrameTimer::new(first_tick),
            state: LoopState::Idle,
            stop: StopHandle::default(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Elapsed time recorded by the most recent tick.
    pub fn previous_elapsed(&self) -> f32 {
        self.timer.previous_elapsed()
    }

    /// Number of ticks that sampled the clock.
    pub fn frames(&self) -> u64 {
        self.timer.frames()
    }

    /// Move from `Idle` to `Running` and request the first frame.
    ///
    /// Starting a loop that is already running, or has stopped, does nothing.
    pub fn start<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if self.state != LoopState::Idle {
            return;
        }
        self.state = LoopState::Running;
        tracing::debug!("frame loop started");
        scheduler.request_next_frame();
    }

    /// Run one frame.
    pub fn tick<D, R, S>(
        &mut self,
        demo: &mut D,
        scene: &mut Scene,
        renderer: &mut R,
        scheduler: &mut S,
    ) -> Result<TickOutcome, LoopError>
    where
        D: Demo + ?Sized,
        R: Renderer + ?Sized,
        S: FrameScheduler + ?Sized,
    {
        if self.state == LoopState::Running && self.stop.is_stop_requested() {
            self.state = LoopState::Stopped;
            tracing::info!(frames = self.timer.frames(), "frame loop stopped");
        }
        if self.state != LoopState::Running {
            return Ok(TickOutcome::Skipped);
        }

        let time = self.timer.sample(self.clock.elapsed());
        tracing::trace!(frame = time.frame, elapsed = time.elapsed, delta = time.delta, "tick");

        demo.update(scene, time);

        if let Some(physics) = scene.physics.as_mut() {
            let config = *physics.config();
            physics.step(config.fixed_dt, time.delta, config.max_substeps);
            physics.sync(&mut scene.world);
        }

        if let Err(err) = renderer.render(scene) {
            self.state = LoopState::Stopped;
            return Err(LoopError::Render(err));
        }

        scheduler.request_next_frame();
        Ok(TickOutcome::Rendered(time))
    }

    /// Start the loop if needed and run up to `n` ticks, stopping early if the
    /// loop stops. Returns the number of frames rendered.
    pub fn run_ticks<D, R, S>(
        &mut self,
        n: usize,
        demo: &mut D,
        scene: &mut Scene,
        renderer: &mut R,
        scheduler: &mut S,
    ) -> Result<usize, LoopError>
    where
        D: Demo + ?Sized,
        R: Renderer + ?Sized,
        S: FrameScheduler + ?Sized,
    {
        self.start(scheduler);
        if self.state == LoopState::Stopped {
            return Err(LoopError::Stopped);
        }

        let mut rendered = 0;
        for _ in 0..n {
            match self.tick(demo, scene, renderer, scheduler)? {
                TickOutcome::Rendered(_) => rendered += 1,
                TickOutcome::Skipped => break,
            }
        }
        Ok(rendered)
    }
}
