use std::f32::consts::FRAC_PI_2;

use approx::assert_abs_diff_eq;
use vignette::{
    Channel, Demo, FirstTick, FrameLoop, FrameScheduler, FrameTime, LoopError, LoopState,
    ManualClock, Motion, Oscillator, PhysicsConfig, RenderError, Renderer, Scene, SphereSpec,
    TickOutcome, Transform, Vec3, apply_motions,
};

#[derive(Default)]
struct CountingScheduler {
    requests: usize,
}

impl FrameScheduler for CountingScheduler {
    fn request_next_frame(&mut self) {
        self.requests += 1;
    }
}

#[derive(Default)]
struct NullRenderer {
    frames: usize,
    fail_after: Option<usize>,
}

impl Renderer for NullRenderer {
    fn render(&mut self, _scene: &Scene) -> Result<(), RenderError> {
        if self.fail_after.is_some_and(|n| self.frames >= n) {
            return Err(RenderError::Other("device gone".into()));
        }
        self.frames += 1;
        Ok(())
    }
}

/// Records every frame time and drives `Motion` components.
#[derive(Default)]
struct Recorder {
    times: Vec<FrameTime>,
}

impl Demo for Recorder {
    fn name(&self) -> &str {
        "recorder"
    }

    fn update(&mut self, scene: &mut Scene, time: FrameTime) {
        apply_motions(&mut scene.world, time.elapsed);
        self.times.push(time);
    }
}

#[test]
fn elapsed_samples_become_deltas() {
    let clock = ManualClock::new();
    let mut frame_loop = FrameLoop::new(clock.clone(), FirstTick::Zero);
    let mut demo = Recorder::default();
    let mut scene = Scene::new();
    let mut renderer = NullRenderer::default();
    let mut scheduler = CountingScheduler::default();

    frame_loop.start(&mut scheduler);
    for elapsed in [0.0, 1.0, 2.0] {
        clock.set(elapsed);
        frame_loop
            .tick(&mut demo, &mut scene, &mut renderer, &mut scheduler)
            .unwrap();
    }

    assert_eq!(frame_loop.previous_elapsed(), 2.0);
    let deltas: Vec<f32> = demo.times.iter().map(|t| t.delta).collect();
    assert_eq!(deltas, vec![0.0, 1.0, 1.0]);
    assert_eq!(demo.times[2].frame, 2);
}

#[test]
fn stopped_loop_neither_renders_nor_rearms() {
    let mut frame_loop = FrameLoop::new(ManualClock::new(), FirstTick::Zero);
    let mut demo = Recorder::default();
    let mut scene = Scene::new();
    let mut renderer = NullRenderer::default();
    let mut scheduler = CountingScheduler::default();

    assert_eq!(
        frame_loop
            .run_ticks(2, &mut demo, &mut scene, &mut renderer, &mut scheduler)
            .unwrap(),
        2
    );
    let requests = scheduler.requests;

    let handle = frame_loop.stop_handle();
    handle.stop();
    assert!(handle.is_stop_requested());

    for _ in 0..3 {
        let outcome = frame_loop
            .tick(&mut demo, &mut scene, &mut renderer, &mut scheduler)
            .unwrap();
        assert_eq!(outcome, TickOutcome::Skipped);
    }

    assert_eq!(frame_loop.state(), LoopState::Stopped);
    assert_eq!(renderer.frames, 2);
    assert_eq!(scheduler.requests, requests);
    assert_eq!(demo.times.len(), 2);
}

#[test]
fn render_failure_stops_the_loop() {
    let mut frame_loop = FrameLoop::new(ManualClock::new(), FirstTick::Zero);
    let mut demo = Recorder::default();
    let mut scene = Scene::new();
    let mut renderer = NullRenderer {
        fail_after: Some(3),
        ..Default::default()
    };
    let mut scheduler = CountingScheduler::default();

    let result = frame_loop.run_ticks(10, &mut demo, &mut scene, &mut renderer, &mut scheduler);

    assert!(matches!(result, Err(LoopError::Render(RenderError::Other(_)))));
    assert_eq!(frame_loop.state(), LoopState::Stopped);
    assert_eq!(renderer.frames, 3);
    // start plus one re-arm per successful frame
    assert_eq!(scheduler.requests, 4);
}

#[test]
fn bounded_run_renders_each_tick() {
    let clock = ManualClock::new();
    let mut frame_loop = FrameLoop::new(clock, FirstTick::Zero);
    let mut demo = Recorder::default();
    let mut scene = Scene::new();
    let mut renderer = NullRenderer::default();
    let mut scheduler = CountingScheduler::default();

    let rendered = frame_loop
        .run_ticks(5, &mut demo, &mut scene, &mut renderer, &mut scheduler)
        .unwrap();

    assert_eq!(rendered, 5);
    assert_eq!(renderer.frames, 5);
    assert_eq!(frame_loop.frames(), 5);
    assert_eq!(frame_loop.state(), LoopState::Running);
}

#[test]
fn motion_follows_elapsed_time() {
    let clock = ManualClock::new();
    let mut frame_loop = FrameLoop::new(clock.clone(), FirstTick::Zero);
    let mut demo = Recorder::default();
    let mut scene = Scene::new();
    let mut renderer = NullRenderer::default();
    let mut scheduler = CountingScheduler::default();

    let motion = Motion::new(Transform::new()).drive(Channel::PositionY, Oscillator::sin());
    let entity = scene.world.spawn((Transform::new(), motion));

    clock.set(FRAC_PI_2);
    frame_loop
        .run_ticks(1, &mut demo, &mut scene, &mut renderer, &mut scheduler)
        .unwrap();

    let y = scene.transform(entity).unwrap().position.y;
    assert_abs_diff_eq!(y, 1.0, epsilon = 1e-6);
}

#[test]
fn physics_bodies_settle_through_the_loop() {
    let clock = ManualClock::new();
    let mut frame_loop = FrameLoop::new(clock.clone(), FirstTick::Zero);
    let mut demo = Recorder::default();
    let mut scene = Scene::with_physics(PhysicsConfig::default().restitution(0.0));
    let mut renderer = NullRenderer::default();
    let mut scheduler = CountingScheduler::default();

    let spec = SphereSpec::default();
    assert_eq!(spec.position, Vec3::new(0.0, 5.0, 0.0));
    let sphere = {
        let physics = scene.physics.as_mut().unwrap();
        physics.add_ground_plane(0.0);
        physics.spawn_sphere(&mut scene.world, spec)
    };

    frame_loop.start(&mut scheduler);
    let mut lowest = f32::MAX;
    for _ in 0..600 {
        clock.advance(1.0 / 60.0);
        frame_loop
            .tick(&mut demo, &mut scene, &mut renderer, &mut scheduler)
            .unwrap();
        lowest = lowest.min(scene.transform(sphere).unwrap().position.y);
    }

    let position = scene.transform(sphere).unwrap().position;
    assert_abs_diff_eq!(position.y, spec.radius, epsilon = 0.05);
    assert_abs_diff_eq!(position.x, 0.0, epsilon = 1e-3);
    assert!(lowest > spec.radius - 0.2, "sphere sank to {lowest}");
}
