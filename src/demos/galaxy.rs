use glam::Vec3;
use hecs::Entity;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bindings::BindingPanel;
use crate::clock::FrameTime;
use crate::color::Color;
use crate::frame_loop::Demo;
use crate::orbit_camera::OrbitCamera;
use crate::scene::{Renderable, Scene, Shape};
use crate::transform::Transform;

/// Side of the cube the stars are scattered in.
const EXTENT: f32 = 3.0;
const SEED: u64 = 0x9a1a;

/// Generator parameters and the stars they produced.
pub struct GalaxyParams {
    pub count: usize,
    pub size: f32,
    rng: StdRng,
    stars: Vec<Entity>,
}

impl GalaxyParams {
    fn new(seed: u64) -> Self {
        Self {
            count: 3000,
            size: 0.02,
            rng: StdRng::seed_from_u64(seed),
            stars: Vec::new(),
        }
    }

    pub fn stars(&self) -> &[Entity] {
        &self.stars
    }
}

/// Replace the current stars with `count` fresh ones.
fn generate(params: &mut GalaxyParams, scene: &mut Scene) {
    for star in params.stars.drain(..) {
        scene.despawn(star);
    }

    for _ in 0..params.count {
        let position = Vec3::new(
            (params.rng.random::<f32>() - 0.5) * EXTENT,
            (params.rng.random::<f32>() - 0.5) * EXTENT,
            (params.rng.random::<f32>() - 0.5) * EXTENT,
        );
        let star = scene.spawn(
            Transform::from_position(position).uniform_scale(params.size),
            Renderable::new(Shape::Cube, Color::WHITE),
        );
        params.stars.push(star);
    }

    tracing::debug!(count = params.count, size = params.size, "galaxy generated");
}

/// A procedural point cloud. Changing a parameter regenerates it.
pub struct Galaxy {
    params: GalaxyParams,
    panel: BindingPanel<GalaxyParams>,
    orbit: OrbitCamera,
    generated: (usize, f32),
}

impl Galaxy {
    pub fn setup(scene: &mut Scene) -> Self {
        Self::with_seed(scene, SEED)
    }

    /// Same as [`setup`](Self::setup) with an explicit RNG seed.
    pub fn with_seed(scene: &mut Scene, seed: u64) -> Self {
        scene.background = Color::BLACK;

        let orbit = OrbitCamera::looking_from(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO)
            .fov(45.0)
            .damping(5.0);
        scene.camera = orbit.camera();

        let mut params = GalaxyParams::new(seed);
        generate(&mut params, scene);

        Self {
            generated: (params.count, params.size),
            params,
            panel: Self::panel(),
            orbit,
        }
    }

    fn panel() -> BindingPanel<GalaxyParams> {
        BindingPanel::<GalaxyParams>::new()
            .binding("count", 100.0..=20000.0, 100.0, |p| p.count as f32, |p, v| {
                p.count = v.round() as usize
            })
            .binding("size", 0.005..=0.1, 0.005, |p| p.size, |p, v| p.size = v)
            .action("regenerate", generate)
    }

    pub fn params(&self) -> &GalaxyParams {
        &self.params
    }
}

impl Demo for Galaxy {
    fn name(&self) -> &str {
        "galaxy"
    }

    fn update(&mut self, scene: &mut Scene, time: FrameTime) {
        self.panel.handle_keys(&mut self.params, scene);

        let current = (self.params.count, self.params.size);
        if current != self.generated {
            generate(&mut self.params, scene);
            self.generated = current;
        }

        self.orbit.update(&scene.context.input, time.delta);
        scene.camera = self.orbit.camera();
    }

    fn describe(&self) -> Vec<String> {
        self.panel.describe(&self.params)
    }
}
