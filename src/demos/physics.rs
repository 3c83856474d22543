use glam::Vec3;

use crate::bindings::BindingPanel;
use crate::clock::FrameTime;
use crate::color::Color;
use crate::frame_loop::Demo;
use crate::orbit_camera::OrbitCamera;
use crate::physics::{BoxSpec, PhysicsConfig, PhysicsWorld, SphereSpec};
use crate::scene::{Renderable, Scene, Shape};
use crate::transform::Transform;

const BODY_COLOR: Color = Color::hex(0xd8d8e0);

/// Values edited from the binding panel.
#[derive(Clone, Copy, Debug, Default)]
pub struct Creators {
    pub sphere: SphereSpec,
    pub cube: BoxSpec,
}

/// Drop spheres and boxes onto a ground plane.
pub struct PhysicsPlayground {
    creators: Creators,
    panel: BindingPanel<Creators>,
    orbit: OrbitCamera,
}

impl PhysicsPlayground {
    pub fn setup(scene: &mut Scene) -> Self {
        let mut physics = PhysicsWorld::new(PhysicsConfig::default());
        physics.add_ground_plane(0.0);
        scene.physics = Some(physics);

        // sits just under the collider so resting bodies don't z-fight it
        scene.spawn(
            Transform::from_position(Vec3::new(0.0, -0.005, 0.0)).scale(Vec3::new(100.0, 1.0, 100.0)),
            Renderable::new(Shape::Plane, Color::WHITE),
        );
        scene.background = Color::hex(0x101014);

        let orbit = OrbitCamera::looking_from(Vec3::new(0.0, 50.0, 100.0), Vec3::ZERO)
            .fov(45.0)
            .damping(5.0);
        scene.camera = orbit.camera();

        let creators = Creators {
            sphere: SphereSpec {
                color: BODY_COLOR,
                ..SphereSpec::default()
            },
            cube: BoxSpec {
                color: BODY_COLOR,
                ..BoxSpec::default()
            },
        };

        Self {
            creators,
            panel: Self::panel(),
            orbit,
        }
    }

    fn panel() -> BindingPanel<Creators> {
        BindingPanel::<Creators>::new()
            .action("create sphere", create_sphere)
            .binding("sphere radius", 0.1..=5.0, 0.1, |c| c.sphere.radius, |c, v| c.sphere.radius = v)
            .binding("sphere mass", 0.0..=10.0, 0.5, |c| c.sphere.mass, |c, v| c.sphere.mass = v)
            .binding("sphere x", -20.0..=20.0, 0.5, |c| c.sphere.position.x, |c, v| c.sphere.position.x = v)
            .binding("sphere y", 0.0..=40.0, 0.5, |c| c.sphere.position.y, |c, v| c.sphere.position.y = v)
            .binding("sphere z", -20.0..=20.0, 0.5, |c| c.sphere.position.z, |c, v| c.sphere.position.z = v)
            .action("create box", create_box)
            .binding("box width", 0.1..=5.0, 0.1, |c| c.cube.size.x, |c, v| c.cube.size.x = v)
            .binding("box height", 0.1..=5.0, 0.1, |c| c.cube.size.y, |c, v| c.cube.size.y = v)
            .binding("box depth", 0.1..=5.0, 0.1, |c| c.cube.size.z, |c, v| c.cube.size.z = v)
            .binding("box mass", 0.0..=10.0, 0.5, |c| c.cube.mass, |c, v| c.cube.mass = v)
            .binding("box x", -20.0..=20.0, 0.5, |c| c.cube.position.x, |c, v| c.cube.position.x = v)
            .binding("box y", 0.0..=40.0, 0.5, |c| c.cube.position.y, |c, v| c.cube.position.y = v)
            .binding("box z", -20.0..=20.0, 0.5, |c| c.cube.position.z, |c, v| c.cube.position.z = v)
            .action("reset world", reset_world)
    }
}

fn create_sphere(creators: &mut Creators, scene: &mut Scene) {
    if let Some(physics) = scene.physics.as_mut() {
        physics.spawn_sphere(&mut scene.world, creators.sphere);
    }
}

fn create_box(creators: &mut Creators, scene: &mut Scene) {
    if let Some(physics) = scene.physics.as_mut() {
        physics.spawn_box(&mut scene.world, creators.cube);
    }
}

fn reset_world(_: &mut Creators, scene: &mut Scene) {
    if let Some(physics) = scene.physics.as_mut() {
        physics.reset(&mut scene.world);
    }
}

impl Demo for PhysicsPlayground {
    fn name(&self) -> &str {
        "physics"
    }

    fn update(&mut self, scene: &mut Scene, time: FrameTime) {
        self.panel.handle_keys(&mut self.creators, scene);

        self.orbit.update(&scene.context.input, time.delta);
        scene.camera = self.orbit.camera();
    }

    fn describe(&self) -> Vec<String> {
        self.panel.describe(&self.creators)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::KeyCode;

    fn press(scene: &mut Scene, demo: &mut PhysicsPlayground, key: KeyCode) {
        scene.context.input.begin_frame();
        scene.context.input.press_key(key);
        demo.update(scene, FrameTime::default());
        scene.context.input.release_key(key);
    }

    #[test]
    fn enter_creates_a_sphere_body() {
        let mut scene = Scene::new();
        let mut demo = PhysicsPlayground::setup(&mut scene);

        press(&mut scene, &mut demo, KeyCode::Enter);

        let physics = scene.physics.as_ref().unwrap();
        assert_eq!(physics.body_count(), 1);
        assert_eq!(scene.entity_count(), 2);
    }

    #[test]
    fn reset_world_keeps_the_ground() {
        let mut scene = Scene::new();
        let mut demo = PhysicsPlayground::setup(&mut scene);
        press(&mut scene, &mut demo, KeyCode::Enter);
        press(&mut scene, &mut demo, KeyCode::Enter);

        // the last entry is the reset action
        press(&mut scene, &mut demo, KeyCode::Tab);
        demo.panel.select_prev();
        demo.panel.select_prev();
        assert_eq!(demo.panel.selected(), Some("reset world"));
        press(&mut scene, &mut demo, KeyCode::Enter);

        assert_eq!(scene.physics.as_ref().unwrap().body_count(), 0);
        assert_eq!(scene.entity_count(), 1);
    }

    #[test]
    fn bindings_clamp_creator_values() {
        let panel = PhysicsPlayground::panel();
        let mut creators = Creators::default();
        assert_eq!(panel.set(&mut creators, "sphere radius", 50.0), Some(5.0));
        assert_eq!(creators.sphere.radius, 5.0);
    }
}
