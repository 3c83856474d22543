use glam::Vec3;
use hecs::Entity;

use crate::animation::{Channel, Motion, Oscillator, Wave, apply_motions};
use crate::clock::FrameTime;
use crate::color::Color;
use crate::frame_loop::Demo;
use crate::orbit_camera::OrbitCamera;
use crate::scene::{Renderable, Scene, Shape};
use crate::transform::Transform;

const GROUND_Y: f32 = -0.53;
const BOUNCE_RATE: f32 = 1.5;
/// Shadow opacity when the sphere touches the ground.
const SHADOW_OPACITY: f32 = 0.3;

/// A sphere bouncing around a circle with a baked shadow under it. The shadow
/// follows the sphere across the ground and fades as the sphere rises.
pub struct Shadows {
    sphere: Entity,
    shadow: Entity,
    opacity: Oscillator,
    orbit: OrbitCamera,
}

impl Shadows {
    pub fn setup(scene: &mut Scene) -> Self {
        scene.background = Color::hex(0x101014);

        scene.spawn(
            Transform::from_position(Vec3::new(0.0, GROUND_Y, 0.0)).uniform_scale(5.0),
            Renderable::new(Shape::Plane, Color::hex(0xb0b0b0)),
        );

        let sphere = Motion::new(Transform::new().uniform_scale(0.5))
            .drive(Channel::PositionX, Oscillator::sin())
            .drive(Channel::PositionZ, Oscillator::cos())
            .drive(
                Channel::PositionY,
                Oscillator::new(Wave::AbsSin).frequency(BOUNCE_RATE),
            );
        let sphere = scene.spawn_with(
            sphere.rest(),
            Renderable::new(Shape::Sphere, Color::WHITE),
            (sphere,),
        );

        // a flattened sphere reads as a soft disc just above the ground
        let shadow_rest = Transform::from_position(Vec3::new(0.0, GROUND_Y + 0.01, 0.0))
            .scale(Vec3::new(0.75, 0.001, 0.75));
        let shadow = Motion::new(shadow_rest)
            .drive(Channel::PositionX, Oscillator::sin())
            .drive(Channel::PositionZ, Oscillator::cos());
        let shadow = scene.spawn_with(
            shadow.rest(),
            Renderable::new(Shape::Sphere, Color::rgba(0.0, 0.0, 0.0, SHADOW_OPACITY)),
            (shadow,),
        );

        let orbit = OrbitCamera::looking_from(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO)
            .fov(75.0)
            .damping(5.0);
        scene.camera = orbit.camera();

        Self {
            sphere,
            shadow,
            opacity: Oscillator::new(Wave::AbsCos)
                .frequency(BOUNCE_RATE)
                .amplitude(SHADOW_OPACITY),
            orbit,
        }
    }

    pub fn sphere(&self) -> Entity {
        self.sphere
    }

    pub fn shadow(&self) -> Entity {
        self.shadow
    }
}

impl Demo for Shadows {
    fn name(&self) -> &str {
        "shadows"
    }

    fn update(&mut self, scene: &mut Scene, time: FrameTime) {
        apply_motions(&mut scene.world, time.elapsed);
        scene.set_color(
            self.shadow,
            Color::rgba(0.0, 0.0, 0.0, self.opacity.sample(time.elapsed)),
        );

        self.orbit.update(&scene.context.input, time.delta);
        scene.camera = self.orbit.camera();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::FRAC_PI_2;

    fn at(elapsed: f32) -> FrameTime {
        FrameTime {
            frame: 1,
            elapsed,
            delta: 1.0 / 60.0,
        }
    }

    #[test]
    fn shadow_tracks_the_sphere_on_the_ground() {
        let mut scene = Scene::new();
        let mut demo = Shadows::setup(&mut scene);
        demo.update(&mut scene, at(FRAC_PI_2));

        let sphere = scene.transform(demo.sphere).unwrap().position;
        let shadow = scene.transform(demo.shadow).unwrap().position;

        assert_abs_diff_eq!(sphere.x, 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(sphere.z, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(sphere.y, (1.5 * FRAC_PI_2).sin().abs(), epsilon = 1e-5);
        assert_abs_diff_eq!(shadow.x, sphere.x, epsilon = 1e-6);
        assert_abs_diff_eq!(shadow.z, sphere.z, epsilon = 1e-6);
        assert_abs_diff_eq!(shadow.y, GROUND_Y + 0.01, epsilon = 1e-6);
    }

    #[test]
    fn shadow_fades_as_the_sphere_rises() {
        let mut scene = Scene::new();
        let mut demo = Shadows::setup(&mut scene);

        demo.update(&mut scene, at(0.0));
        assert_abs_diff_eq!(scene.color(demo.shadow).unwrap().a, SHADOW_OPACITY, epsilon = 1e-6);

        demo.update(&mut scene, at(FRAC_PI_2));
        let expected = (1.5 * FRAC_PI_2).cos().abs() * SHADOW_OPACITY;
        assert_abs_diff_eq!(scene.color(demo.shadow).unwrap().a, expected, epsilon = 1e-6);
        assert!(scene.transform(demo.sphere).unwrap().position.y > 0.5);
    }
}
