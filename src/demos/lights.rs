use std::f32::consts::FRAC_1_PI;

use glam::Vec3;
use hecs::Entity;

use crate::animation::{Channel, Motion, Oscillator, apply_motions};
use crate::clock::FrameTime;
use crate::color::Color;
use crate::frame_loop::Demo;
use crate::orbit_camera::OrbitCamera;
use crate::scene::{Renderable, Scene, Shape};
use crate::transform::Transform;

/// Light helper markers: position, tint, shape.
const MARKERS: [(Vec3, u32, Shape); 4] = [
    (Vec3::new(1.0, 0.25, 0.0), 0x00ffff, Shape::Cube),
    (Vec3::new(3.0, 0.0, 3.0), 0xff9000, Shape::Sphere),
    (Vec3::new(-2.0, 2.0, -2.0), 0x4e00ff, Shape::Cube),
    (Vec3::new(0.0, 2.0, 3.0), 0x78ff00, Shape::Cone),
];

/// A tumbling cube over a floor with a marker at every light source. The
/// spotlight's target marker swings along the diagonal.
pub struct Lights {
    cube: Entity,
    spot_target: Entity,
    orbit: OrbitCamera,
}

impl Lights {
    pub fn setup(scene: &mut Scene) -> Self {
        scene.spawn(
            Transform::from_position(Vec3::new(0.0, -1.0, 0.0)).uniform_scale(20.0),
            Renderable::new(Shape::Plane, Color::hex(0xcccccc)),
        );

        let tumble = Oscillator::linear(FRAC_1_PI);
        let cube = Motion::new(Transform::new())
            .drive(Channel::RotationX, tumble)
            .drive(Channel::RotationY, tumble)
            .drive(Channel::RotationZ, tumble);
        let cube = scene.spawn_with(
            cube.rest(),
            Renderable::new(Shape::Cube, Color::hex(0xe0e0e0)),
            (cube,),
        );

        for (position, tint, shape) in MARKERS {
            scene.spawn(
                Transform::from_position(position).uniform_scale(0.1),
                Renderable::new(shape, Color::hex(tint)),
            );
        }

        let target = Motion::new(Transform::new().uniform_scale(0.05))
            .drive(Channel::PositionX, Oscillator::sin())
            .drive(Channel::PositionY, Oscillator::sin())
            .drive(Channel::PositionZ, Oscillator::sin());
        let spot_target = scene.spawn_with(
            target.rest(),
            Renderable::new(Shape::Sphere, Color::hex(0x78ff00)),
            (target,),
        );

        let orbit = OrbitCamera::looking_from(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO)
            .fov(75.0)
            .damping(5.0);
        scene.camera = orbit.camera();

        Self {
            cube,
            spot_target,
            orbit,
        }
    }

    pub fn cube(&self) -> Entity {
        self.cube
    }

    /// The marker standing in for the spotlight's target.
    pub fn spot_target(&self) -> Entity {
        self.spot_target
    }
}

impl Demo for Lights {
    fn name(&self) -> &str {
        "lights"
    }

    fn update(&mut self, scene: &mut Scene, time: FrameTime) {
        apply_motions(&mut scene.world, time.elapsed);

        self.orbit.update(&scene.context.input, time.delta);
        scene.camera = self.orbit.camera();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::PI;

    #[test]
    fn cube_tumbles_and_target_swings() {
        let mut scene = Scene::new();
        let mut demo = Lights::setup(&mut scene);
        let time = FrameTime {
            frame: 1,
            elapsed: PI * 0.5,
            delta: 1.0 / 60.0,
        };
        demo.update(&mut scene, time);

        // one radian per PI seconds on every axis
        let angles = scene.transform(demo.cube).unwrap().euler_angles();
        assert_abs_diff_eq!(angles.x, 0.5, epsilon = 1e-4);
        assert_abs_diff_eq!(angles.y, 0.5, epsilon = 1e-4);
        assert_abs_diff_eq!(angles.z, 0.5, epsilon = 1e-4);

        let target = scene.transform(demo.spot_target).unwrap().position;
        for axis in target.to_array() {
            assert_abs_diff_eq!(axis, 1.0, epsilon = 1e-5);
        }
        assert_eq!(scene.entity_count(), 2 + MARKERS.len() as u32 + 1);
    }
}
