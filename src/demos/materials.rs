use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use crate::animation::{Channel, Motion, Oscillator, apply_motions};
use crate::clock::FrameTime;
use crate::color::Color;
use crate::frame_loop::Demo;
use crate::orbit_camera::OrbitCamera;
use crate::scene::{Renderable, Scene, Shape};
use crate::transform::Transform;

const SPIN_X: f32 = 0.15;
const SPIN_Y: f32 = 0.1;

/// A sphere and an upright plane tumbling slowly above a ground plane.
pub struct Materials {
    orbit: OrbitCamera,
}

impl Materials {
    pub fn setup(scene: &mut Scene) -> Self {
        scene.background = Color::hex(0x202024);

        scene.spawn(
            Transform::from_position(Vec3::new(0.0, -1.0, 0.0)).uniform_scale(20.0),
            Renderable::new(Shape::Plane, Color::hex(0x808080)),
        );

        let sphere_rest = Transform::from_position(Vec3::new(-1.0, 0.0, 0.0)).uniform_scale(0.5);
        let sphere = Motion::new(sphere_rest)
            .drive(Channel::RotationX, Oscillator::linear(SPIN_X))
            .drive(Channel::RotationY, Oscillator::linear(SPIN_Y));
        // the plane mesh faces +Y; tip it toward the camera first
        let plane = Motion::new(Transform::from_position(Vec3::new(1.0, 0.0, 0.0)))
            .drive(Channel::RotationX, Oscillator::linear(SPIN_X).offset(FRAC_PI_2))
            .drive(Channel::RotationY, Oscillator::linear(SPIN_Y));

        for (motion, shape, color) in [
            (sphere, Shape::Sphere, Color::hex(0xc8c8d0)),
            (plane, Shape::Plane, Color::hex(0xd9a066)),
        ] {
            scene.spawn_with(motion.rest(), Renderable::new(shape, color), (motion,));
        }

        let orbit = OrbitCamera::looking_from(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO)
            .fov(45.0)
            .damping(5.0);
        scene.camera = orbit.camera();

        Self { orbit }
    }
}

impl Demo for Materials {
    fn name(&self) -> &str {
        "materials"
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

    #[test]
    fn objects_rotate_with_elapsed_time() {
        let mut scene = Scene::new();
        let mut demo = Materials::setup(&mut scene);
        let time = FrameTime {
            frame: 10,
            elapsed: 10.0,
            delta: 1.0 / 60.0,
        };
        demo.update(&mut scene, time);

        let mut angles = Vec::new();
        let mut query = scene.world.query::<(&Transform, &Motion)>();
        for (_, (transform, _)) in query.iter() {
            angles.push((transform.position.x, transform.euler_angles()));
        }
        angles.sort_by(|a, b| a.0.total_cmp(&b.0));

        let (_, sphere) = angles[0];
        assert_abs_diff_eq!(sphere.x, 1.5, epsilon = 1e-4);
        assert_abs_diff_eq!(sphere.y, 1.0, epsilon = 1e-4);
        assert_eq!(angles.len(), 2);
    }
}
