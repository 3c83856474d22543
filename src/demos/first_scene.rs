use std::f32::consts::PI;

use glam::Vec3;

use crate::animation::{Channel, Motion, Oscillator, apply_motions};
use crate::camera::Camera;
use crate::clock::FrameTime;
use crate::color::Color;
use crate::frame_loop::Demo;
use crate::scene::{Renderable, Scene, Shape};
use crate::transform::Transform;

/// Scale of the cube group; cube offsets and motion amplitudes are in group units.
const GROUP_SCALE: f32 = 0.5;
const CAMERA_RADIUS: f32 = 6.0;

/// Three cubes driven by trigonometric functions of elapsed time, with the
/// camera circling them.
pub struct FirstScene;

impl FirstScene {
    pub fn setup(scene: &mut Scene) -> Self {
        scene.camera = Camera::new().with_fov(45.0).at(Vec3::new(0.0, 0.0, 3.0));
        scene.camera.look_at(Vec3::ZERO);

        let cube = |x: f32| {
            Transform::from_position(Vec3::new(x * GROUP_SCALE, 0.0, 0.0))
                .uniform_scale(GROUP_SCALE)
        };

        // half a turn per second
        let spinning = Motion::new(cube(1.5)).drive(Channel::RotationX, Oscillator::linear(PI));
        let orbiting = Motion::new(cube(0.0))
            .drive(Channel::PositionY, Oscillator::sin().amplitude(2.0 * GROUP_SCALE))
            .drive(Channel::PositionX, Oscillator::cos().amplitude(3.5 * GROUP_SCALE));
        let flicking = Motion::new(cube(-1.5)).drive(Channel::RotationZ, Oscillator::tan());

        for (motion, color) in [
            (spinning, Color::hex(0xff0000)),
            (orbiting, Color::hex(0x00ff00)),
            (flicking, Color::hex(0x0000ff)),
        ] {
            let rest = motion.rest();
            scene.spawn_with(rest, Renderable::new(Shape::Cube, color), (motion,));
        }

        Self
    }

    /// Camera position on its circle at `elapsed`.
    pub fn camera_position(elapsed: f32) -> Vec3 {
        Vec3::new(
            elapsed.cos() * CAMERA_RADIUS,
            0.0,
            elapsed.sin() * CAMERA_RADIUS,
        )
    }
}

impl Demo for FirstScene {
    fn name(&self) -> &str {
        "first-scene"
    }

    fn update(&mut self, scene: &mut Scene, time: FrameTime) {
        apply_motions(&mut scene.world, time.elapsed);

        scene.camera.position = Self::camera_position(time.elapsed);
        scene.camera.look_at(Vec3::ZERO);
    }
}
