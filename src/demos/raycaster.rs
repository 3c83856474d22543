use glam::Vec3;
use hecs::Entity;
use winit::event::MouseButton;

use crate::animation::{Channel, Motion, Oscillator, apply_motions};
use crate::clock::FrameTime;
use crate::color::Color;
use crate::frame_loop::Demo;
use crate::orbit_camera::OrbitCamera;
use crate::picking::{Collider, HoverEvent, HoverTracker, Ray, raycast_all};
use crate::scene::{Renderable, Scene, Shape};
use crate::transform::Transform;

const IDLE: Color = Color::hex(0xff0000);
const HIT: Color = Color::hex(0x0000ff);

/// Three bobbing spheres that turn blue under the cursor.
pub struct Raycaster {
    orbit: OrbitCamera,
    spheres: Vec<(Entity, &'static str)>,
    hover: HoverTracker,
}

impl Raycaster {
    pub fn setup(scene: &mut Scene) -> Self {
        let orbit = OrbitCamera::looking_from(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO)
            .fov(45.0)
            .damping(5.0);
        scene.camera = orbit.camera();

        let spheres = [(0.0, 0.3, "second"), (-1.5, 0.8, "first"), (1.5, 1.4, "third")]
            .into_iter()
            .map(|(x, frequency, label)| {
                let rest = Transform::from_position(Vec3::new(x, 0.0, 0.0)).uniform_scale(0.5);
                let motion = Motion::new(rest).drive(
                    Channel::PositionY,
                    Oscillator::sin().frequency(frequency).amplitude(1.5),
                );
                let entity = scene.spawn_with(
                    rest,
                    Renderable::new(Shape::Sphere, IDLE),
                    (motion, Collider::sphere(1.0)),
                );
                (entity, label)
            })
            .collect();

        Self {
            orbit,
            spheres,
            hover: HoverTracker::new(),
        }
    }

    fn label(&self, entity: Entity) -> &'static str {
        self.spheres
            .iter()
            .find(|(e, _)| *e == entity)
            .map_or("unknown", |(_, label)| label)
    }
}

impl Demo for Raycaster {
    fn name(&self) -> &str {
        "raycaster"
    }

    fn update(&mut self, scene: &mut Scene, time: FrameTime) {
        apply_motions(&mut scene.world, time.elapsed);

        self.orbit.update(&scene.context.input, time.delta);
        scene.camera = self.orbit.camera();

        let ray = Ray::from_camera(
            scene.context.cursor_ndc(),
            &scene.camera,
            scene.context.aspect(),
        );
        let hits = raycast_all(&scene.world, &ray);

        for &(entity, _) in &self.spheres {
            scene.set_color(entity, IDLE);
        }
        for hit in &hits {
            scene.set_color(hit.entity, HIT);
        }

        match self.hover.update(hits.first().map(|hit| hit.entity)) {
            Some(HoverEvent::Enter(_)) => tracing::info!("mouse enter"),
            Some(HoverEvent::Leave(_)) => tracing::info!("mouse leave"),
            Some(HoverEvent::Switch { to, .. }) => {
                tracing::debug!(sphere = self.label(to), "hover moved")
            }
            None => {}
        }

        if scene.context.input.mouse_pressed(MouseButton::Left) {
            if let Some(current) = self.hover.current() {
                tracing::info!("clicked {} sphere", self.label(current));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn tick(demo: &mut Raycaster, scene: &mut Scene) {
        demo.update(
            scene,
            FrameTime {
                frame: 0,
                elapsed: 0.0,
                delta: 1.0 / 60.0,
            },
        );
    }

    #[test]
    fn cursor_over_center_sphere_turns_it_blue() {
        let mut scene = Scene::new();
        scene.context.resize(800, 600);
        let mut demo = Raycaster::setup(&mut scene);

        scene.context.input.move_cursor(Vec2::new(400.0, 300.0));
        tick(&mut demo, &mut scene);

        let center = demo.spheres[0].0;
        assert_eq!(scene.color(center), Some(HIT));
        assert_eq!(scene.color(demo.spheres[1].0), Some(IDLE));
        assert_eq!(demo.hover.current(), Some(center));
    }

    #[test]
    fn center_sphere_is_hovered_before_the_cursor_moves() {
        let mut scene = Scene::new();
        scene.context.resize(800, 600);
        let mut demo = Raycaster::setup(&mut scene);

        tick(&mut demo, &mut scene);

        assert_eq!(demo.hover.current(), Some(demo.spheres[0].0));
    }

    #[test]
    fn moving_away_restores_color() {
        let mut scene = Scene::new();
        scene.context.resize(800, 600);
        let mut demo = Raycaster::setup(&mut scene);

        scene.context.input.move_cursor(Vec2::new(400.0, 300.0));
        tick(&mut demo, &mut scene);
        scene.context.input.move_cursor(Vec2::new(5.0, 5.0));
        tick(&mut demo, &mut scene);

        assert_eq!(scene.color(demo.spheres[0].0), Some(IDLE));
        assert_eq!(demo.hover.current(), None);
    }
}
