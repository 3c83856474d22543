use std::f32::consts::TAU;

use glam::Vec3;
use hecs::Entity;

use crate::animation::{Easing, Euler, Tween, Tweens};
use crate::bindings::BindingPanel;
use crate::clock::FrameTime;
use crate::color::Color;
use crate::frame_loop::Demo;
use crate::orbit_camera::OrbitCamera;
use crate::scene::{Renderable, Scene, Shape};
use crate::transform::Transform;

/// Everything the debug panel can change on the cube.
pub struct CubeControls {
    pub position: Vec3,
    pub visible: bool,
    pub color: Color,
    mesh: Entity,
    tweens: Tweens,
}

fn spin(controls: &mut CubeControls, _scene: &mut Scene) {
    controls.tweens.start(Tween::rotate_by(
        controls.mesh,
        Vec3::new(0.0, TAU, 0.0),
        1.0,
        Easing::EaseOut,
    ));
}

/// A single cube wired to a debug panel: move it, hide it, recolor it and
/// give it an eased full turn.
pub struct DebugTemplate {
    controls: CubeControls,
    panel: BindingPanel<CubeControls>,
    orbit: OrbitCamera,
}

impl DebugTemplate {
    pub fn setup(scene: &mut Scene) -> Self {
        let color = Color::hex(0xff0000);
        let mesh = scene.spawn_with(
            Transform::new(),
            Renderable::new(Shape::Cube, color),
            (Euler::default(),),
        );

        let orbit = OrbitCamera::looking_from(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO)
            .fov(45.0)
            .damping(5.0);
        scene.camera = orbit.camera();

        Self {
            controls: CubeControls {
                position: Vec3::ZERO,
                visible: true,
                color,
                mesh,
                tweens: Tweens::new(),
            },
            panel: Self::panel(),
            orbit,
        }
    }

    fn panel() -> BindingPanel<CubeControls> {
        BindingPanel::<CubeControls>::new()
            .binding("x", -3.0..=3.0, 0.01, |c| c.position.x, |c, v| c.position.x = v)
            .binding("y", -3.0..=3.0, 0.01, |c| c.position.y, |c, v| c.position.y = v)
            .binding("z", -3.0..=3.0, 0.01, |c| c.position.z, |c, v| c.position.z = v)
            .binding(
                "visible",
                0.0..=1.0,
                1.0,
                |c| if c.visible { 1.0 } else { 0.0 },
                |c, v| c.visible = v >= 0.5,
            )
            .binding("red", 0.0..=1.0, 0.05, |c| c.color.r, |c, v| c.color.r = v)
            .binding("green", 0.0..=1.0, 0.05, |c| c.color.g, |c, v| c.color.g = v)
            .binding("blue", 0.0..=1.0, 0.05, |c| c.color.b, |c, v| c.color.b = v)
            .action("spin", spin)
    }

    pub fn controls(&self) -> &CubeControls {
        &self.controls
    }
}

impl Demo for DebugTemplate {
    fn name(&self) -> &str {
        "debug-template"
    }

    fn update(&mut self, scene: &mut Scene, time: FrameTime) {
        self.panel.handle_keys(&mut self.controls, scene);

        let mesh = self.controls.mesh;
        if let Some(mut transform) = scene.transform(mesh) {
            transform.position = self.controls.position;
            scene.set_transform(mesh, transform);
        }
        scene.set_color(mesh, self.controls.color);
        scene.set_visible(mesh, self.controls.visible);
        self.controls.tweens.advance(&mut scene.world, time.delta);

        self.orbit.update(&scene.context.input, time.delta);
        scene.camera = self.orbit.camera();
    }

    fn describe(&self) -> Vec<String> {
        self.panel.describe(&self.controls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::collect_draws;
    use approx::assert_abs_diff_eq;
    use winit::keyboard::KeyCode;

    fn frame(delta: f32) -> FrameTime {
        FrameTime {
            frame: 0,
            elapsed: 0.0,
            delta,
        }
    }

    fn press(scene: &mut Scene, demo: &mut DebugTemplate, key: KeyCode) {
        scene.context.input.press_key(key);
        demo.update(scene, frame(0.0));
        scene.context.input.begin_frame();
    }

    #[test]
    fn nudging_x_moves_the_cube() {
        let mut scene = Scene::new();
        let mut demo = DebugTemplate::setup(&mut scene);

        press(&mut scene, &mut demo, KeyCode::ArrowUp);
        press(&mut scene, &mut demo, KeyCode::ArrowUp);

        let position = scene.transform(demo.controls().mesh).unwrap().position;
        assert_abs_diff_eq!(position.x, 0.02, epsilon = 1e-6);
        assert_eq!(position.y, 0.0);
    }

    #[test]
    fn visible_toggle_hides_the_cube() {
        let mut scene = Scene::new();
        let mut demo = DebugTemplate::setup(&mut scene);
        for _ in 0..3 {
            demo.panel.select_next();
        }
        assert_eq!(demo.panel.selected(), Some("visible"));

        press(&mut scene, &mut demo, KeyCode::ArrowDown);
        assert!(!demo.controls().visible);
        assert!(collect_draws(&scene).is_empty());

        press(&mut scene, &mut demo, KeyCode::ArrowUp);
        assert_eq!(collect_draws(&scene).len(), 1);
    }

    #[test]
    fn spin_action_turns_the_cube_once() {
        let mut scene = Scene::new();
        let mut demo = DebugTemplate::setup(&mut scene);
        demo.panel.select_prev();
        assert_eq!(demo.panel.selected(), Some("spin"));

        press(&mut scene, &mut demo, KeyCode::Enter);
        for _ in 0..60 {
            demo.update(&mut scene, frame(1.0 / 30.0));
        }

        let angles = scene.world.get::<&Euler>(demo.controls().mesh).unwrap().0;
        assert_abs_diff_eq!(angles.y, TAU, epsilon = 1e-4);
        assert!(demo.controls().tweens.is_empty());
    }
}
