use glam::{Vec2, Vec3};
use hecs::Entity;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::animation::{Easing, Euler, Spin, Tween, Tweens, apply_spins, damp};
use crate::bindings::BindingPanel;
use crate::camera::Camera;
use crate::clock::FrameTime;
use crate::color::Color;
use crate::frame_loop::Demo;
use crate::scene::{Renderable, Scene, Shape};
use crate::transform::Transform;

/// Vertical distance between section meshes.
const OBJECTS_DISTANCE: f32 = 6.0;
const PARTICLE_COUNT: usize = 200;
/// Pixels scrolled per wheel line.
const LINE_HEIGHT: f32 = 100.0;
const PARALLAX_STRENGTH: f32 = 0.5;
const PARALLAX_RATE: f32 = 5.0;
const MATERIAL: Color = Color::hex(0xffeded);

/// Material color shared by the section meshes and the particles.
pub struct Palette {
    pub color: Color,
    tinted: Vec<Entity>,
}

/// A page of sections scrolled with the mouse wheel. The camera follows the
/// scroll, sways with the cursor and each newly reached section gives its
/// mesh an eased extra turn.
pub struct ScrollSections {
    sections: Vec<Entity>,
    scroll_y: f32,
    current_section: usize,
    parallax: Vec2,
    tweens: Tweens,
    palette: Palette,
    panel: BindingPanel<Palette>,
    applied: Color,
}

impl ScrollSections {
    pub fn setup(scene: &mut Scene) -> Self {
        scene.background = Color::hex(0x1e1a20);
        scene.camera = Camera::new().with_fov(75.0).at(Vec3::new(0.0, 0.0, 5.0));

        let spin = Spin::new(Vec3::new(0.1, 0.12, 0.0));
        let sections = [(Shape::Torus, 4.0), (Shape::Cone, -3.0), (Shape::Sphere, 4.0)]
            .into_iter()
            .enumerate()
            .map(|(i, (shape, x))| {
                let position = Vec3::new(x, -OBJECTS_DISTANCE * i as f32, 0.0);
                scene.spawn_with(
                    Transform::from_position(position),
                    Renderable::new(shape, MATERIAL),
                    (spin, Euler::default()),
                )
            })
            .collect::<Vec<_>>();

        let mut rng = StdRng::seed_from_u64(0x5c7011);
        let depth = OBJECTS_DISTANCE * sections.len() as f32;
        let mut tinted = sections.clone();
        for _ in 0..PARTICLE_COUNT {
            let position = Vec3::new(
                (rng.random::<f32>() - 0.5) * 20.0,
                OBJECTS_DISTANCE * 0.5 - rng.random::<f32>() * depth,
                (rng.random::<f32>() - 0.5) * 20.0,
            );
            tinted.push(scene.spawn(
                Transform::from_position(position).uniform_scale(0.03),
                Renderable::new(Shape::Cube, MATERIAL),
            ));
        }

        Self {
            sections,
            scroll_y: 0.0,
            current_section: 0,
            parallax: Vec2::ZERO,
            tweens: Tweens::new(),
            palette: Palette {
                color: MATERIAL,
                tinted,
            },
            panel: Self::panel(),
            applied: MATERIAL,
        }
    }

    fn panel() -> BindingPanel<Palette> {
        BindingPanel::<Palette>::new()
            .binding("red", 0.0..=1.0, 0.05, |p| p.color.r, |p, v| p.color.r = v)
            .binding("green", 0.0..=1.0, 0.05, |p| p.color.g, |p, v| p.color.g = v)
            .binding("blue", 0.0..=1.0, 0.05, |p| p.color.b, |p, v| p.color.b = v)
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn current_section(&self) -> usize {
        self.current_section
    }

    /// Scroll position in pixels; one viewport height per section.
    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    fn scroll(&mut self, scene: &Scene) {
        let height = scene.context.viewport().y as f32;
        let max = height * (self.sections.len() - 1) as f32;
        let wheel = scene.context.input.scroll_delta().y;
        self.scroll_y = (self.scroll_y - wheel * LINE_HEIGHT).clamp(0.0, max);
    }

    fn update_section(&mut self, scene: &Scene) {
        let height = scene.context.viewport().y as f32;
        let section = (self.scroll_y / height).round() as usize;
        if section == self.current_section {
            return;
        }

        self.current_section = section;
        if let Some(&mesh) = self.sections.get(section) {
            tracing::debug!(section, "entered section");
            self.tweens.start(Tween::rotate_by(
                mesh,
                Vec3::new(6.0, 3.0, 1.5),
                1.5,
                Easing::EaseInOut,
            ));
        }
    }
}

impl Demo for ScrollSections {
    fn name(&self) -> &str {
        "scroll"
    }

    fn update(&mut self, scene: &mut Scene, time: FrameTime) {
        self.panel.handle_keys(&mut self.palette, scene);
        if self.palette.color != self.applied {
            for &entity in &self.palette.tinted {
                scene.set_color(entity, self.palette.color);
            }
            self.applied = self.palette.color;
        }

        self.scroll(scene);
        self.update_section(scene);

        let target = scene.context.cursor_ndc() * PARALLAX_STRENGTH;
        self.parallax.x = damp(self.parallax.x, target.x, PARALLAX_RATE, time.delta);
        self.parallax.y = damp(self.parallax.y, target.y, PARALLAX_RATE, time.delta);

        let height = scene.context.viewport().y as f32;
        scene.camera.position = Vec3::new(
            self.parallax.x,
            -self.scroll_y / height * OBJECTS_DISTANCE + self.parallax.y,
            5.0,
        );

        apply_spins(&mut scene.world, time.delta);
        self.tweens.advance(&mut scene.world, time.delta);
    }

    fn describe(&self) -> Vec<String> {
        self.panel.describe(&self.palette)
    }
}
