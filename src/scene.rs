//! The scene graph: entities, camera and per-scene context.
//!
//! A [`Scene`] owns every entity it contains. Entities are `hecs` entities
//! carrying a [`Transform`] and usually a [`Renderable`]; other components
//! such as [`Motion`](crate::Motion) or [`Collider`](crate::Collider) can be
//! attached through [`Scene::world`].

use hecs::{DynamicBundle, Entity, World};

use crate::camera::Camera;
use crate::color::Color;
use crate::input::SceneContext;
use crate::physics::{PhysicsConfig, PhysicsWorld};
use crate::transform::Transform;

/// Built-in primitive geometry. Sizes are in local units before scaling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Shape {
    /// 1x1x1 cube centered on the origin.
    Cube,
    /// Sphere of radius 1.
    Sphere,
    /// 1x1 plane on the XZ axis, facing +Y.
    Plane,
    /// Torus with ring radius 1 and tube radius 0.4, lying in the XY plane.
    Torus,
    /// Cone of radius 1 and height 2 pointing up +Y.
    Cone,
}

impl Shape {
    pub const ALL: [Shape; 5] = [
        Shape::Cube,
        Shape::Sphere,
        Shape::Plane,
        Shape::Torus,
        Shape::Cone,
    ];
}

/// Makes an entity visible to the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Renderable {
    pub shape: Shape,
    pub color: Color,
    /// Hidden entities keep their components but are skipped when drawing.
    pub visible: bool,
}

impl Renderable {
    pub fn new(shape: Shape, color: Color) -> Self {
        Self {
            shape,
            color,
            visible: true,
        }
    }
}

/// Everything one demo renders and mutates.
pub struct Scene {
    /// Entity storage. Every renderable entity has a [`Transform`].
    pub world: World,
    pub camera: Camera,
    pub background: Color,
    /// Input and viewport state written by the host between ticks.
    pub context: SceneContext,
    /// Rigid-body simulation stepped by the frame loop, when present.
    pub physics: Option<PhysicsWorld>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            world: World::new(),
            camera: Camera::new(),
            background: Color::BLACK,
            context: SceneContext::default(),
            physics: None,
        }
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scene with a physics world attached.
    pub fn with_physics(config: PhysicsConfig) -> Self {
        Self {
            physics: Some(PhysicsWorld::new(config)),
            ..Self::default()
        }
    }

    /// Spawn a visible entity.
    pub fn spawn(&mut self, transform: Transform, renderable: Renderable) -> Entity {
        self.world.spawn((transform, renderable))
    }

    /// Spawn a visible entity with extra components.
    pub fn spawn_with(
        &mut self,
        transform: Transform,
        renderable: Renderable,
        extra: impl DynamicBundle,
    ) -> Entity {
        let entity = self.spawn(transform, renderable);
        // The entity was just created, so insertion cannot miss.
        let _ = self.world.insert(entity, extra);
        entity
    }

    /// Remove an entity from the scene. Returns false if it was already gone.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        self.world.despawn(entity).is_ok()
    }

    pub fn transform(&self, entity: Entity) -> Option<Transform> {
        self.world.get::<&Transform>(entity).ok().map(|t| *t)
    }

    /// Overwrite an entity's transform. Returns false if the entity has none.
    pub fn set_transform(&mut self, entity: Entity, transform: Transform) -> bool {
        match self.world.get::<&mut Transform>(entity) {
            Ok(mut current) => {
                *current = transform;
                true
            }
            Err(_) => false,
        }
    }

    pub fn set_color(&mut self, entity: Entity, color: Color) {
        if let Ok(mut renderable) = self.world.get::<&mut Renderable>(entity) {
            renderable.color = color;
        }
    }

    pub fn set_visible(&mut self, entity: Entity, visible: bool) {
        if let Ok(mut renderable) = self.world.get::<&mut Renderable>(entity) {
            renderable.visible = visible;
        }
    }

    pub fn color(&self, entity: Entity) -> Option<Color> {
        self.world.get::<&Renderable>(entity).ok().map(|r| r.color)
    }

    pub fn entity_count(&self) -> u32 {
        self.world.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn spawn_and_despawn() {
        let mut scene = Scene::new();
        let cube = scene.spawn(Transform::new(), Renderable::new(Shape::Cube, Color::RED));
        assert_eq!(scene.entity_count(), 1);

        assert!(scene.despawn(cube));
        assert!(!scene.despawn(cube));
        assert_eq!(scene.entity_count(), 0);
    }

    #[test]
    fn set_transform_overwrites_all_fields() {
        let mut scene = Scene::new();
        let e = scene.spawn(Transform::new(), Renderable::new(Shape::Sphere, Color::WHITE));
        let moved = Transform::new()
            .position(Vec3::Y)
            .euler(0.5, 0.0, 0.0)
            .uniform_scale(3.0);

        assert!(scene.set_transform(e, moved));
        assert_eq!(scene.transform(e), Some(moved));
    }

    #[test]
    fn spawn_with_attaches_extra_components() {
        let mut scene = Scene::new();
        let e = scene.spawn_with(
            Transform::new(),
            Renderable::new(Shape::Cube, Color::WHITE),
            (42u32,),
        );
        assert_eq!(*scene.world.get::<&u32>(e).unwrap(), 42);
    }
}
