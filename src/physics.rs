//! Rigid-body simulation paired with scene entities.
//!
//! [`PhysicsWorld`] wraps a `rapier3d` pipeline. Every dynamic body it creates
//! is paired with exactly one scene entity carrying a [`PhysicsBody`]
//! component; [`PhysicsWorld::sync`] copies body poses onto those entities
//! after each step, and [`PhysicsWorld::reset`] removes both halves together.

use glam::{Quat, Vec3};
use hecs::{Entity, World};
use rapier3d::prelude::*;

use crate::color::Color;
use crate::scene::{Renderable, Shape};
use crate::transform::Transform;

/// Simulation settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsConfig {
    pub gravity: Vec3,
    /// Friction applied to every collider, ground included.
    pub friction: f32,
    /// Restitution applied to every collider, ground included.
    pub restitution: f32,
    /// Let bodies at rest fall asleep.
    pub allow_sleep: bool,
    /// Length of one internal step in seconds. The frame loop steps with 1/60.
    pub fixed_dt: f32,
    /// Upper bound on internal steps per [`PhysicsWorld::step`] call.
    pub max_substeps: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.82, 0.0),
            friction: 0.1,
            restitution: 0.9,
            allow_sleep: true,
            fixed_dt: 1.0 / 60.0,
            max_substeps: 3,
        }
    }
}

impl PhysicsConfig {
    pub fn gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn allow_sleep(mut self, allow: bool) -> Self {
        self.allow_sleep = allow;
        self
    }
}

/// Component linking a scene entity to its rigid body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicsBody(pub RigidBodyHandle);

/// Parameters for [`PhysicsWorld::spawn_sphere`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereSpec {
    pub radius: f32,
    /// Zero or negative mass makes a static body.
    pub mass: f32,
    pub position: Vec3,
    pub color: Color,
}

impl Default for SphereSpec {
    fn default() -> Self {
        Self {
            radius: 1.0,
            mass: 1.0,
            position: Vec3::new(0.0, 5.0, 0.0),
            color: Color::WHITE,
        }
    }
}

/// Parameters for [`PhysicsWorld::spawn_box`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxSpec {
    /// Full edge lengths.
    pub size: Vec3,
    pub mass: f32,
    pub position: Vec3,
    pub color: Color,
}

impl Default for BoxSpec {
    fn default() -> Self {
        Self {
            size: Vec3::ONE,
            mass: 1.0,
            position: Vec3::new(0.0, 5.0, 0.0),
            color: Color::WHITE,
        }
    }
}

pub struct PhysicsWorld {
    config: PhysicsConfig,
    gravity: Vector<Real>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    accumulator: f32,
}

impl PhysicsWorld {
    pub fn new(config: PhysicsConfig) -> Self {
        let params = IntegrationParameters {
            dt: config.fixed_dt,
            ..IntegrationParameters::default()
        };

        Self {
            config,
            gravity: vector![config.gravity.x, config.gravity.y, config.gravity.z],
            params,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            accumulator: 0.0,
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Add an infinite static ground at height `y`, facing +Y.
    pub fn add_ground_plane(&mut self, y: f32) {
        let ground = ColliderBuilder::halfspace(Vector::y_axis())
            .translation(vector![0.0, y, 0.0])
            .friction(self.config.friction)
            .restitution(self.config.restitution)
            .build();
        self.colliders.insert(ground);
    }

    /// Create a sphere body and its visual entity at `spec.position`.
    pub fn spawn_sphere(&mut self, world: &mut World, spec: SphereSpec) -> Entity {
        let collider = ColliderBuilder::ball(spec.radius);
        let transform = Transform::from_position(spec.position).uniform_scale(spec.radius);
        self.spawn(world, collider, spec.mass, transform, Renderable::new(Shape::Sphere, spec.color))
    }

    /// Create a box body and its visual entity at `spec.position`.
    pub fn spawn_box(&mut self, world: &mut World, spec: BoxSpec) -> Entity {
        let half = spec.size * 0.5;
        let collider = ColliderBuilder::cuboid(half.x, half.y, half.z);
        let transform = Transform::from_position(spec.position).scale(spec.size);
        self.spawn(world, collider, spec.mass, transform, Renderable::new(Shape::Cube, spec.color))
    }

    fn spawn(
        &mut self,
        world: &mut World,
        collider: ColliderBuilder,
        mass: f32,
        transform: Transform,
        renderable: Renderable,
    ) -> Entity {
        let p = transform.position;
        let builder = if mass > 0.0 {
            RigidBodyBuilder::dynamic()
        } else {
            RigidBodyBuilder::fixed()
        };
        let body = builder
            .translation(vector![p.x, p.y, p.z])
            .can_sleep(self.config.allow_sleep)
            .build();
        let handle = self.bodies.insert(body);

        let mut collider = collider
            .friction(self.config.friction)
            .restitution(self.config.restitution);
        if mass > 0.0 {
            collider = collider.mass(mass);
        }
        self.colliders
            .insert_with_parent(collider.build(), handle, &mut self.bodies);

        let entity = world.spawn((transform, renderable, PhysicsBody(handle)));
        tracing::debug!(?entity, position = ?p, mass, "spawned physics body");
        entity
    }

    /// Advance the simulation by `real_dt` seconds of wall time.
    ///
    /// Time accumulates and is consumed in `fixed_dt` steps, at most
    /// `max_substeps` per call. Whatever remains after the cap is reduced
    /// modulo `fixed_dt`, so a long stall is dropped instead of replayed.
    /// Returns the number of internal steps taken.
    pub fn step(&mut self, fixed_dt: f32, real_dt: f32, max_substeps: u32) -> u32 {
        if fixed_dt <= 0.0 {
            return 0;
        }
        self.params.dt = fixed_dt;
        self.accumulator += real_dt.max(0.0);

        let mut substeps = 0;
        while self.accumulator >= fixed_dt && substeps < max_substeps {
            self.internal_step();
            self.accumulator -= fixed_dt;
            substeps += 1;
        }
        self.accumulator %= fixed_dt;
        substeps
    }

    fn internal_step(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Copy every tracked body's position and orientation onto its entity.
    ///
    /// Both fields are overwritten; scale is left alone since it carries the
    /// visual size of the shape.
    pub fn sync(&self, world: &mut World) {
        for (_, (transform, body)) in world.query_mut::<(&mut Transform, &PhysicsBody)>() {
            if let Some((position, rotation)) = self.pose(body.0) {
                transform.position = position;
                transform.rotation = rotation;
            }
        }
    }

    fn pose(&self, handle: RigidBodyHandle) -> Option<(Vec3, Quat)> {
        let body = self.bodies.get(handle)?;
        let t = body.translation();
        let r = body.rotation();
        Some((Vec3::new(t.x, t.y, t.z), Quat::from_xyzw(r.i, r.j, r.k, r.w)))
    }

    /// Current pose of the body paired with `entity`.
    pub fn body_transform(&self, world: &World, entity: Entity) -> Option<(Vec3, Quat)> {
        let handle = world.get::<&PhysicsBody>(entity).ok()?.0;
        self.pose(handle)
    }

    pub fn is_sleeping(&self, world: &World, entity: Entity) -> bool {
        world
            .get::<&PhysicsBody>(entity)
            .ok()
            .and_then(|b| self.bodies.get(b.0))
            .is_some_and(|b| b.is_sleeping())
    }

    /// Remove one body together with its entity.
    pub fn remove(&mut self, world: &mut World, entity: Entity) -> bool {
        let Ok(handle) = world.get::<&PhysicsBody>(entity).map(|b| b.0) else {
            return false;
        };
        self.remove_body(handle);
        world.despawn(entity).is_ok()
    }

    fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.bodies.remove(
            handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Remove every spawned body and despawn its entity. The ground stays.
    pub fn reset(&mut self, world: &mut World) -> usize {
        let linked: Vec<(Entity, RigidBodyHandle)> = world
            .query::<&PhysicsBody>()
            .iter()
            .map(|(entity, body)| (entity, body.0))
            .collect();

        for &(entity, handle) in &linked {
            self.remove_body(handle);
            // Collected from this world a moment ago.
            let _ = world.despawn(entity);
        }
        self.accumulator = 0.0;
        tracing::info!(removed = linked.len(), "physics world reset");
        linked.len()
    }

    /// Number of bodies paired with entities.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const DT: f32 = 1.0 / 60.0;

    fn world_with_ground(config: PhysicsConfig) -> (PhysicsWorld, World) {
        let mut physics = PhysicsWorld::new(config);
        physics.add_ground_plane(0.0);
        (physics, World::new())
    }

    #[test]
    fn sphere_settles_on_ground_without_passing_through() {
        let (mut physics, mut world) =
            world_with_ground(PhysicsConfig::default().restitution(0.3));
        let radius = 1.0;
        let ball = physics.spawn_sphere(
            &mut world,
            SphereSpec {
                radius,
                ..SphereSpec::default()
            },
        );

        for _ in 0..600 {
            physics.step(DT, DT, 3);
            physics.sync(&mut world);
            // the contact solver may let one fast step dip below the surface
            let y = world.get::<&Transform>(ball).unwrap().position.y;
            assert!(y > radius - 0.2, "sphere sank to {y}");
        }

        let y = world.get::<&Transform>(ball).unwrap().position.y;
        assert_abs_diff_eq!(y, radius, epsilon = 0.05);
    }

    #[test]
    fn sync_copies_pose_exactly() {
        let (mut physics, mut world) = world_with_ground(PhysicsConfig::default());
        let cube = physics.spawn_box(
            &mut world,
            BoxSpec {
                size: Vec3::new(1.0, 2.0, 0.5),
                position: Vec3::new(0.3, 4.0, -1.0),
                ..BoxSpec::default()
            },
        );
        let sphere = physics.spawn_sphere(&mut world, SphereSpec::default());

        for _ in 0..30 {
            physics.step(DT, DT, 3);
        }
        physics.sync(&mut world);

        for entity in [cube, sphere] {
            let (position, rotation) = physics.body_transform(&world, entity).unwrap();
            let transform = *world.get::<&Transform>(entity).unwrap();
            assert_eq!(transform.position, position);
            assert_eq!(transform.rotation, rotation);
        }
        assert_eq!(world.get::<&Transform>(cube).unwrap().scale, Vec3::new(1.0, 2.0, 0.5));
    }

    #[test]
    fn step_caps_substeps_and_keeps_remainder() {
        let mut physics = PhysicsWorld::new(PhysicsConfig::default());

        assert_eq!(physics.step(DT, DT * 0.5, 3), 0);
        assert_eq!(physics.step(DT, DT * 0.5, 3), 1);
        assert_eq!(physics.step(DT, 1.0, 3), 3);
        assert!(physics.accumulator < DT);
    }

    #[test]
    fn reset_removes_bodies_and_entities() {
        let (mut physics, mut world) = world_with_ground(PhysicsConfig::default());
        for _ in 0..3 {
            physics.spawn_sphere(&mut world, SphereSpec::default());
        }
        physics.spawn_box(&mut world, BoxSpec::default());
        let unrelated = world.spawn((Transform::new(),));

        assert_eq!(physics.body_count(), 4);
        assert_eq!(physics.reset(&mut world), 4);

        assert_eq!(physics.body_count(), 0);
        assert_eq!(world.len(), 1);
        assert!(world.contains(unrelated));
    }

    #[test]
    fn remove_single_body() {
        let (mut physics, mut world) = world_with_ground(PhysicsConfig::default());
        let a = physics.spawn_sphere(&mut world, SphereSpec::default());
        let b = physics.spawn_sphere(&mut world, SphereSpec::default());

        assert!(physics.remove(&mut world, a));
        assert!(!physics.remove(&mut world, a));
        assert_eq!(physics.body_count(), 1);
        assert!(world.contains(b));
    }
}
