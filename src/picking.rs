//! Raycasting against scene entities and hover tracking.
//!
//! - [`Ray`]: a world-space ray, usually built from the cursor through the camera
//! - [`Collider`]: a cheap box or sphere shape attached to an entity for hit tests
//! - [`raycast_all`]: every entity hit by a ray, nearest first
//! - [`HoverTracker`]: turns successive nearest hits into enter/leave transitions

use glam::{Vec2, Vec3, Vec4};

use crate::camera::Camera;
use crate::transform::Transform;

/// A ray with an origin and a normalized direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray; `direction` is normalized.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Ray from the camera through a point in normalized device coordinates
    /// (`-1..1`, y up), such as [`SceneContext::cursor_ndc`](crate::SceneContext::cursor_ndc).
    pub fn from_camera(ndc: Vec2, camera: &Camera, aspect: f32) -> Self {
        let inv_view_proj = (camera.projection_matrix(aspect) * camera.view_matrix()).inverse();

        let near = inv_view_proj * Vec4::new(ndc.x, ndc.y, 0.0, 1.0);
        let far = inv_view_proj * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let near = near.truncate() / near.w;
        let far = far.truncate() / far.w;

        Self::new(near, far - near)
    }

    #[inline]
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance to the nearest forward intersection with an axis-aligned box.
    pub fn intersect_aabb(&self, min: Vec3, max: Vec3) -> Option<f32> {
        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let origin = self.origin[axis];
            let dir = self.direction[axis];

            if dir.abs() < f32::EPSILON {
                if origin < min[axis] || origin > max[axis] {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / dir;
            let (t1, t2) = {
                let a = (min[axis] - origin) * inv;
                let b = (max[axis] - origin) * inv;
                if a > b { (b, a) } else { (a, b) }
            };
            t_min = t_min.max(t1);
            t_max = t_max.min(t2);
            if t_min > t_max {
                return None;
            }
        }

        nearest_forward(t_min, t_max)
    }

    /// Distance to the nearest forward intersection with a sphere.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        // direction is unit length, so the quadratic's `a` term is 1
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let root = discriminant.sqrt();
        nearest_forward(-b - root, -b + root)
    }
}

fn nearest_forward(near: f32, far: f32) -> Option<f32> {
    if near > 0.0 {
        Some(near)
    } else if far > 0.0 {
        Some(far)
    } else {
        None
    }
}

/// Hit-test shape attached to an entity alongside its [`Transform`].
///
/// Sizes are in local units and get multiplied by the transform's scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Collider {
    Box { half_extents: Vec3 },
    Sphere { radius: f32 },
}

impl Collider {
    /// Box collider from full dimensions.
    pub fn cuboid(size: Vec3) -> Self {
        Self::Box {
            half_extents: size * 0.5,
        }
    }

    pub fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    /// Ray distance to this collider placed at `transform`. Rotation is ignored.
    pub fn intersect(&self, ray: &Ray, transform: &Transform) -> Option<f32> {
        match *self {
            Collider::Box { half_extents } => {
                let half = half_extents * transform.scale;
                ray.intersect_aabb(transform.position - half, transform.position + half)
            }
            Collider::Sphere { radius } => {
                ray.intersect_sphere(transform.position, radius * transform.scale.max_element())
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub entity: hecs::Entity,
    pub distance: f32,
    pub point: Vec3,
}

/// All entities with a [`Transform`] and [`Collider`] hit by `ray`, nearest first.
pub fn raycast_all(world: &hecs::World, ray: &Ray) -> Vec<RayHit> {
    let mut hits: Vec<RayHit> = world
        .query::<(&Transform, &Collider)>()
        .iter()
        .filter_map(|(entity, (transform, collider))| {
            collider.intersect(ray, transform).map(|distance| RayHit {
                entity,
                distance,
                point: ray.point_at(distance),
            })
        })
        .collect();

    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

/// The nearest hit, if any.
pub fn raycast(world: &hecs::World, ray: &Ray) -> Option<RayHit> {
    raycast_all(world, ray).into_iter().next()
}

/// Change in what the cursor is hovering between two ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoverEvent {
    /// Nothing was hovered and now `entity` is.
    Enter(hecs::Entity),
    /// `entity` was hovered and now nothing is.
    Leave(hecs::Entity),
    /// The hovered entity changed directly from one to another.
    Switch {
        from: hecs::Entity,
        to: hecs::Entity,
    },
}

/// Remembers the currently hovered entity across ticks.
#[derive(Clone, Copy, Debug, Default)]
pub struct HoverTracker {
    current: Option<hecs::Entity>,
}

impl HoverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<hecs::Entity> {
        self.current
    }

    /// Record this tick's nearest hit and report the transition, if any.
    pub fn update(&mut self, nearest: Option<hecs::Entity>) -> Option<HoverEvent> {
        let event = match (self.current, nearest) {
            (None, Some(to)) => Some(HoverEvent::Enter(to)),
            (Some(from), None) => Some(HoverEvent::Leave(from)),
            (Some(from), Some(to)) if from != to => Some(HoverEvent::Switch { from, to }),
            _ => None,
        };
        self.current = nearest;
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn sphere_hit_distance() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let t = ray.intersect_sphere(Vec3::ZERO, 0.5).unwrap();
        assert_abs_diff_eq!(t, 4.5, epsilon = 1e-5);
    }

    #[test]
    fn sphere_behind_ray_is_missed() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!(ray.intersect_sphere(Vec3::ZERO, 0.5).is_none());
    }

    #[test]
    fn aabb_from_inside_hits_far_face() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let t = ray.intersect_aabb(Vec3::splat(-1.0), Vec3::splat(1.0)).unwrap();
        assert_abs_diff_eq!(t, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn center_ray_points_along_camera_forward() {
        let camera = Camera::new().at(Vec3::new(0.0, 0.0, 5.0)).looking_at(Vec3::ZERO);
        let ray = Ray::from_camera(Vec2::ZERO, &camera, 1.5);

        assert_abs_diff_eq!(ray.direction.z, -1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(ray.origin.x, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn raycast_sorts_nearest_first() {
        let mut world = hecs::World::new();
        let far = world.spawn((Transform::from_position(Vec3::new(0.0, 0.0, -4.0)), Collider::sphere(0.5)));
        let near = world.spawn((Transform::from_position(Vec3::ZERO), Collider::sphere(0.5)));

        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let hits = raycast_all(&world, &ray);

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].entity, near);
        assert_eq!(hits[1].entity, far);
    }

    #[test]
    fn hover_reports_enter_and_leave_once() {
        let mut world = hecs::World::new();
        let a = world.spawn(());
        let mut hover = HoverTracker::new();

        assert_eq!(hover.update(Some(a)), Some(HoverEvent::Enter(a)));
        assert_eq!(hover.update(Some(a)), None);
        assert_eq!(hover.update(None), Some(HoverEvent::Leave(a)));
        assert_eq!(hover.update(None), None);
    }
}
