//! Position, rotation and scale of scene entities.
//!
//! [`Transform`] is the component every animated or simulated entity carries.
//! It uses a builder pattern for construction:
//!
//! ```
//! use vignette::{Quat, Transform, Vec3};
//!
//! let transform = Transform::new()
//!     .position(Vec3::new(0.0, 2.0, -5.0))
//!     .rotation(Quat::from_rotation_y(0.5))
//!     .uniform_scale(2.0);
//! assert_eq!(transform.scale, Vec3::splat(2.0));
//! ```

use glam::{EulerRot, Mat4, Quat, Vec3};

/// A 3D transformation: translation, rotation quaternion and per-axis scale.
///
/// [`Transform::matrix`] composes them in Scale, Rotate, Translate order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// World-space position.
    pub position: Vec3,
    /// Rotation as a unit quaternion.
    pub rotation: Quat,
    /// Scale factors for each axis.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Identity transform: origin, no rotation, unit scale.
    pub fn new() -> Self {
        Self::default()
    }

    /// A transform positioned at `position` with no rotation or scaling.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the rotation from Euler angles in radians, applied in X, Y, Z order.
    pub fn euler(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Quat::from_euler(EulerRot::XYZ, x, y, z);
        self
    }

    pub fn scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// The rotation as XYZ Euler angles in radians.
    pub fn euler_angles(&self) -> Vec3 {
        let (x, y, z) = self.rotation.to_euler(EulerRot::XYZ);
        Vec3::new(x, y, z)
    }

    /// The 4x4 model matrix for this transform.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn matrix_applies_scale_before_translation() {
        let transform = Transform::new()
            .position(Vec3::new(1.0, 0.0, 0.0))
            .uniform_scale(2.0);

        let point = transform.matrix().transform_point3(Vec3::X);
        assert_abs_diff_eq!(point.x, 3.0, epsilon = 1e-6);
    }

    #[test]
    fn euler_round_trips_small_angles() {
        let transform = Transform::new().euler(0.1, 0.2, 0.3);
        let angles = transform.euler_angles();

        assert_abs_diff_eq!(angles.x, 0.1, epsilon = 1e-5);
        assert_abs_diff_eq!(angles.y, 0.2, epsilon = 1e-5);
        assert_abs_diff_eq!(angles.z, 0.3, epsilon = 1e-5);
    }
}
