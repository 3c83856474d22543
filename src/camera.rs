use glam::{Mat4, Vec3};

/// A perspective camera for 3D scenes.
///
/// Provides position, orientation, field of view and clip planes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    pub fov: f32, // radians
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            forward: Vec3::NEG_Z,
            up: Vec3::Y,
            fov: 75f32.to_radians(),
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn looking_at(mut self, target: Vec3) -> Self {
        self.look_at(target);
        self
    }

    pub fn with_fov(mut self, fov_degrees: f32) -> Self {
        self.fov = fov_degrees.to_radians();
        self
    }

    /// Turn the camera toward `target` without moving it.
    pub fn look_at(&mut self, target: Vec3) {
        self.forward = (target - self.position).normalize_or(self.forward);
    }

    /// Right vector from forward and up.
    pub fn right(&self) -> Vec3 {
        self.forward.cross(self.up).normalize_or_zero()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov, aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn looking_at_points_forward_at_target() {
        let camera = Camera::new()
            .at(Vec3::new(0.0, 0.0, 6.0))
            .looking_at(Vec3::ZERO);

        assert_abs_diff_eq!(camera.forward.z, -1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(camera.right().x, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn look_at_own_position_keeps_previous_forward() {
        let mut camera = Camera::new();
        camera.look_at(camera.position);
        assert_eq!(camera.forward, Vec3::NEG_Z);
    }

    #[test]
    fn view_matrix_moves_target_in_front() {
        let camera = Camera::new().at(Vec3::new(0.0, 0.0, 3.0)).looking_at(Vec3::ZERO);
        let in_view = camera.view_matrix().transform_point3(Vec3::ZERO);
        assert_abs_diff_eq!(in_view.z, -3.0, epsilon = 1e-5);
    }
}
