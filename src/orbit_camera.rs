use std::f32::consts::FRAC_PI_2;

use glam::Vec3;
use winit::event::MouseButton;

use crate::animation::damp;
use crate::camera::Camera;
use crate::input::Input;

const ELEVATION_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// Controls how the orbit camera moves.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum OrbitMode {
    /// Mouse drag rotates, scroll zooms.
    #[default]
    Interactive,
    /// Camera turns around the target on its own, ignoring input.
    AutoRotate {
        /// Radians per second, counterclockwise seen from above.
        speed: f32,
    },
}

/// A camera controller that orbits a target point.
///
/// Input moves a goal orientation. With damping enabled the visible
/// orientation eases toward the goal each update instead of snapping to it.
///
/// ```
/// use vignette::{OrbitCamera, Vec3};
///
/// let orbit = OrbitCamera::new().target(Vec3::ZERO).distance(10.0).damping(5.0);
/// let camera = orbit.camera();
/// assert!((camera.position.length() - 10.0).abs() < 1e-4);
/// ```
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub mode: OrbitMode,
    /// Field of view in radians.
    pub fov: f32,
    pub sensitivity: f32,
    pub zoom_sensitivity: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Exponential smoothing rate; `None` snaps straight to the goal.
    pub damping: Option<f32>,
    distance: f32,
    azimuth: f32,
    elevation: f32,
    goal_distance: f32,
    goal_azimuth: f32,
    goal_elevation: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            mode: OrbitMode::Interactive,
            fov: 75f32.to_radians(),
            sensitivity: 0.005,
            zoom_sensitivity: 0.5,
            min_distance: 0.5,
            max_distance: 500.0,
            damping: None,
            distance: 5.0,
            azimuth: 0.0,
            elevation: 0.3,
            goal_distance: 5.0,
            goal_azimuth: 0.0,
            goal_elevation: 0.3,
        }
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Orbit camera placed so that it sits at `position` looking at `target`.
    pub fn looking_from(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let distance = offset.length().max(f32::EPSILON);
        Self::new()
            .target(target)
            .distance(distance)
            .azimuth(offset.x.atan2(offset.z))
            .elevation((offset.y / distance).asin())
    }

    pub fn target(mut self, target: impl Into<Vec3>) -> Self {
        self.target = target.into();
        self
    }

    pub fn distance(mut self, distance: f32) -> Self {
        self.distance = distance.clamp(self.min_distance, self.max_distance);
        self.goal_distance = self.distance;
        self
    }

    pub fn mode(mut self, mode: OrbitMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the field of view in degrees.
    pub fn fov(mut self, fov_degrees: f32) -> Self {
        self.fov = fov_degrees.to_radians();
        self
    }

    pub fn azimuth(mut self, azimuth: f32) -> Self {
        self.azimuth = azimuth;
        self.goal_azimuth = azimuth;
        self
    }

    pub fn elevation(mut self, elevation: f32) -> Self {
        self.elevation = elevation.clamp(-ELEVATION_LIMIT, ELEVATION_LIMIT);
        self.goal_elevation = self.elevation;
        self
    }

    pub fn sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    pub fn damping(mut self, rate: f32) -> Self {
        self.damping = Some(rate);
        self
    }

    pub fn current_distance(&self) -> f32 {
        self.distance
    }

    pub fn current_azimuth(&self) -> f32 {
        self.azimuth
    }

    /// Apply this frame's input and ease toward the goal.
    pub fn update(&mut self, input: &Input, dt: f32) {
        match self.mode {
            OrbitMode::Interactive => {
                if input.mouse_down(MouseButton::Left) {
                    let delta = input.mouse_delta();
                    self.goal_azimuth -= delta.x * self.sensitivity;
                    self.goal_elevation = (self.goal_elevation + delta.y * self.sensitivity)
                        .clamp(-ELEVATION_LIMIT, ELEVATION_LIMIT);
                }

                let scroll = input.scroll_delta();
                if scroll.y != 0.0 {
                    self.goal_distance = (self.goal_distance - scroll.y * self.zoom_sensitivity)
                        .clamp(self.min_distance, self.max_distance);
                }
            }
            OrbitMode::AutoRotate { speed } => {
                self.goal_azimuth += speed * dt;
            }
        }

        match self.damping {
            Some(rate) => {
                self.azimuth = damp(self.azimuth, self.goal_azimuth, rate, dt);
                self.elevation = damp(self.elevation, self.goal_elevation, rate, dt);
                self.distance = damp(self.distance, self.goal_distance, rate, dt);
            }
            None => {
                self.azimuth = self.goal_azimuth;
                self.elevation = self.goal_elevation;
                self.distance = self.goal_distance;
            }
        }
    }

    pub fn camera(&self) -> Camera {
        let offset = Vec3::new(
            self.distance * self.elevation.cos() * self.azimuth.sin(),
            self.distance * self.elevation.sin(),
            self.distance * self.elevation.cos() * self.azimuth.cos(),
        );

        Camera::new()
            .at(self.target + offset)
            .looking_at(self.target)
            .with_fov(self.fov.to_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use glam::Vec2;

    #[test]
    fn looking_from_reproduces_position() {
        let position = Vec3::new(0.0, 50.0, 100.0);
        let orbit = OrbitCamera::looking_from(position, Vec3::ZERO);
        let camera = orbit.camera();
        assert_abs_diff_eq!(camera.position.x, position.x, epsilon = 1e-3);
        assert_abs_diff_eq!(camera.position.y, position.y, epsilon = 1e-3);
        assert_abs_diff_eq!(camera.position.z, position.z, epsilon = 1e-3);
    }

    #[test]
    fn undamped_drag_snaps() {
        let mut orbit = OrbitCamera::new();
        let mut input = Input::new();
        input.press_mouse(MouseButton::Left);
        input.move_cursor(Vec2::ZERO);
        input.begin_frame();
        input.move_cursor(Vec2::new(100.0, 0.0));

        orbit.update(&input, 1.0 / 60.0);
        assert_abs_diff_eq!(orbit.current_azimuth(), -0.5, epsilon = 1e-5);
    }

    #[test]
    fn damped_zoom_approaches_goal() {
        let mut orbit = OrbitCamera::new().distance(10.0).damping(5.0);
        let mut input = Input::new();
        input.scroll(Vec2::new(0.0, 4.0));

        orbit.update(&input, 1.0 / 60.0);
        let first = orbit.current_distance();
        assert!(first < 10.0 && first > 8.0);

        input.begin_frame();
        for _ in 0..300 {
            orbit.update(&input, 1.0 / 60.0);
        }
        assert_abs_diff_eq!(orbit.current_distance(), 8.0, epsilon = 1e-3);
    }

    #[test]
    fn auto_rotate_ignores_input() {
        let mut orbit = OrbitCamera::new().mode(OrbitMode::AutoRotate { speed: 1.0 });
        let mut input = Input::new();
        input.scroll(Vec2::new(0.0, 4.0));
        orbit.update(&input, 0.5);
        assert_abs_diff_eq!(orbit.current_azimuth(), 0.5);
        assert_abs_diff_eq!(orbit.current_distance(), 5.0);
    }
}
