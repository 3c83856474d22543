//! Time-driven motion for scene entities.
//!
//! Two kinds of update run each tick:
//!
//! - **Absolute** ([`Motion`]): each driven field is a pure function of elapsed
//!   time. Applying it twice with the same elapsed gives the same transform, and
//!   any frame can be replayed from its timestamp.
//! - **Incremental** ([`Spin`], [`Tweens`], [`damp`]): fields advance by the
//!   tick's delta, so speed does not depend on the display refresh rate.
//!
//! ```
//! use vignette::{Channel, Motion, Oscillator, Transform};
//!
//! // y = sin(t) * 2, x = cos(t) * 3.5
//! let motion = Motion::new(Transform::new())
//!     .drive(Channel::PositionY, Oscillator::sin().amplitude(2.0))
//!     .drive(Channel::PositionX, Oscillator::cos().amplitude(3.5));
//!
//! let at_rest = motion.sample(0.0);
//! assert_eq!(at_rest.position.y, 0.0);
//! assert_eq!(at_rest.position.x, 3.5);
//! ```

use glam::{EulerRot, Quat, Vec3};

use crate::transform::Transform;

/// Periodic (or linear) function of time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wave {
    Sin,
    Cos,
    Tan,
    /// The input itself, for constant-rate rotation.
    Linear,
    /// `|sin x|`, a bounce that never dips below zero.
    AbsSin,
    AbsCos,
}

impl Wave {
    pub fn eval(self, x: f32) -> f32 {
        match self {
            Wave::Sin => x.sin(),
            Wave::Cos => x.cos(),
            Wave::Tan => x.tan(),
            Wave::Linear => x,
            Wave::AbsSin => x.sin().abs(),
            Wave::AbsCos => x.cos().abs(),
        }
    }
}

/// `offset + amplitude * wave(elapsed * frequency + phase)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Oscillator {
    pub wave: Wave,
    pub amplitude: f32,
    pub frequency: f32,
    pub phase: f32,
    pub offset: f32,
}

impl Oscillator {
    pub fn new(wave: Wave) -> Self {
        Self {
            wave,
            amplitude: 1.0,
            frequency: 1.0,
            phase: 0.0,
            offset: 0.0,
        }
    }

    pub fn sin() -> Self {
        Self::new(Wave::Sin)
    }

    pub fn cos() -> Self {
        Self::new(Wave::Cos)
    }

    pub fn tan() -> Self {
        Self::new(Wave::Tan)
    }

    /// Constant rate: `rate * elapsed`.
    pub fn linear(rate: f32) -> Self {
        Self::new(Wave::Linear).frequency(rate)
    }

    pub fn amplitude(mut self, amplitude: f32) -> Self {
        self.amplitude = amplitude;
        self
    }

    pub fn frequency(mut self, frequency: f32) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn phase(mut self, phase: f32) -> Self {
        self.phase = phase;
        self
    }

    pub fn offset(mut self, offset: f32) -> Self {
        self.offset = offset;
        self
    }

    pub fn sample(&self, elapsed: f32) -> f32 {
        self.offset + self.amplitude * self.wave.eval(elapsed * self.frequency + self.phase)
    }
}

/// A transform field an [`Oscillator`] can drive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    PositionX,
    PositionY,
    PositionZ,
    /// Euler X angle in radians (XYZ order).
    RotationX,
    RotationY,
    RotationZ,
}

/// Component that recomputes an entity's transform from elapsed time.
///
/// Fields without a driver keep their rest value. A driven field is replaced,
/// not added to, so the rest value of that field is ignored.
#[derive(Clone, Debug, PartialEq)]
pub struct Motion {
    rest: Transform,
    rest_euler: Vec3,
    drivers: Vec<(Channel, Oscillator)>,
}

impl Motion {
    pub fn new(rest: Transform) -> Self {
        Self {
            rest,
            rest_euler: rest.euler_angles(),
            drivers: Vec::new(),
        }
    }

    pub fn drive(mut self, channel: Channel, oscillator: Oscillator) -> Self {
        self.drivers.push((channel, oscillator));
        self
    }

    pub fn rest(&self) -> Transform {
        self.rest
    }

    /// The transform at `elapsed` seconds.
    pub fn sample(&self, elapsed: f32) -> Transform {
        let mut position = self.rest.position;
        let mut euler = self.rest_euler;
        let mut rotated = false;

        for (channel, osc) in &self.drivers {
            let value = osc.sample(elapsed);
            match channel {
                Channel::PositionX => position.x = value,
                Channel::PositionY => position.y = value,
                Channel::PositionZ => position.z = value,
                Channel::RotationX => (euler.x, rotated) = (value, true),
                Channel::RotationY => (euler.y, rotated) = (value, true),
                Channel::RotationZ => (euler.z, rotated) = (value, true),
            }
        }

        let rotation = if rotated {
            Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z)
        } else {
            self.rest.rotation
        };

        Transform {
            position,
            rotation,
            scale: self.rest.scale,
        }
    }
}

/// Write every [`Motion`]'s sample at `elapsed` into its entity's [`Transform`].
pub fn apply_motions(world: &mut hecs::World, elapsed: f32) {
    for (_, (transform, motion)) in world.query_mut::<(&mut Transform, &Motion)>() {
        *transform = motion.sample(elapsed);
    }
}

/// Component that rotates an entity at a constant angular rate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spin {
    /// Radians per second around each local axis.
    pub rate: Vec3,
}

impl Spin {
    pub fn new(rate: Vec3) -> Self {
        Self { rate }
    }
}

/// Explicit Euler angles (XYZ, radians) for entities rotated incrementally.
///
/// Without it, [`Spin`] and [`Tween`] compose small rotations onto the
/// quaternion. With it, they add to these angles and rebuild the rotation,
/// matching "rotation.x += ..." style animation exactly.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Euler(pub Vec3);

/// Advance every [`Spin`] by `delta` seconds.
pub fn apply_spins(world: &mut hecs::World, delta: f32) {
    for (_, (transform, spin, euler)) in
        world.query_mut::<(&mut Transform, &Spin, Option<&mut Euler>)>()
    {
        turn(transform, euler, spin.rate * delta);
    }
}

fn turn(transform: &mut Transform, euler: Option<&mut Euler>, by: Vec3) {
    match euler {
        Some(Euler(angles)) => {
            *angles += by;
            transform.rotation = Quat::from_euler(EulerRot::XYZ, angles.x, angles.y, angles.z);
        }
        None => {
            transform.rotation =
                (transform.rotation * Quat::from_euler(EulerRot::XYZ, by.x, by.y, by.z))
                    .normalize();
        }
    }
}

/// Frame-rate-independent smoothing of `current` toward `target`.
///
/// Moves `rate * delta` of the remaining distance, capped so a long frame
/// lands on the target instead of overshooting it.
pub fn damp(current: f32, target: f32, rate: f32, delta: f32) -> f32 {
    current + (target - current) * (rate * delta).min(1.0)
}

/// [`damp`] applied per component.
pub fn damp_vec3(current: Vec3, target: Vec3, rate: f32, delta: f32) -> Vec3 {
    current + (target - current) * (rate * delta).min(1.0)
}

/// Acceleration curves for tweens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    /// Constant speed throughout.
    #[default]
    Linear,
    /// Start slow, accelerate.
    EaseIn,
    /// Start fast, decelerate.
    EaseOut,
    /// Start slow, speed up, then slow down.
    EaseInOut,
    /// Cubic variant of [`Easing::EaseInOut`] with a sharper middle.
    EaseInOutCubic,
}

impl Easing {
    /// Map linear progress (clamped to 0..1) onto the curve.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Adds `by` (Euler XYZ radians) to an entity's rotation over `duration` seconds.
///
/// The tween is relative: it applies the eased increment since its last
/// sample, so it composes with [`Spin`] running on the same entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    pub entity: hecs::Entity,
    pub by: Vec3,
    pub duration: f32,
    pub easing: Easing,
    elapsed: f32,
    applied: f32,
}

impl Tween {
    pub fn rotate_by(entity: hecs::Entity, by: Vec3, duration: f32, easing: Easing) -> Self {
        Self {
            entity,
            by,
            duration,
            easing,
            elapsed: 0.0,
            applied: 0.0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Step the tween and return the rotation increment for this step.
    fn step(&mut self, delta: f32) -> Vec3 {
        self.elapsed += delta;
        let progress = if self.duration > 0.0 {
            self.easing.apply(self.elapsed / self.duration)
        } else {
            1.0
        };
        let increment = progress - self.applied;
        self.applied = progress;
        self.by * increment
    }
}

/// The set of running tweens for a scene.
#[derive(Clone, Debug, Default)]
pub struct Tweens {
    active: Vec<Tween>,
}

impl Tweens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, tween: Tween) {
        self.active.push(tween);
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Advance all tweens by `delta`, apply their increments and drop the
    /// finished ones. Tweens whose entity was despawned are dropped too.
    pub fn advance(&mut self, world: &mut hecs::World, delta: f32) {
        self.active.retain_mut(|tween| {
            let increment = tween.step(delta);
            match world.query_one_mut::<(&mut Transform, Option<&mut Euler>)>(tween.entity) {
                Ok((transform, euler)) => {
                    turn(transform, euler, increment);
                    !tween.is_finished()
                }
                Err(_) => false,
            }
        });
    }
}
