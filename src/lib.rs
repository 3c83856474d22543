//! # Vignette
//!
//! **A frame loop for small animated 3D scenes.**
//!
//! A [`Scene`] holds `hecs` entities, a camera and optionally a rapier
//! [`PhysicsWorld`]. A [`Demo`] mutates the scene once per frame, and the
//! [`FrameLoop`] ties it together: sample the clock, update the demo, step
//! physics, render, request the next frame.
//!
//! ## Quick Start
//!
//! ```no_run
//! use vignette::*;
//!
//! struct Spinner;
//!
//! impl Demo for Spinner {
//!     fn name(&self) -> &str {
//!         "spinner"
//!     }
//!
//!     fn update(&mut self, scene: &mut Scene, time: FrameTime) {
//!         apply_motions(&mut scene.world, time.elapsed);
//!     }
//! }
//!
//! fn main() -> Result<(), AppError> {
//!     let mut scene = Scene::new();
//!     let cube = Motion::new(Transform::new()).drive(Channel::RotationY, Oscillator::linear(1.0));
//!     scene.spawn_with(Transform::new(), Renderable::new(Shape::Cube, Color::RED), (cube,));
//!
//!     run(AppConfig::new(), Box::new(Spinner), scene)
//! }
//! ```
//!
//! Headless code (tests, tools) drives the same loop with a [`ManualClock`]
//! and any [`Renderer`] and [`FrameScheduler`] it likes.

mod animation;
mod app;
mod bindings;
mod camera;
mod clock;
mod color;
pub mod demos;
mod error;
mod frame_loop;
mod gpu;
mod input;
mod mesh;
mod mesh_pass;
mod orbit_camera;
mod physics;
mod picking;
mod render;
mod scene;
mod transform;

pub use animation::{
    Channel, Easing, Euler, Motion, Oscillator, Spin, Tween, Tweens, Wave, apply_motions,
    apply_spins, damp, damp_vec3,
};
pub use app::{AppConfig, run};
pub use bindings::{Action, Binding, BindingPanel, Entry, PanelCommand};
pub use camera::Camera;
pub use clock::{Clock, FirstTick, FrameTime, FrameTimer, ManualClock, SystemClock};
pub use color::Color;
pub use error::{AppError, GpuError, LoopError, RenderError};
pub use frame_loop::{Demo, FrameLoop, FrameScheduler, LoopState, StopHandle, TickOutcome};
pub use gpu::GpuContext;
pub use input::{Input, SceneContext};
pub use mesh::{GpuMesh, MeshData, Vertex3d};
pub use mesh_pass::{CameraUniforms, InstanceRaw, MeshPass};
pub use orbit_camera::{OrbitCamera, OrbitMode};
pub use physics::{BoxSpec, PhysicsBody, PhysicsConfig, PhysicsWorld, SphereSpec};
pub use render::{DrawItem, GpuRenderer, Renderer, batches, collect_draws};
pub use scene::{Renderable, Scene, Shape};
pub use transform::Transform;

// Re-export glam math types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

// Re-export commonly used winit types for convenience
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

// ECS storage
pub use hecs::{Entity, World};

// 3D picking and hover tracking
pub use picking::{Collider, HoverEvent, HoverTracker, Ray, RayHit, raycast, raycast_all};
