//! The bundled demo scenes.
//!
//! Every demo builds its entities into a fresh [`Scene`] and then mutates
//! them from [`Demo::update`]. Look one up by name with [`by_name`].

mod debug_template;
mod first_scene;
mod galaxy;
mod lights;
mod materials;
mod physics;
mod raycaster;
mod scroll;
mod shadows;

pub use debug_template::{CubeControls, DebugTemplate};
pub use first_scene::FirstScene;
pub use galaxy::Galaxy;
pub use lights::Lights;
pub use materials::Materials;
pub use physics::PhysicsPlayground;
pub use raycaster::Raycaster;
pub use scroll::{Palette, ScrollSections};
pub use shadows::Shadows;

use crate::frame_loop::Demo;
use crate::scene::Scene;

/// Names accepted by [`by_name`], in launcher order.
pub const NAMES: [&str; 9] = [
    "first-scene",
    "debug-template",
    "raycaster",
    "physics",
    "scroll",
    "galaxy",
    "materials",
    "lights",
    "shadows",
];

/// Build the named demo and its scene.
pub fn by_name(name: &str) -> Option<(Box<dyn Demo>, Scene)> {
    let mut scene = Scene::new();
    let demo: Box<dyn Demo> = match name {
        "first-scene" => Box::new(FirstScene::setup(&mut scene)),
        "debug-template" => Box::new(DebugTemplate::setup(&mut scene)),
        "raycaster" => Box::new(Raycaster::setup(&mut scene)),
        "physics" => Box::new(PhysicsPlayground::setup(&mut scene)),
        "scroll" => Box::new(ScrollSections::setup(&mut scene)),
        "galaxy" => Box::new(Galaxy::setup(&mut scene)),
        "materials" => Box::new(Materials::setup(&mut scene)),
        "lights" => Box::new(Lights::setup(&mut scene)),
        "shadows" => Box::new(Shadows::setup(&mut scene)),
        _ => return None,
    };
    Some((demo, scene))
}
