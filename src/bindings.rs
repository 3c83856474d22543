//! Keyboard-driven debug bindings.
//!
//! A [`BindingPanel`] is an ordered list of tweakable values and one-shot
//! actions over some parameter struct `T`. Values are read and written
//! through plain accessor functions and always clamped to their range.
//!
//! | Key          | Effect                          |
//! |--------------|---------------------------------|
//! | Tab          | select next entry               |
//! | Shift+Tab    | select previous entry           |
//! | Up / Down    | nudge selected value by `step`  |
//! | Enter        | run selected action             |

use std::ops::RangeInclusive;

use winit::keyboard::KeyCode;

use crate::input::Input;
use crate::scene::Scene;

/// A named `f32` view into `T`.
pub struct Binding<T> {
    pub label: &'static str,
    pub range: RangeInclusive<f32>,
    pub step: f32,
    get: fn(&T) -> f32,
    set: fn(&mut T, f32),
}

impl<T> Binding<T> {
    pub fn value(&self, target: &T) -> f32 {
        (self.get)(target)
    }

    fn clamp(&self, value: f32) -> f32 {
        value.clamp(*self.range.start(), *self.range.end())
    }
}

/// A named operation on `T` and the scene.
pub struct Action<T> {
    pub label: &'static str,
    run: fn(&mut T, &mut Scene),
}

pub enum Entry<T> {
    Binding(Binding<T>),
    Action(Action<T>),
}

impl<T> Entry<T> {
    pub fn label(&self) -> &'static str {
        match self {
            Entry::Binding(b) => b.label,
            Entry::Action(a) => a.label,
        }
    }
}

/// One keyboard gesture understood by the panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelCommand {
    Next,
    Prev,
    Increase,
    Decrease,
    Trigger,
}

impl PanelCommand {
    /// Commands pressed this frame, in a fixed order.
    pub fn from_input(input: &Input) -> Vec<PanelCommand> {
        let mut commands = Vec::new();
        if input.key_pressed(KeyCode::Tab) {
            let shift = input.key_down(KeyCode::ShiftLeft) || input.key_down(KeyCode::ShiftRight);
            commands.push(if shift {
                PanelCommand::Prev
            } else {
                PanelCommand::Next
            });
        }
        if input.key_pressed(KeyCode::ArrowUp) {
            commands.push(PanelCommand::Increase);
        }
        if input.key_pressed(KeyCode::ArrowDown) {
            commands.push(PanelCommand::Decrease);
        }
        if input.key_pressed(KeyCode::Enter) {
            commands.push(PanelCommand::Trigger);
        }
        commands
    }
}

pub struct BindingPanel<T> {
    entries: Vec<Entry<T>>,
    selected: usize,
}

impl<T> Default for BindingPanel<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            selected: 0,
        }
    }
}

impl<T> BindingPanel<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a clamped value binding.
    pub fn binding(
        mut self,
        label: &'static str,
        range: RangeInclusive<f32>,
        step: f32,
        get: fn(&T) -> f32,
        set: fn(&mut T, f32),
    ) -> Self {
        self.entries.push(Entry::Binding(Binding {
            label,
            range,
            step,
            get,
            set,
        }));
        self
    }

    pub fn action(mut self, label: &'static str, run: fn(&mut T, &mut Scene)) -> Self {
        self.entries.push(Entry::Action(Action { label, run }));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry<T>] {
        &self.entries
    }

    /// Label of the selected entry.
    pub fn selected(&self) -> Option<&'static str> {
        self.entries.get(self.selected).map(Entry::label)
    }

    pub fn select_next(&mut self) {
        if !self.entries.is_empty() {
            self.selected = (self.selected + 1) % self.entries.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.entries.is_empty() {
            self.selected = (self.selected + self.entries.len() - 1) % self.entries.len();
        }
    }

    fn find_binding(&self, label: &str) -> Option<&Binding<T>> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Binding(b) if b.label == label => Some(b),
            _ => None,
        })
    }

    pub fn value(&self, target: &T, label: &str) -> Option<f32> {
        self.find_binding(label).map(|b| b.value(target))
    }

    /// Write a value, clamped to the binding's range. Returns the stored
    /// value, or `None` for an unknown label.
    pub fn set(&self, target: &mut T, label: &str, value: f32) -> Option<f32> {
        let binding = self.find_binding(label)?;
        let clamped = binding.clamp(value);
        (binding.set)(target, clamped);
        tracing::info!(binding = binding.label, value = clamped, "binding changed");
        Some(clamped)
    }

    /// Step the selected binding by `steps` increments. Does nothing when an
    /// action is selected.
    pub fn nudge(&self, target: &mut T, steps: f32) -> Option<f32> {
        match self.entries.get(self.selected)? {
            Entry::Binding(b) => {
                let next = b.value(target) + b.step * steps;
                self.set(target, b.label, next)
            }
            Entry::Action(_) => None,
        }
    }

    /// Run the selected action. Returns false when a binding is selected.
    pub fn trigger(&self, target: &mut T, scene: &mut Scene) -> bool {
        match self.entries.get(self.selected) {
            Some(Entry::Action(action)) => {
                tracing::info!(action = action.label, "action triggered");
                (action.run)(target, scene);
                true
            }
            _ => false,
        }
    }

    pub fn execute(&mut self, command: PanelCommand, target: &mut T, scene: &mut Scene) {
        match command {
            PanelCommand::Next => self.select_next(),
            PanelCommand::Prev => self.select_prev(),
            PanelCommand::Increase => {
                self.nudge(target, 1.0);
            }
            PanelCommand::Decrease => {
                self.nudge(target, -1.0);
            }
            PanelCommand::Trigger => {
                self.trigger(target, scene);
            }
        }
    }

    /// Apply this frame's key presses from the scene's input.
    pub fn handle_keys(&mut self, target: &mut T, scene: &mut Scene) {
        for command in PanelCommand::from_input(&scene.context.input) {
            self.execute(command, target, scene);
        }
    }

    /// One line per entry, the selected one marked with `>`.
    pub fn describe(&self, target: &T) -> Vec<String> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let marker = if i == self.selected { '>' } else { ' ' };
                match entry {
                    Entry::Binding(b) => format!(
                        "{marker} {} = {:.3} [{}..{}]",
                        b.label,
                        b.value(target),
                        b.range.start(),
                        b.range.end()
                    ),
                    Entry::Action(a) => format!("{marker} [{}]", a.label),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::scene::{Renderable, Shape};
    use crate::transform::Transform;

    #[derive(Default)]
    struct Params {
        radius: f32,
    }

    fn panel() -> BindingPanel<Params> {
        BindingPanel::<Params>::new()
            .binding("radius", 0.1..=3.0, 0.1, |p| p.radius, |p, v| p.radius = v)
            .action("spawn", |p, scene| {
                scene.spawn(
                    Transform::new().uniform_scale(p.radius),
                    Renderable::new(Shape::Sphere, Color::WHITE),
                );
            })
    }

    #[test]
    fn set_clamps_to_range() {
        let panel = panel();
        let mut params = Params::default();
        assert_eq!(panel.set(&mut params, "radius", 10.0), Some(3.0));
        assert_eq!(params.radius, 3.0);
        assert_eq!(panel.set(&mut params, "radius", -1.0), Some(0.1));
        assert_eq!(panel.set(&mut params, "missing", 1.0), None);
    }

    #[test]
    fn selection_wraps_both_ways() {
        let mut panel = panel();
        assert_eq!(panel.selected(), Some("radius"));
        panel.select_prev();
        assert_eq!(panel.selected(), Some("spawn"));
        panel.select_next();
        assert_eq!(panel.selected(), Some("radius"));
    }

    #[test]
    fn nudge_steps_selected_binding() {
        let panel = panel();
        let mut params = Params { radius: 1.0 };
        panel.nudge(&mut params, 1.0);
        assert!((params.radius - 1.1).abs() < 1e-6);
    }

    #[test]
    fn keys_select_and_trigger_action() {
        let mut panel = panel();
        let mut params = Params { radius: 0.5 };
        let mut scene = Scene::new();

        scene.context.input.press_key(KeyCode::Tab);
        scene.context.input.press_key(KeyCode::Enter);
        panel.handle_keys(&mut params, &mut scene);

        assert_eq!(panel.selected(), Some("spawn"));
        assert_eq!(scene.entity_count(), 1);
    }

    #[test]
    fn shift_tab_selects_previous() {
        let mut input = Input::new();
        input.press_key(KeyCode::ShiftLeft);
        input.press_key(KeyCode::Tab);
        assert_eq!(PanelCommand::from_input(&input), vec![PanelCommand::Prev]);
    }

    #[test]
    fn describe_marks_selection() {
        let panel = panel();
        let lines = panel.describe(&Params { radius: 1.0 });
        assert_eq!(lines, vec!["> radius = 1.000 [0.1..3]", "  [spawn]"]);
    }
}
