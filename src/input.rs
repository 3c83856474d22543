use std::collections::HashSet;

use glam::{UVec2, Vec2};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Tracks input state for keyboard and mouse.
///
/// The host feeds window events in through [`Input::handle_event`]; the
/// lower-level `press_*`/`move_cursor` methods do the same work and let
/// headless code drive input directly.
#[derive(Clone, Debug, Default)]
pub struct Input {
    keys_down: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    keys_released: HashSet<KeyCode>,
    mouse_buttons_down: HashSet<MouseButton>,
    mouse_buttons_pressed: HashSet<MouseButton>,
    mouse_buttons_released: HashSet<MouseButton>,
    mouse_position: Vec2,
    mouse_delta: Vec2,
    scroll_delta: Vec2,
    /// Set once a real cursor position has been reported.
    cursor_seen: bool,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset per-frame state. Called by the host after every tick.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.mouse_buttons_pressed.clear();
        self.mouse_buttons_released.clear();
        self.mouse_delta = Vec2::ZERO;
        self.scroll_delta = Vec2::ZERO;
    }

    /// Process a window event and update input state.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => self.press_key(key),
                        ElementState::Released => self.release_key(key),
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => self.press_mouse(*button),
                ElementState::Released => self.release_mouse(*button),
            },
            WindowEvent::CursorMoved { position, .. } => {
                self.move_cursor(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let d = match delta {
                    MouseScrollDelta::LineDelta(x, y) => Vec2::new(*x, *y),
                    MouseScrollDelta::PixelDelta(pos) => {
                        Vec2::new(pos.x as f32, pos.y as f32) / 120.0
                    }
                };
                self.scroll(d);
            }
            _ => {}
        }
    }

    pub fn press_key(&mut self, key: KeyCode) {
        if self.keys_down.insert(key) {
            self.keys_pressed.insert(key);
        }
    }

    pub fn release_key(&mut self, key: KeyCode) {
        self.keys_down.remove(&key);
        self.keys_released.insert(key);
    }

    pub fn press_mouse(&mut self, button: MouseButton) {
        if self.mouse_buttons_down.insert(button) {
            self.mouse_buttons_pressed.insert(button);
        }
    }

    pub fn release_mouse(&mut self, button: MouseButton) {
        self.mouse_buttons_down.remove(&button);
        self.mouse_buttons_released.insert(button);
    }

    /// Move the cursor to a window position in pixels.
    pub fn move_cursor(&mut self, position: Vec2) {
        self.mouse_delta += position - self.mouse_position;
        self.mouse_position = position;
        self.cursor_seen = true;
    }

    /// Park the cursor at `position` until the first real movement arrives.
    /// Produces no mouse delta.
    fn park_cursor(&mut self, position: Vec2) {
        if !self.cursor_seen {
            self.mouse_position = position;
        }
    }

    /// Accumulate scroll wheel movement, in lines.
    pub fn scroll(&mut self, delta: Vec2) {
        self.scroll_delta += delta;
    }

    /// Returns true if the key is currently held down.
    pub fn key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Returns true if the key was pressed this frame.
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Returns true if the key was released this frame.
    pub fn key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    pub fn mouse_down(&self, button: MouseButton) -> bool {
        self.mouse_buttons_down.contains(&button)
    }

    pub fn mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse_buttons_pressed.contains(&button)
    }

    pub fn mouse_released(&self, button: MouseButton) -> bool {
        self.mouse_buttons_released.contains(&button)
    }

    /// Current mouse position in window pixels.
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// Mouse movement delta this frame.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Scroll wheel delta this frame (in "lines").
    pub fn scroll_delta(&self) -> Vec2 {
        self.scroll_delta
    }
}

/// Per-scene input and viewport state.
///
/// Event handlers write here between ticks and the next tick reads it. Both
/// happen on the host thread, so the fields need no synchronization.
#[derive(Clone, Debug)]
pub struct SceneContext {
    pub input: Input,
    viewport: UVec2,
}

impl Default for SceneContext {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl SceneContext {
    /// A context whose cursor rests at the viewport center until the host
    /// reports a real position.
    pub fn new(width: u32, height: u32) -> Self {
        let mut context = Self {
            input: Input::new(),
            viewport: UVec2::new(width.max(1), height.max(1)),
        };
        context.input.park_cursor(context.viewport.as_vec2() * 0.5);
        context
    }

    /// Record a new viewport size. Zero-sized (minimized) windows are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.viewport = UVec2::new(width, height);
            self.input.park_cursor(self.viewport.as_vec2() * 0.5);
        }
    }

    pub fn viewport(&self) -> UVec2 {
        self.viewport
    }

    pub fn aspect(&self) -> f32 {
        self.viewport.x as f32 / self.viewport.y as f32
    }

    /// Cursor position in `-0.5..0.5` on both axes, origin at the window
    /// center, y growing downward.
    pub fn cursor_centered(&self) -> Vec2 {
        self.input.mouse_position() / self.viewport.as_vec2() - Vec2::splat(0.5)
    }

    /// Cursor position in normalized device coordinates, `-1..1` with y up.
    pub fn cursor_ndc(&self) -> Vec2 {
        let p = self.input.mouse_position() / self.viewport.as_vec2();
        Vec2::new(p.x * 2.0 - 1.0, -(p.y * 2.0 - 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_press_is_reported_once() {
        let mut input = Input::new();
        input.press_key(KeyCode::Space);
        assert!(input.key_pressed(KeyCode::Space));

        input.begin_frame();
        input.press_key(KeyCode::Space); // key repeat
        assert!(input.key_down(KeyCode::Space));
        assert!(!input.key_pressed(KeyCode::Space));
    }

    #[test]
    fn cursor_delta_accumulates_until_frame_start() {
        let mut input = Input::new();
        input.move_cursor(Vec2::new(10.0, 0.0));
        input.move_cursor(Vec2::new(15.0, 5.0));
        assert_eq!(input.mouse_delta(), Vec2::new(15.0, 5.0));

        input.begin_frame();
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
        assert_eq!(input.mouse_position(), Vec2::new(15.0, 5.0));
    }

    #[test]
    fn cursor_coordinates_at_window_center() {
        let mut ctx = SceneContext::new(800, 600);
        ctx.input.move_cursor(Vec2::new(400.0, 300.0));

        assert_eq!(ctx.cursor_centered(), Vec2::ZERO);
        assert_eq!(ctx.cursor_ndc(), Vec2::ZERO);
    }

    #[test]
    fn ndc_flips_y() {
        let mut ctx = SceneContext::new(100, 100);
        ctx.input.move_cursor(Vec2::new(0.0, 0.0));
        assert_eq!(ctx.cursor_ndc(), Vec2::new(-1.0, 1.0));
        assert_eq!(ctx.cursor_centered(), Vec2::new(-0.5, -0.5));
    }

    #[test]
    fn cursor_starts_centered_until_moved() {
        let mut ctx = SceneContext::new(800, 600);
        assert_eq!(ctx.cursor_ndc(), Vec2::ZERO);

        ctx.resize(1024, 768);
        assert_eq!(ctx.input.mouse_position(), Vec2::new(512.0, 384.0));
        assert_eq!(ctx.input.mouse_delta(), Vec2::ZERO);

        ctx.input.move_cursor(Vec2::new(10.0, 20.0));
        ctx.resize(640, 480);
        assert_eq!(ctx.input.mouse_position(), Vec2::new(10.0, 20.0));
    }

    #[test]
    fn resize_ignores_zero_size() {
        let mut ctx = SceneContext::new(640, 480);
        ctx.resize(0, 0);
        assert_eq!(ctx.viewport(), UVec2::new(640, 480));
    }
}
