//! Keyboard and mouse state, folded down to the renderer's action set.
//!
//! Event callbacks write into [`Input`]; the frame loop polls action flags
//! and *consumes* the accumulated look delta once per frame, so skipped
//! frames can never bank unbounded rotation.

use std::collections::HashSet;

use glam::Vec2;
use winit::event::{DeviceEvent, ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// A movement action the camera controller understands.
///
/// Physical keys map onto these; unrecognized keys are ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Forward,
    Back,
    Left,
    Right,
    Up,
    Down,
}

impl Action {
    /// Keyboard binding: WASD or arrows for horizontal movement, Space and
    /// Shift for vertical.
    pub fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::KeyW | KeyCode::ArrowUp => Some(Self::Forward),
            KeyCode::KeyS | KeyCode::ArrowDown => Some(Self::Back),
            KeyCode::KeyA | KeyCode::ArrowLeft => Some(Self::Left),
            KeyCode::KeyD | KeyCode::ArrowRight => Some(Self::Right),
            KeyCode::Space => Some(Self::Up),
            KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(Self::Down),
            _ => None,
        }
    }
}

/// Tracks input state between frames.
#[derive(Default)]
pub struct Input {
    keys_down: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    mouse_buttons_down: HashSet<MouseButton>,
    mouse_buttons_pressed: HashSet<MouseButton>,
    pointer_locked: bool,
    look_delta: Vec2,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call at the end of each frame to reset edge-triggered state.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.mouse_buttons_pressed.clear();
    }

    /// Process a window event and update input state.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => self.press(key),
                        ElementState::Released => self.release(key),
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => self.press_button(*button),
                ElementState::Released => self.release_button(*button),
            },
            _ => {}
        }
    }

    /// Process a raw device event. Mouse motion accumulates into the look
    /// delta only while look mode is engaged.
    pub fn handle_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.add_look_delta(Vec2::new(delta.0 as f32, delta.1 as f32));
        }
    }

    pub fn press(&mut self, key: KeyCode) {
        if !self.keys_down.contains(&key) {
            self.keys_pressed.insert(key);
        }
        self.keys_down.insert(key);
    }

    pub fn release(&mut self, key: KeyCode) {
        self.keys_down.remove(&key);
    }

    pub fn press_button(&mut self, button: MouseButton) {
        if !self.mouse_buttons_down.contains(&button) {
            self.mouse_buttons_pressed.insert(button);
        }
        self.mouse_buttons_down.insert(button);
    }

    pub fn release_button(&mut self, button: MouseButton) {
        self.mouse_buttons_down.remove(&button);
    }

    /// Record that pointer lock was engaged or released by the host.
    pub fn set_pointer_locked(&mut self, locked: bool) {
        self.pointer_locked = locked;
    }

    pub fn pointer_locked(&self) -> bool {
        self.pointer_locked
    }

    /// Look mode is engaged while the left mouse button is held or the
    /// pointer is locked. Either activation path works on its own.
    pub fn looking(&self) -> bool {
        self.pointer_locked || self.mouse_buttons_down.contains(&MouseButton::Left)
    }

    /// Accumulate mouse travel while look mode is engaged; ignored otherwise.
    pub fn add_look_delta(&mut self, delta: Vec2) {
        if self.looking() {
            self.look_delta += delta;
        }
    }

    /// Returns the accumulated look delta and resets it. Called exactly once
    /// per frame by the camera controller.
    pub fn take_look_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.look_delta)
    }

    /// Returns true if any key bound to the action is currently held.
    pub fn action_down(&self, action: Action) -> bool {
        self.keys_down
            .iter()
            .any(|&key| Action::from_key(key) == Some(action))
    }

    /// Returns true if the key is currently held down.
    pub fn key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Returns true if the key was pressed this frame.
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Returns true if the mouse button was pressed this frame.
    pub fn mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse_buttons_pressed.contains(&button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_map_from_bound_keys_only() {
        assert_eq!(Action::from_key(KeyCode::KeyW), Some(Action::Forward));
        assert_eq!(Action::from_key(KeyCode::ArrowLeft), Some(Action::Left));
        assert_eq!(Action::from_key(KeyCode::Space), Some(Action::Up));
        assert_eq!(Action::from_key(KeyCode::ShiftRight), Some(Action::Down));
        assert_eq!(Action::from_key(KeyCode::KeyQ), None);
        assert_eq!(Action::from_key(KeyCode::F12), None);
    }

    #[test]
    fn action_down_follows_key_state() {
        let mut input = Input::new();
        assert!(!input.action_down(Action::Forward));

        input.press(KeyCode::KeyW);
        assert!(input.action_down(Action::Forward));

        input.release(KeyCode::KeyW);
        assert!(!input.action_down(Action::Forward));

        // Alternate binding drives the same action
        input.press(KeyCode::ArrowUp);
        assert!(input.action_down(Action::Forward));
    }

    #[test]
    fn look_delta_requires_look_mode() {
        let mut input = Input::new();
        input.add_look_delta(Vec2::new(10.0, 5.0));
        assert_eq!(input.take_look_delta(), Vec2::ZERO);

        input.press_button(MouseButton::Left);
        input.add_look_delta(Vec2::new(10.0, 5.0));
        assert_eq!(input.take_look_delta(), Vec2::new(10.0, 5.0));
    }

    #[test]
    fn pointer_lock_is_an_alternative_look_path() {
        let mut input = Input::new();
        input.set_pointer_locked(true);
        assert!(input.looking());

        input.handle_device_event(&DeviceEvent::MouseMotion { delta: (3.0, -2.0) });
        input.handle_device_event(&DeviceEvent::MouseMotion { delta: (1.0, 1.0) });
        assert_eq!(input.take_look_delta(), Vec2::new(4.0, -1.0));
    }

    #[test]
    fn look_delta_is_consumed_once() {
        let mut input = Input::new();
        input.press_button(MouseButton::Left);
        input.add_look_delta(Vec2::new(2.0, 2.0));

        assert_eq!(input.take_look_delta(), Vec2::new(2.0, 2.0));
        assert_eq!(input.take_look_delta(), Vec2::ZERO);
    }

    #[test]
    fn pressed_is_edge_triggered() {
        let mut input = Input::new();
        input.press(KeyCode::Escape);
        assert!(input.key_pressed(KeyCode::Escape));

        input.begin_frame();
        assert!(!input.key_pressed(KeyCode::Escape));
        assert!(input.key_down(KeyCode::Escape));
    }
}
