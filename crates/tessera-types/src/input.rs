//! Frame input snapshot.
//!
//! The driver polls the host engine once per frame and rebuilds an
//! [`InputState`]; widgets read it during `update`. Transient fields
//! (clicks, typed text, wheel) are cleared at the start of each frame.

use crate::geometry::ViewRect;

/// Mouse buttons the toolkit reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    fn index(self) -> usize {
        match self {
            MouseButton::Left => 0,
            MouseButton::Right => 1,
            MouseButton::Middle => 2,
        }
    }
}

/// Non-character keys widgets consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Backspace,
    Delete,
    Enter,
    Tab,
    Escape,
}

/// One frame's worth of input.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub mouse_x: i32,
    pub mouse_y: i32,
    /// Wheel movement this frame; positive scrolls up.
    pub wheel_delta: i32,
    down: [bool; 3],
    just_pressed: [bool; 3],
    just_released: [bool; 3],
    typed: Vec<char>,
    keys: Vec<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear transient state; call before feeding this frame's events.
    pub fn begin_frame(&mut self) {
        self.just_pressed = [false; 3];
        self.just_released = [false; 3];
        self.wheel_delta = 0;
        self.typed.clear();
        self.keys.clear();
    }

    pub fn set_mouse_position(&mut self, x: i32, y: i32) {
        self.mouse_x = x;
        self.mouse_y = y;
    }

    pub fn press(&mut self, button: MouseButton) {
        let i = button.index();
        if !self.down[i] {
            self.just_pressed[i] = true;
        }
        self.down[i] = true;
    }

    pub fn release(&mut self, button: MouseButton) {
        let i = button.index();
        if self.down[i] {
            self.just_released[i] = true;
        }
        self.down[i] = false;
    }

    pub fn push_char(&mut self, ch: char) {
        self.typed.push(ch);
    }

    pub fn push_key(&mut self, key: Key) {
        self.keys.push(key);
    }

    /// Whether the button is currently held.
    pub fn is_down(&self, button: MouseButton) -> bool {
        self.down[button.index()]
    }

    /// Whether the button went down this frame.
    pub fn was_pressed(&self, button: MouseButton) -> bool {
        self.just_pressed[button.index()]
    }

    /// Whether the button went up this frame.
    pub fn was_released(&self, button: MouseButton) -> bool {
        self.just_released[button.index()]
    }

    /// Characters typed this frame, in order.
    pub fn typed(&self) -> &[char] {
        &self.typed
    }

    /// Non-character keys pressed this frame, in order.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    /// Whether the cursor is inside `rect`.
    pub fn mouse_in(&self, rect: ViewRect) -> bool {
        rect.contains(self.mouse_x, self.mouse_y)
    }
}
