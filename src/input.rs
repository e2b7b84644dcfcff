//! Player input
//!
//! Physical inputs (held keys, on-screen touch buttons) are collected between
//! frames and resolved to a logical `Intent` once per step. Several physical
//! inputs map to the same intent and are OR'd together.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Logical movement request for one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
}

impl Intent {
    pub const IDLE: Intent = Intent { move_left: false, move_right: false, jump: false };

    pub fn right() -> Self {
        Self { move_right: true, ..Self::IDLE }
    }

    pub fn left() -> Self {
        Self { move_left: true, ..Self::IDLE }
    }

    pub fn with_jump(mut self) -> Self {
        self.jump = true;
        self
    }
}

/// On-screen touch buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchButton {
    Left,
    Right,
    Jump,
}

impl TouchButton {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" => Some(TouchButton::Left),
            "right" => Some(TouchButton::Right),
            "jump" | "up" => Some(TouchButton::Jump),
            _ => None,
        }
    }
}

pub const LEFT_KEYS: [&str; 3] = ["ArrowLeft", "a", "A"];
pub const RIGHT_KEYS: [&str; 3] = ["ArrowRight", "d", "D"];
pub const JUMP_KEYS: [&str; 4] = ["ArrowUp", "w", "W", " "];

/// Keys whose browser default (scrolling) must be suppressed while playing
pub fn is_game_key(key: &str) -> bool {
    matches!(key, "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight" | " ")
}

/// Held keys and touch buttons, mutated by input handlers between frames
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys: HashSet<String>,
    touch_left: bool,
    touch_right: bool,
    touch_jump: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: &str) {
        self.keys.insert(key.to_string());
    }

    pub fn key_up(&mut self, key: &str) {
        self.keys.remove(key);
    }

    pub fn set_touch(&mut self, button: TouchButton, held: bool) {
        match button {
            TouchButton::Left => self.touch_left = held,
            TouchButton::Right => self.touch_right = held,
            TouchButton::Jump => self.touch_jump = held,
        }
    }

    /// Release every key and button (respawn, screen change)
    pub fn clear(&mut self) {
        self.keys.clear();
        self.touch_left = false;
        self.touch_right = false;
        self.touch_jump = false;
    }

    fn any_held(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.keys.contains(*k))
    }

    /// Resolve the current logical intent
    ///
    /// Left takes precedence when both directions are held.
    pub fn intent(&self) -> Intent {
        let move_left = self.any_held(&LEFT_KEYS) || self.touch_left;
        let move_right = !move_left && (self.any_held(&RIGHT_KEYS) || self.touch_right);
        Intent {
            move_left,
            move_right,
            jump: self.any_held(&JUMP_KEYS) || self.touch_jump,
        }
    }
}
