//! Player input: logical actions and per-fighter key state
//!
//! The host polls its input device and forwards key-down / key-up events for
//! the four logical actions. Movement is resolved from held state plus the
//! most recent directional key, so holding both directions moves toward the
//! one pressed last.

use serde::{Deserialize, Serialize};

// ============================================================================
// Input Types
// ============================================================================

/// Logical actions a fighter can be driven by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    MoveLeft,
    MoveRight,
    Jump,
    Attack,
}

impl InputAction {
    pub fn is_directional(self) -> bool {
        matches!(self, InputAction::MoveLeft | InputAction::MoveRight)
    }
}

/// Horizontal movement intent derived from input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveIntent {
    Left,
    Right,
}

/// Queryable input state, as exposed by an input device adapter.
pub trait InputSource {
    fn is_pressed(&self, action: InputAction) -> bool;

    /// Most recent directional key, used to break left/right ties.
    fn last_direction(&self) -> Option<InputAction>;

    /// Resolve the held directional keys into a single movement intent.
    fn move_intent(&self) -> Option<MoveIntent> {
        match self.last_direction() {
            Some(InputAction::MoveLeft) if self.is_pressed(InputAction::MoveLeft) => {
                Some(MoveIntent::Left)
            }
            Some(InputAction::MoveRight) if self.is_pressed(InputAction::MoveRight) => {
                Some(MoveIntent::Right)
            }
            _ => None,
        }
    }
}

// ============================================================================
// Key State
// ============================================================================

/// Held flags plus the most-recent-direction tie-break
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyState {
    move_left: bool,
    move_right: bool,
    jump: bool,
    attack: bool,
    last_direction: Option<InputAction>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Returns true if the key was not already held.
    pub fn key_down(&mut self, action: InputAction) -> bool {
        let was_held = self.is_pressed(action);
        *self.slot(action) = true;
        if action.is_directional() {
            self.last_direction = Some(action);
        }
        !was_held
    }

    pub fn key_up(&mut self, action: InputAction) {
        *self.slot(action) = false;

        // Releasing the most recent direction hands movement back to the
        // other one if it is still held.
        if self.last_direction == Some(action) {
            self.last_direction = match action {
                InputAction::MoveLeft if self.move_right => Some(InputAction::MoveRight),
                InputAction::MoveRight if self.move_left => Some(InputAction::MoveLeft),
                _ => self.last_direction,
            };
        }
    }

    pub fn release_all(&mut self) {
        *self = Self::default();
    }

    fn slot(&mut self, action: InputAction) -> &mut bool {
        match action {
            InputAction::MoveLeft => &mut self.move_left,
            InputAction::MoveRight => &mut self.move_right,
            InputAction::Jump => &mut self.jump,
            InputAction::Attack => &mut self.attack,
        }
    }
}

impl InputSource for KeyState {
    fn is_pressed(&self, action: InputAction) -> bool {
        match action {
            InputAction::MoveLeft => self.move_left,
            InputAction::MoveRight => self.move_right,
            InputAction::Jump => self.jump,
            InputAction::Attack => self.attack,
        }
    }

    fn last_direction(&self) -> Option<InputAction> {
        self.last_direction
    }
}

// ============================================================================
// Tests
// ============================================================================
