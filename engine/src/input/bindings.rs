//! Input Bindings Module
//!
//! Maps physical keys to logical actions. Every movement action accepts a
//! primary and an alternate key (WASD plus arrows by default), so the map is
//! many-keys-to-one-action.

use std::collections::{HashMap, HashSet};

use super::KeyCode;
use crate::config::KeySettings;

/// Logical input actions that can be bound to physical keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    /// Move forward / up (default: W, ArrowUp)
    MoveForward,
    /// Move backward / down (default: S, ArrowDown)
    MoveBack,
    /// Move left (default: A, ArrowLeft)
    MoveLeft,
    /// Move right (default: D, ArrowRight)
    MoveRight,
    /// Jump (default: Space)
    Jump,
    /// Sprint modifier (default: Shift)
    Sprint,
    /// Restore camera defaults (Home)
    ResetCamera,
}

/// Key used for the camera reset action; not user-configurable.
pub const RESET_CAMERA_KEY: KeyCode = KeyCode::Home;

/// Maps physical keys to logical actions.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    key_to_action: HashMap<KeyCode, InputAction>,
    action_to_keys: HashMap<InputAction, Vec<KeyCode>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_settings(&KeySettings::default())
    }
}

impl KeyBindings {
    /// Build bindings from the `keys` configuration section.
    pub fn from_settings(keys: &KeySettings) -> Self {
        let mut bindings = Self {
            key_to_action: HashMap::new(),
            action_to_keys: HashMap::new(),
        };

        bindings.bind(keys.forward, InputAction::MoveForward);
        bindings.bind(keys.forward_alt, InputAction::MoveForward);
        bindings.bind(keys.backward, InputAction::MoveBack);
        bindings.bind(keys.backward_alt, InputAction::MoveBack);
        bindings.bind(keys.left, InputAction::MoveLeft);
        bindings.bind(keys.left_alt, InputAction::MoveLeft);
        bindings.bind(keys.right, InputAction::MoveRight);
        bindings.bind(keys.right_alt, InputAction::MoveRight);
        bindings.bind(keys.jump, InputAction::Jump);
        bindings.bind(keys.sprint, InputAction::Sprint);
        bindings.bind(RESET_CAMERA_KEY, InputAction::ResetCamera);

        bindings
    }

    /// Bind a physical key to an action.
    ///
    /// A key maps to one action at a time; rebinding a key removes it from
    /// its previous action. An action may keep several keys.
    pub fn bind(&mut self, key: KeyCode, action: InputAction) {
        if key == KeyCode::Unknown {
            return;
        }
        if let Some(old_action) = self.key_to_action.insert(key, action) {
            if let Some(keys) = self.action_to_keys.get_mut(&old_action) {
                keys.retain(|k| *k != key);
            }
        }
        let keys = self.action_to_keys.entry(action).or_default();
        if !keys.contains(&key) {
            keys.push(key);
        }
    }

    /// Remove the binding for a specific key.
    pub fn unbind_key(&mut self, key: KeyCode) {
        if let Some(action) = self.key_to_action.remove(&key) {
            if let Some(keys) = self.action_to_keys.get_mut(&action) {
                keys.retain(|k| *k != key);
            }
        }
    }

    /// Get the action bound to a physical key, if any.
    pub fn get_action(&self, key: KeyCode) -> Option<InputAction> {
        self.key_to_action.get(&key).copied()
    }

    /// Keys bound to an action, in binding order.
    pub fn keys_for(&self, action: InputAction) -> &[KeyCode] {
        self.action_to_keys
            .get(&action)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Check if any key bound to `action` is in the pressed set.
    pub fn is_action_pressed(&self, action: InputAction, pressed_keys: &HashSet<KeyCode>) -> bool {
        self.keys_for(action).iter().any(|k| pressed_keys.contains(k))
    }
}
