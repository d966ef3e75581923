//! Movement Intent
//!
//! Tracks which bound keys are held and turns them into a per-frame
//! [`MovementIntent`]. Also remembers which axis was pressed most recently
//! and latches taps, both needed by grid stepping.

use std::collections::HashSet;

use glam::IVec2;

use crate::input::{InputAction, KeyBindings, KeyCode};

/// Transient per-frame movement request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub sprint: bool,
}

impl MovementIntent {
    /// Forward/backward direction (-1, 0, or 1).
    pub fn forward_axis(&self) -> f32 {
        (self.forward as i32 - self.backward as i32) as f32
    }

    /// Left/right direction (-1, 0, or 1).
    pub fn right_axis(&self) -> f32 {
        (self.right as i32 - self.left as i32) as f32
    }

    pub fn is_moving(&self) -> bool {
        self.forward_axis() != 0.0 || self.right_axis() != 0.0
    }
}

/// Input axis, for the grid-mode tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Held-key bookkeeping for one controller.
#[derive(Debug, Clone)]
pub struct KeyTracker {
    bindings: KeyBindings,
    held: HashSet<KeyCode>,
    last_axis: Option<Axis>,
    /// Direction of the latest press, kept until consumed so a tap shorter
    /// than a frame still produces one grid step.
    pending_step: Option<IVec2>,
}

impl KeyTracker {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            held: HashSet::new(),
            last_axis: None,
            pending_step: None,
        }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Record a key press. Returns the bound action, if any.
    pub fn key_down(&mut self, key: KeyCode) -> Option<InputAction> {
        let action = self.bindings.get_action(key)?;
        self.held.insert(key);

        let step = match action {
            InputAction::MoveForward => Some(IVec2::new(0, 1)),
            InputAction::MoveBack => Some(IVec2::new(0, -1)),
            InputAction::MoveLeft => Some(IVec2::new(-1, 0)),
            InputAction::MoveRight => Some(IVec2::new(1, 0)),
            _ => None,
        };
        if let Some(step) = step {
            self.last_axis = Some(if step.x != 0 {
                Axis::Horizontal
            } else {
                Axis::Vertical
            });
            self.pending_step = Some(step);
        }
        Some(action)
    }

    /// Record a key release. Returns the bound action, if any.
    pub fn key_up(&mut self, key: KeyCode) -> Option<InputAction> {
        self.held.remove(&key);
        self.bindings.get_action(key)
    }

    /// Forget all held keys (focus loss, enable/disable).
    pub fn clear(&mut self) {
        self.held.clear();
        self.last_axis = None;
        self.pending_step = None;
    }

    pub fn is_held(&self, action: InputAction) -> bool {
        self.bindings.is_action_pressed(action, &self.held)
    }

    pub fn intent(&self) -> MovementIntent {
        MovementIntent {
            forward: self.is_held(InputAction::MoveForward),
            backward: self.is_held(InputAction::MoveBack),
            left: self.is_held(InputAction::MoveLeft),
            right: self.is_held(InputAction::MoveRight),
            jump: self.is_held(InputAction::Jump),
            sprint: self.is_held(InputAction::Sprint),
        }
    }

    pub fn last_axis(&self) -> Option<Axis> {
        self.last_axis
    }

    /// Next one-tile step for grid movement, consuming any latched tap.
    ///
    /// `x` is right (+) / left (-), `y` is forward or up (+) / back (-).
    /// With both axes held, horizontal wins unless the vertical axis was
    /// pressed more recently.
    pub fn next_grid_step(&mut self) -> Option<IVec2> {
        let latched = self.pending_step.take();
        let intent = self.intent();
        let h = intent.right_axis() as i32;
        let v = intent.forward_axis() as i32;

        match (h != 0, v != 0) {
            (true, true) => {
                if self.last_axis == Some(Axis::Vertical) {
                    Some(IVec2::new(0, v))
                } else {
                    Some(IVec2::new(h, 0))
                }
            }
            (true, false) => Some(IVec2::new(h, 0)),
            (false, true) => Some(IVec2::new(0, v)),
            (false, false) => latched,
        }
    }
}
