//! Control Configuration
//!
//! Movement, key, mouse and camera-follow settings for one controllable
//! entity. Read once when a controller is constructed and never mutated by
//! the controller afterwards.
//!
//! JSON keys are camelCase (`movement.sprintMultiplier`, `keys.forwardAlt`,
//! `mouse.invertY`, `camera.followSmoothing`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ConfigError, ensure_non_negative, ensure_positive, merge_json};
use crate::input::KeyCode;

/// Movement tuning (`movement.*`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MovementSettings {
    /// Base speed in units per second
    pub speed: f32,
    /// Multiplier applied while sprint is held
    pub sprint_multiplier: f32,
    /// Upward velocity applied on jump
    pub jump_force: f32,
    /// Downward acceleration; 0 disables gravity (free planar movement)
    pub gravity: f32,
    /// Facing interpolation rate (per second)
    pub rotation_speed: f32,
    pub click_to_move: bool,
    /// Arrival tolerance for click navigation
    pub click_stop_distance: f32,
    pub grid_movement: bool,
    pub tile_size: f32,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            speed: 5.0,
            sprint_multiplier: 2.0,
            jump_force: 8.0,
            gravity: 0.0,
            rotation_speed: 10.0,
            click_to_move: false,
            click_stop_distance: 0.2,
            grid_movement: false,
            tile_size: 1.0,
        }
    }
}

/// Key bindings (`keys.*`). Values are physical key codes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeySettings {
    pub forward: KeyCode,
    pub forward_alt: KeyCode,
    pub backward: KeyCode,
    pub backward_alt: KeyCode,
    pub left: KeyCode,
    pub left_alt: KeyCode,
    pub right: KeyCode,
    pub right_alt: KeyCode,
    pub jump: KeyCode,
    pub sprint: KeyCode,
}

impl Default for KeySettings {
    fn default() -> Self {
        Self {
            forward: KeyCode::KeyW,
            forward_alt: KeyCode::ArrowUp,
            backward: KeyCode::KeyS,
            backward_alt: KeyCode::ArrowDown,
            left: KeyCode::KeyA,
            left_alt: KeyCode::ArrowLeft,
            right: KeyCode::KeyD,
            right_alt: KeyCode::ArrowRight,
            jump: KeyCode::Space,
            sprint: KeyCode::ShiftLeft,
        }
    }
}

/// Pointer tuning (`mouse.*`).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MouseSettings {
    /// Degrees of rotation per pixel of drag
    pub sensitivity: f32,
    pub invert_y: bool,
    /// Scales wheel and pinch zoom steps
    pub zoom_speed: f32,
}

impl Default for MouseSettings {
    fn default() -> Self {
        Self {
            sensitivity: 0.3,
            invert_y: false,
            zoom_speed: 1.0,
        }
    }
}

/// How the 2D camera relates to the controlled entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraFollowMode {
    /// Camera continuously tracks the entity
    #[default]
    Follow,
    /// Camera is independently pannable
    Free,
}

/// Camera follow settings (`camera.*`).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraFollowSettings {
    pub mode: CameraFollowMode,
    /// Exponential smoothing rate for camera follow (per second)
    pub follow_smoothing: f32,
}

impl Default for CameraFollowSettings {
    fn default() -> Self {
        Self {
            mode: CameraFollowMode::Follow,
            follow_smoothing: 8.0,
        }
    }
}

/// Cursor shown while the scheme is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorStyle {
    #[default]
    Default,
    Pointer,
    Crosshair,
    Hidden,
}

/// Merged defaults + stored overrides for one controllable entity.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfiguration {
    pub movement: MovementSettings,
    pub keys: KeySettings,
    pub mouse: MouseSettings,
    pub camera: CameraFollowSettings,
    pub cursor: CursorStyle,
}

impl ControlConfiguration {
    /// Defaults merged with a stored override object.
    pub fn from_overrides(overrides: &Value) -> Result<Self, ConfigError> {
        Self::default().merged_with(overrides)
    }

    /// This configuration with `overrides` deep-merged on top.
    pub fn merged_with(&self, overrides: &Value) -> Result<Self, ConfigError> {
        let mut base = serde_json::to_value(self)?;
        merge_json(&mut base, overrides);
        let merged: Self = serde_json::from_value(base)?;
        merged.validate()?;
        Ok(merged)
    }

    /// Check numeric ranges that the controllers rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.movement;
        ensure_non_negative("movement.speed", m.speed)?;
        ensure_positive("movement.sprintMultiplier", m.sprint_multiplier)?;
        ensure_non_negative("movement.jumpForce", m.jump_force)?;
        ensure_non_negative("movement.gravity", m.gravity)?;
        ensure_non_negative("movement.rotationSpeed", m.rotation_speed)?;
        ensure_non_negative("movement.clickStopDistance", m.click_stop_distance)?;
        ensure_positive("movement.tileSize", m.tile_size)?;
        ensure_non_negative("mouse.sensitivity", self.mouse.sensitivity)?;
        ensure_non_negative("mouse.zoomSpeed", self.mouse.zoom_speed)?;
        ensure_non_negative("camera.followSmoothing", self.camera.follow_smoothing)?;
        Ok(())
    }

    /// Speed for this frame, with the sprint multiplier applied if held.
    pub fn effective_speed(&self, sprinting: bool) -> f32 {
        if sprinting {
            self.movement.speed * self.movement.sprint_multiplier
        } else {
            self.movement.speed
        }
    }

    pub fn set_speed(&mut self, speed: f32) -> &mut Self {
        self.movement.speed = speed;
        self
    }

    pub fn set_gravity(&mut self, gravity: f32, jump_force: f32) -> &mut Self {
        self.movement.gravity = gravity;
        self.movement.jump_force = jump_force;
        self
    }

    pub fn enable_grid(&mut self, tile_size: f32) -> &mut Self {
        self.movement.grid_movement = true;
        self.movement.tile_size = tile_size;
        self
    }

    pub fn enable_click_to_move(&mut self, stop_distance: f32) -> &mut Self {
        self.movement.click_to_move = true;
        self.movement.click_stop_distance = stop_distance;
        self
    }

    pub fn set_camera_mode(&mut self, mode: CameraFollowMode) -> &mut Self {
        self.camera.mode = mode;
        self
    }
}
