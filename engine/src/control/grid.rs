//! Grid Transition
//!
//! One animated tile step. Progress advances by `(speed / tile_size) * dt`
//! and the position eases between start and target; once progress reaches
//! 1 the position snaps exactly onto the target tile. Progress within
//! `FINISH_EPSILON` of 1 counts as finished, so a step of `tile / speed`
//! seconds takes a whole number of frames despite f32 accumulation.

use glam::Vec3;

use crate::camera::smoothing::ease_in_out_quad;

/// Tolerance on accumulated progress when finishing a step
pub const FINISH_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GridTransition {
    pub is_moving: bool,
    pub start: Vec3,
    pub target: Vec3,
    /// Normalized progress in [0, 1]
    pub progress: f32,
}

impl GridTransition {
    pub fn begin(&mut self, start: Vec3, target: Vec3) {
        self.is_moving = true;
        self.start = start;
        self.target = target;
        self.progress = 0.0;
    }

    /// Advance the transition and return the entity's new position.
    pub fn advance(&mut self, dt: f32, speed: f32, tile_size: f32) -> Vec3 {
        if !self.is_moving {
            return self.target;
        }

        self.progress += (speed / tile_size) * dt;
        if self.progress >= 1.0 - FINISH_EPSILON {
            self.progress = 1.0;
            self.is_moving = false;
            return self.target;
        }

        self.start.lerp(self.target, ease_in_out_quad(self.progress))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
