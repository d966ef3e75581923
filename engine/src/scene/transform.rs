//! Transform
//!
//! Position / rotation / scale of a scene entity. Conventions:
//! - +Y is up
//! - entities face local +Z, so yaw `atan2(dx, dz)` faces direction (dx, dz)
//! - cameras look down local -Z

use glam::{EulerRot, Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Rotation about +Y in radians.
    pub fn yaw(&self) -> f32 {
        let (yaw, _, _) = self.rotation.to_euler(EulerRot::YXZ);
        yaw
    }

    /// Replace the rotation with a pure yaw.
    pub fn set_yaw(&mut self, yaw: f32) {
        self.rotation = Quat::from_rotation_y(yaw);
    }

    /// Direction an entity faces (local +Z).
    pub fn facing(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Direction a camera looks (local -Z).
    pub fn view_direction(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Camera view direction flattened onto the XZ plane.
    ///
    /// Falls back to -Z when looking straight up or down.
    pub fn horizontal_view_direction(&self) -> Vec3 {
        let dir = self.view_direction();
        let flat = Vec3::new(dir.x, 0.0, dir.z);
        if flat.length_squared() < 1e-8 {
            Vec3::NEG_Z
        } else {
            flat.normalize()
        }
    }

    /// Orient a camera at `self.position` toward `target`.
    pub fn look_at(&mut self, target: Vec3) {
        if let Some(rotation) = look_rotation(target - self.position) {
            self.rotation = rotation;
        }
    }
}

/// Rotation whose local -Z points along `direction` with +Y kept upright.
///
/// Returns `None` for a zero-length direction.
pub fn look_rotation(direction: Vec3) -> Option<Quat> {
    let forward = direction.try_normalize()?;

    // Looking straight up or down - use world X as the right vector
    let right = if forward.y.abs() > 0.999 {
        Vec3::X
    } else {
        forward.cross(Vec3::Y).normalize()
    };
    let up = right.cross(forward);

    Some(Quat::from_mat3(&Mat3::from_cols(right, up, -forward)))
}
