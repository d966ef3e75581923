//! Camera Settings
//!
//! Initial third-person framing stored on the controllable entity
//! (`cameraSettings.*`): height above and distance behind the target, the
//! starting orbit angle and the field of view, all in scene units / degrees.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ConfigError, ensure_positive, merge_json};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Camera height above the target
    pub height: f32,
    /// Horizontal distance behind the target
    pub distance: f32,
    /// Initial orbit yaw in degrees
    pub angle: f32,
    /// Vertical field of view in degrees
    pub fov: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            height: 5.0,
            distance: 10.0,
            angle: 0.0,
            fov: 60.0,
        }
    }
}

impl CameraSettings {
    /// Defaults merged with a stored override object.
    pub fn from_overrides(overrides: &Value) -> Result<Self, ConfigError> {
        let mut base = serde_json::to_value(Self::default())?;
        merge_json(&mut base, overrides);
        let settings: Self = serde_json::from_value(base)?;
        ensure_positive("cameraSettings.fov", settings.fov)?;
        Ok(settings)
    }

    /// Pitch implied by height and distance, in degrees.
    pub fn initial_pitch(&self) -> f32 {
        self.height.atan2(self.distance).to_degrees()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_initial_pitch() {
        let settings = CameraSettings {
            height: 10.0,
            distance: 10.0,
            ..Default::default()
        };
        assert!((settings.initial_pitch() - 45.0).abs() < 1e-4);
    }

    #[test]
    fn test_overrides() {
        let settings = CameraSettings::from_overrides(&json!({"fov": 75.0})).unwrap();
        assert_eq!(settings.fov, 75.0);
        assert_eq!(settings.distance, 10.0);
        assert!(CameraSettings::from_overrides(&json!({"fov": 0.0})).is_err());
    }
}
