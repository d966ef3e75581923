//! Config Module
//!
//! Per-entity control configuration and camera settings. Stored overrides are
//! partial JSON objects; every field missing from them resolves to a
//! documented default, so downstream code never sees an absent value.

pub mod camera_settings;
pub mod control;

pub use camera_settings::CameraSettings;
pub use control::{
    CameraFollowMode, CameraFollowSettings, ControlConfiguration, CursorStyle, KeySettings,
    MouseSettings, MovementSettings,
};

use serde_json::Value;

/// Errors raised while parsing stored configuration at the boundary.
#[derive(Debug)]
pub enum ConfigError {
    /// Overrides were not valid for the configuration schema.
    Json(serde_json::Error),
    /// A numeric field was outside its accepted range.
    InvalidValue { field: &'static str, value: f32 },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Json(e) => write!(f, "invalid configuration: {e}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "invalid value {value} for {field}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Json(e) => Some(e),
            ConfigError::InvalidValue { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

/// Recursively merge `patch` into `base`. Objects merge key by key, any other
/// value (including arrays and `null`-free scalars) replaces the base value.
/// `null` in the patch leaves the base untouched.
pub fn merge_json(base: &mut Value, patch: &Value) {
    match (base, patch) {
        (Value::Object(base_map), Value::Object(patch_map)) => {
            for (key, patch_value) in patch_map {
                match base_map.get_mut(key) {
                    Some(base_value) => merge_json(base_value, patch_value),
                    None => {
                        if !patch_value.is_null() {
                            base_map.insert(key.clone(), patch_value.clone());
                        }
                    }
                }
            }
        }
        (_, Value::Null) => {}
        (base, patch) => *base = patch.clone(),
    }
}

/// Reject non-finite or negative values for fields that must be `>= 0`.
pub(crate) fn ensure_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { field, value })
    }
}

/// Reject non-finite or non-positive values for fields that must be `> 0`.
pub(crate) fn ensure_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_nested_objects() {
        let mut base = json!({"movement": {"speed": 5.0, "gravity": 0.0}, "mouse": {"invertY": false}});
        merge_json(&mut base, &json!({"movement": {"speed": 8.0}}));
        assert_eq!(base["movement"]["speed"], json!(8.0));
        assert_eq!(base["movement"]["gravity"], json!(0.0));
        assert_eq!(base["mouse"]["invertY"], json!(false));
    }

    #[test]
    fn test_merge_null_keeps_base() {
        let mut base = json!({"speed": 5.0});
        merge_json(&mut base, &json!({"speed": null, "extra": null}));
        assert_eq!(base, json!({"speed": 5.0}));
    }

    #[test]
    fn test_range_checks() {
        assert!(ensure_non_negative("gravity", 0.0).is_ok());
        assert!(ensure_non_negative("gravity", -1.0).is_err());
        assert!(ensure_positive("tileSize", 0.0).is_err());
        assert!(ensure_positive("tileSize", f32::NAN).is_err());
        let err = ensure_positive("tileSize", -2.0).unwrap_err();
        assert_eq!(err.to_string(), "invalid value -2 for tileSize");
    }
}
