//! Scene Module
//!
//! The control layer's view of the external scene graph: entity traversal,
//! flags, transforms, camera lenses, ground markers and the optional 2D
//! camera. The scene graph is acyclic by contract; controllers only read
//! flags and read/write transforms, they never restructure the hierarchy.

pub mod camera_2d;
pub mod memory;
pub mod transform;

pub use camera_2d::{Camera2D, OrthoCamera2D};
pub use memory::{EntityDescription, MemoryScene, SceneDescription};
pub use transform::{Transform, look_rotation};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::CursorStyle;

/// Stable handle of a scene entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u32);

/// Handle of a transient ground marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerId(pub u32);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    #[default]
    Object,
    Camera,
}

/// Flags and stored settings of one entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntityInfo {
    pub name: String,
    pub kind: EntityKind,
    pub parent: Option<EntityId>,
    /// Locked entities are never picked as the controlled entity
    pub locked: bool,
    pub is_controllable: bool,
    pub is_primary_camera: bool,
    /// `firstPerson`, `clickToMove`, anything else means third person
    pub camera_mode: Option<String>,
    /// Stored `cameraSettings` overrides
    pub camera_settings: Option<Value>,
    /// Stored `controlSettings` overrides
    pub control_settings: Option<Value>,
}

impl EntityInfo {
    pub fn is_camera(&self) -> bool {
        self.kind == EntityKind::Camera
    }
}

/// Projection parameters of a 3D camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraLens {
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Viewport width in pixels
    pub width: f32,
    /// Viewport height in pixels
    pub height: f32,
}

impl Default for CameraLens {
    fn default() -> Self {
        Self {
            fov: 60.0,
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl CameraLens {
    pub fn aspect_ratio(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

/// Errors from scene traversal. These indicate programming defects (a
/// stale entity handle, a non-camera used as a camera) and propagate.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    UnknownEntity(EntityId),
    NotACamera(EntityId),
    NoDefaultCamera,
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::UnknownEntity(id) => write!(f, "unknown entity {}", id.0),
            SceneError::NotACamera(id) => write!(f, "entity {} is not a camera", id.0),
            SceneError::NoDefaultCamera => write!(f, "scene cannot provide a default camera"),
        }
    }
}

impl std::error::Error for SceneError {}

/// The scene graph as seen by controllers.
pub trait SceneGraph {
    /// All entities in traversal order.
    fn entities(&self) -> Result<Vec<EntityId>, SceneError>;
    fn entity_info(&self, id: EntityId) -> Result<EntityInfo, SceneError>;
    fn transform(&self, id: EntityId) -> Result<Transform, SceneError>;
    fn set_transform(&mut self, id: EntityId, transform: Transform) -> Result<(), SceneError>;

    /// The scene's fallback camera, created on demand.
    fn default_camera(&mut self) -> Result<EntityId, SceneError>;
    fn camera_lens(&self, camera: EntityId) -> Result<CameraLens, SceneError>;
    fn set_camera_fov(&mut self, camera: EntityId, fov_degrees: f32) -> Result<(), SceneError>;

    /// Create a hidden ground marker.
    fn spawn_marker(&mut self) -> MarkerId;
    fn set_marker(&mut self, marker: MarkerId, position: Vec3, visible: bool);
    fn remove_marker(&mut self, marker: MarkerId);

    fn set_cursor_style(&mut self, _style: CursorStyle) {}

    /// The planar camera, for scenes that have one.
    fn camera_2d(&mut self) -> Option<&mut dyn Camera2D> {
        None
    }
}

/// Read-modify-write helper for a single transform.
pub fn update_transform<S, F>(scene: &mut S, id: EntityId, f: F) -> Result<Transform, SceneError>
where
    S: SceneGraph + ?Sized,
    F: FnOnce(&mut Transform),
{
    let mut transform = scene.transform(id)?;
    f(&mut transform);
    scene.set_transform(id, transform)?;
    Ok(transform)
}
