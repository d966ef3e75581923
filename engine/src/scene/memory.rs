//! In-Memory Scene
//!
//! A flat, vector-backed [`SceneGraph`] used by tests and the headless
//! simulator. Entity ids are indices into the entity list.

use std::collections::BTreeMap;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::{
    Camera2D, CameraLens, EntityId, EntityInfo, EntityKind, MarkerId, OrthoCamera2D, SceneError,
    SceneGraph, Transform,
};
use crate::config::CursorStyle;

/// Name of the camera created by [`SceneGraph::default_camera`].
pub const DEFAULT_CAMERA_NAME: &str = "Default Camera";
/// Where the default camera is placed when the scene has none.
const DEFAULT_CAMERA_POSITION: Vec3 = Vec3::new(0.0, 5.0, 10.0);

/// Serialized form of one entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityDescription {
    #[serde(flatten)]
    pub info: EntityInfo,
    pub transform: Transform,
    pub lens: Option<CameraLens>,
}

/// Serialized 2D camera.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Camera2DDescription {
    pub viewport: [f32; 2],
    pub zoom: f32,
}

/// Serialized scene, as read by the simulator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneDescription {
    pub entities: Vec<EntityDescription>,
    pub camera_2d: Option<Camera2DDescription>,
}

/// A transient ground marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub position: Vec3,
    pub visible: bool,
}

#[derive(Debug, Clone)]
struct SceneEntity {
    info: EntityInfo,
    transform: Transform,
    lens: Option<CameraLens>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryScene {
    entities: Vec<SceneEntity>,
    markers: BTreeMap<MarkerId, Marker>,
    next_marker: u32,
    cursor: CursorStyle,
    camera_2d: Option<OrthoCamera2D>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_description(description: SceneDescription) -> Self {
        let mut scene = Self::new();
        for entity in description.entities {
            let lens = match entity.info.kind {
                EntityKind::Camera => Some(entity.lens.unwrap_or_default()),
                EntityKind::Object => None,
            };
            scene.entities.push(SceneEntity {
                info: entity.info,
                transform: entity.transform,
                lens,
            });
        }
        if let Some(cam) = description.camera_2d {
            scene.camera_2d = Some(OrthoCamera2D::new(
                Vec2::new(cam.viewport[0], cam.viewport[1]),
                cam.zoom,
            ));
        }
        scene
    }

    pub fn add_entity(&mut self, info: EntityInfo, transform: Transform) -> EntityId {
        let id = EntityId(self.entities.len() as u32);
        let lens = info.is_camera().then(CameraLens::default);
        self.entities.push(SceneEntity {
            info,
            transform,
            lens,
        });
        id
    }

    /// Add a camera entity with an explicit lens.
    pub fn add_camera(
        &mut self,
        name: &str,
        transform: Transform,
        lens: CameraLens,
        primary: bool,
    ) -> EntityId {
        let id = self.add_entity(
            EntityInfo {
                name: name.to_string(),
                kind: EntityKind::Camera,
                is_primary_camera: primary,
                ..Default::default()
            },
            transform,
        );
        self.entities[id.0 as usize].lens = Some(lens);
        id
    }

    pub fn with_camera_2d(mut self, camera: OrthoCamera2D) -> Self {
        self.camera_2d = Some(camera);
        self
    }

    /// Mutable access to stored flags, for test setup.
    pub fn info_mut(&mut self, id: EntityId) -> Option<&mut EntityInfo> {
        self.entities.get_mut(id.0 as usize).map(|e| &mut e.info)
    }

    pub fn marker(&self, id: MarkerId) -> Option<Marker> {
        self.markers.get(&id).copied()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Marker currently shown, if any.
    pub fn visible_marker(&self) -> Option<Marker> {
        self.markers.values().find(|m| m.visible).copied()
    }

    pub fn cursor_style(&self) -> CursorStyle {
        self.cursor
    }

    pub fn ortho_camera_2d(&self) -> Option<&OrthoCamera2D> {
        self.camera_2d.as_ref()
    }

    pub fn ortho_camera_2d_mut(&mut self) -> Option<&mut OrthoCamera2D> {
        self.camera_2d.as_mut()
    }

    /// Advance the 2D camera toward its follow target.
    pub fn track_camera_2d(&mut self, dt: f32) {
        let Some(target) = self.camera_2d.as_ref().and_then(|c| c.follow_target()) else {
            return;
        };
        let Some(entity) = self.entities.get(target.0 as usize) else {
            return;
        };
        let position = entity.transform.position.truncate();
        if let Some(camera) = self.camera_2d.as_mut() {
            camera.track(position, dt);
        }
    }

    fn entity(&self, id: EntityId) -> Result<&SceneEntity, SceneError> {
        self.entities
            .get(id.0 as usize)
            .ok_or(SceneError::UnknownEntity(id))
    }

    fn entity_mut(&mut self, id: EntityId) -> Result<&mut SceneEntity, SceneError> {
        self.entities
            .get_mut(id.0 as usize)
            .ok_or(SceneError::UnknownEntity(id))
    }
}

impl SceneGraph for MemoryScene {
    fn entities(&self) -> Result<Vec<EntityId>, SceneError> {
        Ok((0..self.entities.len() as u32).map(EntityId).collect())
    }

    fn entity_info(&self, id: EntityId) -> Result<EntityInfo, SceneError> {
        Ok(self.entity(id)?.info.clone())
    }

    fn transform(&self, id: EntityId) -> Result<Transform, SceneError> {
        Ok(self.entity(id)?.transform)
    }

    fn set_transform(&mut self, id: EntityId, transform: Transform) -> Result<(), SceneError> {
        self.entity_mut(id)?.transform = transform;
        Ok(())
    }

    fn default_camera(&mut self) -> Result<EntityId, SceneError> {
        let existing = self
            .entities
            .iter()
            .position(|e| e.info.is_camera() && e.info.name == DEFAULT_CAMERA_NAME);
        if let Some(index) = existing {
            return Ok(EntityId(index as u32));
        }

        let mut transform = Transform::from_position(DEFAULT_CAMERA_POSITION);
        transform.look_at(Vec3::ZERO);
        Ok(self.add_camera(DEFAULT_CAMERA_NAME, transform, CameraLens::default(), false))
    }

    fn camera_lens(&self, camera: EntityId) -> Result<CameraLens, SceneError> {
        self.entity(camera)?
            .lens
            .ok_or(SceneError::NotACamera(camera))
    }

    fn set_camera_fov(&mut self, camera: EntityId, fov_degrees: f32) -> Result<(), SceneError> {
        let lens = self
            .entity_mut(camera)?
            .lens
            .as_mut()
            .ok_or(SceneError::NotACamera(camera))?;
        lens.fov = fov_degrees;
        Ok(())
    }

    fn spawn_marker(&mut self) -> MarkerId {
        let id = MarkerId(self.next_marker);
        self.next_marker += 1;
        self.markers.insert(
            id,
            Marker {
                position: Vec3::ZERO,
                visible: false,
            },
        );
        id
    }

    fn set_marker(&mut self, marker: MarkerId, position: Vec3, visible: bool) {
        if let Some(m) = self.markers.get_mut(&marker) {
            m.position = position;
            m.visible = visible;
        }
    }

    fn remove_marker(&mut self, marker: MarkerId) {
        self.markers.remove(&marker);
    }

    fn set_cursor_style(&mut self, style: CursorStyle) {
        self.cursor = style;
    }

    fn camera_2d(&mut self) -> Option<&mut dyn Camera2D> {
        self.camera_2d.as_mut().map(|c| c as &mut dyn Camera2D)
    }
}
