//! Point Navigator
//!
//! Click-to-navigate in 3D. A primary click is unprojected into a ray from
//! the camera and intersected with the horizontal plane at the entity's
//! height; a hit becomes the navigation target and a ground marker shows
//! it. Each frame the entity turns toward the target along the shortest
//! arc and walks to it. A new click replaces the target; there is no queue.

use std::any::Any;

use glam::Vec3;

use super::{ControlContext, Controller, ControllerRole, release_listener};
use crate::camera::raycast::raycast_to_plane;
use crate::camera::smoothing::lerp_angle;
use crate::config::ControlConfiguration;
use crate::input::{ChannelSet, InputEvent, InputResponse, ListenerId, MouseButton, Position};
use crate::scene::{EntityId, MarkerId, SceneError, update_transform};

#[derive(Debug, Clone)]
pub struct PointNavigator {
    entity: EntityId,
    camera: EntityId,
    config: ControlConfiguration,
    target: Option<Vec3>,
    marker: Option<MarkerId>,
    listener: Option<ListenerId>,
    enabled: bool,
}

impl PointNavigator {
    pub fn new(entity: EntityId, camera: EntityId, config: ControlConfiguration) -> Self {
        Self {
            entity,
            camera,
            config,
            target: None,
            marker: None,
            listener: None,
            enabled: false,
        }
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// Current navigation target, if any.
    pub fn target(&self) -> Option<Vec3> {
        self.target
    }

    pub fn marker(&self) -> Option<MarkerId> {
        self.marker
    }

    /// Set the navigation target directly and show the marker there.
    pub fn navigate_to(&mut self, target: Vec3, ctx: &mut ControlContext<'_>) {
        self.target = Some(target);
        if let Some(marker) = self.marker {
            ctx.scene.set_marker(marker, target, true);
        }
        log::debug!("navigation target set to {:?}", target);
    }

    fn click(&mut self, at: Position, ctx: &mut ControlContext<'_>) -> Result<(), SceneError> {
        let entity_y = ctx.scene.transform(self.entity)?.position.y;
        let camera = ctx.scene.transform(self.camera)?;
        let lens = ctx.scene.camera_lens(self.camera)?;

        match raycast_to_plane(&camera, &lens, at.x, at.y, entity_y) {
            Some(hit) => self.navigate_to(Vec3::new(hit.x, entity_y, hit.z), ctx),
            None => log::debug!("click at ({}, {}) missed the ground plane", at.x, at.y),
        }
        Ok(())
    }

    fn arrive(&mut self, ctx: &mut ControlContext<'_>) {
        self.target = None;
        if let Some(marker) = self.marker {
            ctx.scene.set_marker(marker, Vec3::ZERO, false);
        }
    }
}

impl Controller for PointNavigator {
    fn name(&self) -> &'static str {
        "PointNavigator"
    }

    fn role(&self) -> ControllerRole {
        ControllerRole::Movement
    }

    fn enable(&mut self, ctx: &mut ControlContext<'_>) -> Result<(), SceneError> {
        release_listener(ctx.input, &mut self.listener);
        self.target = None;
        if self.marker.is_none() {
            self.marker = Some(ctx.scene.spawn_marker());
        }

        self.listener = Some(ctx.input.attach(self.name(), ChannelSet::POINTER));
        self.enabled = true;
        Ok(())
    }

    fn disable(&mut self, ctx: &mut ControlContext<'_>) -> Result<(), SceneError> {
        release_listener(ctx.input, &mut self.listener);
        if let Some(marker) = self.marker.take() {
            ctx.scene.remove_marker(marker);
        }
        self.target = None;
        self.enabled = false;
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn listener(&self) -> Option<ListenerId> {
        self.listener
    }

    fn handle_input(
        &mut self,
        event: &InputEvent,
        ctx: &mut ControlContext<'_>,
    ) -> Result<InputResponse, SceneError> {
        match event {
            InputEvent::PointerDown {
                button: MouseButton::Left,
                position,
                ..
            } => {
                self.click(*position, ctx)?;
                Ok(InputResponse::Consumed)
            }
            InputEvent::ContextMenu { .. } => Ok(InputResponse::Consumed),
            _ => Ok(InputResponse::Ignored),
        }
    }

    fn update(&mut self, dt: f32, ctx: &mut ControlContext<'_>) -> Result<(), SceneError> {
        let Some(target) = self.target else {
            return Ok(());
        };

        let position = ctx.scene.transform(self.entity)?.position;
        let delta = Vec3::new(target.x - position.x, 0.0, target.z - position.z);
        let distance = delta.length();

        if distance < self.config.movement.click_stop_distance || distance <= f32::EPSILON {
            self.arrive(ctx);
            log::debug!("navigation target reached");
            return Ok(());
        }

        let direction = delta / distance;
        let step = (self.config.movement.speed * dt).min(distance);
        let turn = self.config.movement.rotation_speed * dt;
        let goal_yaw = direction.x.atan2(direction.z);

        update_transform(ctx.scene, self.entity, |t| {
            t.set_yaw(lerp_angle(t.yaw(), goal_yaw, turn));
            t.position += direction * step;
        })?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
