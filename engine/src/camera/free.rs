//! Free Camera
//!
//! Fly camera used when the scene has no controllable entity. Starts where
//! the previous camera was (never below `MIN_HEIGHT`), flies along the view
//! direction with WASD, rises with jump, and looks around with a right
//! drag or pointer-locked motion.

use std::any::Any;
use std::f32::consts::TAU;

use glam::Vec3;

use crate::config::ControlConfiguration;
use crate::control::{ControlContext, Controller, ControllerRole, KeyTracker, release_listener};
use crate::input::{ChannelSet, InputEvent, InputResponse, KeyBindings, ListenerId, MouseButton, Position};
use crate::scene::{EntityId, SceneError, look_rotation, update_transform};

/// Lowest starting height of the free camera
pub const MIN_HEIGHT: f32 = 1.7;

const PITCH_LIMIT: f32 = 89.0 * std::f32::consts::PI / 180.0;

#[derive(Clone, Debug)]
pub struct FreeCamera {
    camera: EntityId,
    config: ControlConfiguration,
    keys: KeyTracker,
    /// Radians; yaw 0 looks along -Z
    yaw: f32,
    pitch: f32,
    position: Vec3,
    looking: bool,
    last_pointer: Option<Position>,
    listener: Option<ListenerId>,
    enabled: bool,
}

impl FreeCamera {
    pub fn new(camera: EntityId, config: ControlConfiguration) -> Self {
        let keys = KeyTracker::new(KeyBindings::from_settings(&config.keys));
        Self {
            camera,
            config,
            keys,
            yaw: 0.0,
            pitch: 0.0,
            position: Vec3::ZERO,
            looking: false,
            last_pointer: None,
            listener: None,
            enabled: false,
        }
    }

    pub fn camera(&self) -> EntityId {
        self.camera
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// View direction from yaw and pitch.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            -self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            -self.yaw.cos() * self.pitch.cos(),
        )
    }

    fn look(&mut self, dx: f32, dy: f32) {
        let sensitivity = self.config.mouse.sensitivity.to_radians();
        let dy = if self.config.mouse.invert_y { -dy } else { dy };
        self.yaw = (self.yaw - dx * sensitivity).rem_euclid(TAU);
        self.pitch = (self.pitch - dy * sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    fn write_camera(&self, ctx: &mut ControlContext<'_>) -> Result<(), SceneError> {
        let position = self.position;
        let rotation = look_rotation(self.forward());
        update_transform(ctx.scene, self.camera, |t| {
            t.position = position;
            if let Some(rotation) = rotation {
                t.rotation = rotation;
            }
        })?;
        Ok(())
    }
}

impl Controller for FreeCamera {
    fn name(&self) -> &'static str {
        "FreeCamera"
    }

    fn role(&self) -> ControllerRole {
        ControllerRole::Camera
    }

    fn enable(&mut self, ctx: &mut ControlContext<'_>) -> Result<(), SceneError> {
        release_listener(ctx.input, &mut self.listener);
        self.keys.clear();
        self.looking = false;
        self.last_pointer = None;

        let current = ctx.scene.transform(self.camera)?;
        self.position = current.position;
        self.position.y = self.position.y.max(MIN_HEIGHT);

        let dir = current.view_direction();
        self.yaw = (-dir.x).atan2(-dir.z).rem_euclid(TAU);
        self.pitch = dir.y.clamp(-1.0, 1.0).asin().clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.write_camera(ctx)?;

        self.listener = Some(ctx.input.attach(self.name(), ChannelSet::KEYBOARD_AND_POINTER));
        self.enabled = true;
        Ok(())
    }

    fn disable(&mut self, ctx: &mut ControlContext<'_>) -> Result<(), SceneError> {
        release_listener(ctx.input, &mut self.listener);
        self.keys.clear();
        self.looking = false;
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
        _ctx: &mut ControlContext<'_>,
    ) -> Result<InputResponse, SceneError> {
        let response = match event {
            InputEvent::KeyDown(key) => match self.keys.key_down(*key) {
                Some(_) => InputResponse::Consumed,
                None => InputResponse::Ignored,
            },
            InputEvent::KeyUp(key) => match self.keys.key_up(*key) {
                Some(_) => InputResponse::Consumed,
                None => InputResponse::Ignored,
            },
            InputEvent::PointerDown { button, position, .. } if *button == MouseButton::Right => {
                self.looking = true;
                self.last_pointer = Some(*position);
                InputResponse::Consumed
            }
            InputEvent::PointerUp { button, .. } if *button == MouseButton::Right => {
                self.looking = false;
                InputResponse::Consumed
            }
            InputEvent::PointerMove {
                movement: Some((dx, dy)),
                ..
            } => {
                self.look(*dx, *dy);
                InputResponse::Consumed
            }
            InputEvent::PointerMove { position, .. } if self.looking => {
                if let Some(last) = self.last_pointer {
                    let (dx, dy) = position.delta_from(&last);
                    self.look(dx, dy);
                }
                self.last_pointer = Some(*position);
                InputResponse::Consumed
            }
            InputEvent::FocusLost => {
                self.keys.clear();
                self.looking = false;
                InputResponse::Ignored
            }
            _ => InputResponse::Ignored,
        };
        Ok(response)
    }

    fn update(&mut self, dt: f32, ctx: &mut ControlContext<'_>) -> Result<(), SceneError> {
        if !self.enabled {
            return Ok(());
        }

        let intent = self.keys.intent();
        let forward = self.forward();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let rise = if intent.jump { 1.0 } else { 0.0 };

        let wish = forward * intent.forward_axis() + right * intent.right_axis() + Vec3::Y * rise;
        let wish = wish.normalize_or_zero();
        if wish != Vec3::ZERO {
            self.position += wish * self.config.effective_speed(intent.sprint) * dt;
        }

        self.write_camera(ctx)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputRouter, KeyCode};
    use crate::scene::{MemoryScene, SceneGraph, Transform};

    #[test]
    fn test_starts_at_previous_camera_above_min_height() {
        let mut scene = MemoryScene::new();
        let mut start = Transform::from_position(Vec3::new(4.0, 0.5, 2.0));
        start.look_at(Vec3::new(4.0, 0.5, -10.0));
        let camera = scene.add_camera("Main", start, Default::default(), true);

        let mut input = InputRouter::new();
        let mut free = FreeCamera::new(camera, ControlConfiguration::default());
        let mut ctx = ControlContext::new(&mut scene, &mut input);
        free.enable(&mut ctx).unwrap();

        let t = scene.transform(camera).unwrap();
        assert_eq!(t.position, Vec3::new(4.0, MIN_HEIGHT, 2.0));
        assert!((t.view_direction() - Vec3::NEG_Z).length() < 1e-3);
    }

    #[test]
    fn test_flies_forward_along_view() {
        let mut scene = MemoryScene::new();
        let mut start = Transform::from_position(Vec3::new(0.0, 5.0, 0.0));
        start.look_at(Vec3::new(10.0, 5.0, 0.0));
        let camera = scene.add_camera("Main", start, Default::default(), true);

        let mut input = InputRouter::new();
        let mut free = FreeCamera::new(camera, ControlConfiguration::default());
        let mut ctx = ControlContext::new(&mut scene, &mut input);
        free.enable(&mut ctx).unwrap();
        free.handle_input(&InputEvent::KeyDown(KeyCode::KeyW), &mut ctx).unwrap();
        free.update(1.0, &mut ctx).unwrap();

        // speed 5 along +X
        assert!((free.position() - Vec3::new(5.0, 5.0, 0.0)).length() < 1e-3);
    }
}
